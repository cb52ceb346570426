use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ephemeral working tree for one request: a unique root with `input/` and
/// `output/` subdirectories. The whole tree is removed when the value is
/// dropped, whichever way the request path exits.
pub struct StagingArea {
    root: TempDir,
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl StagingArea {
    pub fn acquire() -> Result<Self> {
        let root = tempfile::tempdir()?;
        let input_dir = root.path().join("input");
        let output_dir = root.path().join("output");
        std::fs::create_dir(&input_dir)?;
        std::fs::create_dir(&output_dir)?;

        Ok(Self {
            root,
            input_dir,
            output_dir,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
