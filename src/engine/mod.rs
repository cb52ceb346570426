mod nnunet;

pub use nnunet::NnUnetEngine;

use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait SegmentationEngine: Send + Sync {
    /// Segments every volume in `input_dir`, writing results into
    /// `output_dir`. Returns the files produced; producing none is not an
    /// error at this level.
    async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>>;
}
