use async_trait::async_trait;
use nnunet_inference::{
    engine::SegmentationEngine,
    storage::{ObjectLocation, ObjectStoreGateway},
    Error, Result,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock object-store gateway recording every call.
pub struct MockObjectStoreGateway {
    pub fetches: Arc<Mutex<Vec<(ObjectLocation, PathBuf)>>>,
    pub stores: Arc<Mutex<Vec<(PathBuf, ObjectLocation)>>>,
    pub fetch_error: Option<String>,
    pub store_error: Option<String>,
}

impl MockObjectStoreGateway {
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(Mutex::new(Vec::new())),
            stores: Arc::new(Mutex::new(Vec::new())),
            fetch_error: None,
            store_error: None,
        }
    }

    /// Makes `fetch` fail as if the object were missing.
    pub fn with_missing_object(mut self) -> Self {
        self.fetch_error = Some("missing".to_string());
        self
    }

    pub fn with_store_error(mut self, error: impl Into<String>) -> Self {
        self.store_error = Some(error.into());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn store_count(&self) -> usize {
        self.stores.lock().unwrap().len()
    }

    pub fn fetched(&self) -> Vec<(ObjectLocation, PathBuf)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<(PathBuf, ObjectLocation)> {
        self.stores.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStoreGateway for MockObjectStoreGateway {
    async fn fetch(&self, location: &ObjectLocation, dest: &Path) -> Result<()> {
        self.fetches
            .lock()
            .unwrap()
            .push((location.clone(), dest.to_path_buf()));

        if self.fetch_error.is_some() {
            return Err(Error::ObjectNotFound(location.uri()));
        }

        tokio::fs::write(dest, b"volume-bytes").await?;
        Ok(())
    }

    async fn store(&self, src: &Path, location: &ObjectLocation) -> Result<String> {
        self.stores
            .lock()
            .unwrap()
            .push((src.to_path_buf(), location.clone()));

        if let Some(ref error) = self.store_error {
            return Err(Error::transfer(error.clone()));
        }

        Ok(location.uri())
    }
}

impl Default for MockObjectStoreGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock segmentation engine writing configured output files into the output
/// directory. Construction counts as initialization so tests can assert the
/// engine is built exactly once per process.
pub struct MockSegmentationEngine {
    pub output_files: Vec<String>,
    pub error: Option<String>,
    pub runs: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    pub initializations: Arc<Mutex<usize>>,
}

impl MockSegmentationEngine {
    pub fn new(initializations: Arc<Mutex<usize>>) -> Self {
        *initializations.lock().unwrap() += 1;
        Self {
            output_files: vec!["seg.nii.gz".to_string()],
            error: None,
            runs: Arc::new(Mutex::new(Vec::new())),
            initializations,
        }
    }

    pub fn with_output_files(mut self, files: Vec<String>) -> Self {
        self.output_files = files;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    pub fn runs(&self) -> Vec<(PathBuf, PathBuf)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SegmentationEngine for MockSegmentationEngine {
    async fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        self.runs
            .lock()
            .unwrap()
            .push((input_dir.to_path_buf(), output_dir.to_path_buf()));

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        let mut produced = Vec::new();
        for name in &self.output_files {
            let path = output_dir.join(name);
            tokio::fs::write(&path, b"segmentation-mask").await?;
            produced.push(path);
        }
        produced.sort();
        Ok(produced)
    }
}
