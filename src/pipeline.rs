use crate::engine::SegmentationEngine;
use crate::staging::StagingArea;
use crate::storage::{ObjectLocation, ObjectStoreGateway};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

/// One entry of the prediction envelope returned to the serving platform.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub status: String,
    pub input_gcs_uri: String,
    pub output_gcs_uris: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Runs the download -> inference -> upload sequence for one request. The
/// collaborator handles are shared by all requests; the staging area is
/// exclusive to one.
pub struct PredictionPipeline {
    storage: Arc<dyn ObjectStoreGateway>,
    engine: Arc<dyn SegmentationEngine>,
    engine_gate: Semaphore,
}

impl PredictionPipeline {
    pub fn new(storage: Arc<dyn ObjectStoreGateway>, engine: Arc<dyn SegmentationEngine>) -> Self {
        Self {
            storage,
            engine,
            // The inference runtime's safety under concurrent invocation on
            // shared accelerator hardware is unknown; admit one run at a time.
            engine_gate: Semaphore::new(1),
        }
    }

    pub async fn execute(
        &self,
        input_gcs_uri: &str,
        output_gcs_prefix: &str,
    ) -> Result<Prediction> {
        let input = ObjectLocation::parse(input_gcs_uri)?;
        let destination = ObjectLocation::parse(output_gcs_prefix)?;

        // Dropped on every exit path below, removing the tree.
        let staging = StagingArea::acquire()?;

        let input_filename = match input.key.rsplit_once('/') {
            Some((_, name)) => name,
            None => input.key.as_str(),
        };
        let local_input = staging.input_dir().join(input_filename);

        info!("Downloading {} to {}", input_gcs_uri, local_input.display());
        self.storage.fetch(&input, &local_input).await?;
        info!("Download complete");

        info!("Processing file: {}", local_input.display());
        let produced = {
            let _permit = self
                .engine_gate
                .acquire()
                .await
                .map_err(|_| Error::internal("engine gate closed"))?;
            self.engine
                .run(staging.input_dir(), staging.output_dir())
                .await?
        };

        if produced.is_empty() {
            return Err(Error::NoOutputProduced);
        }

        let mut output_gcs_uris = Vec::with_capacity(produced.len());
        for path in &produced {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    Error::internal(format!("Unrepresentable output filename: {}", path.display()))
                })?;

            let target = ObjectLocation {
                bucket: destination.bucket.clone(),
                key: output_key(&destination.key, input_filename, filename),
            };

            info!("Uploading {} to {}", path.display(), target.uri());
            let uri = self.storage.store(path, &target).await?;
            output_gcs_uris.push(uri);
        }

        Ok(Prediction {
            status: "success".to_string(),
            input_gcs_uri: input_gcs_uri.to_string(),
            output_gcs_uris,
            timestamp: Utc::now(),
        })
    }
}

/// Destination key for one produced file:
/// `<prefix>/<input-stem>_nnunet_output/<filename>`, with surrounding slashes
/// trimmed from the prefix and only the final extension removed from the
/// input name (`a.nii.gz` becomes `a.nii`).
fn output_key(prefix: &str, input_filename: &str, produced_filename: &str) -> String {
    let stem = Path::new(input_filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(input_filename);
    let run_folder = format!("{stem}_nnunet_output");

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{run_folder}/{produced_filename}")
    } else {
        format!("{prefix}/{run_folder}/{produced_filename}")
    }
}
