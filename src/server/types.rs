use crate::pipeline::Prediction;
use serde::{Deserialize, Serialize};

/// One unit of work: where to read the input volume and where to put results.
#[derive(Debug, Clone, Deserialize)]
pub struct Instance {
    pub input_gcs_uri: String,
    pub output_gcs_prefix: String,
}

/// The serving platform wraps the request JSON inside an `instances` array.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub instances: Vec<Instance>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Error body carrying a single human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
