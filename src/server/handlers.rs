use super::types::{
    ErrorResponse, HealthResponse, PredictRequest, PredictResponse, RootResponse,
};
use crate::pipeline::PredictionPipeline;
use crate::Error;
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PredictionPipeline>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "nnU-Net Inference API with GCS".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(instance) = request.instances.first().cloned() else {
        return Err(error_response(&Error::validation(
            "No instances provided in the request payload.",
        )));
    };

    if request.instances.len() > 1 {
        warn!(
            "Request carries {} instances; only the first is processed",
            request.instances.len()
        );
    }

    info!("Received prediction request for {}", instance.input_gcs_uri);

    match state
        .pipeline
        .execute(&instance.input_gcs_uri, &instance.output_gcs_prefix)
        .await
    {
        Ok(prediction) => {
            info!("Prediction complete for {}", instance.input_gcs_uri);
            Ok(Json(PredictResponse {
                predictions: vec![prediction],
            }))
        }
        Err(e) => {
            error!("Prediction failed for {}: {}", instance.input_gcs_uri, e);
            Err(error_response(&e))
        }
    }
}

fn error_response(error: &Error) -> (StatusCode, Json<ErrorResponse>) {
    match error {
        Error::Validation(message) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                detail: message.clone(),
            }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                detail: format!("Prediction failed: {other}"),
            }),
        ),
    }
}
