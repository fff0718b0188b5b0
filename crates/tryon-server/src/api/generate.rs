use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tryon_core::{GenerationRequest, GenerationResult};
use tryon_fal::GenerationError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Storefront payload; field names match the theme widget.
#[derive(Debug, Deserialize)]
pub(super) struct GenerateBody {
    #[serde(default)]
    pub model_image: String,
    #[serde(default)]
    pub garment_image: String,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub preserve_pose: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateData {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<String>,
}

impl GenerateData {
    fn from_result(result: GenerationResult, model_id: Option<String>) -> Self {
        Self {
            success: result.success,
            image_url: result.image_ref,
            error: result.error_detail,
            backend_request_id: result.request_id,
            model_id,
        }
    }
}

pub(super) async fn create_generation(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<ApiResponse<GenerateData>>, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let request = GenerationRequest::new(
        body.model_image,
        body.garment_image,
        body.preserve_pose.unwrap_or(true),
    );
    // Invalid input never occupies a generation slot.
    request
        .validate()
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let Ok(_permit) = state.permits.clone().try_acquire_owned() else {
        tracing::warn!(request_id = %req_id.0, "generation rejected: concurrency limit reached");
        return Err(ApiError::new(
            req_id.0,
            "rate_limited",
            "too many generations in progress; retry shortly",
        ));
    };

    let result = state
        .generator
        .generate(&request)
        .await
        .map_err(|e| map_generation_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: GenerateData::from_result(result, body.model_id),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_generation_error(request_id: String, error: &GenerationError) -> ApiError {
    match error {
        GenerationError::InvalidInput(e) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        GenerationError::BackendRejected { status, .. } => {
            tracing::error!(error = %error, "try-on backend rejected submission");
            ApiError::new(
                request_id,
                "upstream_rejected",
                format!("image service rejected the request (status {status})"),
            )
        }
        GenerationError::PollTimeout { .. } => {
            tracing::error!(error = %error, "try-on generation timed out");
            ApiError::new(
                request_id,
                "upstream_timeout",
                "image generation did not finish in time",
            )
        }
        GenerationError::Transport(_)
        | GenerationError::MalformedResponse { .. }
        | GenerationError::NoImageInResponse => {
            tracing::error!(error = %error, "try-on generation failed");
            ApiError::new(request_id, "upstream_error", "image service error")
        }
        GenerationError::InvalidEndpoint { .. } => {
            tracing::error!(error = %error, "try-on backend misconfigured");
            ApiError::new(request_id, "internal_error", "image service misconfigured")
        }
    }
}
