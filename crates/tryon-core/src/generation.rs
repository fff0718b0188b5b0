//! Caller-facing contract for a single try-on generation.
//!
//! A [`GenerationRequest`] goes in, exactly one [`GenerationResult`] comes
//! out. Whether the backend answered synchronously or queued the job is not
//! visible at this level.

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::CoreError;

fn default_preserve_pose() -> bool {
    true
}

/// Model photo plus garment photo, both as URIs the backend can fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model_image_ref: String,
    pub garment_image_ref: String,
    #[serde(default = "default_preserve_pose")]
    pub preserve_pose: bool,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(
        model_image_ref: impl Into<String>,
        garment_image_ref: impl Into<String>,
        preserve_pose: bool,
    ) -> Self {
        Self {
            model_image_ref: model_image_ref.into(),
            garment_image_ref: garment_image_ref.into(),
            preserve_pose,
        }
    }

    /// Checks that both image references are present and parse as absolute URIs.
    ///
    /// `data:` URIs are accepted since the backend takes inline images too.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingImageRef`] for a blank reference and
    /// [`CoreError::InvalidImageRef`] for one that is not a URI.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_image_ref("model_image_ref", &self.model_image_ref)?;
        check_image_ref("garment_image_ref", &self.garment_image_ref)?;
        Ok(())
    }
}

fn check_image_ref(field: &'static str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::MissingImageRef { field });
    }
    Url::parse(trimmed).map_err(|e| CoreError::InvalidImageRef {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Terminal outcome of one generation.
///
/// `success == false` means the backend accepted the job and then reported
/// it could not produce an image. Infrastructure failures never reach this
/// type; they surface as errors from the generator instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Backend job identifier, present only when the job was queued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl GenerationResult {
    #[must_use]
    pub fn succeeded(image_ref: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            success: true,
            image_ref: Some(image_ref.into()),
            error_detail: None,
            request_id,
        }
    }

    #[must_use]
    pub fn failed(error_detail: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            success: false,
            image_ref: None,
            error_detail: Some(error_detail.into()),
            request_id,
        }
    }
}
