//! Wire types for the fal.ai virtual try-on queue API.
//!
//! Every field the backend may omit is `#[serde(default)]`, so shape
//! detection happens in [`crate::normalize`] rather than in serde.

use serde::{Deserialize, Serialize};
use tryon_core::GenerationRequest;

/// Body of the submission POST.
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub person_image_url: &'a str,
    pub clothing_image_url: &'a str,
    pub preserve_pose: bool,
}

impl<'a> From<&'a GenerationRequest> for SubmitRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            person_image_url: request.model_image_ref.trim(),
            clothing_image_url: request.garment_image_ref.trim(),
            preserve_pose: request.preserve_pose,
        }
    }
}

/// One `{ "url": ... }` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageRef {
    /// The URL, if present and non-blank.
    #[must_use]
    pub fn usable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

/// Submission response; either a queue ticket or an immediate result.
///
/// Ticket: `{ "request_id": "..." }`.
/// Immediate: `{ "images": [{ "url": ... }] }` or `{ "image": { "url": ... } }`.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

/// Response from `GET <status_base>/<request_id>`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusResponse {
    /// `COMPLETED`, `FAILED`, `IN_QUEUE`, `IN_PROGRESS`, ...
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ImageRef>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub queue_position: Option<u32>,
}
