//! Response-shape detection.
//!
//! The backend answers a submission in one of three ways: a queue ticket, an
//! image list, or a single image object. Status polls answer with a status
//! string plus optional images and error text. These functions reduce both to
//! small enums so the generator never touches raw fields.

use crate::error::GenerationError;
use crate::types::{ImageRef, StatusResponse, SubmitResponse};

/// Maximum characters of a rejected response body kept for diagnostics.
pub const BACKEND_BODY_LIMIT: usize = 200;

/// Maximum characters of an image URL written to logs.
pub const LOG_URL_LIMIT: usize = 80;

const FAILED_FALLBACK: &str = "Request failed";

/// What a submission response asks the generator to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The image is already available.
    Immediate(String),
    /// The job was queued under this id; poll for it.
    Ticket(String),
}

/// Interpretation of one status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed(String),
    Failed(String),
    Pending,
}

/// Classifies a parsed submission response.
///
/// An image in either known layout wins over a `request_id`, since the
/// result is already there and polling would only delay it.
///
/// # Errors
///
/// Returns [`GenerationError::NoImageInResponse`] when the response carries
/// neither an image nor a non-blank `request_id`.
pub fn classify_submission(response: &SubmitResponse) -> Result<Submission, GenerationError> {
    let immediate = first_image_url(response.images.as_deref())
        .or_else(|| response.image.as_ref().and_then(ImageRef::usable_url));
    if let Some(url) = immediate {
        return Ok(Submission::Immediate(url.to_owned()));
    }

    match response.request_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(Submission::Ticket(id.to_owned())),
        _ => Err(GenerationError::NoImageInResponse),
    }
}

/// Classifies a parsed status response.
///
/// `COMPLETED` without a usable image is still [`PollOutcome::Pending`]:
/// the backend sometimes flips the status before the output is attached.
#[must_use]
pub fn classify_status(response: &StatusResponse) -> PollOutcome {
    let status = response.status.as_deref().unwrap_or_default();

    if status == "COMPLETED" {
        return match first_image_url(response.images.as_deref()) {
            Some(url) => PollOutcome::Completed(url.to_owned()),
            None => PollOutcome::Pending,
        };
    }

    if status == "FAILED" {
        let reason = response
            .error
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(FAILED_FALLBACK);
        return PollOutcome::Failed(reason.to_owned());
    }

    PollOutcome::Pending
}

fn first_image_url(images: Option<&[ImageRef]>) -> Option<&str> {
    images.and_then(<[ImageRef]>::first).and_then(ImageRef::usable_url)
}

/// Truncates `s` to at most `max` characters, never splitting a character.
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Shortens an image reference for logging. Inline `data:` URIs can be megabytes.
#[must_use]
pub fn abbreviate(url: &str) -> String {
    let short = truncate_chars(url, LOG_URL_LIMIT);
    if short.len() < url.len() {
        format!("{short}...")
    } else {
        short.to_owned()
    }
}
