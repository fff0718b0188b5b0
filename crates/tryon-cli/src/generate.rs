//! Generation command handlers for the CLI.
//!
//! `generate` runs one full submit-and-poll cycle. `status` makes a single
//! status query for a job that was queued earlier, which is how an operator
//! checks on a generation that timed out; it does not resume polling.

use tryon_core::{AppConfig, GenerationRequest, GenerationResult};
use tryon_fal::normalize::{classify_status, PollOutcome};
use tryon_fal::{Generator, StatusResponse};

/// Runs one generation and prints the image URL (or the full result as JSON).
///
/// # Errors
///
/// Returns an error if the generator cannot be built, generation fails with
/// a [`tryon_fal::GenerationError`], or the backend reports the job failed.
pub(crate) async fn run_generate(
    config: &AppConfig,
    request: &GenerationRequest,
    json: bool,
) -> anyhow::Result<()> {
    let generator = Generator::from_config(config)?;
    let result = match generator.generate(request).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            return Err(e.into());
        }
    };
    tracing::info!(
        success = result.success,
        request_id = result.request_id.as_deref().unwrap_or("-"),
        "generation finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result(&result));
    }

    if !result.success {
        anyhow::bail!(
            "generation failed: {}",
            result.error_detail.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

/// Queries the backend once for `request_id` and prints what it reports.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the status call fails.
pub(crate) async fn run_status(config: &AppConfig, request_id: &str) -> anyhow::Result<()> {
    let generator = Generator::from_config(config)?;
    let response = generator.client().status(request_id).await?;
    tracing::info!(
        request_id,
        status = response.status.as_deref().unwrap_or("UNKNOWN"),
        "status fetched"
    );
    println!("{}", format_status(request_id, &response));
    Ok(())
}

fn format_result(result: &GenerationResult) -> String {
    match (&result.image_ref, &result.error_detail) {
        (Some(url), _) if result.success => url.clone(),
        (_, Some(detail)) => format!("failed: {detail}"),
        _ => "failed: unknown error".to_string(),
    }
}

fn format_status(request_id: &str, response: &StatusResponse) -> String {
    let raw = response.status.as_deref().unwrap_or("UNKNOWN");
    match classify_status(response) {
        PollOutcome::Completed(url) => format!("{request_id}: {raw} {url}"),
        PollOutcome::Failed(reason) => format!("{request_id}: {raw} ({reason})"),
        PollOutcome::Pending => match response.queue_position {
            Some(pos) => format!("{request_id}: {raw} (queue position {pos})"),
            None => format!("{request_id}: {raw}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(value: serde_json::Value) -> StatusResponse {
        serde_json::from_value(value).expect("status")
    }

    #[test]
    fn format_result_prints_bare_url_on_success() {
        let result = GenerationResult::succeeded("https://fal.media/out.png", None);
        assert_eq!(format_result(&result), "https://fal.media/out.png");
    }

    #[test]
    fn format_result_prints_failure_detail() {
        let result = GenerationResult::failed("bad input", Some("abc".to_owned()));
        assert_eq!(format_result(&result), "failed: bad input");
    }

    #[test]
    fn format_status_includes_queue_position_while_pending() {
        let response = status(serde_json::json!({ "status": "IN_QUEUE", "queue_position": 3 }));
        assert_eq!(
            format_status("abc", &response),
            "abc: IN_QUEUE (queue position 3)"
        );
    }

    #[test]
    fn format_status_shows_completed_image() {
        let response = status(serde_json::json!({
            "status": "COMPLETED",
            "images": [{ "url": "https://fal.media/y.png" }]
        }));
        assert_eq!(
            format_status("abc", &response),
            "abc: COMPLETED https://fal.media/y.png"
        );
    }

    #[test]
    fn format_status_shows_failure_reason() {
        let response = status(serde_json::json!({ "status": "FAILED", "error": "nsfw" }));
        assert_eq!(format_status("abc", &response), "abc: FAILED (nsfw)");
    }
}
