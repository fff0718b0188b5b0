//! Bounded status polling for queued jobs.
//!
//! [`poll_until_settled`] waits, checks, and repeats until the backend reports
//! completion or failure, or until [`PollPolicy::max_attempts`] checks have
//! been spent. Failed checks (network errors, 5xx, garbage bodies) cost an
//! attempt but do not end the loop.

use std::future::Future;
use std::time::Duration;

use tryon_core::{AppConfig, GenerationResult};

use crate::error::GenerationError;
use crate::job::{GenerationJob, JobStatus};
use crate::normalize::{abbreviate, classify_status, PollOutcome};
use crate::types::StatusResponse;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// How many status checks to make and how long to wait before each.
///
/// The bound is attempt-count based; slow status calls stretch the
/// wall-clock total past `max_attempts * interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.poll_max_attempts,
            interval: Duration::from_millis(config.poll_interval_ms),
        }
    }
}

/// Suspension point between status checks, injectable so tests skip real delays.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Polls a queued job until it settles.
///
/// `job` must already be in [`JobStatus::Polling`] with a backend request id.
/// Each iteration sleeps `policy.interval` first, then calls `fetch`.
///
/// # Errors
///
/// Returns [`GenerationError::PollTimeout`] when `policy.max_attempts`
/// checks pass without a `COMPLETED` (with image) or `FAILED` status.
pub(crate) async fn poll_until_settled<S, F, Fut>(
    policy: &PollPolicy,
    sleeper: &S,
    job: &mut GenerationJob,
    mut fetch: F,
) -> Result<GenerationResult, GenerationError>
where
    S: Sleeper,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StatusResponse, GenerationError>>,
{
    let request_id = job.backend_request_id().unwrap_or_default().to_owned();
    let max_attempts = policy.max_attempts;

    while job.attempt_count() < max_attempts {
        sleeper.sleep(policy.interval).await;
        let attempt = job.record_attempt();

        let response = match fetch().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    attempt,
                    max_attempts,
                    error = %err,
                    "status check failed; continuing to poll"
                );
                continue;
            }
        };

        match classify_status(&response) {
            PollOutcome::Completed(url) => {
                job.advance(JobStatus::Completed);
                tracing::info!(
                    request_id = %request_id,
                    attempt,
                    image = %abbreviate(&url),
                    "try-on generation completed"
                );
                return Ok(GenerationResult::succeeded(url, Some(request_id)));
            }
            PollOutcome::Failed(reason) => {
                job.advance(JobStatus::Failed);
                tracing::warn!(
                    request_id = %request_id,
                    attempt,
                    reason = %reason,
                    "backend reported try-on generation failed"
                );
                return Ok(GenerationResult::failed(reason, Some(request_id)));
            }
            PollOutcome::Pending => {
                tracing::debug!(
                    request_id = %request_id,
                    attempt,
                    max_attempts,
                    status = response.status.as_deref().unwrap_or("unknown"),
                    queue_position = ?response.queue_position,
                    "generation still pending"
                );
            }
        }
    }

    job.advance(JobStatus::TimedOut);
    tracing::warn!(
        request_id = %request_id,
        attempts = job.attempt_count(),
        "gave up polling try-on generation"
    );
    Err(GenerationError::PollTimeout {
        request_id,
        attempts: job.attempt_count(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct RecordingSleeper {
        naps: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.naps.lock().unwrap().push(duration);
            std::future::ready(())
        }
    }

    fn status(value: serde_json::Value) -> StatusResponse {
        serde_json::from_value(value).unwrap()
    }

    fn pending() -> Result<StatusResponse, GenerationError> {
        Ok(status(serde_json::json!({ "status": "IN_PROGRESS" })))
    }

    fn queued_job() -> GenerationJob {
        let mut job = GenerationJob::new();
        assert!(job.enqueue("abc".to_owned()));
        job
    }

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            max_attempts,
            interval: Duration::from_millis(1_000),
        }
    }

    /// Replays `script` in order, counting how many checks were made.
    fn scripted(
        script: Vec<Result<StatusResponse, GenerationError>>,
        calls: &Arc<AtomicU32>,
    ) -> impl FnMut() -> std::future::Ready<Result<StatusResponse, GenerationError>> {
        let script = Arc::new(Mutex::new(VecDeque::from(script)));
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let next = script.lock().unwrap().pop_front().unwrap_or_else(pending);
            std::future::ready(next)
        }
    }

    #[tokio::test]
    async fn completes_after_pending_checks() {
        let calls = Arc::new(AtomicU32::new(0));
        let sleeper = RecordingSleeper::default();
        let mut job = queued_job();
        let fetch = scripted(
            vec![
                pending(),
                pending(),
                Ok(status(serde_json::json!({
                    "status": "COMPLETED",
                    "images": [{ "url": "Y" }]
                }))),
            ],
            &calls,
        );

        let result = poll_until_settled(&policy(30), &sleeper, &mut job, fetch)
            .await
            .unwrap();

        assert_eq!(result, GenerationResult::succeeded("Y", Some("abc".to_owned())));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(
            *sleeper.naps.lock().unwrap(),
            vec![Duration::from_millis(1_000); 3],
            "one interval before every check"
        );
    }

    #[tokio::test]
    async fn failed_status_is_a_result_not_an_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut job = queued_job();
        let fetch = scripted(
            vec![Ok(status(
                serde_json::json!({ "status": "FAILED", "error": "bad input" }),
            ))],
            &calls,
        );

        let result = poll_until_settled(&policy(30), &RecordingSleeper::default(), &mut job, fetch)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.error_detail.as_deref(), Some("bad input"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(job.status(), JobStatus::Failed);
    }

    #[tokio::test]
    async fn transient_check_errors_do_not_abort() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut job = queued_job();
        let garbage = serde_json::from_str::<StatusResponse>("<html>").unwrap_err();
        let fetch = scripted(
            vec![
                Err(GenerationError::MalformedResponse {
                    context: "status(abc)".to_owned(),
                    source: garbage,
                }),
                Ok(status(serde_json::json!({
                    "status": "COMPLETED",
                    "images": [{ "url": "Z" }]
                }))),
            ],
            &calls,
        );

        let result = poll_until_settled(&policy(30), &RecordingSleeper::default(), &mut job, fetch)
            .await
            .unwrap();

        assert_eq!(result.image_ref.as_deref(), Some("Z"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(job.attempt_count(), 2);
    }

    #[tokio::test]
    async fn times_out_after_exactly_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let sleeper = RecordingSleeper::default();
        let mut job = queued_job();
        let fetch = scripted(Vec::new(), &calls);

        let err = poll_until_settled(&policy(30), &sleeper, &mut job, fetch)
            .await
            .unwrap_err();

        assert!(
            matches!(err, GenerationError::PollTimeout { ref request_id, attempts: 30 } if request_id == "abc"),
            "unexpected error: {err:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 30);
        assert_eq!(sleeper.naps.lock().unwrap().len(), 30);
        assert_eq!(job.status(), JobStatus::TimedOut);
    }

    #[test]
    fn default_policy_is_thirty_one_second_checks() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.interval, Duration::from_secs(1));
    }
}
