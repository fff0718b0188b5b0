//! The try-on Submitter/Poller.
//!
//! [`Generator::generate`] turns one [`GenerationRequest`] into exactly one
//! [`GenerationResult`] (or a typed error), whether the backend answers
//! synchronously or hands back a queue ticket. A `Generator` holds only
//! read-only state and can be shared across concurrent callers behind an
//! `Arc`; every call builds and owns its own [`GenerationJob`].

use tryon_core::{AppConfig, GenerationRequest, GenerationResult};

use crate::client::FalClient;
use crate::error::GenerationError;
use crate::job::{GenerationJob, JobStatus};
use crate::normalize::{abbreviate, classify_submission, Submission};
use crate::poll::{poll_until_settled, PollPolicy, Sleeper, TokioSleeper};
use crate::types::SubmitRequest;

#[derive(Debug, Clone)]
pub struct Generator<S = TokioSleeper> {
    client: FalClient,
    policy: PollPolicy,
    sleeper: S,
}

impl Generator<TokioSleeper> {
    #[must_use]
    pub fn new(client: FalClient, policy: PollPolicy) -> Self {
        Self::with_sleeper(client, policy, TokioSleeper)
    }

    /// Builds a production generator from application config.
    ///
    /// # Errors
    ///
    /// Propagates [`FalClient::with_endpoints`] failures.
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let client = FalClient::with_endpoints(
            &config.fal_key,
            config.fal_request_timeout_secs,
            &config.fal_submit_url,
            &config.fal_status_base_url,
        )?;
        Ok(Self::new(client, PollPolicy::from_config(config)))
    }
}

impl<S: Sleeper> Generator<S> {
    #[must_use]
    pub fn with_sleeper(client: FalClient, policy: PollPolicy, sleeper: S) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    #[must_use]
    pub fn client(&self) -> &FalClient {
        &self.client
    }

    /// Submits `request` and waits for its final image.
    ///
    /// Returns `Ok` with `success == false` when the backend itself reports
    /// the job failed.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::InvalidInput`] if either image reference is blank
    ///   or not a URI; no network call is made.
    /// - [`GenerationError::Transport`] if the submission cannot be sent.
    /// - [`GenerationError::BackendRejected`] on a non-2xx submission status.
    /// - [`GenerationError::MalformedResponse`] if the submission body is not JSON.
    /// - [`GenerationError::NoImageInResponse`] if the submission carries
    ///   neither a ticket nor an image.
    /// - [`GenerationError::PollTimeout`] if a queued job never settles.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        request.validate()?;

        tracing::info!(
            model_image = %abbreviate(&request.model_image_ref),
            garment_image = %abbreviate(&request.garment_image_ref),
            preserve_pose = request.preserve_pose,
            "submitting try-on generation"
        );

        let mut job = GenerationJob::new();
        let response = self.client.submit(&SubmitRequest::from(request)).await?;

        match classify_submission(&response)? {
            Submission::Immediate(url) => {
                job.advance(JobStatus::Completed);
                tracing::info!(image = %abbreviate(&url), "backend returned image immediately");
                Ok(GenerationResult::succeeded(url, None))
            }
            Submission::Ticket(request_id) => {
                tracing::info!(request_id = %request_id, "generation queued; polling for result");
                job.enqueue(request_id.clone());
                let client = &self.client;
                let id = request_id.as_str();
                poll_until_settled(&self.policy, &self.sleeper, &mut job, move || {
                    client.status(id)
                })
                .await
            }
        }
    }
}
