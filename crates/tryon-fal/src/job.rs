//! In-flight state for one generation.
//!
//! A [`GenerationJob`] lives on the stack of a single `generate()` call and is
//! dropped when it returns. Nothing here is shared or persisted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }

    /// Submitted -> Completed | Failed | Polling,
    /// Polling -> Polling | Completed | Failed | TimedOut.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Submitted => matches!(next, Self::Completed | Self::Failed | Self::Polling),
            Self::Polling => !matches!(next, Self::Submitted),
            Self::Completed | Self::Failed | Self::TimedOut => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Polling => "polling",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
pub struct GenerationJob {
    backend_request_id: Option<String>,
    attempt_count: u32,
    status: JobStatus,
}

impl Default for GenerationJob {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationJob {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend_request_id: None,
            attempt_count: 0,
            status: JobStatus::Submitted,
        }
    }

    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.status
    }

    #[must_use]
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    #[must_use]
    pub fn backend_request_id(&self) -> Option<&str> {
        self.backend_request_id.as_deref()
    }

    /// Moves to `next`, returning `false` and leaving the job untouched if
    /// the move is not allowed.
    pub fn advance(&mut self, next: JobStatus) -> bool {
        if !self.status.can_transition_to(next) {
            tracing::error!(from = %self.status, to = %next, "illegal generation job transition");
            return false;
        }
        self.status = next;
        true
    }

    /// Records the backend ticket and enters polling.
    pub fn enqueue(&mut self, request_id: String) -> bool {
        if self.advance(JobStatus::Polling) {
            self.backend_request_id = Some(request_id);
            true
        } else {
            false
        }
    }

    /// Counts one status check and returns the new attempt number.
    pub fn record_attempt(&mut self) -> u32 {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.attempt_count
    }
}
