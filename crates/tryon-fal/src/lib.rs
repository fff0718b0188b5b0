pub mod client;
pub mod error;
pub mod generator;
pub mod job;
pub mod normalize;
pub mod poll;
pub mod types;

pub use client::FalClient;
pub use error::GenerationError;
pub use generator::Generator;
pub use job::{GenerationJob, JobStatus};
pub use poll::{PollPolicy, Sleeper, TokioSleeper};
pub use types::{ImageRef, StatusResponse, SubmitRequest, SubmitResponse};
