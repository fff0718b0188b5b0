use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub fal_key: String,
    pub fal_submit_url: String,
    pub fal_status_base_url: String,
    pub fal_request_timeout_secs: u64,
    pub poll_max_attempts: u32,
    pub poll_interval_ms: u64,
    pub max_concurrent_generations: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("fal_key", &"[redacted]")
            .field("fal_submit_url", &self.fal_submit_url)
            .field("fal_status_base_url", &self.fal_status_base_url)
            .field("fal_request_timeout_secs", &self.fal_request_timeout_secs)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field(
                "max_concurrent_generations",
                &self.max_concurrent_generations,
            )
            .finish()
    }
}
