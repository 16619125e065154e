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

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Scheme + host of the carrier site; lookup and quote endpoints hang off it.
    pub carrier_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Permits of the process-wide politeness gate. Never below 1.
    pub max_concurrent_fetches: usize,
    /// Upper bound (inclusive) of the randomized delay before each outbound fetch.
    pub fetch_delay_max_ms: u64,
    pub aggregate_deadline_secs: u64,
}
