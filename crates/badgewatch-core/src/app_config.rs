use std::net::SocketAddr;
use std::path::PathBuf;

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

/// Login-with-Amazon credentials for the SP-API token exchange.
#[derive(Clone)]
pub struct LwaCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for LwaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LwaCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub lwa: LwaCredentials,
    pub lwa_token_url: String,
    pub api_host: String,
    pub marketplace_id: String,
    pub data_dir: PathBuf,
    pub result_path: PathBuf,
    pub source_name: String,
    pub batch_size: usize,
    pub batch_concurrency: usize,
    pub request_timeout_secs: u64,
    pub report_unchanged: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("lwa", &self.lwa)
            .field("lwa_token_url", &self.lwa_token_url)
            .field("api_host", &self.api_host)
            .field("marketplace_id", &self.marketplace_id)
            .field("data_dir", &self.data_dir)
            .field("result_path", &self.result_path)
            .field("source_name", &self.source_name)
            .field("batch_size", &self.batch_size)
            .field("batch_concurrency", &self.batch_concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("report_unchanged", &self.report_unchanged)
            .finish()
    }
}
