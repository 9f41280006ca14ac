//! Server configuration from env / .env.

use std::path::PathBuf;
use std::time::Duration;

use carepath::SetupConfig;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Collaborator keys and store paths; `setup.output_dir` is served under `/download`.
    pub setup: SetupConfig,
    pub listen: String,
    /// Where uploaded audio and images are saved.
    pub upload_dir: PathBuf,
    /// Upper bound for one workflow run.
    pub run_timeout: Duration,
}

impl ServerConfig {
    /// Reads [`SetupConfig::from_env`] plus `LISTEN`, `UPLOAD_DIR` and `RUN_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            setup: SetupConfig::from_env(),
            listen: var("LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            upload_dir: var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            run_timeout: Duration::from_secs(
                var("RUN_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RUN_TIMEOUT_SECS),
            ),
        }
    }
}
