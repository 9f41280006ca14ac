//! Run entry points: run with default config, run_with_config, or run_with_options.

pub use crate::config::Error;

mod run_with_config;

use carepath::ConsultState;

use crate::config::{RunConfig, RunOptions};

pub use run_with_config::run_with_config;
pub(crate) use run_with_config::run_with_collaborators;

/// Run the consultation with default config (from .env), returns final state.
///
/// Loads `.env` internally, then calls `run_with_config`.
pub async fn run(query: &str) -> Result<ConsultState, Error> {
    dotenv::dotenv().ok();
    let config = RunConfig::from_env()?;
    run_with_config(&config, ConsultState::from_text(query)).await
}

/// Run with config from env (or the offline config) and the overrides and inputs in
/// `options`.
///
/// Loads `.env`; `OPENAI_API_KEY` is only required when `options.offline` is false.
pub async fn run_with_options(query: &str, options: &RunOptions) -> Result<ConsultState, Error> {
    dotenv::dotenv().ok();
    let mut config = if options.offline {
        RunConfig::offline()
    } else {
        RunConfig::from_env()?
    };
    config.apply_options(options);
    run_with_config(&config, options.request(query)).await
}
