//! carepath-cli library: reusable run logic for the consultation workflow.
//!
//! Reads keys from .env, builds the collaborators, compiles the consultation (or hospital)
//! graph and runs one request, returning the final state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), carepath_cli::Error> {
//! let state = carepath_cli::run("I have a sore throat").await?;
//! println!("{}", state.response_text.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;

pub use carepath::{ConsultState, Workflow};
pub use config::{Error, RunConfig, RunOptions};
pub use middleware::LoggingMiddleware;
pub use run::{run, run_with_config, run_with_options};

#[cfg(test)]
mod tests;
