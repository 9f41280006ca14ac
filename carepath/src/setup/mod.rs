//! Collaborator setup from configuration: picks real clients where keys are present and
//! mocks elsewhere, opens and seeds the knowledge stores.
//!
//! Used by the CLI and the server, which fill a [`SetupConfig`] from their own config
//! (env, flags) and call [`build_collaborators`].

mod build;
mod config;

pub use build::{build_collaborators, preventive_cache_path};
pub use config::SetupConfig;
