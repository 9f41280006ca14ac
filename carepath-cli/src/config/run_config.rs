//! Run config: collaborator setup plus workflow choice. Can be filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions), [`run_with_config`](crate::run_with_config)
//! and carepath's [`SetupConfig`].

use carepath::{SetupConfig, Workflow};

use super::RunOptions;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Run config: keys and paths for the collaborators, which graph to run, verbosity.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Collaborator keys, endpoints and store paths.
    pub setup: SetupConfig,
    /// Consultation (default) or hospital lookup.
    pub workflow: Workflow,
    /// When true, log node enter/exit through [`LoggingMiddleware`](crate::LoggingMiddleware).
    pub verbose: bool,
}

impl RunConfig {
    /// Fill config from env vars (and .env, once loaded by the caller).
    ///
    /// `OPENAI_API_KEY` required; everything else read by [`SetupConfig::from_env`] is
    /// optional and falls back to mocks.
    pub fn from_env() -> Result<Self, Error> {
        let setup = SetupConfig::from_env();
        if setup.openai_api_key.is_none() {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "OPENAI_API_KEY is not set; please configure it in .env or pass --offline",
            )));
        }
        Ok(Self {
            setup,
            workflow: Workflow::Consultation,
            verbose: false,
        })
    }

    /// Config that needs no keys: every collaborator mocked, stores in memory.
    pub fn offline() -> Self {
        Self {
            setup: SetupConfig {
                offline: true,
                ..SetupConfig::default()
            },
            workflow: Workflow::Consultation,
            verbose: false,
        }
    }

    /// Apply optional overrides from `RunOptions` to this config.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if options.hospitals {
            self.workflow = Workflow::Hospitals;
        }
        if options.offline {
            self.setup.offline = true;
        }
        if let Some(path) = &options.knowledge_db {
            self.setup.knowledge_db = Some(path.clone());
        }
        self.verbose = options.verbose;
    }
}
