use ffjobs_core::{Config, JobOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: JobOrchestrator,
}

impl AppState {
    pub fn new(config: Config, orchestrator: JobOrchestrator) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.orchestrator
    }
}
