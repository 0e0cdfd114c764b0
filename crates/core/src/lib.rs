pub mod config;
pub mod fetcher;
pub mod job;
pub mod ledger;
pub mod metrics;
pub mod orchestrator;
pub mod resolver;
pub mod runner;
pub mod testing;
pub mod workspace;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, DatabaseConfig, ServerConfig,
};
pub use fetcher::{FetchError, Fetcher, FetcherConfig, HttpFetcher, InputPaths};
pub use job::{AliasMap, Job, JobRequest, JobStatus, JobUpdate, RequestError};
pub use ledger::{InMemoryJobLedger, JobLedger, LedgerError, SqliteJobLedger};
pub use orchestrator::{
    download_url, JobHandle, JobOrchestrator, OrchestratorConfig, PipelineError, SubmitError,
};
pub use resolver::{CommandResolver, ResolvedCommand, ResolverConfig, ResolverStrategy, TemplateError};
pub use runner::{LaunchError, ProcessResult, ProcessRunner, RunnerConfig, TokioProcessRunner};
pub use workspace::{Workspace, WorkspaceConfig, WorkspaceError, WorkspaceManager};
