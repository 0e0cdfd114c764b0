//! Job orchestrator implementation.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use super::config::OrchestratorConfig;
use super::error::{PipelineError, SubmitError};
use crate::fetcher::Fetcher;
use crate::job::{AliasMap, Job, JobRequest, JobUpdate};
use crate::ledger::{JobLedger, LedgerError};
use crate::metrics;
use crate::resolver::CommandResolver;
use crate::runner::ProcessRunner;
use crate::workspace::WorkspaceManager;

/// Public link for a produced file.
pub fn download_url(base_url: &str, job_id: &str, filename: &str) -> String {
    format!(
        "{}/v1/downloads/{}/{}",
        base_url.trim_end_matches('/'),
        job_id,
        urlencoding::encode(filename)
    )
}

/// Handle to a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    id: String,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Waits until the job has reached a terminal state.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            error!(job_id = %self.id, error = %e, "Job supervisor task failed");
        }
    }
}

/// Accepts jobs and runs their pipelines in background tasks.
///
/// Cheap to clone; clones share the same components and admission limit.
#[derive(Clone)]
pub struct JobOrchestrator {
    ledger: Arc<dyn JobLedger>,
    workspaces: Arc<WorkspaceManager>,
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<CommandResolver>,
    runner: Arc<dyn ProcessRunner>,
    admission: Option<Arc<Semaphore>>,
}

impl JobOrchestrator {
    pub fn new(
        config: &OrchestratorConfig,
        ledger: Arc<dyn JobLedger>,
        workspaces: Arc<WorkspaceManager>,
        fetcher: Arc<dyn Fetcher>,
        resolver: Arc<CommandResolver>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            ledger,
            workspaces,
            fetcher,
            resolver,
            runner,
            admission: config
                .max_concurrent_jobs
                .map(|limit| Arc::new(Semaphore::new(limit))),
        }
    }

    pub fn ledger(&self) -> &Arc<dyn JobLedger> {
        &self.ledger
    }

    pub fn workspaces(&self) -> &WorkspaceManager {
        &self.workspaces
    }

    /// Looks up a job record.
    pub fn job(&self, job_id: &str) -> Result<Option<Job>, LedgerError> {
        self.ledger.get(job_id)
    }

    /// Accepts a job and starts its pipeline in the background.
    ///
    /// Returns once the `pending` row exists. Must be called from within a
    /// tokio runtime. `base_url` prefixes the download links recorded on
    /// completion.
    pub fn submit(
        &self,
        request: JobRequest,
        base_url: impl Into<String>,
    ) -> Result<JobHandle, SubmitError> {
        request.validate()?;

        let job_id = uuid::Uuid::new_v4().to_string();
        self.ledger.create(&job_id)?;
        metrics::JOBS_SUBMITTED.inc();

        info!(
            job_id = %job_id,
            inputs = request.input_files.len(),
            outputs = request.output_files.len(),
            "Job submitted"
        );

        let task = tokio::spawn(self.clone().supervise(
            job_id.clone(),
            request,
            base_url.into(),
        ));

        Ok(JobHandle { id: job_id, task })
    }

    /// Runs the pipeline in its own task and records a failure if it panics.
    async fn supervise(self, job_id: String, request: JobRequest, base_url: String) {
        let pipeline = tokio::spawn(self.clone().execute(job_id.clone(), request, base_url));

        if let Err(e) = pipeline.await {
            let err = PipelineError::Panicked(join_error_message(e));
            error!(job_id = %job_id, error = %err, "Job pipeline aborted");
            metrics::JOBS_FAILED.with_label_values(&[err.stage()]).inc();
            self.record(&job_id, JobUpdate::failed(err.to_string()));
        }
    }

    async fn execute(self, job_id: String, request: JobRequest, base_url: String) {
        let _permit = self.admit(&job_id).await;
        let _in_flight = InFlight::enter();
        let start = Instant::now();

        if !self.record(&job_id, JobUpdate::processing()) {
            return;
        }
        info!(job_id = %job_id, "Job processing");

        let update = match self.run_pipeline(&job_id, &request).await {
            Ok(outputs) => {
                let links: AliasMap = outputs
                    .iter()
                    .map(|(alias, filename)| {
                        (alias.clone(), download_url(&base_url, &job_id, filename))
                    })
                    .collect();

                info!(
                    job_id = %job_id,
                    outputs = links.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Job completed"
                );
                metrics::JOBS_COMPLETED.inc();
                metrics::JOB_DURATION
                    .with_label_values(&["completed"])
                    .observe(start.elapsed().as_secs_f64());
                JobUpdate::completed(links)
            }
            Err(e) => {
                warn!(
                    job_id = %job_id,
                    stage = e.stage(),
                    error = %e,
                    "Job failed"
                );
                metrics::JOBS_FAILED.with_label_values(&[e.stage()]).inc();
                metrics::JOB_DURATION
                    .with_label_values(&["failed"])
                    .observe(start.elapsed().as_secs_f64());
                JobUpdate::failed(e.to_string())
            }
        };

        self.record(&job_id, update);
    }

    /// Workspace, fetch, resolve, run. Returns alias -> output file name.
    async fn run_pipeline(
        &self,
        job_id: &str,
        request: &JobRequest,
    ) -> Result<AliasMap, PipelineError> {
        let workspace = self.workspaces.allocate(job_id).await?;

        let inputs = self
            .fetcher
            .fetch_all(&request.input_files, &workspace.staging_dir)
            .await?;
        debug!(job_id = %job_id, inputs = inputs.len(), fetcher = self.fetcher.name(), "Inputs staged");

        let command = self.resolver.resolve(request, &inputs, &workspace).await?;
        info!(job_id = %job_id, command = %command.command_line(), "Running command");

        let result = match self.runner.run(&command.args).await {
            Ok(result) => result,
            Err(e) => {
                metrics::PROCESS_RUNS
                    .with_label_values(&["launch_error"])
                    .inc();
                return Err(e.into());
            }
        };

        if result.stderr_truncated {
            debug!(job_id = %job_id, "Process stderr exceeded capture limit");
        }

        if !result.success() {
            metrics::PROCESS_RUNS
                .with_label_values(&["nonzero_exit"])
                .inc();
            return Err(PipelineError::ProcessFailed {
                exit_code: result.exit_code,
                message: result.failure_message(),
            });
        }
        metrics::PROCESS_RUNS.with_label_values(&["success"]).inc();

        Ok(command.outputs)
    }

    /// Waits for an admission slot when a limit is configured.
    async fn admit(&self, job_id: &str) -> Option<OwnedSemaphorePermit> {
        let semaphore = self.admission.as_ref()?;
        if semaphore.available_permits() == 0 {
            debug!(job_id = %job_id, "Waiting for admission slot");
        }
        // The semaphore is never closed, so acquisition only ends with a permit.
        semaphore.clone().acquire_owned().await.ok()
    }

    /// Writes an update, logging instead of propagating failures.
    /// Returns whether the write was stored.
    fn record(&self, job_id: &str, update: JobUpdate) -> bool {
        let status = update.status;
        match self.ledger.update(job_id, update) {
            Ok(_) => true,
            Err(e) => {
                error!(job_id = %job_id, status = %status, error = %e, "Failed to record job update");
                false
            }
        }
    }
}

/// Tracks a running pipeline in the in-flight gauge, including on unwind.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        metrics::JOBS_IN_FLIGHT.inc();
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics::JOBS_IN_FLIGHT.dec();
    }
}

fn join_error_message(err: JoinError) -> String {
    if err.is_cancelled() {
        return "pipeline task was cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url() {
        assert_eq!(
            download_url("http://localhost:8080", "abc", "result.mp4"),
            "http://localhost:8080/v1/downloads/abc/result.mp4"
        );
    }

    #[test]
    fn test_download_url_trims_trailing_slash() {
        assert_eq!(
            download_url("https://media.example.com/", "abc", "out.mp3"),
            "https://media.example.com/v1/downloads/abc/out.mp3"
        );
    }

    #[test]
    fn test_download_url_encodes_filename() {
        assert_eq!(
            download_url("http://h", "abc", "my clip.mp4"),
            "http://h/v1/downloads/abc/my%20clip.mp4"
        );
    }
}
