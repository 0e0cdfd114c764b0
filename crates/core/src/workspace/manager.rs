//! Workspace allocation and teardown.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::config::WorkspaceConfig;
use super::error::WorkspaceError;

/// Returns true if `name` is a single, plain path component.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// The directories owned by one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub job_id: String,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Derives, creates and removes per-job directories under fixed roots.
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    staging_root: PathBuf,
    output_root: PathBuf,
}

impl WorkspaceManager {
    /// Creates a manager; relative roots are resolved against the current directory.
    pub fn new(config: &WorkspaceConfig) -> Result<Self, WorkspaceError> {
        Ok(Self {
            staging_root: absolute_root(&config.staging_root)?,
            output_root: absolute_root(&config.output_root)?,
        })
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Derives the workspace paths for a job without touching the filesystem.
    pub fn paths(&self, job_id: &str) -> Result<Workspace, WorkspaceError> {
        if !is_plain_file_name(job_id) {
            return Err(WorkspaceError::InvalidJobId {
                job_id: job_id.to_string(),
            });
        }

        Ok(Workspace {
            job_id: job_id.to_string(),
            staging_dir: self.staging_root.join(job_id),
            output_dir: self.output_root.join(job_id),
        })
    }

    /// Creates both directories for a job. Safe to call more than once.
    pub async fn allocate(&self, job_id: &str) -> Result<Workspace, WorkspaceError> {
        let workspace = self.paths(job_id)?;

        for dir in [&workspace.staging_dir, &workspace.output_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| WorkspaceError::CreateDir {
                    path: dir.clone(),
                    source,
                })?;
        }

        debug!(
            job_id,
            staging = %workspace.staging_dir.display(),
            output = %workspace.output_dir.display(),
            "Workspace allocated"
        );
        Ok(workspace)
    }

    /// Path of a file in a job's output directory.
    pub fn output_file(&self, job_id: &str, filename: &str) -> Result<PathBuf, WorkspaceError> {
        if !is_plain_file_name(filename) {
            return Err(WorkspaceError::InvalidFileName {
                name: filename.to_string(),
            });
        }
        Ok(self.paths(job_id)?.output_dir.join(filename))
    }

    /// Removes both directories of a job. Missing directories are ignored.
    pub async fn release(&self, job_id: &str) -> Result<(), WorkspaceError> {
        let workspace = self.paths(job_id)?;

        for dir in [&workspace.staging_dir, &workspace.output_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(WorkspaceError::RemoveDir {
                        path: dir.clone(),
                        source,
                    })
                }
            }
        }

        info!(job_id, "Workspace released");
        Ok(())
    }
}

fn absolute_root(path: &Path) -> Result<PathBuf, WorkspaceError> {
    std::path::absolute(path).map_err(|source| WorkspaceError::Root {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> WorkspaceManager {
        WorkspaceManager::new(&WorkspaceConfig::with_roots(
            temp.path().join("downloads"),
            temp.path().join("outputs"),
        ))
        .unwrap()
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("result.mp4"));
        assert!(is_plain_file_name("my clip (1).mov"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b.mp4"));
        assert!(!is_plain_file_name("a\\b.mp4"));
    }

    #[test]
    fn test_paths_are_deterministic() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let a = manager.paths("job-1").unwrap();
        let b = manager.paths("job-1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.staging_dir, temp.path().join("downloads").join("job-1"));
        assert_eq!(a.output_dir, temp.path().join("outputs").join("job-1"));
    }

    #[test]
    fn test_relative_roots_become_absolute() {
        let manager =
            WorkspaceManager::new(&WorkspaceConfig::with_roots("in", "out")).unwrap();
        assert!(manager.staging_root().is_absolute());
        assert!(manager.output_root().is_absolute());
    }

    #[test]
    fn test_rejects_traversing_job_id() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);
        assert!(matches!(
            manager.paths("../etc"),
            Err(WorkspaceError::InvalidJobId { .. })
        ));
    }

    #[tokio::test]
    async fn test_allocate_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let first = manager.allocate("job-1").await.unwrap();
        let second = manager.allocate("job-1").await.unwrap();
        assert_eq!(first, second);
        assert!(first.staging_dir.is_dir());
        assert!(first.output_dir.is_dir());
    }

    #[tokio::test]
    async fn test_jobs_get_distinct_directories() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let a = manager.allocate("job-a").await.unwrap();
        let b = manager.allocate("job-b").await.unwrap();
        assert_ne!(a.staging_dir, b.staging_dir);
        assert_ne!(a.output_dir, b.output_dir);
    }

    #[tokio::test]
    async fn test_allocate_fails_when_root_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let manager = WorkspaceManager::new(&WorkspaceConfig::with_roots(
            blocker.clone(),
            temp.path().join("outputs"),
        ))
        .unwrap();

        let result = manager.allocate("job-1").await;
        assert!(matches!(result, Err(WorkspaceError::CreateDir { .. })));
    }

    #[tokio::test]
    async fn test_release_removes_directories() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let workspace = manager.allocate("job-1").await.unwrap();
        std::fs::write(workspace.output_dir.join("out.mp4"), b"data").unwrap();

        manager.release("job-1").await.unwrap();
        assert!(!workspace.staging_dir.exists());
        assert!(!workspace.output_dir.exists());

        // Releasing again is fine
        manager.release("job-1").await.unwrap();
    }

    #[test]
    fn test_output_file_rejects_nested_names() {
        let temp = TempDir::new().unwrap();
        let manager = manager(&temp);

        let path = manager.output_file("job-1", "out.mp4").unwrap();
        assert_eq!(path, temp.path().join("outputs").join("job-1").join("out.mp4"));
        assert!(matches!(
            manager.output_file("job-1", "../other/out.mp4"),
            Err(WorkspaceError::InvalidFileName { .. })
        ));
    }
}
