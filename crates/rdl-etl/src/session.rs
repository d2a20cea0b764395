//! Run lifecycle
//!
//! The session is the one long-lived shared resource of a run: the engine's
//! connection pool plus its scratch directory. It is acquired once before
//! the per-file loop, released once after, and never touched concurrently.
//! Scratch cleanup happens only after the session has stopped.

use crate::config::Config;
use rdl_common::{EtlError, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// The run's execution session: pool and scratch space
pub struct Session {
    pool: PgPool,
    scratch_dir: PathBuf,
}

impl Session {
    /// Acquire the session. A failure here is fatal to the whole run.
    pub async fn start(config: &Config) -> Result<Session> {
        std::fs::create_dir_all(&config.pipeline.scratch_dir)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.connection_url())
            .await
            .map_err(|e| {
                EtlError::Database(format!(
                    "cannot acquire session against {}: {}",
                    config.database.host, e
                ))
            })?;

        info!(
            driver = %config.database.driver,
            scratch = %config.pipeline.scratch_dir.display(),
            "execution session started"
        );

        Ok(Session {
            pool,
            scratch_dir: config.pipeline.scratch_dir.clone(),
        })
    }

    /// The session's connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The scratch directory configured for this session
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Release the session unconditionally once the per-file loop is done.
    pub async fn stop(self) {
        self.pool.close().await;
        info!("execution session stopped");
    }
}

/// What scratch cleanup did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupStats {
    pub removed: usize,
    pub failed: usize,
}

/// Remove every entry directly under the scratch directory.
///
/// Each entry's failure is logged individually and does not abort cleanup
/// of the remaining entries. A missing or already-empty directory is a
/// clean no-op.
pub fn cleanup_scratch(dir: &Path) -> CleanupStats {
    let mut stats = CleanupStats::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return stats,
        Err(err) => {
            error!(path = %dir.display(), error = %err, "cannot read scratch directory");
            stats.failed += 1;
            return stats;
        }
    };

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                error!(path = %dir.display(), error = %err, "cannot read scratch entry");
                stats.failed += 1;
                continue;
            }
        };

        let removal = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };

        match removal {
            Ok(()) => {
                info!(path = %path.display(), "removed scratch entry");
                stats.removed += 1;
            }
            Err(err) => {
                let err = EtlError::Cleanup {
                    path: path.clone(),
                    message: err.to_string(),
                };
                error!(error = %err, "scratch cleanup failed for entry");
                stats.failed += 1;
            }
        }
    }

    stats
}
