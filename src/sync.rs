//! Sync engine - one full pass over the starred-repository listing.
//!
//! Each cycle lists every starred repository, clones the ones with no local
//! directory, fetches the ones pushed to since the previous watermark, and
//! leaves the rest untouched. Repositories are processed strictly one at a
//! time, in API-delivered order.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::git::GitClient;
use crate::github::{StarSource, StarredRepo};

/// Result of syncing a single repository.
#[derive(Debug)]
pub enum SyncOutcome {
    /// Repository had no local directory and was cloned
    Cloned,
    /// Existing clone was stale and origin was fetched
    Fetched,
    /// Existing clone needed no update
    UpToDate,
    /// Repository was not touched
    Skipped { reason: String },
}

/// Counters from a complete sync cycle.
#[derive(Debug, Clone)]
pub struct CycleSummary {
    pub total: usize,
    pub cloned: usize,
    pub fetched: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Timestamp captured when the cycle started; becomes the next watermark
    pub watermark: DateTime<Utc>,
    pub duration: Duration,
}

/// Runs sync cycles against a [`StarSource`] and the local git binary.
pub struct SyncEngine<S> {
    config: Config,
    source: S,
    git: GitClient,
}

impl<S: StarSource> SyncEngine<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self {
            config,
            source,
            git: GitClient::new(),
        }
    }

    /// Perform one full sync pass.
    ///
    /// `since` is the watermark of the previous successful cycle; `None`
    /// means no baseline exists yet and every existing clone is fetched.
    /// A failure to list the starred repositories abandons the whole cycle;
    /// per-repository failures are logged, counted, and skipped over.
    pub async fn run_cycle(&self, since: Option<DateTime<Utc>>) -> Result<CycleSummary> {
        let started = Instant::now();
        let watermark = Utc::now();

        let repos = self
            .source
            .list_starred()
            .await
            .context("Failed to list starred repositories")?;

        info!("Syncing {} starred repositories", repos.len());

        tokio::fs::create_dir_all(&self.config.target_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create target directory {}",
                    self.config.target_dir.display()
                )
            })?;

        let mut summary = CycleSummary {
            total: repos.len(),
            cloned: 0,
            fetched: 0,
            up_to_date: 0,
            skipped: 0,
            failed: 0,
            watermark,
            duration: Duration::ZERO,
        };

        for repo in &repos {
            match self.sync_repo(repo, since).await {
                Ok(SyncOutcome::Cloned) => summary.cloned += 1,
                Ok(SyncOutcome::Fetched) => summary.fetched += 1,
                Ok(SyncOutcome::UpToDate) => summary.up_to_date += 1,
                Ok(SyncOutcome::Skipped { reason }) => {
                    summary.skipped += 1;
                    warn!("Skipping {}: {}", repo.name, reason);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("Failed to sync {}: {:#}", repo.name, e);
                }
            }
        }

        summary.duration = started.elapsed();
        Ok(summary)
    }

    /// Sync a single repository: clone it, fetch it, or leave it alone.
    async fn sync_repo(
        &self,
        repo: &StarredRepo,
        since: Option<DateTime<Utc>>,
    ) -> Result<SyncOutcome> {
        if !is_safe_name(&repo.name) {
            return Ok(SyncOutcome::Skipped {
                reason: format!("{:?} is not usable as a directory name", repo.name),
            });
        }

        let path = self.config.target_dir.join(&repo.name);
        debug!("Checking {}", repo.name);

        if !path.exists() {
            info!("Cloning {} into {}", repo.name, path.display());
            self.git.clone_repository(&repo.clone_url, &path).await?;
            return Ok(SyncOutcome::Cloned);
        }

        if !self.git.is_repository(&path) {
            return Ok(SyncOutcome::Skipped {
                reason: format!("{} exists but is not a git repository", path.display()),
            });
        }

        if !needs_fetch(repo.pushed_at, since) {
            debug!("{} is up to date", repo.name);
            return Ok(SyncOutcome::UpToDate);
        }

        let remote = self.git.remote_url(&path).await?;
        info!("Fetching {} from {}", repo.name, remote);
        self.git.fetch_origin(&path).await?;

        Ok(SyncOutcome::Fetched)
    }
}

/// Staleness check for an existing clone.
///
/// With no watermark yet (first cycle of the process) every clone counts as
/// stale, so repositories that changed while the process was down are still
/// caught. A repository that has never been pushed to is never stale.
fn needs_fetch(pushed_at: Option<DateTime<Utc>>, since: Option<DateTime<Utc>>) -> bool {
    match (pushed_at, since) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(pushed), Some(watermark)) => pushed > watermark,
    }
}

/// Whether a repository name can be used directly as a directory name under
/// the target root.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
