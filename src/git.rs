use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

/// Git operations handler backed by the git binary.
#[derive(Debug, Clone, Default)]
pub struct GitClient;

impl GitClient {
    pub fn new() -> Self {
        Self
    }

    /// Verify the git binary is on PATH before entering the sync loop.
    pub async fn ensure_available() -> Result<()> {
        let output = AsyncCommand::new("git")
            .arg("--version")
            .output()
            .await
            .context("Failed to run git. Is it installed and on PATH?")?;

        if !output.status.success() {
            return Err(anyhow!("git --version exited with {}", output.status));
        }

        Ok(())
    }

    /// Whether the path holds a git repository.
    pub fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Clone a repository into `dest` via a staging directory.
    ///
    /// The clone lands in `<dest>.partial` and is renamed into place only
    /// once git exits successfully, so the final path never holds a
    /// half-finished clone. Leftover staging directories from an interrupted
    /// run are removed before cloning.
    pub async fn clone_repository(&self, url: &str, dest: &Path) -> Result<()> {
        let staging = staging_path(dest)?;

        if staging.exists() {
            debug!("Removing leftover staging directory {}", staging.display());
            tokio::fs::remove_dir_all(&staging)
                .await
                .context("Failed to remove leftover staging directory")?;
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create target directory")?;
        }

        let output = AsyncCommand::new("git")
            .arg("clone")
            .arg(url)
            .arg(&staging)
            .output()
            .await
            .context("Failed to execute git clone")?;

        if !output.status.success() {
            let _ = tokio::fs::remove_dir_all(&staging).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git clone failed: {}", stderr.trim()));
        }

        tokio::fs::rename(&staging, dest)
            .await
            .context("Failed to move completed clone into place")?;

        Ok(())
    }

    /// Look up the URL of the `origin` remote.
    pub async fn remote_url(&self, path: &Path) -> Result<String> {
        let output = AsyncCommand::new("git")
            .args(["remote", "get-url", "origin"])
            .current_dir(path)
            .output()
            .await
            .context("Failed to execute git remote get-url")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "No usable origin remote in {}: {}",
                path.display(),
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Fetch from `origin` with the repository's default refspec.
    pub async fn fetch_origin(&self, path: &Path) -> Result<()> {
        let output = AsyncCommand::new("git")
            .args(["fetch", "origin"])
            .current_dir(path)
            .output()
            .await
            .context("Failed to execute git fetch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git fetch failed: {}", stderr.trim()));
        }

        Ok(())
    }
}

/// Staging directory used while a clone is in flight.
fn staging_path(dest: &Path) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid clone destination: {}", dest.display()))?;

    Ok(dest.with_file_name(format!("{}.partial", name)))
}
