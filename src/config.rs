use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default root directory for clones, relative to the working directory.
pub const DEFAULT_TARGET_DIR: &str = "starred";

/// Default delay between sync cycles.
pub const DEFAULT_INTERVAL: &str = "20m";

/// Page size for starred-repository listing requests.
const DEFAULT_PAGE_SIZE: u8 = 100;

/// Runtime settings for the sync loop.
///
/// The GitHub token is carried here explicitly so the API client receives it
/// as a constructor parameter rather than reading process-wide state.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub personal access token used for the starred listing
    pub token: String,

    /// Root directory that holds one clone per starred repository
    pub target_dir: PathBuf,

    /// Delay between sync cycles
    pub interval: Duration,

    /// Repositories requested per listing page
    pub page_size: u8,
}

impl Config {
    /// Build a config from the credential and the CLI-supplied settings.
    ///
    /// The target directory is shell-expanded, so `~/mirrors` and
    /// `${HOME}/mirrors` both work.
    pub fn new(token: String, target_dir: &str, interval: &str) -> Result<Self> {
        let expanded = shellexpand::full(target_dir)
            .context("Failed to expand target directory path")?;

        Ok(Self {
            token,
            target_dir: PathBuf::from(expanded.as_ref()),
            interval: parse_interval(interval)?,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }
}

/// Parse duration strings like "30s", "20m", "1h", "2d", or raw seconds.
pub fn parse_interval(interval: &str) -> Result<Duration> {
    let interval = interval.trim().to_lowercase();

    let seconds = if let Some(value) = interval.strip_suffix('s') {
        value.parse::<u64>().context("Invalid seconds value")?
    } else if let Some(value) = interval.strip_suffix('m') {
        value.parse::<u64>().map(|v| v * 60).context("Invalid minutes value")?
    } else if let Some(value) = interval.strip_suffix('h') {
        value.parse::<u64>().map(|v| v * 3600).context("Invalid hours value")?
    } else if let Some(value) = interval.strip_suffix('d') {
        value.parse::<u64>().map(|v| v * 86400).context("Invalid days value")?
    } else {
        interval
            .parse::<u64>()
            .context("Invalid interval format. Use format like '30m', '1h', '2d'")?
    };

    Ok(Duration::from_secs(seconds))
}
