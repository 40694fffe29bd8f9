//! The run-forever loop around the sync engine.
//!
//! One cycle, then a fixed sleep, repeated until the process is interrupted.
//! The cycle watermark lives in memory only; a restart starts over with no
//! baseline, which makes the first cycle fetch every existing clone.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Config;
use crate::github::StarClient;
use crate::sync::{CycleSummary, SyncEngine};

/// Long-running sync daemon.
pub struct Daemon {
    interval: std::time::Duration,
    engine: SyncEngine<StarClient>,
    watermark: Option<DateTime<Utc>>,
}

impl Daemon {
    pub fn new(config: Config) -> Result<Self> {
        let source = StarClient::new(&config)?;

        Ok(Self {
            interval: config.interval,
            engine: SyncEngine::new(config, source),
            watermark: None,
        })
    }

    /// Run sync cycles until Ctrl-C.
    ///
    /// The watermark advances only after a fully successful cycle; a failed
    /// cycle keeps the previous one so the same "since" boundary is retried.
    /// The loop itself never returns an error.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting sync loop with interval {:?}", self.interval);

        loop {
            match self.engine.run_cycle(self.watermark).await {
                Ok(summary) => {
                    self.watermark = Some(summary.watermark);
                    log_cycle(&summary);
                }
                Err(e) => {
                    error!("Sync cycle failed: {:#}", e);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping sync loop");
                    break;
                }
            }
        }

        Ok(())
    }
}

fn log_cycle(summary: &CycleSummary) {
    info!(
        "Cycle finished in {:.2}s: {} starred, {} cloned, {} fetched, {} up to date, {} skipped, {} failed",
        summary.duration.as_secs_f64(),
        summary.total,
        summary.cloned,
        summary.fetched,
        summary.up_to_date,
        summary.skipped,
        summary.failed
    );
}
