//! Process configuration, read from flags or the matching `CAPACITY_*` environment variables.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::search::types::PageLimits;

#[derive(Debug, Clone, Parser)]
#[command(name = "hospital-capacity")]
#[command(about = "Hospital availability matching and live sync server", long_about = None)]
pub struct Config {
    /// Address the HTTP and WebSocket server listens on
    #[arg(long, env = "CAPACITY_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Buffered events per broadcast room before slow observers start skipping
    #[arg(long, env = "CAPACITY_BROADCAST_CAPACITY", default_value_t = 256)]
    pub broadcast_capacity: usize,

    #[arg(long, env = "CAPACITY_DEFAULT_PAGE_SIZE", default_value_t = 10)]
    pub default_page_size: usize,

    #[arg(long, env = "CAPACITY_MAX_PAGE_SIZE", default_value_t = 50)]
    pub max_page_size: usize,

    /// Minutes a queue entry may stay WAITING before the sweeper expires it
    #[arg(long, env = "CAPACITY_QUEUE_MAX_WAIT_MINUTES", default_value_t = 360)]
    pub queue_max_wait_minutes: i64,

    #[arg(long, env = "CAPACITY_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,

    /// JSON array of hospitals loaded into the store at start-up
    #[arg(long, env = "CAPACITY_SEED")]
    pub seed: Option<PathBuf>,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, env = "CAPACITY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.broadcast_capacity == 0 {
            anyhow::bail!("--broadcast-capacity must be greater than zero");
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            anyhow::bail!("page sizes must be greater than zero");
        }
        if self.default_page_size > self.max_page_size {
            anyhow::bail!(
                "--default-page-size ({}) exceeds --max-page-size ({})",
                self.default_page_size,
                self.max_page_size
            );
        }
        if self.queue_max_wait_minutes <= 0 {
            anyhow::bail!("--queue-max-wait-minutes must be greater than zero");
        }
        if self.sweep_interval_secs == 0 {
            anyhow::bail!("--sweep-interval-secs must be greater than zero");
        }
        Ok(())
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    pub fn queue_max_wait(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.queue_max_wait_minutes)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}
