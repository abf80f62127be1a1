//! Deploy-time configuration, read once at startup from `splash.ron`.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use splash_core::FailurePolicy;

pub const CONFIG_FILENAME: &str = "splash.ron";

const DEFAULT_TIMEOUT_MS: u64 = 12_000;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 1_500;

#[derive(Debug, Clone, Deserialize)]
pub struct SplashConfig {
    /// Target document to fetch and inject.
    pub target: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub failure_policy: PolicyConfig,
    /// Fixed seed for the progress schedule; omitted means per-run jitter.
    #[serde(default)]
    pub progress_seed: Option<u64>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub enum PolicyConfig {
    #[default]
    ManualRetry,
    AutoNavigate {
        delay_ms: u64,
    },
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

impl SplashConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.max(1))
    }

    pub fn policy(&self) -> FailurePolicy {
        match self.failure_policy {
            PolicyConfig::ManualRetry => FailurePolicy::ManualRetry,
            PolicyConfig::AutoNavigate { delay_ms } => FailurePolicy::AutoNavigate {
                delay: Duration::from_millis(delay_ms),
            },
        }
    }

    /// Configured seed, or one derived from the clock so each run jitters.
    pub fn seed(&self) -> u64 {
        self.progress_seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.subsec_nanos() as u64)
                .unwrap_or(0)
        })
    }
}

pub fn load(path: &Path) -> anyhow::Result<SplashConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    let config: SplashConfig = ron::from_str(&content)
        .with_context(|| format!("could not parse config file {}", path.display()))?;
    Ok(config)
}
