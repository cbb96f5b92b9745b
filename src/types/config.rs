//! Capture configuration, loaded from JSON

use crate::source::{PulseSource, ReplaySource, SimulatedSource};
use crate::{PulseCounterError, Result};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of words per capture window.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Default chunk count for parallel decoding.
pub const DEFAULT_NUM_CHUNKS: usize = 16;

/// DMA transfers are whole pages.
pub const DEFAULT_ALIGNMENT_BYTES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct CaptureConfig {
    #[builder(default = DEFAULT_SAMPLES)]
    pub samples: usize,
    #[builder(default = DEFAULT_NUM_CHUNKS)]
    pub num_chunks: usize,
    #[builder(default = true)]
    pub parallel: bool,
    #[builder(default)]
    pub source: SourceConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Where pulse words come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Simulated {
        #[serde(default)]
        seed: Option<u64>,
        #[serde(default)]
        delay_ms: u64,
        #[serde(default)]
        anomaly_rate: f64,
    },
    Replay {
        path: PathBuf,
        #[serde(default = "default_alignment_bytes")]
        alignment_bytes: usize,
    },
}

fn default_alignment_bytes() -> usize {
    DEFAULT_ALIGNMENT_BYTES
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulated {
            seed: None,
            delay_ms: 0,
            anomaly_rate: 0.0,
        }
    }
}

impl SourceConfig {
    /// Builds the configured pulse source.
    pub fn open(&self) -> Result<Box<dyn PulseSource>> {
        match self {
            SourceConfig::Simulated {
                seed,
                delay_ms,
                anomaly_rate,
            } => {
                let source = SimulatedSource::builder()
                    .maybe_seed(*seed)
                    .delay(Duration::from_millis(*delay_ms))
                    .anomaly_rate(*anomaly_rate)
                    .build();
                Ok(Box::new(source))
            }
            SourceConfig::Replay {
                path,
                alignment_bytes,
            } => Ok(Box::new(ReplaySource::open(path, *alignment_bytes)?)),
        }
    }
}

impl CaptureConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CaptureConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(PulseCounterError::InvalidConfig(
                "samples must be greater than zero".to_string(),
            ));
        }
        if self.num_chunks == 0 {
            return Err(PulseCounterError::InvalidConfig(
                "num_chunks must be greater than zero".to_string(),
            ));
        }
        match &self.source {
            SourceConfig::Simulated { anomaly_rate, .. } => validate_anomaly_rate(*anomaly_rate)?,
            SourceConfig::Replay {
                alignment_bytes, ..
            } => {
                if *alignment_bytes == 0 || alignment_bytes % 2 != 0 {
                    return Err(PulseCounterError::InvalidConfig(format!(
                        "alignment_bytes {} must be a positive even number",
                        alignment_bytes
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Rejects rates outside `[0, 1]`, NaN included.
pub fn validate_anomaly_rate(anomaly_rate: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&anomaly_rate) {
        return Err(PulseCounterError::InvalidConfig(format!(
            "anomaly_rate {} outside [0, 1]",
            anomaly_rate
        )));
    }
    Ok(())
}
