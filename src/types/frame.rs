use crate::types::pixel_grid::{AnomalyCounts, ChannelSingles, PixelGrid};
use bon::Builder;
use serde::Serialize;

/// Everything decoded from one capture window.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
pub struct CaptureFrame {
    pub samples: usize,
    pub pixels: PixelGrid,
    pub anomalies: AnomalyCounts,
    pub singles: ChannelSingles,
}

impl CaptureFrame {
    /// Number of decoded words, coincidences plus anomalies.
    pub fn total(&self) -> u64 {
        self.pixels.total() + self.anomalies.total()
    }

    /// Fraction of words that were valid coincidences. Zero for an empty frame.
    pub fn valid_fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.pixels.total() as f64 / total as f64,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
