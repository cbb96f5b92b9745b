//! Decoder for an FPGA photon/pulse counter.
//!
//! Raw 16-bit pulse words carry one line per bit: columns on bits 0..8 and
//! rows on bits 8..16. A word with exactly one row bit and one column bit is a
//! coincidence on that pixel of the 8x8 detector; everything else falls into
//! one of three anomaly buckets (zero bits, one bit, multi/invalid).
//!
//! ```no_run
//! use _core::{CaptureConfig, PulseCounter, TextRenderer};
//!
//! let mut counter = PulseCounter::from_config(CaptureConfig::default())?;
//! let mut renderer = TextRenderer::new(std::io::stdout());
//! let frame = counter.capture_into(&mut renderer)?;
//! println!("{}", counter.get_summary(&frame));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decoder;
pub mod parser;
pub mod processing;
pub mod pulse_counter;
#[cfg(feature = "python")]
pub mod python;
pub mod render;
pub mod source;
pub mod types;
pub mod utils;

use thiserror::Error;

pub use decoder::{PixelMap, PopCountTable, PulseDecoder, build_pixel_map, build_popcount_table, decode};
pub use processing::{count_pixels, count_pixels_with};
pub use pulse_counter::PulseCounter;
pub use render::{ParquetRenderer, Renderer, TableRenderer, TextRenderer};
pub use source::{PulseSource, ReplaySource, SimulatedSource};
pub use types::{
    AnomalyCounts, CaptureConfig, CaptureFrame, Category, ChannelSingles, PixelGrid, PixelIndex,
    PulseWord, SourceConfig,
};

#[derive(Error, Debug)]
pub enum PulseCounterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Requested {requested} samples, not a whole number of {alignment}-sample transfers")]
    UnalignedRequest { requested: usize, alignment: usize },

    #[error("Source filled {filled} of {requested} requested samples")]
    ShortRead { requested: usize, filled: usize },

    #[error("Requested {requested} samples but only {available} remain")]
    InsufficientData { requested: usize, available: usize },

    #[error("Requested {requested} samples, too many to buffer")]
    OversizedRequest { requested: usize },

    #[error("Pulse stream ends with {trailing} byte(s) of a partial word")]
    TruncatedWord { trailing: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PulseCounterError>;
