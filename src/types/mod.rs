//! Type definitions for pulse words, decoded counts and capture settings

pub mod config;
pub mod frame;
pub mod pixel_grid;
pub mod pulse;

// Re-export the main types for convenience
pub use config::{CaptureConfig, SourceConfig};
pub use frame::CaptureFrame;
pub use pixel_grid::{AnomalyCounts, CategoryHistogram, ChannelSingles, PixelGrid};
pub use pulse::{Category, GRID_SIZE, NUM_CATEGORIES, NUM_LINES, NUM_PIXELS, PixelIndex, PulseWord};
