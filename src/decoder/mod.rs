//! Pulse word decoding: lookup tables and classification

pub mod classify;
pub mod pixel_map;
pub mod popcount;

// Re-export the decoding entry points
pub use classify::{PulseDecoder, decode};
pub use pixel_map::{COLUMN_BITS, PixelMap, ROW_BITS, build_pixel_map};
pub use popcount::{PopCountTable, build_popcount_table};
