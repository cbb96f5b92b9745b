//! Renderers: consumers of decoded capture windows

pub mod table;
pub mod text;

pub use table::{ParquetRenderer, TableRenderer, anomalies_to_dataframe, pixels_to_dataframe};
pub use text::TextRenderer;

use crate::Result;
use crate::types::{AnomalyCounts, PixelGrid};

/// Accepts one decoded capture window for presentation or storage.
pub trait Renderer {
    fn render(&mut self, pixels: &PixelGrid, anomalies: &AnomalyCounts) -> Result<()>;
}
