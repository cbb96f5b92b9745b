use crate::decoder::pixel_map::{PixelMap, build_pixel_map};
use crate::decoder::popcount::{PopCountTable, build_popcount_table};
use crate::types::pulse::{Category, PulseWord};
use std::sync::OnceLock;

static GLOBAL_DECODER: OnceLock<PulseDecoder> = OnceLock::new();

/// Classifies raw pulse words into pixel coincidences or anomaly buckets.
///
/// Holds both lookup tables; read-only once built, so one instance can be shared
/// across threads by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseDecoder {
    pixel_map: PixelMap,
    popcount: PopCountTable,
}

impl PulseDecoder {
    pub fn new() -> Self {
        Self {
            pixel_map: build_pixel_map(),
            popcount: build_popcount_table(),
        }
    }

    /// Process-wide decoder, built on first use.
    pub fn global() -> &'static PulseDecoder {
        GLOBAL_DECODER.get_or_init(PulseDecoder::new)
    }

    pub fn pixel_map(&self) -> &PixelMap {
        &self.pixel_map
    }

    pub fn popcount(&self) -> &PopCountTable {
        &self.popcount
    }

    /// Total over the 16-bit domain. Two bits that are not one row plus one column
    /// land in `Multi` with the 3+ bit words.
    #[inline]
    pub fn decode(&self, pulse: PulseWord) -> Category {
        if let Some(pixel) = self.pixel_map.pixel(pulse) {
            return Category::Pixel(pixel);
        }
        match self.popcount.get(pulse) {
            0 => Category::Zero,
            1 => Category::Single,
            _ => Category::Multi,
        }
    }
}

impl Default for PulseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes one word with the global decoder.
pub fn decode(pulse: PulseWord) -> Category {
    PulseDecoder::global().decode(pulse)
}
