//! Mapping from coincidence bitmasks to pixel indices

use crate::types::pulse::{GRID_SIZE, NUM_PIXELS, PixelIndex, ROW_BIT_OFFSET};
use itertools::iproduct;
use std::ops::Range;
use tracing::debug;

/// Bit positions of the row lines.
pub const ROW_BITS: Range<u32> = ROW_BIT_OFFSET..ROW_BIT_OFFSET + GRID_SIZE as u32;

/// Bit positions of the column lines.
pub const COLUMN_BITS: Range<u32> = 0..GRID_SIZE as u32;

const TABLE_SIZE: usize = 1 << 16;

/// Bijection between the 64 valid coincidence masks and pixel indices 0..64.
///
/// Indices are assigned row-major: the outer loop walks row bits 8..16 and the inner
/// loop column bits 0..8, so pixel `k` is always row `k / 8`, column `k % 8`. Recorded
/// pixel indices depend on this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelMap {
    // Dense lookup, indexed by the raw mask
    lookup: Box<[Option<PixelIndex>]>,
    masks: [u16; NUM_PIXELS],
}

impl PixelMap {
    /// Pixel index for a mask, if it is a valid row/column coincidence.
    #[inline]
    pub fn pixel(&self, mask: u16) -> Option<PixelIndex> {
        self.lookup[mask as usize]
    }

    pub fn get(&self, mask: u16) -> Option<u8> {
        self.pixel(mask).map(PixelIndex::get)
    }

    pub fn contains(&self, mask: u16) -> bool {
        self.get(mask).is_some()
    }

    /// The coincidence mask assigned to a pixel index.
    pub fn mask(&self, pixel: u8) -> Option<u16> {
        self.masks.get(pixel as usize).copied()
    }

    /// All valid masks in pixel index order.
    pub fn masks(&self) -> &[u16; NUM_PIXELS] {
        &self.masks
    }

    pub fn len(&self) -> usize {
        NUM_PIXELS
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// `(mask, pixel)` pairs in pixel index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u8)> + '_ {
        self.masks
            .iter()
            .enumerate()
            .map(|(pixel, &mask)| (mask, pixel as u8))
    }
}

pub fn build_pixel_map() -> PixelMap {
    let mut lookup = vec![None; TABLE_SIZE].into_boxed_slice();
    let mut masks = [0u16; NUM_PIXELS];

    for (pixel, (row_bit, column_bit)) in iproduct!(ROW_BITS, COLUMN_BITS).enumerate() {
        let mask = (1u16 << row_bit) | (1u16 << column_bit);
        lookup[mask as usize] = PixelIndex::new(pixel as u8);
        masks[pixel] = mask;
    }

    debug!("Built pixel map with {} coincidence masks", NUM_PIXELS);
    PixelMap { lookup, masks }
}
