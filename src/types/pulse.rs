//! Types for raw pulse words and their decode categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw 16-bit sample from the pulse source. Bits 0..8 are the column
/// lines, bits 8..16 the row lines.
pub type PulseWord = u16;

/// Side length of the detector grid.
pub const GRID_SIZE: usize = 8;

/// Number of detector pixels.
pub const NUM_PIXELS: usize = GRID_SIZE * GRID_SIZE;

/// Number of decode categories: 64 pixels followed by the 3 anomaly buckets.
pub const NUM_CATEGORIES: usize = NUM_PIXELS + 3;

/// Number of input lines carried by one pulse word.
pub const NUM_LINES: usize = 16;

/// Bit position of the first row line.
pub const ROW_BIT_OFFSET: u32 = 8;

/// A pixel index in 0..64, row-major over the detector grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PixelIndex(u8);

impl PixelIndex {
    pub fn new(index: u8) -> Option<Self> {
        ((index as usize) < NUM_PIXELS).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PixelIndex {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("pixel index {} out of range 0..{}", index, NUM_PIXELS))
    }
}

impl From<PixelIndex> for u8 {
    fn from(index: PixelIndex) -> u8 {
        index.0
    }
}

/// The outcome of decoding one pulse word.
///
/// Every 16-bit value maps to exactly one category:
/// - `Pixel(k)`: a valid coincidence (one row bit plus one column bit), `k` in 0..64
/// - `Zero`: no bits set (index 64)
/// - `Single`: exactly one bit set (index 65)
/// - `Multi`: anything else, including two bits that are not one row plus one column (index 66)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Pixel(PixelIndex),
    Zero,
    Single,
    Multi,
}

impl Category {
    pub const ZERO_INDEX: usize = NUM_PIXELS;
    pub const SINGLE_INDEX: usize = NUM_PIXELS + 1;
    pub const MULTI_INDEX: usize = NUM_PIXELS + 2;

    /// Flat category index in 0..67.
    pub fn index(self) -> usize {
        match self {
            Category::Pixel(k) => k.get() as usize,
            Category::Zero => Self::ZERO_INDEX,
            Category::Single => Self::SINGLE_INDEX,
            Category::Multi => Self::MULTI_INDEX,
        }
    }

    /// Inverse of [`Category::index`]. Returns `None` for indices past the last bucket.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            k if k < NUM_PIXELS => Some(Category::Pixel(PixelIndex(k as u8))),
            Self::ZERO_INDEX => Some(Category::Zero),
            Self::SINGLE_INDEX => Some(Category::Single),
            Self::MULTI_INDEX => Some(Category::Multi),
            _ => None,
        }
    }

    pub fn is_pixel(self) -> bool {
        matches!(self, Category::Pixel(_))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Pixel(k) => write!(f, "pixel {}", k.get()),
            Category::Zero => write!(f, "zero"),
            Category::Single => write!(f, "one"),
            Category::Multi => write!(f, "multi"),
        }
    }
}
