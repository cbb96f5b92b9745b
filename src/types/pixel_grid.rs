//! Count containers produced by decoding a capture window

use crate::types::pulse::{Category, GRID_SIZE, NUM_CATEGORIES, NUM_LINES, NUM_PIXELS};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// 8x8 grid of per-pixel coincidence counts, indexed `[[row, column]]`.
/// The shape is fixed; deserializing any other shape fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Array2<u64>", into = "Array2<u64>")]
pub struct PixelGrid {
    counts: Array2<u64>,
}

impl TryFrom<Array2<u64>> for PixelGrid {
    type Error = String;

    fn try_from(counts: Array2<u64>) -> Result<Self, Self::Error> {
        if counts.dim() != (GRID_SIZE, GRID_SIZE) {
            return Err(format!(
                "pixel grid must be {}x{}, got {:?}",
                GRID_SIZE,
                GRID_SIZE,
                counts.dim()
            ));
        }
        Ok(Self { counts })
    }
}

impl From<PixelGrid> for Array2<u64> {
    fn from(grid: PixelGrid) -> Self {
        grid.counts
    }
}

impl PixelGrid {
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    pub fn zeros() -> Self {
        Self {
            counts: Array2::zeros((GRID_SIZE, GRID_SIZE)),
        }
    }

    /// Builds the grid from the first 64 buckets of a histogram, row-major.
    pub fn from_pixel_counts(pixel_counts: &[u64]) -> Self {
        let counts = Array2::from_shape_fn((GRID_SIZE, GRID_SIZE), |(row, column)| {
            pixel_counts
                .get(row * GRID_SIZE + column)
                .copied()
                .unwrap_or(0)
        });
        Self { counts }
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u64> {
        self.counts.get((row, column)).copied()
    }

    /// Total coincidences over the grid.
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, u64> {
        self.counts.row(row)
    }

    /// Row-major copy of the counts, pixel index order.
    pub fn to_flat(&self) -> Vec<u64> {
        self.counts.iter().copied().collect()
    }
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Counts of the three anomaly buckets over one capture window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyCounts {
    /// Words with no bits set
    pub zero: u64,
    /// Words with exactly one bit set
    pub one: u64,
    /// Words with two or more bits set that are not a row/column coincidence
    pub multi: u64,
}

impl AnomalyCounts {
    pub fn total(&self) -> u64 {
        self.zero + self.one + self.multi
    }

    /// `[zero, one, multi]`
    pub fn as_array(&self) -> [u64; 3] {
        [self.zero, self.one, self.multi]
    }
}

impl From<[u64; 3]> for AnomalyCounts {
    fn from([zero, one, multi]: [u64; 3]) -> Self {
        Self { zero, one, multi }
    }
}

/// One bucket per decode category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryHistogram {
    buckets: [u64; NUM_CATEGORIES],
}

impl CategoryHistogram {
    pub fn new() -> Self {
        Self {
            buckets: [0; NUM_CATEGORIES],
        }
    }

    pub fn record(&mut self, category: Category) {
        self.buckets[category.index()] += 1;
    }

    pub fn get(&self, category: Category) -> u64 {
        self.buckets[category.index()]
    }

    pub fn buckets(&self) -> &[u64; NUM_CATEGORIES] {
        &self.buckets
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// Adds another histogram into this one, bucket by bucket.
    pub fn merge(mut self, other: &CategoryHistogram) -> Self {
        for (bucket, count) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *bucket += count;
        }
        self
    }

    /// Splits into the pixel grid (buckets 0..64) and anomaly counts (64..67).
    pub fn split(&self) -> (PixelGrid, AnomalyCounts) {
        let (pixels, anomalies) = self.buckets.split_at(NUM_PIXELS);
        let anomalies = AnomalyCounts {
            zero: anomalies[0],
            one: anomalies[1],
            multi: anomalies[2],
        };
        (PixelGrid::from_pixel_counts(pixels), anomalies)
    }
}

impl Default for CategoryHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-line hit counts for the 16 input lines of a pulse word.
/// Line `i` is incremented whenever bit `i` is set, regardless of category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSingles {
    pub lines: [u64; NUM_LINES],
}

impl ChannelSingles {
    pub fn record(&mut self, word: u16) {
        let mut bits = word;
        while bits != 0 {
            let line = bits.trailing_zeros() as usize;
            self.lines[line] += 1;
            bits &= bits - 1;
        }
    }

    pub fn merge(mut self, other: &ChannelSingles) -> Self {
        for (line, count) in self.lines.iter_mut().zip(other.lines.iter()) {
            *line += count;
        }
        self
    }

    /// Lines 0..8
    pub fn columns(&self) -> &[u64] {
        &self.lines[..GRID_SIZE]
    }

    /// Lines 8..16
    pub fn rows(&self) -> &[u64] {
        &self.lines[GRID_SIZE..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_row_major() {
        let mut histogram = CategoryHistogram::new();
        for index in [0, 9, 9, 63] {
            histogram.record(Category::from_index(index).unwrap());
        }
        histogram.record(Category::Single);

        let (grid, anomalies) = histogram.split();
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(1, 1), Some(2));
        assert_eq!(grid.get(7, 7), Some(1));
        assert_eq!(grid.total(), 4);
        assert_eq!(anomalies.as_array(), [0, 1, 0]);
    }

    #[test]
    fn test_each_category_has_its_own_bucket() {
        for index in 0..NUM_CATEGORIES {
            let category = Category::from_index(index).unwrap();
            let mut histogram = CategoryHistogram::new();
            histogram.record(category);

            assert_eq!(histogram.get(category), 1);
            assert_eq!(histogram.buckets()[index], 1);
            assert_eq!(histogram.total(), 1);
        }
    }

    #[test]
    fn test_grid_shape_is_checked_on_deserialize() {
        let grid = PixelGrid::from_pixel_counts(&[3; NUM_PIXELS]);
        let json = serde_json::to_string(&grid).unwrap();
        let restored: PixelGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);

        let small = serde_json::to_string(&Array2::<u64>::zeros((2, 3))).unwrap();
        assert!(serde_json::from_str::<PixelGrid>(&small).is_err());
        assert!(PixelGrid::try_from(Array2::<u64>::zeros((8, 7))).is_err());
    }

    #[test]
    fn test_histogram_merge() {
        let mut a = CategoryHistogram::new();
        a.record(Category::Zero);
        let mut b = CategoryHistogram::new();
        b.record(Category::Zero);
        b.record(Category::Multi);

        let merged = a.merge(&b);
        assert_eq!(merged.get(Category::Zero), 2);
        assert_eq!(merged.get(Category::Multi), 1);
        assert_eq!(merged.total(), 3);
    }

    #[test]
    fn test_channel_singles_views() {
        let mut singles = ChannelSingles::default();
        singles.record((1 << 8) | (1 << 3));
        singles.record(0xFFFF);
        singles.record(0);

        assert_eq!(singles.columns()[3], 2);
        assert_eq!(singles.columns()[0], 1);
        assert_eq!(singles.rows()[0], 2);
        assert_eq!(singles.rows()[7], 1);
        assert_eq!(singles.lines.iter().sum::<u64>(), 18);
    }
}
