use crate::types::pulse::{GRID_SIZE, NUM_PIXELS, ROW_BIT_OFFSET};
use bon::Builder;

/// Represents a 2D detector coordinate using row and column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Builder)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

/// Row-major pixel index for a detector coordinate.
pub fn pixel_index(row: usize, column: usize) -> Option<usize> {
    (row < GRID_SIZE && column < GRID_SIZE).then(|| row * GRID_SIZE + column)
}

/// Detector coordinate of a pixel index.
pub fn pixel_coordinate(index: usize) -> Option<Coordinate> {
    (index < NUM_PIXELS).then(|| {
        Coordinate::builder()
            .row(index / GRID_SIZE)
            .column(index % GRID_SIZE)
            .build()
    })
}

/// The pulse word a valid coincidence at `(row, column)` produces:
/// row line `8 + row` plus column line `column`.
pub fn coincidence_mask(row: usize, column: usize) -> Option<u16> {
    pixel_index(row, column)?;
    Some((1u16 << (ROW_BIT_OFFSET as usize + row)) | (1u16 << column))
}
