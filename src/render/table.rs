use crate::Result;
use crate::render::Renderer;
use crate::types::{AnomalyCounts, GRID_SIZE, PixelGrid};
use polars::prelude::*;
use polars_io::prelude::ParquetWriter;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tidy table of a pixel grid: one row per pixel with
/// `row`, `column`, `pixel` and `count` columns, in pixel index order.
pub fn pixels_to_dataframe(pixels: &PixelGrid) -> PolarsResult<DataFrame> {
    let mut rows = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let mut columns = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let mut indices = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
    let mut counts = Vec::with_capacity(GRID_SIZE * GRID_SIZE);

    for ((row, column), &count) in pixels.counts().indexed_iter() {
        rows.push(row as u32);
        columns.push(column as u32);
        indices.push((row * GRID_SIZE + column) as u32);
        counts.push(count);
    }

    DataFrame::new(vec![
        Series::new("row".into(), &rows).into(),
        Series::new("column".into(), &columns).into(),
        Series::new("pixel".into(), &indices).into(),
        Series::new("count".into(), &counts).into(),
    ])
}

/// The three anomaly buckets as a two-column table (`kind`, `count`).
pub fn anomalies_to_dataframe(anomalies: &AnomalyCounts) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Series::new("kind".into(), &["zero", "one", "multi"]).into(),
        Series::new("count".into(), &anomalies.as_array()).into(),
    ])
}

/// Keeps the most recent window as a polars `DataFrame`.
#[derive(Default)]
pub struct TableRenderer {
    last_frame: Option<DataFrame>,
    last_anomalies: Option<AnomalyCounts>,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&DataFrame> {
        self.last_frame.as_ref()
    }

    pub fn last_anomalies(&self) -> Option<AnomalyCounts> {
        self.last_anomalies
    }
}

impl Renderer for TableRenderer {
    fn render(&mut self, pixels: &PixelGrid, anomalies: &AnomalyCounts) -> Result<()> {
        self.last_frame = Some(pixels_to_dataframe(pixels)?);
        self.last_anomalies = Some(*anomalies);
        Ok(())
    }
}

/// Writes every window to `<output_dir>/<prefix>_<n>.parquet`, plus the anomaly
/// counts to `<prefix>_<n>_anomalies.parquet`.
pub struct ParquetRenderer {
    output_dir: PathBuf,
    prefix: String,
    written: usize,
}

impl ParquetRenderer {
    pub fn new(output_dir: impl AsRef<Path>, prefix: Option<&str>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            prefix: prefix.unwrap_or("capture").to_string(),
            written: 0,
        })
    }

    /// Number of windows written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.parquet", self.prefix, index))
    }

    pub fn anomalies_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_anomalies.parquet", self.prefix, index))
    }
}

impl Renderer for ParquetRenderer {
    fn render(&mut self, pixels: &PixelGrid, anomalies: &AnomalyCounts) -> Result<()> {
        let index = self.written;

        let mut pixel_df = pixels_to_dataframe(pixels)?;
        let mut pixel_file = File::create(self.frame_path(index))?;
        ParquetWriter::new(&mut pixel_file).finish(&mut pixel_df)?;

        let mut anomaly_df = anomalies_to_dataframe(anomalies)?;
        let mut anomaly_file = File::create(self.anomalies_path(index))?;
        ParquetWriter::new(&mut anomaly_file).finish(&mut anomaly_df)?;

        debug!("Wrote capture {} to {}", index, self.frame_path(index).display());
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::count_pixels;
    use crate::utils::misc::coincidence_mask;

    #[test]
    fn test_pixels_to_dataframe() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let words = [
            coincidence_mask(0, 1).unwrap(),
            coincidence_mask(7, 7).unwrap(),
            coincidence_mask(7, 7).unwrap(),
        ];
        let (pixels, _) = count_pixels(&words);
        let df = pixels_to_dataframe(&pixels)?;

        assert_eq!(df.shape(), (64, 4));
        let counts: Vec<Option<u64>> = df.column("count")?.as_materialized_series().u64()?.into_iter().collect();
        assert_eq!(counts[1], Some(1));
        assert_eq!(counts[63], Some(2));
        assert_eq!(counts.iter().flatten().sum::<u64>(), 3);

        let pixel = df.column("pixel")?.as_materialized_series().u32()?;
        assert_eq!(pixel.get(63), Some(63));
        Ok(())
    }

    #[test]
    fn test_anomalies_to_dataframe() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let anomalies = AnomalyCounts::from([4, 5, 6]);
        let df = anomalies_to_dataframe(&anomalies)?;
        assert_eq!(df.shape(), (3, 2));
        let counts: Vec<Option<u64>> = df.column("count")?.as_materialized_series().u64()?.into_iter().collect();
        assert_eq!(counts, vec![Some(4), Some(5), Some(6)]);
        Ok(())
    }

    #[test]
    fn test_parquet_renderer_writes_each_frame() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut renderer = ParquetRenderer::new(dir.path().join("frames"), Some("run"))?;

        let (pixels, anomalies) = count_pixels(&[0, 1, coincidence_mask(3, 3).unwrap()]);
        renderer.render(&pixels, &anomalies)?;
        renderer.render(&pixels, &anomalies)?;

        assert_eq!(renderer.written(), 2);
        assert!(dir.path().join("frames/run_0.parquet").exists());
        assert!(dir.path().join("frames/run_1.parquet").exists());
        assert!(dir.path().join("frames/run_1_anomalies.parquet").exists());
        Ok(())
    }
}
