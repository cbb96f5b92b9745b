//! Python bindings for the decoder and capture pipeline

use crate::render::{anomalies_to_dataframe, pixels_to_dataframe};
use crate::source::{PulseSource, SimulatedSource};
use crate::types::config::validate_anomaly_rate;
use crate::types::{AnomalyCounts, CaptureConfig, PixelGrid, SourceConfig};
use crate::utils::misc::pixel_index as grid_pixel_index;
use crate::{PulseCounter, PulseCounterError, processing};
use pyo3::{
    Bound, PyErr, PyResult, pyfunction, pymodule, types::PyModule, types::PyModuleMethods,
    wrap_pyfunction,
};
use pyo3_polars::PyDataFrame;
use std::path::PathBuf;

// --- Error Conversion for PyO3 ---
impl From<PulseCounterError> for PyErr {
    fn from(err: PulseCounterError) -> PyErr {
        match err {
            PulseCounterError::Io(e) => pyo3::exceptions::PyOSError::new_err(e.to_string()),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        }
    }
}

fn to_py_frames(
    pixels: &PixelGrid,
    anomalies: &AnomalyCounts,
) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let pixel_df = pixels_to_dataframe(pixels).map_err(PulseCounterError::from)?;
    let anomaly_df = anomalies_to_dataframe(anomalies).map_err(PulseCounterError::from)?;
    Ok((PyDataFrame(pixel_df), PyDataFrame(anomaly_df)))
}

/// Decodes raw pulse words into pixel and anomaly tables.
///
/// Args:
///     words (list[int]): Raw 16-bit pulse words.
///
/// Returns:
///     tuple[polars.DataFrame, polars.DataFrame]: Per-pixel counts
///     (row, column, pixel, count) and anomaly counts (kind, count).
#[pyfunction]
fn count_pixels(words: Vec<u16>) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let (pixels, anomalies) = processing::count_pixels(&words);
    to_py_frames(&pixels, &anomalies)
}

/// Generates fake pulse words: uniformly chosen valid coincidences.
///
/// Args:
///     n (int): Number of words.
///     seed (int | None): Seed for a reproducible sequence.
///     anomaly_rate (float): Fraction of words replaced by arbitrary values.
///
/// Raises:
///     ValueError: If `anomaly_rate` is outside [0, 1].
#[pyfunction]
#[pyo3(signature = (n, seed = None, anomaly_rate = 0.0))]
fn simulate_counts(n: usize, seed: Option<u64>, anomaly_rate: f64) -> PyResult<Vec<u16>> {
    validate_anomaly_rate(anomaly_rate)?;
    let mut source = SimulatedSource::builder()
        .maybe_seed(seed)
        .anomaly_rate(anomaly_rate)
        .build();
    let mut buf = vec![0u16; n];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// Captures one window from a recorded DMA dump and decodes it.
///
/// Args:
///     file_path (str): Path to the big-endian dump.
///     samples (int): Window size in words; must be a whole number of pages.
///
/// Raises:
///     OSError: If the file cannot be opened.
///     ValueError: If the request is misaligned or the dump is too short.
#[pyfunction]
#[pyo3(signature = (file_path, samples = 2048))]
fn capture_file(file_path: PathBuf, samples: usize) -> PyResult<(PyDataFrame, PyDataFrame)> {
    let config = CaptureConfig::builder()
        .samples(samples)
        .source(SourceConfig::Replay {
            path: file_path,
            alignment_bytes: crate::types::config::DEFAULT_ALIGNMENT_BYTES,
        })
        .build();
    let mut counter = PulseCounter::from_config(config)?;
    let frame = counter.capture()?;
    to_py_frames(&frame.pixels, &frame.anomalies)
}

/// Pixel index of a detector coordinate, or None when out of range.
#[pyfunction]
fn pixel_index(row: usize, column: usize) -> Option<usize> {
    grid_pixel_index(row, column)
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(count_pixels, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_counts, m)?)?;
    m.add_function(wrap_pyfunction!(capture_file, m)?)?;
    m.add_function(wrap_pyfunction!(pixel_index, m)?)?;
    Ok(())
}
