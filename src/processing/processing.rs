use crate::decoder::PulseDecoder;
use crate::types::frame::CaptureFrame;
use crate::types::pixel_grid::{AnomalyCounts, CategoryHistogram, ChannelSingles, PixelGrid};
use crate::types::pulse::PulseWord;

/// Decodes every word and accumulates one bucket per category.
pub fn histogram<I>(decoder: &PulseDecoder, pulses: I) -> CategoryHistogram
where
    I: IntoIterator<Item = PulseWord>,
{
    let mut histogram = CategoryHistogram::new();
    for pulse in pulses {
        histogram.record(decoder.decode(pulse));
    }
    histogram
}

/// Reduces a capture window to the 8x8 pixel grid and the anomaly counts,
/// using the global decoder.
pub fn count_pixels(pulses: &[PulseWord]) -> (PixelGrid, AnomalyCounts) {
    count_pixels_with(PulseDecoder::global(), pulses)
}

pub fn count_pixels_with(decoder: &PulseDecoder, pulses: &[PulseWord]) -> (PixelGrid, AnomalyCounts) {
    histogram(decoder, pulses.iter().copied()).split()
}

/// Counts how often each of the 16 input lines fired.
pub fn count_channel_singles(pulses: &[PulseWord]) -> ChannelSingles {
    let mut singles = ChannelSingles::default();
    for &pulse in pulses {
        singles.record(pulse);
    }
    singles
}

#[cfg(feature = "parallel")]
/// Same result as [`count_pixels_with`], decoded over `num_chunks` slices in parallel.
pub fn count_pixels_parallel(
    decoder: &PulseDecoder,
    pulses: &[PulseWord],
    num_chunks: usize,
) -> (PixelGrid, AnomalyCounts) {
    use rayon::prelude::*;

    let chunk_len = chunk_length(pulses.len(), num_chunks);
    pulses
        .par_chunks(chunk_len)
        .map(|chunk| histogram(decoder, chunk.iter().copied()))
        .reduce(CategoryHistogram::new, |acc, other| acc.merge(&other))
        .split()
}

#[cfg(feature = "parallel")]
fn chunk_length(len: usize, num_chunks: usize) -> usize {
    len.div_ceil(num_chunks.max(1)).max(1)
}

/// Decodes a full capture window into a frame.
pub fn decode_frame(
    decoder: &PulseDecoder,
    pulses: &[PulseWord],
    parallel: bool,
    num_chunks: usize,
) -> CaptureFrame {
    #[cfg(feature = "parallel")]
    let (pixels, anomalies) = if parallel {
        count_pixels_parallel(decoder, pulses, num_chunks)
    } else {
        count_pixels_with(decoder, pulses)
    };

    #[cfg(not(feature = "parallel"))]
    let (pixels, anomalies) = {
        let _ = (parallel, num_chunks);
        count_pixels_with(decoder, pulses)
    };

    CaptureFrame::builder()
        .samples(pulses.len())
        .pixels(pixels)
        .anomalies(anomalies)
        .singles(count_channel_singles(pulses))
        .build()
}
