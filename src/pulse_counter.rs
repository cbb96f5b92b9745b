use crate::decoder::PulseDecoder;
use crate::processing;
use crate::render::Renderer;
use crate::source::PulseSource;
use crate::types::{CaptureConfig, CaptureFrame, GRID_SIZE, PulseWord};
use crate::{PulseCounterError, Result};
use tracing::{info, warn};

/// Drives captures: pulls a window of words from a source, decodes it and
/// optionally hands the result to a renderer.
pub struct PulseCounter<S: PulseSource> {
    source: S,
    decoder: &'static PulseDecoder,
    config: CaptureConfig,
    captures: usize,
}

impl PulseCounter<Box<dyn PulseSource>> {
    /// Validate the configuration and open its pulse source
    pub fn from_config(config: CaptureConfig) -> Result<Self> {
        config.validate()?;
        let source = config.source.open()?;
        Ok(Self::new(source, config))
    }
}

impl<S: PulseSource> PulseCounter<S> {
    pub fn new(source: S, config: CaptureConfig) -> Self {
        Self {
            source,
            decoder: PulseDecoder::global(),
            config,
            captures: 0,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of frames captured so far.
    pub fn captures(&self) -> usize {
        self.captures
    }

    /// Read `samples` raw words from the source.
    ///
    /// The request is checked against the source's transfer unit and remaining
    /// data before the source is touched or a buffer is allocated; a rejected
    /// request never reaches the source.
    pub fn acquire(&mut self, samples: usize) -> Result<Vec<PulseWord>> {
        let alignment = self.source.alignment().max(1);
        if samples % alignment != 0 {
            warn!(
                "Rejecting capture of {} samples from {}: transfer unit is {} samples",
                samples,
                self.source.name(),
                alignment
            );
            return Err(PulseCounterError::UnalignedRequest {
                requested: samples,
                alignment,
            });
        }

        if let Some(available) = self.source.available() {
            if samples > available {
                return Err(PulseCounterError::InsufficientData {
                    requested: samples,
                    available,
                });
            }
        }

        let oversized = PulseCounterError::OversizedRequest { requested: samples };
        if samples.checked_mul(size_of::<PulseWord>()).is_none() {
            return Err(oversized);
        }
        let mut buf = Vec::new();
        buf.try_reserve_exact(samples).map_err(|_| oversized)?;
        buf.resize(samples, 0);

        let filled = self.source.fill(&mut buf)?;
        if filled < samples {
            return Err(PulseCounterError::ShortRead {
                requested: samples,
                filled,
            });
        }
        Ok(buf)
    }

    /// Capture one window of the configured size.
    pub fn capture(&mut self) -> Result<CaptureFrame> {
        self.capture_samples(self.config.samples)
    }

    pub fn capture_samples(&mut self, samples: usize) -> Result<CaptureFrame> {
        let pulses = self.acquire(samples)?;
        let frame = processing::decode_frame(
            self.decoder,
            &pulses,
            self.config.parallel,
            self.config.num_chunks,
        );
        self.captures += 1;

        info!(
            "Capture {} from {}: {} samples, {} coincidences, anomalies {:?}",
            self.captures,
            self.source.name(),
            frame.samples,
            frame.pixels.total(),
            frame.anomalies.as_array()
        );
        Ok(frame)
    }

    /// Capture one window and pass it to `renderer`.
    pub fn capture_into<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<CaptureFrame> {
        let frame = self.capture()?;
        renderer.render(&frame.pixels, &frame.anomalies)?;
        Ok(frame)
    }

    /// Get a summary of a captured frame
    pub fn get_summary(&self, frame: &CaptureFrame) -> String {
        let mut result = String::new();

        result.push_str("Capture:\n");
        result.push_str(&format!("  Source: {}\n", self.source.name()));
        result.push_str(&format!("  Samples: {}\n", frame.samples));
        result.push_str(&format!(
            "  Coincidences: {} ({:.1}%)\n",
            frame.pixels.total(),
            frame.valid_fraction() * 100.0
        ));

        result.push_str("\nAnomalies:\n");
        result.push_str(&format!("  Zero bits: {}\n", frame.anomalies.zero));
        result.push_str(&format!("  One bit: {}\n", frame.anomalies.one));
        result.push_str(&format!("  Multi/invalid: {}\n", frame.anomalies.multi));

        result.push_str("\nPixels:\n");
        for row in 0..GRID_SIZE {
            let cells: Vec<String> = frame
                .pixels
                .row(row)
                .iter()
                .map(|count| format!("{:>6}", count))
                .collect();
            result.push_str(&format!("  {}\n", cells.join(" ")));
        }

        result.push_str("\nLine singles (rows | columns):\n");
        result.push_str(&format!(
            "  {:?} | {:?}\n",
            frame.singles.rows(),
            frame.singles.columns()
        ));

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TableRenderer;
    use crate::source::ReplaySource;
    use crate::types::SourceConfig;
    use crate::utils::file_utils::write_pulse_words;
    use crate::utils::misc::coincidence_mask;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Page-aligned fake source that records how often it was read.
    struct CountingSource {
        fills: Arc<AtomicUsize>,
        word: PulseWord,
        short: bool,
    }

    impl PulseSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        fn alignment(&self) -> usize {
            2048
        }

        fn fill(&mut self, buf: &mut [PulseWord]) -> Result<usize> {
            self.fills.fetch_add(1, Ordering::SeqCst);
            buf.fill(self.word);
            Ok(if self.short { buf.len() / 2 } else { buf.len() })
        }
    }

    fn counting_counter(short: bool) -> (PulseCounter<CountingSource>, Arc<AtomicUsize>) {
        let fills = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fills: Arc::clone(&fills),
            word: coincidence_mask(2, 5).unwrap(),
            short,
        };
        (PulseCounter::new(source, CaptureConfig::default()), fills)
    }

    #[test]
    fn test_unaligned_request_never_reaches_source() {
        let (mut counter, fills) = counting_counter(false);

        // The default window of 10000 words is not a whole number of pages
        let result = counter.capture();
        assert!(matches!(
            result,
            Err(PulseCounterError::UnalignedRequest {
                requested: 10_000,
                alignment: 2048
            })
        ));
        assert_eq!(fills.load(Ordering::SeqCst), 0);
        assert_eq!(counter.captures(), 0);
    }

    #[test]
    fn test_oversized_request_never_reaches_source() {
        let (mut counter, fills) = counting_counter(false);

        let samples = (usize::MAX / 2048) * 2048;
        assert!(matches!(
            counter.capture_samples(samples),
            Err(PulseCounterError::OversizedRequest { requested }) if requested == samples
        ));
        assert_eq!(fills.load(Ordering::SeqCst), 0);
        assert_eq!(counter.captures(), 0);
    }

    #[test]
    fn test_request_beyond_replay_data_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("page.bin");
        write_pulse_words(&path, &[0; 2048])?;

        let source = ReplaySource::open(&path, 4096)?;
        let mut counter = PulseCounter::new(source, CaptureConfig::default());

        let samples = (usize::MAX / 2048) * 2048;
        assert!(matches!(
            counter.capture_samples(samples),
            Err(PulseCounterError::InsufficientData { requested, available: 2048 }) if requested == samples
        ));
        assert_eq!(counter.source().remaining(), 2048);
        assert_eq!(counter.capture_samples(2048)?.anomalies.zero, 2048);
        Ok(())
    }

    #[test]
    fn test_aligned_request_is_decoded() {
        let (mut counter, fills) = counting_counter(false);

        let frame = counter.capture_samples(4096).unwrap();
        assert_eq!(fills.load(Ordering::SeqCst), 1);
        assert_eq!(frame.samples, 4096);
        assert_eq!(frame.pixels.get(2, 5), Some(4096));
        assert_eq!(frame.total(), 4096);
        assert_eq!(counter.captures(), 1);
    }

    #[test]
    fn test_short_read_is_an_error() {
        let (mut counter, _) = counting_counter(true);
        assert!(matches!(
            counter.capture_samples(2048),
            Err(PulseCounterError::ShortRead {
                requested: 2048,
                filled: 1024
            })
        ));
    }

    #[test]
    fn test_simulated_capture_from_config() {
        let config = CaptureConfig::builder()
            .samples(10_000)
            .source(SourceConfig::Simulated {
                seed: Some(1),
                delay_ms: 0,
                anomaly_rate: 0.1,
            })
            .build();
        let mut counter = PulseCounter::from_config(config).unwrap();
        let mut renderer = TableRenderer::new();

        let frame = counter.capture_into(&mut renderer).unwrap();
        assert_eq!(frame.total(), 10_000);
        assert!(frame.anomalies.total() > 0);

        let table = renderer.last_frame().unwrap();
        assert_eq!(table.height(), 64);

        let summary = counter.get_summary(&frame);
        assert!(summary.contains("Samples: 10000"));
        assert!(summary.contains("Source: simulated"));
    }

    #[test]
    fn test_replay_capture_from_config() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dump.bin");
        let words: Vec<PulseWord> = (0..4096)
            .map(|i| coincidence_mask(i % 8, (i / 8) % 8).unwrap())
            .collect();
        write_pulse_words(&path, &words)?;

        let config = CaptureConfig::builder()
            .samples(2048)
            .source(SourceConfig::Replay {
                path: path.clone(),
                alignment_bytes: 4096,
            })
            .build();
        let mut counter = PulseCounter::from_config(config)?;

        let first = counter.capture()?;
        let second = counter.capture()?;
        assert_eq!(first.pixels.total(), 2048);
        assert_eq!(second.pixels.total(), 2048);
        assert!(first.pixels.counts().iter().all(|&count| count == 32));
        assert!(matches!(
            counter.capture(),
            Err(PulseCounterError::InsufficientData { .. })
        ));
        Ok(())
    }
}
