use crate::Result;
use crate::decoder::PulseDecoder;
use crate::source::PulseSource;
use crate::types::pulse::{NUM_PIXELS, PulseWord};
use bon::bon;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Fake acquisition: every word is a uniformly chosen valid coincidence,
/// optionally mixed with arbitrary words at `anomaly_rate`.
///
/// Seeded sources are reproducible; unseeded ones draw from entropy. `delay`
/// is slept before each fill to mimic acquisition time.
pub struct SimulatedSource {
    rng: StdRng,
    masks: [u16; NUM_PIXELS],
    delay: Duration,
    anomaly_rate: f64,
}

#[bon]
impl SimulatedSource {
    #[builder]
    pub fn new(
        seed: Option<u64>,
        #[builder(default)] delay: Duration,
        #[builder(default)] anomaly_rate: f64,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            masks: *PulseDecoder::global().pixel_map().masks(),
            delay,
            anomaly_rate: if anomaly_rate.is_nan() {
                0.0
            } else {
                anomaly_rate.clamp(0.0, 1.0)
            },
        }
    }
}

impl PulseSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn fill(&mut self, buf: &mut [PulseWord]) -> Result<usize> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        for slot in buf.iter_mut() {
            *slot = if self.anomaly_rate > 0.0 && self.rng.gen_bool(self.anomaly_rate) {
                self.rng.r#gen()
            } else {
                self.masks[self.rng.gen_range(0..NUM_PIXELS)]
            };
        }

        trace!("Simulated {} pulse words", buf.len());
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::count_pixels;

    #[test]
    fn test_only_coincidences_by_default() {
        let mut source = SimulatedSource::builder().seed(3).build();
        let mut buf = vec![0u16; 10_000];
        assert_eq!(source.fill(&mut buf).unwrap(), 10_000);

        let (grid, anomalies) = count_pixels(&buf);
        assert_eq!(anomalies.total(), 0);
        assert_eq!(grid.total(), 10_000);
        // 64 pixels at ~156 hits each; all should be hit
        assert!(grid.counts().iter().all(|&count| count > 0));
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = SimulatedSource::builder().seed(42).anomaly_rate(0.3).build();
        let mut b = SimulatedSource::builder().seed(42).anomaly_rate(0.3).build();
        let mut buf_a = vec![0u16; 512];
        let mut buf_b = vec![0u16; 512];
        a.fill(&mut buf_a).unwrap();
        b.fill(&mut buf_b).unwrap();
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_full_anomaly_rate_produces_anomalies() {
        let mut source = SimulatedSource::builder().seed(5).anomaly_rate(1.0).build();
        let mut buf = vec![0u16; 4096];
        source.fill(&mut buf).unwrap();

        let (grid, anomalies) = count_pixels(&buf);
        // Random words are rarely exact coincidences
        assert!(anomalies.multi > grid.total());
        assert_eq!(grid.total() + anomalies.total(), 4096);
    }
}
