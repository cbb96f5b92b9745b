//! Pulse sources: anything that can fill a buffer with raw pulse words

pub mod replay;
pub mod simulated;

pub use replay::ReplaySource;
pub use simulated::SimulatedSource;

use crate::Result;
use crate::types::pulse::PulseWord;

/// A provider of raw 16-bit pulse words.
///
/// Hardware sources transfer whole units (pages for the DMA engine); callers
/// must request a multiple of [`PulseSource::alignment`] words.
pub trait PulseSource: Send {
    fn name(&self) -> &str;

    /// Transfer unit in words.
    fn alignment(&self) -> usize {
        1
    }

    /// Words left to read, when the source is finite.
    fn available(&self) -> Option<usize> {
        None
    }

    /// Fills `buf` with pulse words and returns how many were written.
    fn fill(&mut self, buf: &mut [PulseWord]) -> Result<usize>;
}

impl<S: PulseSource + ?Sized> PulseSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn alignment(&self) -> usize {
        (**self).alignment()
    }

    fn available(&self) -> Option<usize> {
        (**self).available()
    }

    fn fill(&mut self, buf: &mut [PulseWord]) -> Result<usize> {
        (**self).fill(buf)
    }
}
