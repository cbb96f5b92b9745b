use crate::parser::parse_pulse_words;
use crate::source::PulseSource;
use crate::types::pulse::PulseWord;
use crate::utils::file_utils::read_binary_file_mmap;
use crate::{PulseCounterError, Result};
use memmap2::Mmap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Replays a recorded DMA dump of big-endian pulse words.
///
/// Reads advance through the file; requests must be whole transfer units, as
/// they were for the live device.
pub struct ReplaySource {
    path: PathBuf,
    mmap_data: Mmap,
    // Byte offset of the next unread word
    cursor: usize,
    alignment_words: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>, alignment_bytes: usize) -> Result<Self> {
        if alignment_bytes == 0 || alignment_bytes % 2 != 0 {
            return Err(PulseCounterError::InvalidConfig(format!(
                "alignment_bytes {} must be a positive even number",
                alignment_bytes
            )));
        }

        let path = path.as_ref().to_path_buf();
        let mmap_data = read_binary_file_mmap(&path)?;
        let trailing = mmap_data.len() % 2;
        if trailing != 0 {
            return Err(PulseCounterError::TruncatedWord { trailing });
        }

        debug!(
            "Opened replay source {} with {} pulse words",
            path.display(),
            mmap_data.len() / 2
        );

        Ok(Self {
            path,
            mmap_data,
            cursor: 0,
            alignment_words: alignment_bytes / 2,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Words left before the end of the recording.
    pub fn remaining(&self) -> usize {
        (self.mmap_data.len() - self.cursor) / 2
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl PulseSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn alignment(&self) -> usize {
        self.alignment_words
    }

    fn available(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn fill(&mut self, buf: &mut [PulseWord]) -> Result<usize> {
        let requested = buf.len();
        let available = self.remaining();
        if requested > available {
            return Err(PulseCounterError::InsufficientData {
                requested,
                available,
            });
        }

        let end = self.cursor + requested * 2;
        let mut input = &self.mmap_data[self.cursor..end];
        let words = parse_pulse_words(&mut input, requested).map_err(|e| {
            PulseCounterError::Parse(format!(
                "Error parsing {} at byte {}: {:?}",
                self.path.display(),
                self.cursor,
                e
            ))
        })?;

        buf.copy_from_slice(&words);
        self.cursor = end;
        Ok(requested)
    }
}
