use crate::types::pulse::PulseWord;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Read a binary file using memory mapping for improved performance
/// This is more efficient for large captures as it doesn't load the entire file into RAM
pub fn read_binary_file_mmap(path: impl AsRef<Path>) -> io::Result<Mmap> {
    let file = File::open(path)?;
    // Safety: The file is not modified while the mmap is active
    unsafe { Mmap::map(&file) }
}

/// Record pulse words as a raw big-endian dump, the byte order the device streams.
pub fn write_pulse_words(path: impl AsRef<Path>, words: &[PulseWord]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for word in words {
        writer.write_all(&word.to_be_bytes())?;
    }
    writer.flush()
}
