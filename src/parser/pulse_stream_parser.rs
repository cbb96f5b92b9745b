//! Parser for raw pulse streams as written by the DMA engine
//!
//! The device streams 16-bit words in big-endian order, so host-side
//! buffers are byte-swapped relative to the wire.

use crate::types::pulse::PulseWord;
use crate::{PulseCounterError, Result};
use winnow::{Parser, binary::be_u16, combinator::repeat, error::ContextError};

/// Parses a single big-endian pulse word (2 bytes).
pub fn parse_pulse_word(input: &mut &[u8]) -> std::result::Result<PulseWord, ContextError> {
    be_u16.parse_next(input)
}

/// Parses exactly `count` pulse words from the front of `input`.
pub fn parse_pulse_words(
    input: &mut &[u8],
    count: usize,
) -> std::result::Result<Vec<PulseWord>, ContextError> {
    repeat(count, parse_pulse_word).parse_next(input)
}

/// Decodes a whole dump into pulse words. A trailing odd byte is an error.
pub fn parse_pulse_stream(bytes: &[u8]) -> Result<Vec<PulseWord>> {
    let trailing = bytes.len() % 2;
    if trailing != 0 {
        return Err(PulseCounterError::TruncatedWord { trailing });
    }

    let mut input = bytes;
    parse_pulse_words(&mut input, bytes.len() / 2)
        .map_err(|e| PulseCounterError::Parse(format!("Error parsing pulse stream: {:?}", e)))
}
