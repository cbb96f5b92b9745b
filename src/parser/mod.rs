//! Raw pulse stream parsing

pub mod pulse_stream_parser;

// Re-export the parsing functions
pub use pulse_stream_parser::{parse_pulse_stream, parse_pulse_word, parse_pulse_words};
