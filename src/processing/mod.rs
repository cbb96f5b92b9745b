pub mod processing;

// Re-export for easier access
pub use processing::*;
