//! Shared utilities: line-oriented input reading and skipped-line errors.

pub mod lines;

pub use lines::{non_blank_lines, LineError, Loaded, NumberedLine};
