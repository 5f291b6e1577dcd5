// src/core/types.rs
use serde::{Deserialize, Serialize};

/// How many characters a single pass substituted.
pub type ConversionCount = u64;

/// Outcome of one conversion run, printed on the status channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Where the text came from ("-" for stdin).
    pub input: String,
    /// Where the text went ("-" for stdout).
    pub output: String,
    /// Characters replaced by an entity. This is the number the tool reports.
    pub converted: ConversionCount,
    /// Total characters read from the input.
    pub characters_read: u64,
    /// Bytes written to the output, entity text included.
    pub bytes_written: u64,
}

impl ConversionReport {
    /// The status line the command-line tool has always printed.
    pub fn summary(&self) -> String {
        format!("{} characters were converted.", self.converted)
    }
}

/// Counters gathered by the converter during a single pass over a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub converted: ConversionCount,
    pub characters_read: u64,
    pub bytes_written: u64,
}
