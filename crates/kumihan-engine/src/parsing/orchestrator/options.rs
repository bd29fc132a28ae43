use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::messages::Locale;

/// Tuning knobs for [`super::Parser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub locale: Locale,
    /// Inputs with at least this many lines are parsed in parallel.
    pub parallel_line_threshold: usize,
    /// Inputs with at least this many bytes are parsed in parallel.
    pub parallel_byte_threshold: usize,
    /// Upper bound on worker threads.
    pub max_workers: usize,
    /// Target number of lines per parallel chunk.
    pub chunk_lines: usize,
    /// Buffered bytes that trigger a streaming flush.
    pub stream_buffer_bytes: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            locale: Locale::Ja,
            parallel_line_threshold: 10_000,
            parallel_byte_threshold: 100_000,
            max_workers: 4,
            chunk_lines: 2_000,
            stream_buffer_bytes: 8 * 1024,
        }
    }
}

/// How an input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    Parallel,
    Streaming,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Sequential => "sequential",
            Strategy::Parallel => "parallel",
            Strategy::Streaming => "streaming",
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected sequential, parallel or streaming)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "parallel" => Ok(Strategy::Parallel),
            "streaming" => Ok(Strategy::Streaming),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
