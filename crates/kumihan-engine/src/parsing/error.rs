/// Errors from the parsing pipeline.
///
/// Only [`ParseError::InvalidInput`] ever reaches a caller of the public
/// parse entry points. The other variants are handled inside the
/// orchestrator and surface as log lines or localized messages.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("input is not UTF-8 text: {0}")]
    InvalidInput(#[from] std::str::Utf8Error),
    #[error("chunk {index} failed: {reason}")]
    ChunkFailed { index: usize, reason: String },
    #[error("{parser} parser declined the segment: {reason}")]
    SubParser {
        parser: &'static str,
        reason: String,
    },
}
