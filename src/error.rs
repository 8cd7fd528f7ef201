use std::io;
use thiserror::Error;

use crate::primitive::TextEncoding;

/// Every way a PAK footer or index can fail to decode.
///
/// All failures are terminal for the call that produced them: the decoders
/// stop at the first error and never return partially decoded metadata.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Truncated input: need {needed} byte(s) at offset {offset}, buffer holds {available}")]
    TruncatedInput { offset: u64, needed: u64, available: u64 },
    #[error("Unsupported archive version: {0}")]
    UnsupportedVersion(u32),
    #[error("Invalid magic number: {0:#010x}")]
    InvalidMagic(u32),
    #[error("Unknown compression method: {0}")]
    UnknownCompressionMethod(u32),
    #[error("File name at offset {offset} has a zero length prefix")]
    EmptyName { offset: u64 },
    #[error("Text at offset {offset} is not valid {encoding:?}")]
    InvalidText { offset: u64, encoding: TextEncoding },
    #[error("Range {offset}+{length} exceeds source size {size}")]
    OutOfRange { offset: u64, length: u64, size: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    pub(crate) fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        DecodeError::TruncatedInput {
            offset:    offset as u64,
            needed:    needed as u64,
            available: available as u64,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
