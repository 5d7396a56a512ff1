/// Module containing the error types for wave_reader
use thiserror::Error;

use crate::header::HeaderField;

pub type WaveResult<T> = Result<T, WaveError>;

/// Errors raised while decoding the 44-byte header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Header must be exactly 44 bytes, got {actual}")]
    TruncatedInput { actual: usize },
    #[error("Invalid {field}: expected {expected}, found {actual}")]
    InvalidField {
        field: HeaderField,
        expected: String,
        actual: String,
    },
}

impl HeaderError {
    pub(crate) fn invalid<E, A>(field: HeaderField, expected: E, actual: A) -> Self
    where
        E: ToString,
        A: ToString,
    {
        HeaderError::InvalidField {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Errors raised while extracting the sample payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Payload length of {0} bytes is not a whole number of 16-bit samples")]
    OddByteCount(usize),
    #[error("Unsupported bit depth ({0}), only 16-bit payloads can be extracted")]
    UnsupportedBitDepth(i16),
    #[error("Short read from byte source: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("IO error with byte source")]
    SourceError(#[from] std::io::Error),
}

/// Error types for wave_reader
#[derive(Error, Debug)]
pub enum WaveError {
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("IO error with file")]
    IOError(#[from] std::io::Error),
}
