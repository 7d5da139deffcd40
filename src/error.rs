// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Error types

use crate::ranges::RangeError;
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

/// Malformed UTF-8 input
///
/// `offset` is the byte offset of the offending byte. `bytes` holds the
/// sequence read so far, ending with the offending byte (if any byte was
/// found: a sequence truncated by the end of input ends without one).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BadEncoding {
    pub offset: usize,
    pub bytes: SmallVec<[u8; 4]>,
}

impl fmt::Display for BadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid UTF-8 at byte {}:", self.offset)?;
        for b in &self.bytes {
            write!(f, " {b:02X}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BadEncoding {}

/// Error kinds
///
/// Each [`Error`] variant maps to one kind; these are suitable for matching,
/// metrics and [`Diagnostic`](crate::Diagnostic) events.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AllocationFailure,
    RasterizerUnavailable,
    FontSourceNotFound,
    RasterizerCallFailed,
    Unsupported,
    BadEncoding,
    InvalidRanges,
}

impl ErrorKind {
    /// Stable name of the kind
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::AllocationFailure => "AllocationFailure",
            ErrorKind::RasterizerUnavailable => "RasterizerUnavailable",
            ErrorKind::FontSourceNotFound => "FontSourceNotFound",
            ErrorKind::RasterizerCallFailed => "RasterizerCallFailed",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::BadEncoding => "BadEncoding",
            ErrorKind::InvalidRanges => "InvalidRanges",
        }
    }

    /// Generic message describing the kind
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::AllocationFailure => "Memory allocation failed",
            ErrorKind::RasterizerUnavailable => "Glyph rasterizer could not be initialized",
            ErrorKind::FontSourceNotFound => "Found no matching font",
            ErrorKind::RasterizerCallFailed => "Glyph rasterizer call failed",
            ErrorKind::Unsupported => {
                "Requested character was not supported by the font, nor could a suitable replacement be found"
            }
            ErrorKind::BadEncoding => "String was not encoded according to the expected format",
            ErrorKind::InvalidRanges => "Codepoint ranges were not ascending and disjoint",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Atlas building and lookup errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("memory allocation of {bytes} bytes failed")]
    AllocationFailure { bytes: usize },
    #[error("glyph rasterizer unavailable: {0}")]
    RasterizerUnavailable(String),
    #[error("no font source found: {0}")]
    FontSourceNotFound(String),
    #[error("rasterizer call failed for U+{codepoint:04X}: {reason}")]
    RasterizerCallFailed { codepoint: u32, reason: String },
    #[error("U+{codepoint:04X} is not supported by the font, nor is replacement U+{replacement:04X}")]
    Unsupported { codepoint: u32, replacement: u32 },
    #[error(transparent)]
    BadEncoding(#[from] BadEncoding),
    #[error("invalid codepoint ranges: {0}")]
    InvalidRanges(#[from] RangeError),
}

impl Error {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AllocationFailure { .. } => ErrorKind::AllocationFailure,
            Error::RasterizerUnavailable(_) => ErrorKind::RasterizerUnavailable,
            Error::FontSourceNotFound(_) => ErrorKind::FontSourceNotFound,
            Error::RasterizerCallFailed { .. } => ErrorKind::RasterizerCallFailed,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
            Error::BadEncoding(_) => ErrorKind::BadEncoding,
            Error::InvalidRanges(_) => ErrorKind::InvalidRanges,
        }
    }
}

/// Result type with [`Error`] as the default error
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn display() {
        let err = BadEncoding {
            offset: 3,
            bytes: smallvec![0xE2, 0x41],
        };
        assert_eq!(err.to_string(), "invalid UTF-8 at byte 3: E2 41");

        let err = Error::Unsupported {
            codepoint: 0x41,
            replacement: 0xFFFD,
        };
        assert_eq!(
            err.to_string(),
            "U+0041 is not supported by the font, nor is replacement U+FFFD"
        );
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.kind().name(), "Unsupported");
    }

    #[test]
    fn kind_of_encoding_error() {
        let err = Error::from(BadEncoding {
            offset: 0,
            bytes: smallvec![0x80],
        });
        assert_eq!(err.kind(), ErrorKind::BadEncoding);
        assert_eq!(err.to_string(), "invalid UTF-8 at byte 0: 80");
    }
}
