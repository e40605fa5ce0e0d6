//! Error types for SPK packing and extraction.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Malformed archive or entry header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The first four bytes are not `.spk`.
    #[error("invalid SPK signature: {0:02X?}")]
    BadSignature([u8; 4]),

    /// Version field is not 1.
    #[error("unsupported SPK version {0}")]
    UnsupportedVersion(u16),

    /// Fewer bytes available than the structure needs.
    #[error("truncated data: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// Stored filename is not valid UTF-8.
    #[error("filename is not valid UTF-8: {0}")]
    InvalidFilename(String),

    /// An offset or range points outside the region it must live in.
    #[error("{what} out of bounds: {start:#X}..{end:#X} not within {lower:#X}..{upper:#X}")]
    OutOfBounds {
        what: &'static str,
        start: u64,
        end: u64,
        lower: u64,
        upper: u64,
    },
}

/// Errors that can occur when packing or extracting SPK archives.
#[derive(Debug, Error)]
pub enum SpkError {
    /// Malformed archive header.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Malformed entry in the index region.
    #[error("entry {index}: {source}")]
    Entry {
        index: u32,
        #[source]
        source: FormatError,
    },

    /// The payload did not decompress to the declared size.
    #[error("corrupt payload for {file}: {detail}")]
    PayloadCorrupt { file: String, detail: String },

    /// Target path already exists and overwrite was not requested.
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    /// A length or offset does not fit the fixed-width field.
    #[error("{what} of {value} exceeds the format limit")]
    SizeOverflow { what: &'static str, value: u64 },

    /// Entry name would escape the output directory.
    #[error("refusing to extract unsafe path: {0}")]
    UnsafePath(String),

    /// A file under the input directory has a name that is not UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// Filesystem error on a specific path.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for SPK operations.
pub type Result<T> = std::result::Result<T, SpkError>;

/// Attach the offending path to an I/O error.
pub trait PathContext<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> PathContext<T> for io::Result<T> {
    fn with_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| SpkError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Narrow a length or offset to a `u32` field.
pub(crate) fn to_u32(value: u64, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| SpkError::SizeOverflow { what, value })
}
