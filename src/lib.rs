//! # spkpack
//!
//! Pack directory trees into SPK archives and extract them again.
//!
//! An SPK archive bundles many files into one blob. Each file is compressed
//! on its own with zlib/DEFLATE, and a trailing index records every entry's
//! name, payload offset and sizes. The index is found through an offset
//! stored in the fixed header at the start of the file.
//!
//! ## Features
//!
//! - Extract an archive into a directory, recording entry order in `__files__.txt`
//! - Pack a directory, keeping the order from an existing `__files__.txt` and
//!   appending newly found files
//! - List archive contents without extracting
//! - Validation of signature, versions, offsets and decompressed sizes
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! fn main() -> spkpack::Result<()> {
//!     let files = spkpack::extract(Path::new("data.spk"), Path::new("data"), false)?;
//!     println!("{} files", files.len());
//!
//!     spkpack::pack(Path::new("data"), Path::new("rebuilt.spk"), true)?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod spk;

pub use cli::Cli;
pub use error::{FormatError, Result, SpkError};
pub use io::{LocalFileReader, ReadAt};
pub use spk::{SpkExtractor, SpkFileEntry, SpkParser, SpkWriter, extract, pack};
