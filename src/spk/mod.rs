//! SPK archive reading and writing.
//!
//! ## Format Overview
//!
//! An SPK file consists of:
//! 1. A 16-byte archive header (`.spk`, version, entry count, index offset)
//! 2. The zlib-compressed payload of each file, back to back
//! 3. The index: one 16-byte entry header per file, each followed by the
//!    NUL-terminated UTF-8 filename
//!
//! All integers are little-endian. Reading starts at the header and jumps to
//! the index; payloads are then read by absolute offset.
//!
//! ## Architecture
//!
//! - [`structures`]: header layouts and their byte-exact encode/decode
//! - [`parser`]: reads the header and index from any [`ReadAt`](crate::io::ReadAt)
//! - [`extractor`]: extraction API and the [`extract`] operation
//! - [`writer`]: streaming archive writer
//! - [`packer`]: the [`pack`] operation over a directory tree
//! - [`manifest`]: the `__files__.txt` ordering side channel
//!
//! ## Limitations
//!
//! - Format version 1 only
//! - No encryption, checksums or in-place updates
//! - Offsets and sizes are 32-bit, so archives are limited to 4 GiB

mod codec;
mod extractor;
mod manifest;
mod packer;
mod parser;
mod path;
mod structures;
mod writer;

pub use codec::{compress, decompress};
pub use extractor::{SpkExtractor, extract};
pub use manifest::{MANIFEST_FILE, Manifest, write_manifest};
pub use packer::{collect_files, pack};
pub use parser::SpkParser;
pub use structures::*;
pub use writer::SpkWriter;
