//! Low-level SPK archive parser.
//!
//! This module reads SPK structures from any source that implements the
//! [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! SPK archives keep their metadata at the end:
//! 1. Read the archive header at offset 0 to get the entry count and the
//!    index offset
//! 2. Walk the index region, one entry header plus filename at a time
//! 3. For extraction, read each entry's compressed payload by absolute offset
//!
//! Every offset read from the archive is checked against the file size and
//! the region it must live in before it is used.

use std::path::PathBuf;

use crate::error::{FormatError, PathContext, Result, SpkError};
use crate::io::ReadAt;

use super::structures::*;

/// Low-level SPK archive parser.
///
/// Typically used through [`SpkExtractor`](super::SpkExtractor)
/// rather than directly.
pub struct SpkParser<R: ReadAt> {
    /// The underlying data source
    reader: R,
    /// Total size of the archive in bytes
    size: u64,
    /// Path reported in I/O errors
    name: PathBuf,
}

impl<R: ReadAt> SpkParser<R> {
    /// Create a new parser for the given reader.
    ///
    /// `name` identifies the source in error messages, usually the archive path.
    pub fn new(reader: R, name: impl Into<PathBuf>) -> Self {
        let size = reader.size();
        Self {
            reader,
            size,
            name: name.into(),
        }
    }

    /// Read and validate the archive header at offset 0.
    pub fn read_header(&self) -> Result<ArchiveHeader> {
        let len = (ARCHIVE_HEADER_SIZE as u64).min(self.size) as usize;
        let mut buf = vec![0u8; len];
        self.reader.read_exact_at(0, &mut buf).with_path(&self.name)?;
        Ok(ArchiveHeader::from_bytes(&buf)?)
    }

    /// List all entries in index order.
    ///
    /// Reads the archive header, then walks `num_files` entries starting at
    /// `index_offset`. Each entry's payload range is checked to lie between
    /// the end of the header and the start of the index.
    ///
    /// # Errors
    ///
    /// Returns [`SpkError::Format`] for a bad archive header and
    /// [`SpkError::Entry`] naming the entry index for a bad entry.
    pub fn list_files(&self) -> Result<Vec<SpkFileEntry>> {
        let header = self.read_header()?;
        let payload_start = ARCHIVE_HEADER_SIZE as u64;
        let index_offset = header.index_offset as u64;

        if index_offset < payload_start || index_offset > self.size {
            return Err(FormatError::OutOfBounds {
                what: "index offset",
                start: index_offset,
                end: index_offset,
                lower: payload_start,
                upper: self.size,
            }
            .into());
        }

        // num_files comes from the archive, so don't trust it for the allocation
        let max_entries = (self.size - index_offset) / ENTRY_HEADER_SIZE as u64;
        let mut entries = Vec::with_capacity(max_entries.min(header.num_files as u64) as usize);
        let mut cursor = index_offset;

        for index in 0..header.num_files {
            let entry = self
                .parse_entry(cursor, index_offset)
                .map_err(|err| match err {
                    SpkError::Format(source) => SpkError::Entry { index, source },
                    other => other,
                })?;
            cursor += entry.header.index_len();
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Parse one entry header and its filename at `cursor`.
    fn parse_entry(&self, cursor: u64, index_offset: u64) -> Result<SpkFileEntry> {
        let mut buf = [0u8; ENTRY_HEADER_SIZE];
        self.ensure_available(cursor, ENTRY_HEADER_SIZE as u64)?;
        self.reader.read_exact_at(cursor, &mut buf).with_path(&self.name)?;
        let header = EntryHeader::from_bytes(&buf)?;

        let name_offset = cursor + ENTRY_HEADER_SIZE as u64;
        self.ensure_available(name_offset, header.filename_size as u64)?;
        let mut name_buf = vec![0u8; header.filename_size as usize];
        self.reader
            .read_exact_at(name_offset, &mut name_buf)
            .with_path(&self.name)?;
        let file_name = decode_filename(&name_buf).map_err(|e| {
            FormatError::InvalidFilename(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;

        let (start, end) = header.payload_range();
        let payload_start = ARCHIVE_HEADER_SIZE as u64;
        if start < payload_start || end > index_offset {
            return Err(FormatError::OutOfBounds {
                what: "payload",
                start,
                end,
                lower: payload_start,
                upper: index_offset,
            }
            .into());
        }

        Ok(SpkFileEntry { file_name, header })
    }

    fn ensure_available(&self, offset: u64, len: u64) -> Result<()> {
        let available = self.size.saturating_sub(offset);
        if available < len {
            return Err(FormatError::Truncated {
                needed: len as usize,
                available: available as usize,
            }
            .into());
        }
        Ok(())
    }

    /// Read the raw compressed payload of an entry.
    pub fn read_payload(&self, entry: &SpkFileEntry) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; entry.header.compress_size as usize];
        self.reader
            .read_exact_at(entry.offset(), &mut buf)
            .with_path(&self.name)?;
        Ok(buf)
    }
}
