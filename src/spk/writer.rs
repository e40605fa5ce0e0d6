use std::io::{Seek, SeekFrom, Write};
use std::path::PathBuf;

use tracing::info;

use crate::error::{PathContext, Result, SpkError, to_u32};

use super::codec;
use super::structures::*;

/// Streaming SPK archive writer.
///
/// Layout written:
/// - archive header placeholder, patched by [`finish`](Self::finish)
/// - compressed payloads, contiguous, in the order files are added
/// - index: per entry, [`EntryHeader`] then the UTF-8 name and one NUL
pub struct SpkWriter<W: Write + Seek> {
    inner: W,
    /// Path reported in I/O errors
    name: PathBuf,
    position: u64,
    entries: Vec<SpkFileEntry>,
}

impl<W: Write + Seek> SpkWriter<W> {
    /// Start an archive at the beginning of `inner`.
    pub fn new(mut inner: W, name: impl Into<PathBuf>) -> Result<Self> {
        let name = name.into();
        inner.seek(SeekFrom::Start(0)).with_path(&name)?;
        inner.write_all(&[0u8; ARCHIVE_HEADER_SIZE]).with_path(&name)?;
        Ok(Self {
            inner,
            name,
            position: ARCHIVE_HEADER_SIZE as u64,
            entries: Vec::new(),
        })
    }

    /// Compress `data` and append it as entry `file_name`.
    ///
    /// # Errors
    ///
    /// [`SpkError::SizeOverflow`] if the name, the data or the payload offset
    /// do not fit their header fields.
    pub fn add_file(&mut self, file_name: &str, data: &[u8]) -> Result<&SpkFileEntry> {
        let filename_size = file_name.len() as u64 + 1;
        let filename_size = u16::try_from(filename_size).map_err(|_| SpkError::SizeOverflow {
            what: "filename length",
            value: filename_size,
        })?;
        let file_size = to_u32(data.len() as u64, "file size")?;
        let offset = to_u32(self.position, "payload offset")?;

        let compressed = codec::compress(data).with_path(&self.name)?;
        let compress_size = to_u32(compressed.len() as u64, "compressed size")?;

        info!(
            "Packing {file_name}: {file_size:#X} -> {compress_size:#X} to {offset:#X}"
        );
        self.inner.write_all(&compressed).with_path(&self.name)?;
        self.position += compressed.len() as u64;

        self.entries.push(SpkFileEntry {
            file_name: file_name.to_string(),
            header: EntryHeader {
                filename_size,
                offset,
                file_size,
                compress_size,
            },
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[SpkFileEntry] {
        &self.entries
    }

    /// Write the index, patch the archive header and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        let index_offset = to_u32(self.position, "index offset")?;
        let num_files = to_u32(self.entries.len() as u64, "entry count")?;

        for entry in &self.entries {
            self.inner
                .write_all(&entry.header.to_bytes())
                .with_path(&self.name)?;
            self.inner
                .write_all(entry.file_name.as_bytes())
                .with_path(&self.name)?;
            self.inner.write_all(&[0]).with_path(&self.name)?;
        }

        let header = ArchiveHeader::new(num_files, index_offset);
        self.inner.seek(SeekFrom::Start(0)).with_path(&self.name)?;
        self.inner.write_all(&header.to_bytes()).with_path(&self.name)?;
        self.inner.flush().with_path(&self.name)?;
        Ok(self.inner)
    }
}
