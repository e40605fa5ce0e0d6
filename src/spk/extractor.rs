use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{PathContext, Result, SpkError};
use crate::io::{LocalFileReader, ReadAt};

use super::codec;
use super::manifest::write_manifest;
use super::parser::SpkParser;
use super::path::entry_rel_path;
use super::structures::SpkFileEntry;

/// SPK archive extractor
pub struct SpkExtractor<R: ReadAt> {
    parser: SpkParser<R>,
}

impl<R: ReadAt> SpkExtractor<R> {
    pub fn new(parser: SpkParser<R>) -> Self {
        Self { parser }
    }

    /// List all entries in index order
    pub fn list_files(&self) -> Result<Vec<SpkFileEntry>> {
        self.parser.list_files()
    }

    /// Decompress an entry into memory, checking its declared size
    pub fn extract_to_memory(&self, entry: &SpkFileEntry) -> Result<Vec<u8>> {
        let raw = self.parser.read_payload(entry)?;
        codec::decompress(&entry.file_name, &raw, entry.file_size())
    }

    /// Extract an entry to `output_path`, creating parent directories
    pub fn extract_to_file(&self, entry: &SpkFileEntry, output_path: &Path) -> Result<()> {
        let data = self.extract_to_memory(entry)?;

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_path(parent)?;
            }
        }
        fs::write(output_path, &data).with_path(output_path)
    }
}

impl SpkExtractor<LocalFileReader> {
    /// Open an archive on disk.
    pub fn open(archive_path: &Path) -> Result<Self> {
        let reader = LocalFileReader::new(archive_path).with_path(archive_path)?;
        Ok(Self::new(SpkParser::new(reader, archive_path)))
    }
}

/// Extract every entry of `archive_path` into `output_dir`.
///
/// Entries are written in index order and their names returned in that
/// order; the same list is written to `__files__.txt` in `output_dir`.
///
/// An existing `output_dir` is an error unless `overwrite` is set. With
/// `overwrite` it is removed, but only after the whole index has been read
/// and validated. Later entries with a duplicate name overwrite
/// earlier ones. Files written before a failing entry are left in place.
pub fn extract(archive_path: &Path, output_dir: &Path, overwrite: bool) -> Result<Vec<String>> {
    let dest_exists = fs::symlink_metadata(output_dir).is_ok();
    if dest_exists && !overwrite {
        return Err(SpkError::DestinationExists(output_dir.to_path_buf()));
    }

    let extractor = SpkExtractor::open(archive_path)?;
    let entries = extractor.list_files()?;
    let targets = entries
        .iter()
        .map(|e| entry_rel_path(&e.file_name))
        .collect::<Result<Vec<_>>>()?;

    if dest_exists {
        remove_path(output_dir)?;
    }
    fs::create_dir_all(output_dir).with_path(output_dir)?;

    let mut files = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());
    for (entry, rel) in entries.iter().zip(&targets) {
        info!(
            "Extracting {}: {:#X} -> {:#X} at {:#X}",
            entry.file_name,
            entry.file_size(),
            entry.compressed_size(),
            entry.offset()
        );
        if !seen.insert(rel) {
            warn!("duplicate entry {}, overwriting earlier copy", entry.file_name);
        }

        extractor.extract_to_file(entry, &output_dir.join(rel))?;
        files.push(entry.file_name.clone());
    }

    write_manifest(output_dir, &files)?;
    debug!(
        "extracted {} files from {} into {}",
        files.len(),
        archive_path.display(),
        output_dir.display()
    );
    Ok(files)
}

fn remove_path(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).with_path(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path).with_path(path)
    } else {
        fs::remove_file(path).with_path(path)
    }
}
