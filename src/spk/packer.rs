use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PathContext, Result, SpkError};

use super::manifest::{MANIFEST_FILE, Manifest};
use super::path::normalize_rel_path;
use super::writer::SpkWriter;

/// Pack every file under `input_dir` into a new archive at `archive_path`.
///
/// Entry order comes from [`collect_files`]. An existing `archive_path` is an
/// error unless `overwrite` is set. On failure the partially written archive
/// is left on disk.
pub fn pack(input_dir: &Path, archive_path: &Path, overwrite: bool) -> Result<()> {
    if fs::symlink_metadata(archive_path).is_ok() {
        if !overwrite {
            return Err(SpkError::DestinationExists(archive_path.to_path_buf()));
        }
        fs::remove_file(archive_path).with_path(archive_path)?;
    }
    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
    }

    let files = collect_files(input_dir)?;

    let file = File::create(archive_path).with_path(archive_path)?;
    let mut writer = SpkWriter::new(BufWriter::new(file), archive_path)?;
    for rel in &files {
        let path = input_dir.join(rel);
        let data = fs::read(&path).with_path(&path)?;
        writer.add_file(rel, &data)?;
    }
    writer.finish()?;

    debug!(
        "packed {} files from {} into {}",
        files.len(),
        input_dir.display(),
        archive_path.display()
    );
    Ok(())
}

/// Ordered list of relative paths to pack from `input_dir`.
///
/// Starts from `__files__.txt` when present, then appends every regular file
/// found by the walk that is not listed yet. The walk visits entries sorted
/// by name and skips files named `__files__.txt`. Symlinked directories are
/// not descended into; symlinks to regular files are packed with the target's
/// contents under the link's name.
pub fn collect_files(input_dir: &Path) -> Result<Vec<String>> {
    let mut manifest = Manifest::load(input_dir)?.unwrap_or_default();
    let listed = manifest.len();

    for ent in WalkDir::new(input_dir)
        .follow_links(false)
        .sort_by_file_name()
    {
        let ent = ent.map_err(|e| {
            let path = e.path().unwrap_or(input_dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            SpkError::Io { path, source }
        })?;

        let is_file = if ent.path_is_symlink() {
            ent.path().is_file()
        } else {
            ent.file_type().is_file()
        };
        if !is_file || ent.file_name() == MANIFEST_FILE {
            continue;
        }
        manifest.push(normalize_rel_path(input_dir, ent.path())?);
    }

    debug!(
        "{} files from manifest, {} found by walk",
        listed,
        manifest.len() - listed
    );
    Ok(manifest.into_vec())
}
