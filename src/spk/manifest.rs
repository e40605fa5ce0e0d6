//! The `__files__.txt` side channel recording entry order.
//!
//! Extraction writes one relative path per line in archive order. A later
//! pack of the same directory starts from that list and only appends files
//! the walk finds that are not in it yet.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{PathContext, Result};

/// Manifest filename at the root of an extracted or packed directory.
pub const MANIFEST_FILE: &str = "__files__.txt";

/// Ordered list of relative paths with O(1) membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from manifest text. Blank lines and repeated paths are dropped.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::new();
        for line in text.lines() {
            if !line.is_empty() {
                manifest.push(line);
            }
        }
        manifest
    }

    /// Load `dir/__files__.txt` if present.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).with_path(&path)?;
        Ok(Some(Self::parse(&text)))
    }

    /// Append `path` unless already listed. Returns whether it was added.
    pub fn push(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.order.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// Write `paths` to `dir/__files__.txt`, newline-joined, in the given order.
pub fn write_manifest<S: AsRef<str>>(dir: &Path, paths: &[S]) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    let text = paths
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    fs::write(&path, text).with_path(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_occurrence_order() {
        let mut manifest = Manifest::parse("b.txt\na/c.txt\nb.txt\n");
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.push("a/c.txt"));
        assert!(manifest.push("z.txt"));
        assert!(manifest.contains("z.txt"));
        assert_eq!(
            manifest.iter().collect::<Vec<_>>(),
            ["b.txt", "a/c.txt", "z.txt"]
        );
    }

    #[test]
    fn parses_crlf_and_blank_lines() {
        let manifest = Manifest::parse("one\r\n\r\ntwo");
        assert_eq!(manifest.into_vec(), ["one", "two"]);
        assert!(Manifest::parse("").is_empty());
    }

    #[test]
    fn load_and_write() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Manifest::load(dir.path()).unwrap(), None);

        write_manifest(dir.path(), &["a.txt", "sub/b.bin"]).unwrap();
        let text = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(text, "a.txt\nsub/b.bin");

        let manifest = Manifest::load(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.into_vec(), ["a.txt", "sub/b.bin"]);
    }
}
