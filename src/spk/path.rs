use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SpkError};

/// Path of `file_path` relative to `root`, joined with forward slashes.
pub fn normalize_rel_path(root: &Path, file_path: &Path) -> Result<String> {
    let rel = file_path
        .strip_prefix(root)
        .map_err(|_| SpkError::UnsafePath(file_path.to_string_lossy().into_owned()))?;

    let mut parts = Vec::new();
    for comp in rel.components() {
        let part = comp
            .as_os_str()
            .to_str()
            .ok_or_else(|| SpkError::NonUtf8Path(file_path.to_path_buf()))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Map an archive entry name onto a relative filesystem path.
///
/// Only plain components are allowed; `..`, roots and drive prefixes are
/// rejected so extraction stays inside the output directory.
pub fn entry_rel_path(name: &str) -> Result<PathBuf> {
    let unsafe_path = || SpkError::UnsafePath(name.to_string());

    let mut out = PathBuf::new();
    for part in name.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        let mut comps = Path::new(part).components();
        match (comps.next(), comps.next()) {
            (Some(Component::Normal(c)), None) => out.push(c),
            _ => return Err(unsafe_path()),
        }
    }

    if name.starts_with('/') || out.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rel_paths_use_forward_slashes() {
        let root = Path::new("data");
        let file = root.join("sub").join("b.bin");
        assert_eq!(normalize_rel_path(root, &file).unwrap(), "sub/b.bin");
        assert!(normalize_rel_path(root, Path::new("elsewhere/x")).is_err());
    }

    #[test]
    fn entry_paths() {
        assert_eq!(
            entry_rel_path("sub/b.bin").unwrap(),
            Path::new("sub").join("b.bin")
        );
        assert_eq!(entry_rel_path("./a.txt").unwrap(), Path::new("a.txt"));

        for bad in ["", "/etc/passwd", "../x", "a/../../x", "a/.."] {
            assert!(
                matches!(entry_rel_path(bad), Err(SpkError::UnsafePath(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
