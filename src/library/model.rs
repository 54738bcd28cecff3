use std::path::{Component, Path, PathBuf};

/// A playable file discovered under a library folder. Identity is `path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// File name without its extension; what users type and see.
    pub name: String,
    /// Path relative to the scanned folder, always `/`-separated.
    pub relative: String,
}

impl AudioFile {
    pub(crate) fn new(root: &Path, path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        Self {
            path: absolute,
            name,
            relative: slash_relative(root, path),
        }
    }
}

/// `path` relative to `root` with forward slashes, regardless of host separators.
pub(crate) fn slash_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
