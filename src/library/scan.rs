use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::LibrarySettings;
use crate::error::Error;

use super::model::AudioFile;

/// How far below the scanned folder to look.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScanMode {
    /// Only the folder's own files.
    Flat,
    /// The folder and every subfolder, depth-unbounded.
    Recursive,
}

/// An immediate subfolder of a collection, e.g. one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfolder {
    pub name: String,
    pub path: PathBuf,
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            settings
                .extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn walker(
    dir: &Path,
    max_depth: Option<usize>,
    settings: &LibrarySettings,
) -> impl Iterator<Item = DirEntry> {
    let include_hidden = settings.include_hidden;
    let mut walk = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();
    if let Some(depth) = max_depth {
        walk = walk.max_depth(depth);
    }

    walk.into_iter()
        .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
}

/// List the audio files under `dir`.
///
/// Entries are visited depth-first with each directory's children sorted by
/// file name, so the order (and therefore every 1-based song id) is stable
/// between invocations.
pub fn scan(dir: &Path, mode: ScanMode, settings: &LibrarySettings) -> Result<Vec<AudioFile>, Error> {
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir.to_path_buf()));
    }

    // Non-recursive = only the folder itself.
    let max_depth = match mode {
        ScanMode::Flat => Some(1),
        ScanMode::Recursive => None,
    };

    Ok(walker(dir, max_depth, settings)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| AudioFile::new(dir, e.path()))
        .collect())
}

/// Immediate subfolders of `dir`, sorted by name.
pub fn subfolders(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Subfolder>, Error> {
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir.to_path_buf()));
    }

    Ok(walker(dir, Some(1), settings)
        .filter(|e| e.depth() == 1 && e.path().is_dir())
        .map(|e| Subfolder {
            name: e.file_name().to_string_lossy().into_owned(),
            path: e.path().to_path_buf(),
        })
        .collect())
}
