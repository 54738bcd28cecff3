use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::model::AudioFile;

/// One row of `playlist.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// 1-based, matches the index accepted by `play`.
    pub id: u64,
    /// `/`-separated path relative to the library root.
    pub path: String,
}

/// The generated id listing, `{ "songs": [ { "id": 1, "path": "band/a.mp3" }, ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub songs: Vec<PlaylistEntry>,
}

impl Playlist {
    /// Number the files in scan order, starting at 1.
    pub fn from_files(files: &[AudioFile]) -> Self {
        let songs = (1u64..)
            .zip(files)
            .map(|(id, file)| PlaylistEntry {
                id,
                path: file.relative.clone(),
            })
            .collect();
        Self { songs }
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, Error> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::PlaylistNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|e| Error::InvalidPlaylist(e.to_string()))
    }

    /// Entries stored under `folder` (a `/`-separated path relative to the root).
    pub fn in_folder(&self, folder: &str) -> Vec<&PlaylistEntry> {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            return self.songs.iter().collect();
        }
        let prefix = format!("{folder}/");
        self.songs
            .iter()
            .filter(|song| song.path.starts_with(&prefix))
            .collect()
    }
}
