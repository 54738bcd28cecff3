use std::path::{Path, PathBuf};

use crate::ids::GuildId;
use crate::transport::TransportError;

const GENERIC_FAILURE: &str = "There was an error executing that command!";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("folder does not exist: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("playlist file does not exist: {}", .0.display())]
    PlaylistNotFound(PathBuf),

    #[error("no supported audio files in {}", .0.display())]
    EmptyLibrary(PathBuf),

    #[error("no playlist songs inside folder {0:?}")]
    EmptyAlbum(String),

    #[error("song index {index} out of range 1..={len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("no exact or close match for {0:?}")]
    NoMatch(String),

    #[error("album {index} out of range 1..={count}")]
    NoSuchAlbum { index: i64, count: usize },

    #[error("invalid playlist data: {0}")]
    InvalidPlaylist(String),

    #[error("invoker is not in a voice channel")]
    NoVoiceChannel,

    #[error("nothing is playing")]
    NothingPlaying,

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("session for guild {0} is no longer running")]
    SessionClosed(GuildId),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The user-facing failure categories every command reports through.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EmptyLibrary,
    InvalidSelection,
    NoVoiceChannel,
    NothingPlaying,
    PlaybackError,
    Usage,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FolderNotFound(_) | Error::PlaylistNotFound(_) => ErrorKind::NotFound,
            Error::EmptyLibrary(_) | Error::EmptyAlbum(_) => ErrorKind::EmptyLibrary,
            Error::IndexOutOfRange { .. }
            | Error::NoMatch(_)
            | Error::NoSuchAlbum { .. }
            | Error::InvalidPlaylist(_) => ErrorKind::InvalidSelection,
            Error::NoVoiceChannel => ErrorKind::NoVoiceChannel,
            Error::NothingPlaying => ErrorKind::NothingPlaying,
            Error::Playback(_) | Error::Transport(_) => ErrorKind::PlaybackError,
            Error::Usage(_) => ErrorKind::Usage,
            Error::SessionClosed(_) | Error::Io(_) | Error::Json(_) => ErrorKind::Internal,
        }
    }

    /// Whether this error indicates a fault rather than a bad request.
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// Text shown to the user who issued the command.
    pub fn user_message(&self) -> String {
        match self {
            Error::FolderNotFound(path) => format!(
                "The folder \"{}\" does not exist. Please make sure the songs are in the correct location.",
                folder_name(path)
            ),
            Error::PlaylistNotFound(_) => {
                "The playlist file does not exist. Please run the playlist command first."
                    .to_string()
            }
            Error::EmptyLibrary(_) => "The folder is empty or contains unsupported file types. Add some songs to the folder first.".to_string(),
            Error::EmptyAlbum(name) => format!("No songs found in the folder \"{name}\"."),
            Error::IndexOutOfRange { index, len } => format!(
                "Invalid song index: {index}. Please provide a number between 1 and {len}."
            ),
            Error::NoMatch(input) => format!(
                "No exact or close match found for **{input}**. Please try again with a valid song ID or filename."
            ),
            Error::NoSuchAlbum { index, count: 0 } => {
                format!("Album {index} does not exist. There are no albums in this folder.")
            }
            Error::NoSuchAlbum { index, count } => format!(
                "Album {index} does not exist. Please choose a valid album number (1 to {count})."
            ),
            Error::InvalidPlaylist(_) => "Invalid playlist data. Please regenerate the playlist using the playlist command.".to_string(),
            Error::NoVoiceChannel => "You need to be in a voice channel to play music!".to_string(),
            Error::NothingPlaying => {
                "There are no songs playing or no songs in the queue.".to_string()
            }
            Error::Playback(_) | Error::Transport(_) => {
                "There was an error trying to play the song.".to_string()
            }
            Error::Usage(usage) => usage.to_string(),
            Error::SessionClosed(_) | Error::Io(_) | Error::Json(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
