//! The music library: file discovery, song selection from user input, and
//! the generated `playlist.json` that maps numeric ids to files.
//!
//! Everything here is recomputed per command; nothing is cached, so files
//! added to or removed from disk show up on the next invocation.

mod model;
mod playlist;
mod resolve;
mod scan;

pub use model::AudioFile;
pub use playlist::{Playlist, PlaylistEntry};
pub use resolve::{FUZZY_THRESHOLD, MatchKind, Resolution, leading_integer, levenshtein, resolve};
pub use scan::{ScanMode, Subfolder, scan, subfolders};
