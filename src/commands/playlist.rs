use crate::error::Error;
use crate::library::{Playlist, ScanMode};
use crate::reply::Reply;

use super::pages::{self, PLAYLIST_PAGE_LINES};
use super::{CommandContext, Outcome, load_files};

/// Number every song under the root, save the numbering to the playlist
/// file and list it.
pub(super) fn run(ctx: &CommandContext) -> Result<Outcome, Error> {
    let library = &ctx.settings.library;
    let files = load_files(&library.root, ScanMode::Recursive, library)?;

    let playlist = Playlist::from_files(&files);
    let path = library.playlist_path();
    playlist.write(&path)?;
    tracing::info!(path = %path.display(), songs = playlist.songs.len(), "wrote playlist");

    let lines: Vec<String> = playlist
        .songs
        .iter()
        .map(|song| format!("{}: {}", song.id, song.path))
        .collect();
    let bodies = pages::by_count(&lines, PLAYLIST_PAGE_LINES);
    let total = bodies.len();
    let replies = bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| Reply::page("🎶 Playlist", body, format!("Page {} of {total}", i + 1)))
        .collect();

    Ok(Outcome::paged(replies))
}
