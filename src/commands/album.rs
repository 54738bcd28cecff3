use crate::error::Error;
use crate::library::Playlist;
use crate::reply::Reply;

use super::pages::{self, MAX_PAGE_CHARS};
use super::{CommandContext, Invocation, Outcome};

pub(super) const USAGE: &str =
    "Usage: album <folder>\nExample: `album \"Pizza Collection PizzaDAO's House Band\"`";

/// List the playlist ids of the songs inside one folder. Reads the file the
/// `playlist` command writes; does not rescan.
pub(super) fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let folder = inv.input();
    if folder.is_empty() {
        return Err(Error::Usage(USAGE));
    }

    let library = &ctx.settings.library;
    let dir = library.folder(&folder);
    if !dir.is_dir() {
        return Err(Error::FolderNotFound(dir));
    }

    let playlist = Playlist::read(&library.playlist_path())?;
    let songs = playlist.in_folder(&folder);
    if songs.is_empty() {
        return Err(Error::EmptyAlbum(folder));
    }

    let lines: Vec<String> = songs
        .iter()
        .map(|song| format!("{}: {}", song.id, song.path))
        .collect();
    let bodies = pages::by_length(&lines, MAX_PAGE_CHARS);
    let total = bodies.len();
    let replies = bodies
        .into_iter()
        .enumerate()
        .map(|(i, body)| {
            let title = if i == 0 {
                format!("🎵 Album: {folder}")
            } else {
                format!("🎵 Album: {folder} (cont.)")
            };
            let footer = if i + 1 == total {
                format!("Total songs: {}", songs.len())
            } else {
                format!("Page {}/{total}", i + 1)
            };
            Reply::page(title, body, footer)
        })
        .collect();

    Ok(Outcome::paged(replies))
}
