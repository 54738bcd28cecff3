use crate::error::Error;
use crate::library::{ScanMode, leading_integer, subfolders};
use crate::session::{ExhaustionPolicy, StartRequest, shuffled};

use super::{CommandContext, Invocation, Outcome, load_files};

pub(super) const USAGE: &str = "Usage: `lobo` or `lobo <albumNumber>` (example: `lobo 2`)";

/// Without an argument, everything under the lobo folder shuffled; with
/// `n`, the n-th album (subfolder, by name) in order.
pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let album = match inv.args.first().map(|a| a.trim()) {
        None | Some("") => None,
        Some(raw) => Some(leading_integer(raw).ok_or(Error::Usage(USAGE))?),
    };
    let channel = inv.require_voice()?;

    let library = &ctx.settings.library;
    let folder = library.folder(&ctx.settings.collections.lobo);
    let albums = subfolders(&folder, library)?;

    let (queue, message) = match album {
        Some(index) => {
            let chosen = usize::try_from(index)
                .ok()
                .and_then(|i| i.checked_sub(1))
                .and_then(|i| albums.get(i))
                .ok_or(Error::NoSuchAlbum {
                    index,
                    count: albums.len(),
                })?;
            let files = load_files(&chosen.path, ScanMode::Recursive, library)?;
            let message = format!(
                "🎵 Playing Album {index} ({}) from the songs/lobo folder in order!",
                chosen.name
            );
            (files, message)
        }
        None => {
            let files = load_files(&folder, ScanMode::Recursive, library)?;
            let message =
                "🎵 Playing all songs from the songs/lobo folder in random order!".to_string();
            (shuffled(&files, &mut rand::rng()), message)
        }
    };

    let request = StartRequest::new(channel, queue, ExhaustionPolicy::Finite)
        .completion_notice("Finished all songs.")
        .notify(inv.sink.clone());
    let started = ctx.sessions.session(inv.guild).start_or_replace(request).await?;

    Ok(Outcome::reply(message).with_notices(started.notices))
}
