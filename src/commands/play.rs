use tracing::debug;

use crate::error::Error;
use crate::library::{ScanMode, resolve};
use crate::session::{ErrorNotice, ExhaustionPolicy, StartRequest};

use super::{CommandContext, Invocation, Outcome, load_files};

pub(super) const USAGE: &str =
    "Usage: `play <song id | filename>` (example: `play 12` or `play my song`)";

const PLAYBACK_ERROR: &str = "There was an error playing the song.";

/// Play one song from anywhere in the library, by playlist id or name.
pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let input = inv.input();
    if input.is_empty() {
        return Err(Error::Usage(USAGE));
    }
    let channel = inv.require_voice()?;

    let library = &ctx.settings.library;
    let files = load_files(&library.root, ScanMode::Recursive, library)?;
    let selection = resolve(&input, &files)?;
    debug!(%input, song = %selection.file.name, kind = ?selection.kind, distance = ?selection.distance, "resolved song");

    let song = selection.file.clone();
    let request = StartRequest::new(channel, vec![song.clone()], ExhaustionPolicy::Finite)
        .error_notice(ErrorNotice::Message(PLAYBACK_ERROR.to_string()))
        .notify(inv.sink.clone());
    let started = ctx.sessions.session(inv.guild).start_or_replace(request).await?;

    Ok(Outcome::reply(format!("🎵 Now playing: **{}**", song.name))
        .with_notices(started.notices))
}
