use crate::error::Error;
use crate::library::ScanMode;
use crate::session::{ExhaustionPolicy, StartRequest, shuffled};

use super::{CommandContext, Invocation, Outcome, load_files};

/// Shuffle the band folder and keep playing it until stopped.
pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let channel = inv.require_voice()?;

    let library = &ctx.settings.library;
    let folder = library.folder(&ctx.settings.collections.band);
    let files = load_files(&folder, ScanMode::Flat, library)?;
    let queue = shuffled(&files, &mut rand::rng());

    let request = StartRequest::new(channel, queue, ExhaustionPolicy::Looping).notify(inv.sink.clone());
    let started = ctx.sessions.session(inv.guild).start_or_replace(request).await?;

    Ok(Outcome::reply("🎵 Playing songs from the band folder in random order!")
        .with_notices(started.notices))
}
