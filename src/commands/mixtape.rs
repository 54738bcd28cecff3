use crate::error::Error;
use crate::library::ScanMode;
use crate::session::{ErrorNotice, ExhaustionPolicy, StartRequest, shuffled};

use super::{CommandContext, Invocation, Outcome, load_files};

/// Play the mixtape folder once, in random order.
pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let channel = inv.require_voice()?;

    let library = &ctx.settings.library;
    let folder = library.folder(&ctx.settings.collections.mixtape);
    let files = load_files(&folder, ScanMode::Flat, library)?;
    let queue = shuffled(&files, &mut rand::rng());

    let request = StartRequest::new(channel, queue, ExhaustionPolicy::Finite)
        .completion_notice("All songs from the mixtape have been played!")
        .error_notice(ErrorNotice::WithReason(
            "An error occurred while playing a song: ".to_string(),
        ))
        .notify(inv.sink.clone());
    let started = ctx.sessions.session(inv.guild).start_or_replace(request).await?;

    Ok(Outcome::reply("🎵 Playing songs from the mixtape folder in random order!")
        .with_notices(started.notices))
}
