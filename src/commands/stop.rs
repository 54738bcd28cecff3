use crate::error::Error;

use super::{CommandContext, Invocation, Outcome};

/// Stopping an idle guild is not an error, only a different reply.
pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let was_connected = match ctx.sessions.existing(inv.guild) {
        Some(session) => session.stop().await?,
        None => false,
    };

    Ok(Outcome::reply(if was_connected {
        "🛑 Stopped the music and disconnected from the voice channel."
    } else {
        "I am not currently connected to a voice channel in this server."
    }))
}
