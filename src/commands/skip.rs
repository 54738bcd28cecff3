use crate::error::Error;

use super::{CommandContext, Invocation, Outcome};

pub(super) async fn run(ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
    let session = ctx.sessions.existing(inv.guild).ok_or(Error::NothingPlaying)?;
    session.skip().await?;
    Ok(Outcome::reply("⏭️ Skipped to the next song!"))
}
