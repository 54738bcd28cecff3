//! User-facing commands.
//!
//! Every command takes a normalized [`Invocation`], composes the library and
//! the per-guild session, and yields exactly one primary reply. [`run`] is the
//! single boundary where errors become replies.

mod album;
mod band;
mod lobo;
mod mixtape;
mod pages;
mod play;
mod playlist;
mod skip;
mod stop;

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{LibrarySettings, Settings};
use crate::error::Error;
use crate::ids::{ChannelId, GuildId};
use crate::library::{self, AudioFile, ScanMode};
use crate::reply::{Reply, ReplySink};
use crate::session::SessionRegistry;

/// Shared state every command runs against.
#[derive(Clone)]
pub struct CommandContext {
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionRegistry>,
}

/// One command call, already stripped of prefix and command name.
pub struct Invocation {
    pub guild: GuildId,
    pub args: Vec<String>,
    /// The invoker's voice channel, after any fallback the caller applies.
    pub voice_channel: Option<ChannelId>,
    pub sink: Arc<dyn ReplySink>,
}

impl Invocation {
    /// All arguments joined back into one string.
    pub fn input(&self) -> String {
        self.args.join(" ").trim().to_string()
    }

    fn require_voice(&self) -> Result<ChannelId, Error> {
        self.voice_channel.ok_or(Error::NoVoiceChannel)
    }
}

/// What a successful command sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub primary: Reply,
    pub follow_ups: Vec<Reply>,
}

impl Outcome {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            primary: Reply::text(text),
            follow_ups: Vec::new(),
        }
    }

    /// Queue session notices to go out after the primary reply.
    fn with_notices(mut self, notices: Vec<String>) -> Self {
        self.follow_ups.extend(notices.into_iter().map(Reply::text));
        self
    }

    /// First page as the primary reply, the rest as follow-ups.
    fn paged(pages: Vec<Reply>) -> Self {
        let mut pages = pages.into_iter();
        let primary = pages.next().unwrap_or_else(|| Reply::text(String::new()));
        Self {
            primary,
            follow_ups: pages.collect(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    Band,
    Lobo,
    Mixtape,
    Skip,
    Stop,
    Album,
    Playlist,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Play,
        Command::Band,
        Command::Lobo,
        Command::Mixtape,
        Command::Skip,
        Command::Stop,
        Command::Album,
        Command::Playlist,
    ];

    /// Look a command up by its (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Band => "band",
            Command::Lobo => "lobo",
            Command::Mixtape => "mixtape",
            Command::Skip => "skip",
            Command::Stop => "stop",
            Command::Album => "album",
            Command::Playlist => "playlist",
        }
    }

    pub async fn execute(self, ctx: &CommandContext, inv: &Invocation) -> Result<Outcome, Error> {
        match self {
            Command::Play => play::run(ctx, inv).await,
            Command::Band => band::run(ctx, inv).await,
            Command::Lobo => lobo::run(ctx, inv).await,
            Command::Mixtape => mixtape::run(ctx, inv).await,
            Command::Skip => skip::run(ctx, inv).await,
            Command::Stop => stop::run(ctx, inv).await,
            Command::Album => album::run(ctx, inv),
            Command::Playlist => playlist::run(ctx),
        }
    }
}

/// Execute `command` and deliver its replies. Never fails: errors become the
/// primary reply.
pub async fn run(command: Command, ctx: &CommandContext, inv: Invocation) {
    info!(command = command.name(), guild = %inv.guild, args = ?inv.args, "executing command");

    let outcome = match command.execute(ctx, &inv).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_internal() {
                error!(command = command.name(), guild = %inv.guild, "command failed: {e}");
            } else {
                info!(command = command.name(), guild = %inv.guild, kind = ?e.kind(), "command rejected: {e}");
            }
            Outcome::reply(e.user_message())
        }
    };

    if let Err(e) = inv.sink.primary_reply(outcome.primary).await {
        warn!(command = command.name(), "could not send reply: {e}");
        return;
    }
    for reply in outcome.follow_ups {
        if let Err(e) = inv.sink.follow_up(reply).await {
            warn!(command = command.name(), "could not send follow-up: {e}");
            break;
        }
    }
}

/// Scan `dir`, treating an empty result as an error.
fn load_files(dir: &Path, mode: ScanMode, settings: &LibrarySettings) -> Result<Vec<AudioFile>, Error> {
    let files = library::scan(dir, mode, settings)?;
    if files.is_empty() {
        return Err(Error::EmptyLibrary(dir.to_path_buf()));
    }
    info!(folder = %dir.display(), count = files.len(), "found supported songs");
    Ok(files)
}
