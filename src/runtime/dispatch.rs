//! Turning raw chat lines into command invocations.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use crate::commands::{self, Command, CommandContext, Invocation};
use crate::ids::{ChannelId, GuildId, UserId};
use crate::reply::ReplySink;

/// A command name and its arguments, prefix removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercased.
    pub name: String,
    pub args: Vec<String>,
}

/// Split `content` into a command if it starts with `prefix` or a mention of
/// `bot_user` (`<@ID>` or `<@!ID>`).
pub fn parse_prefixed(content: &str, prefix: &str, bot_user: Option<u64>) -> Option<ParsedCommand> {
    let content = content.trim_start();
    let rest = match content.strip_prefix(prefix).filter(|_| !prefix.is_empty()) {
        Some(rest) => rest,
        None => {
            let id = bot_user?;
            let mention = format!("<@{id}>");
            let nick_mention = format!("<@!{id}>");
            content
                .strip_prefix(mention.as_str())
                .or_else(|| content.strip_prefix(nick_mention.as_str()))?
        }
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next()?.to_lowercase();
    Some(ParsedCommand {
        name,
        args: parts.map(str::to_string).collect(),
    })
}

/// An incoming chat message.
pub struct Message {
    pub guild: GuildId,
    pub author: UserId,
    pub content: String,
    /// The author's voice channel right now, if any.
    pub voice_channel: Option<ChannelId>,
    pub sink: Arc<dyn ReplySink>,
}

pub struct Dispatcher {
    ctx: CommandContext,
    last_known: DashMap<(GuildId, UserId), ChannelId>,
}

impl Dispatcher {
    pub fn new(ctx: CommandContext) -> Self {
        Self {
            ctx,
            last_known: DashMap::new(),
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// The member's current channel, else the last channel they were seen
    /// in, else the configured fallback.
    pub fn resolve_voice_channel(
        &self,
        guild: GuildId,
        user: UserId,
        current: Option<ChannelId>,
    ) -> Option<ChannelId> {
        if let Some(channel) = current {
            self.last_known.insert((guild, user), channel);
            return Some(channel);
        }
        self.last_known
            .get(&(guild, user))
            .map(|c| *c.value())
            .or_else(|| self.ctx.settings.bot.voice_channel.map(ChannelId))
    }

    /// Run the command in `message`, if it is one. Returns the command that ran.
    pub async fn dispatch(&self, message: Message) -> Option<Command> {
        let bot = &self.ctx.settings.bot;
        let parsed = parse_prefixed(&message.content, &bot.prefix, bot.bot_user_id)?;
        let Some(command) = Command::from_name(&parsed.name) else {
            debug!(name = %parsed.name, "ignoring unknown command");
            return None;
        };

        let voice_channel =
            self.resolve_voice_channel(message.guild, message.author, message.voice_channel);
        if voice_channel != message.voice_channel {
            info!(user = %message.author, channel = ?voice_channel, "invoker not in voice, using fallback channel");
        }

        let invocation = Invocation {
            guild: message.guild,
            args: parsed.args,
            voice_channel,
            sink: message.sink,
        };
        commands::run(command, &self.ctx, invocation).await;
        Some(command)
    }
}
