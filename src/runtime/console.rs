//! A stdin/stdout stand-in for a chat channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::error::Error;
use crate::ids::{ChannelId, GuildId, UserId};
use crate::reply::{Reply, ReplySink};

use super::dispatch::{Dispatcher, Message};

/// Prints replies to stdout.
pub struct ConsoleSink;

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn primary_reply(&self, reply: Reply) -> Result<(), Error> {
        println!("{reply}");
        Ok(())
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), Error> {
        println!("{reply}");
        Ok(())
    }
}

/// Shell-only lines that are not bot commands.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Builtin {
    Join(ChannelId),
    Leave,
    Quit,
}

pub(super) fn parse_builtin(line: &str) -> Option<Builtin> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "join" => parts.next()?.parse().ok().map(|id| Builtin::Join(ChannelId(id))),
        "leave" => Some(Builtin::Leave),
        "quit" | "exit" => Some(Builtin::Quit),
        _ => None,
    }
}

/// Read lines until `quit` or end of input.
pub async fn run(dispatcher: &Dispatcher) -> Result<(), Error> {
    let bot = &dispatcher.context().settings.bot;
    let guild = GuildId(bot.guild_id);
    let user = UserId(bot.user_id);
    let sink: Arc<dyn ReplySink> = Arc::new(ConsoleSink);
    let mut voice_channel: Option<ChannelId> = None;

    println!(
        "Commands: {p}play <id|name>, {p}band, {p}lobo [n], {p}mixtape, {p}skip, {p}stop, {p}album <folder>, {p}playlist",
        p = bot.prefix
    );
    println!("Shell: join <channel id>, leave, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_builtin(line) {
            Some(Builtin::Join(channel)) => {
                info!(%channel, "console joined voice channel");
                voice_channel = Some(channel);
            }
            Some(Builtin::Leave) => {
                info!("console left voice channel");
                voice_channel = None;
            }
            Some(Builtin::Quit) => break,
            None => {
                let message = Message {
                    guild,
                    author: user,
                    content: line.to_string(),
                    voice_channel,
                    sink: sink.clone(),
                };
                if dispatcher.dispatch(message).await.is_none() {
                    debug!(%line, "not a command");
                }
            }
        }
    }
    Ok(())
}
