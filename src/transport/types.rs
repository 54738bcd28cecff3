use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::ids::{ChannelId, GuildId, PlayerId};

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("could not join voice channel {channel}: {reason}")]
    Connect { channel: ChannelId, reason: String },

    #[error("could not open {}: {source}", .path.display())]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("player {0} is gone")]
    PlayerGone(PlayerId),
}

/// A file checked to be readable, ready to hand to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayableResource {
    pub path: PathBuf,
}

impl PlayableResource {
    /// Open-check `path` without decoding it.
    pub fn open(path: &Path) -> Result<Self, TransportError> {
        std::fs::File::open(path).map_err(|source| TransportError::Resource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// Player lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The current resource ended, either naturally or through `stop`.
    Idle,
    /// The current resource failed. No `Idle` follows for the same resource.
    Error(String),
}

/// Receives a player's events. Called from transport-owned threads.
pub type PlayerListener = Arc<dyn Fn(PlayerEvent) + Send + Sync>;

#[async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn connect(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError>;

    /// Create a player whose events go to `listener` only.
    fn create_player(&self, listener: PlayerListener) -> Result<Box<dyn AudioPlayer>, TransportError>;

    fn create_resource(&self, path: &Path) -> Result<PlayableResource, TransportError>;
}

pub trait VoiceConnection: Send {
    fn channel(&self) -> ChannelId;

    /// Route `player`'s output into this connection.
    fn subscribe(&mut self, player: &dyn AudioPlayer);

    fn destroy(&mut self);
}

#[async_trait]
pub trait AudioPlayer: Send {
    fn id(&self) -> PlayerId;

    /// Replace whatever is playing with `resource`.
    async fn play(&mut self, resource: PlayableResource) -> Result<(), TransportError>;

    /// End the current resource; emits `Idle` if something was playing.
    fn stop(&mut self);
}
