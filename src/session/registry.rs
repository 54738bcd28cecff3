use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::Error;
use crate::ids::GuildId;
use crate::transport::VoiceTransport;

use super::actor::SessionActor;
use super::types::{SessionEvent, SessionMsg, SessionSnapshot, StartRequest, Started, Transition};

/// Cheap, cloneable access to one guild's session actor.
#[derive(Clone)]
pub struct SessionHandle {
    guild: GuildId,
    tx: mpsc::UnboundedSender<SessionMsg>,
}

impl SessionHandle {
    pub fn guild(&self) -> GuildId {
        self.guild
    }

    /// Connect (or reuse the connection), install a fresh player and start
    /// the queue. Replaces any queue and player that were active before.
    pub async fn start_or_replace(&self, request: StartRequest) -> Result<Started, Error> {
        self.request(|reply| SessionMsg::Start { request, reply })
            .await?
    }

    /// End the current track early; the queue then advances exactly as if
    /// the track had finished.
    pub async fn skip(&self) -> Result<(), Error> {
        self.control(SessionEvent::SkipRequested).await.map(|_| ())
    }

    /// Stop playback and leave the channel. Returns whether a connection
    /// was active. Never fails for an idle session.
    pub async fn stop(&self) -> Result<bool, Error> {
        match self.control(SessionEvent::StopRequested).await? {
            Transition::Stopped { was_connected } => Ok(was_connected),
            _ => Ok(false),
        }
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, Error> {
        self.request(|reply| SessionMsg::Snapshot { reply }).await
    }

    async fn control(&self, event: SessionEvent) -> Result<Transition, Error> {
        self.request(|reply| SessionMsg::Control { event, reply })
            .await?
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMsg,
    ) -> Result<T, Error> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| Error::SessionClosed(self.guild))?;
        rx.await.map_err(|_| Error::SessionClosed(self.guild))
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Process-wide map from guild to session; the only way to reach a session.
pub struct SessionRegistry {
    transport: Arc<dyn VoiceTransport>,
    sessions: DashMap<GuildId, SessionHandle>,
}

impl SessionRegistry {
    pub fn new(transport: Arc<dyn VoiceTransport>) -> Self {
        Self {
            transport,
            sessions: DashMap::new(),
        }
    }

    /// The guild's session, spawned on first use. Must be called inside a
    /// tokio runtime.
    pub fn session(&self, guild: GuildId) -> SessionHandle {
        let mut entry = self
            .sessions
            .entry(guild)
            .or_insert_with(|| self.spawn(guild));
        if entry.is_closed() {
            *entry = self.spawn(guild);
        }
        entry.value().clone()
    }

    /// The guild's session if one was ever started.
    pub fn existing(&self, guild: GuildId) -> Option<SessionHandle> {
        self.sessions
            .get(&guild)
            .map(|h| h.value().clone())
            .filter(|h| !h.is_closed())
    }

    /// Stop every session, e.g. on shutdown.
    pub async fn stop_all(&self) {
        let handles: Vec<SessionHandle> = self.sessions.iter().map(|h| h.value().clone()).collect();
        for handle in handles {
            if let Err(e) = handle.stop().await {
                debug!(guild = %handle.guild(), "stop on shutdown failed: {e}");
            }
        }
    }

    fn spawn(&self, guild: GuildId) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = SessionActor::new(guild, self.transport.clone(), tx.downgrade());
        tokio::spawn(actor.run(rx));
        SessionHandle { guild, tx }
    }
}
