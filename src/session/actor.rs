use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::ids::GuildId;
use crate::library::AudioFile;
use crate::reply::{Reply, ReplySink};
use crate::transport::{AudioPlayer, PlayerEvent, PlayerListener, VoiceConnection, VoiceTransport};

use super::queue::PlayQueue;
use super::types::{
    ErrorNotice, SessionEvent, SessionMsg, SessionSnapshot, SessionState,
    StartRequest, Started, Transition,
};

/// The single owner of one guild's connection, player and queue.
pub(super) struct SessionActor {
    guild: GuildId,
    transport: Arc<dyn VoiceTransport>,
    /// Weak so that player listeners never keep the mailbox open.
    mailbox: WeakUnboundedSender<SessionMsg>,

    state: SessionState,
    connection: Option<Box<dyn VoiceConnection>>,
    player: Option<Box<dyn AudioPlayer>>,
    /// Bumped whenever a player is installed or torn down; events carrying
    /// an older value come from a detached player and are dropped.
    generation: u64,

    current: Option<AudioFile>,
    queue: PlayQueue,
    completion_notice: Option<String>,
    error_notice: ErrorNotice,
    notifier: Option<Arc<dyn ReplySink>>,
    /// Notices raised while a start is still unanswered; the caller sends
    /// them after its own reply.
    held_notices: Option<Vec<String>>,
    rng: StdRng,
}

impl SessionActor {
    pub(super) fn new(
        guild: GuildId,
        transport: Arc<dyn VoiceTransport>,
        mailbox: WeakUnboundedSender<SessionMsg>,
    ) -> Self {
        Self {
            guild,
            transport,
            mailbox,
            state: SessionState::Idle,
            connection: None,
            player: None,
            generation: 0,
            current: None,
            queue: PlayQueue::empty(),
            completion_notice: None,
            error_notice: ErrorNotice::Silent,
            notifier: None,
            held_notices: None,
            rng: StdRng::from_os_rng(),
        }
    }

    pub(super) async fn run(mut self, mut rx: UnboundedReceiver<SessionMsg>) {
        debug!(guild = %self.guild, "session started");
        while let Some(msg) = rx.recv().await {
            match msg {
                SessionMsg::Start { request, reply } => {
                    let result = self.start_or_replace(request).await;
                    let _ = reply.send(result);
                }
                SessionMsg::Player { generation, event } => {
                    if generation != self.generation {
                        debug!(guild = %self.guild, generation, current = self.generation, ?event, "dropping event from a detached player");
                        continue;
                    }
                    if let Err(e) = self.apply(event).await {
                        warn!(guild = %self.guild, "player event failed: {e}");
                    }
                }
                SessionMsg::Control { event, reply } => {
                    let result = self.apply(event).await;
                    let _ = reply.send(result);
                }
                SessionMsg::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }
        self.teardown();
        debug!(guild = %self.guild, "session closed");
    }

    /// The session state machine.
    pub(super) async fn apply(&mut self, event: SessionEvent) -> Result<Transition, Error> {
        match event {
            SessionEvent::TrackFinished => {
                if self.player.is_none() {
                    return Ok(Transition::Ignored);
                }
                Ok(self.advance().await)
            }
            SessionEvent::TrackErrored(reason) => {
                if self.player.is_none() {
                    return Ok(Transition::Ignored);
                }
                let track = self.current.as_ref().map(|f| f.name.clone()).unwrap_or_default();
                error!(guild = %self.guild, %track, "error during playback: {reason}");
                self.notify_error(&reason).await;
                Ok(self.advance().await)
            }
            SessionEvent::SkipRequested => {
                let Some(player) = self.player.as_mut().filter(|_| self.current.is_some()) else {
                    return Err(Error::NothingPlaying);
                };
                // The player reports the stop as a finished track, which
                // advances through the same path as a natural end.
                player.stop();
                Ok(Transition::Skipping)
            }
            SessionEvent::StopRequested => {
                let was_connected = self.connection.is_some();
                self.teardown();
                Ok(Transition::Stopped { was_connected })
            }
        }
    }

    async fn start_or_replace(&mut self, request: StartRequest) -> Result<Started, Error> {
        self.detach_player();
        self.state = SessionState::Connecting;

        let reuse = self
            .connection
            .as_ref()
            .is_some_and(|c| c.channel() == request.channel);
        if !reuse {
            if let Some(mut old) = self.connection.take() {
                old.destroy();
            }
            match self.transport.connect(self.guild, request.channel).await {
                Ok(connection) => self.connection = Some(connection),
                Err(e) => {
                    self.teardown();
                    return Err(e.into());
                }
            }
        }

        self.generation += 1;
        let player = match self.transport.create_player(self.listener(self.generation)) {
            Ok(player) => player,
            Err(e) => {
                self.teardown();
                return Err(e.into());
            }
        };
        if let Some(connection) = self.connection.as_mut() {
            connection.subscribe(player.as_ref());
        }
        self.player = Some(player);

        self.queue = PlayQueue::new(request.queue, request.policy);
        self.completion_notice = request.completion_notice;
        self.error_notice = request.error_notice;
        self.notifier = request.notifier;
        self.state = SessionState::Playing;

        self.held_notices = Some(Vec::new());
        let transition = self.advance().await;
        let notices = self.held_notices.take().unwrap_or_default();
        match transition {
            Transition::Advanced(first) => Ok(Started {
                first,
                queued: self.queue.pending().count(),
                notices,
            }),
            _ => Err(Error::Playback("no track in the queue could be played".to_string())),
        }
    }

    /// Start the next playable track, or wind the session down when there is none.
    async fn advance(&mut self) -> Transition {
        let mut failures = 0usize;
        loop {
            let Some(next) = self.queue.next(&mut self.rng) else {
                self.exhaust().await;
                return Transition::Exhausted;
            };

            match self.start_track(&next).await {
                Ok(()) => return Transition::Advanced(next),
                Err(e) => {
                    warn!(guild = %self.guild, track = %next.name, "could not start track: {e}");
                    self.notify_error(&e.to_string()).await;
                    failures += 1;
                    // A looping queue never drains, so stop after a full pass of failures.
                    if failures >= self.queue.library_len().max(1) {
                        error!(guild = %self.guild, "no playable tracks left, stopping");
                        self.teardown();
                        return Transition::Exhausted;
                    }
                }
            }
        }
    }

    async fn start_track(&mut self, file: &AudioFile) -> Result<(), Error> {
        let resource = self.transport.create_resource(&file.path)?;
        let player = self.player.as_mut().ok_or(Error::NothingPlaying)?;
        player.play(resource).await?;
        self.current = Some(file.clone());
        info!(guild = %self.guild, track = %file.name, "now playing");
        Ok(())
    }

    async fn exhaust(&mut self) {
        let policy = self.queue.policy();
        let notice = self.completion_notice.take();
        let notifier = self.notifier.clone();
        info!(guild = %self.guild, ?policy, "finished all songs");
        self.teardown();

        if let (Some(text), Some(sink)) = (notice, notifier) {
            self.deliver(sink, text).await;
        }
    }

    async fn notify_error(&mut self, reason: &str) {
        let text = self.error_notice.render(reason);
        if let (Some(text), Some(sink)) = (text, self.notifier.clone()) {
            self.deliver(sink, text).await;
        }
    }

    /// Send a notice now, or hold it while a start is being answered.
    async fn deliver(&mut self, sink: Arc<dyn ReplySink>, text: String) {
        match self.held_notices.as_mut() {
            Some(held) => held.push(text),
            None => send_notice(self.guild, sink, text).await,
        }
    }

    fn listener(&self, generation: u64) -> PlayerListener {
        let mailbox = self.mailbox.clone();
        Arc::new(move |event: PlayerEvent| {
            let event = match event {
                PlayerEvent::Idle => SessionEvent::TrackFinished,
                PlayerEvent::Error(reason) => SessionEvent::TrackErrored(reason),
            };
            if let Some(tx) = mailbox.upgrade() {
                let _ = tx.send(SessionMsg::Player { generation, event });
            }
        })
    }

    /// Stop and drop the player, keeping the connection.
    fn detach_player(&mut self) {
        self.generation += 1;
        if let Some(mut player) = self.player.take() {
            player.stop();
        }
        self.current = None;
    }

    /// Back to `Idle`: no player, no queue, no connection. Safe to repeat.
    fn teardown(&mut self) {
        self.detach_player();
        self.queue = PlayQueue::empty();
        self.completion_notice = None;
        self.error_notice = ErrorNotice::Silent;
        self.notifier = None;
        if let Some(mut connection) = self.connection.take() {
            connection.destroy();
        }
        self.state = SessionState::Idle;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            channel: self.connection.as_ref().map(|c| c.channel()),
            current: self.current.clone(),
            queue: self.queue.pending().cloned().collect(),
            policy: self.player.as_ref().map(|_| self.queue.policy()),
        }
    }
}

async fn send_notice(guild: GuildId, sink: Arc<dyn ReplySink>, text: String) {
    if let Err(e) = sink.follow_up(Reply::text(text)).await {
        warn!(%guild, "could not deliver notice: {e}");
    }
}
