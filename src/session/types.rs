//! Session request, event and snapshot types.

use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::Error;
use crate::ids::ChannelId;
use crate::library::AudioFile;
use crate::reply::ReplySink;

/// What happens when the queue runs dry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Reshuffle the full starting set and keep going.
    Looping,
    /// Tear the session down and send the completion notice.
    Finite,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Connecting,
    Playing,
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TrackFinished,
    TrackErrored(String),
    SkipRequested,
    StopRequested,
}

/// What the state machine did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new track started.
    Advanced(AudioFile),
    /// The queue ran out and the session is idle again.
    Exhausted,
    /// The current track was told to end; the advance follows as `TrackFinished`.
    Skipping,
    Stopped { was_connected: bool },
    /// The event belonged to a replaced player, or nothing was playing.
    Ignored,
}

/// Follow-up sent when a track fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorNotice {
    /// Log only.
    #[default]
    Silent,
    /// Always the same text.
    Message(String),
    /// The text followed by the transport's reason.
    WithReason(String),
}

impl ErrorNotice {
    pub(crate) fn render(&self, reason: &str) -> Option<String> {
        match self {
            ErrorNotice::Silent => None,
            ErrorNotice::Message(msg) => Some(msg.clone()),
            ErrorNotice::WithReason(prefix) => Some(format!("{prefix}{reason}")),
        }
    }
}

/// Everything `start_or_replace` needs to install a fresh queue.
#[derive(Clone)]
pub struct StartRequest {
    pub channel: ChannelId,
    /// Played front to back. Looping sessions reshuffle this same set.
    pub queue: Vec<AudioFile>,
    pub policy: ExhaustionPolicy,
    pub completion_notice: Option<String>,
    pub error_notice: ErrorNotice,
    pub notifier: Option<Arc<dyn ReplySink>>,
}

impl StartRequest {
    pub fn new(channel: ChannelId, queue: Vec<AudioFile>, policy: ExhaustionPolicy) -> Self {
        Self {
            channel,
            queue,
            policy,
            completion_notice: None,
            error_notice: ErrorNotice::Silent,
            notifier: None,
        }
    }

    pub fn completion_notice(mut self, notice: impl Into<String>) -> Self {
        self.completion_notice = Some(notice.into());
        self
    }

    pub fn error_notice(mut self, notice: ErrorNotice) -> Self {
        self.error_notice = notice;
        self
    }

    /// Where asynchronous notices (errors, completion) are sent.
    pub fn notify(mut self, sink: Arc<dyn ReplySink>) -> Self {
        self.notifier = Some(sink);
        self
    }
}

/// The first track of a freshly started queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    pub first: AudioFile,
    pub queued: usize,
    /// Notices raised before the first track got going (e.g. an unreadable
    /// file that was skipped). Sent by the caller after its reply.
    pub notices: Vec<String>,
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub channel: Option<ChannelId>,
    pub current: Option<AudioFile>,
    pub queue: Vec<AudioFile>,
    pub policy: Option<ExhaustionPolicy>,
}

pub(crate) enum SessionMsg {
    Start {
        request: StartRequest,
        reply: oneshot::Sender<Result<Started, Error>>,
    },
    /// Raised by a player; `generation` says which one.
    Player { generation: u64, event: SessionEvent },
    /// Raised by a command (skip, stop).
    Control {
        event: SessionEvent,
        reply: oneshot::Sender<Result<Transition, Error>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}
