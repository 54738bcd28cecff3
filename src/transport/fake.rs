//! In-memory transport for tests: records every call and lets the test
//! play the part of the audio device.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ids::{ChannelId, GuildId, PlayerId};

use super::types::{
    AudioPlayer, PlayableResource, PlayerEvent, PlayerListener, TransportError, VoiceConnection,
    VoiceTransport,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Connect(ChannelId),
    CreatePlayer(PlayerId),
    Subscribe(PlayerId),
    Play(PlayerId, PathBuf),
    Stop(PlayerId),
    Destroy(ChannelId),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    listeners: HashMap<PlayerId, PlayerListener>,
    playing: HashMap<PlayerId, PathBuf>,
    next_player: u64,
    unreadable: HashSet<PathBuf>,
    refuse_connect: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<State>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// File names passed to `play`, in order.
    pub(crate) fn played(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Play(_, path) => path.file_name().map(|n| n.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn players_created(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreatePlayer(_)))
            .count()
    }

    pub(crate) fn count(&self, wanted: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| wanted(c)).count()
    }

    /// Make `create_resource` fail for `path`.
    pub(crate) fn make_unreadable(&self, path: &Path) {
        self.state.lock().unwrap().unreadable.insert(path.to_path_buf());
    }

    pub(crate) fn refuse_connections(&self) {
        self.state.lock().unwrap().refuse_connect = true;
    }

    /// Deliver an event to every player ever created, stale ones included.
    pub(crate) fn broadcast(&self, event: PlayerEvent) {
        let listeners: Vec<PlayerListener> =
            self.state.lock().unwrap().listeners.values().cloned().collect();
        for listener in listeners {
            listener(event.clone());
        }
    }

    /// Deliver an event to one player.
    pub(crate) fn emit(&self, player: PlayerId, event: PlayerEvent) {
        let listener = self.state.lock().unwrap().listeners.get(&player).cloned();
        if let Some(listener) = listener {
            listener(event);
        }
    }

    /// The most recently created player.
    pub(crate) fn latest_player(&self) -> Option<PlayerId> {
        let s = self.state.lock().unwrap();
        s.next_player.checked_sub(1).map(PlayerId)
    }

    /// Let the latest player's track end naturally.
    pub(crate) fn finish_track(&self) {
        if let Some(player) = self.latest_player() {
            self.state.lock().unwrap().playing.remove(&player);
            self.emit(player, PlayerEvent::Idle);
        }
    }

    /// Report a decode failure on the latest player's track.
    pub(crate) fn fail_track(&self, reason: &str) {
        if let Some(player) = self.latest_player() {
            self.state.lock().unwrap().playing.remove(&player);
            self.emit(player, PlayerEvent::Error(reason.to_string()));
        }
    }
}

#[async_trait]
impl VoiceTransport for FakeTransport {
    async fn connect(
        &self,
        _guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError> {
        let mut s = self.state.lock().unwrap();
        if s.refuse_connect {
            return Err(TransportError::Connect {
                channel,
                reason: "refused".to_string(),
            });
        }
        s.calls.push(Call::Connect(channel));
        Ok(Box::new(FakeConnection {
            channel,
            state: self.state.clone(),
        }))
    }

    fn create_player(&self, listener: PlayerListener) -> Result<Box<dyn AudioPlayer>, TransportError> {
        let mut s = self.state.lock().unwrap();
        let id = PlayerId(s.next_player);
        s.next_player += 1;
        s.calls.push(Call::CreatePlayer(id));
        s.listeners.insert(id, listener);
        Ok(Box::new(FakePlayer {
            id,
            state: self.state.clone(),
        }))
    }

    fn create_resource(&self, path: &Path) -> Result<PlayableResource, TransportError> {
        if self.state.lock().unwrap().unreadable.contains(path) {
            return Err(TransportError::Resource {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Ok(PlayableResource {
            path: path.to_path_buf(),
        })
    }
}

struct FakeConnection {
    channel: ChannelId,
    state: Arc<Mutex<State>>,
}

impl VoiceConnection for FakeConnection {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    fn subscribe(&mut self, player: &dyn AudioPlayer) {
        self.state.lock().unwrap().calls.push(Call::Subscribe(player.id()));
    }

    fn destroy(&mut self) {
        self.state.lock().unwrap().calls.push(Call::Destroy(self.channel));
    }
}

struct FakePlayer {
    id: PlayerId,
    state: Arc<Mutex<State>>,
}

#[async_trait]
impl AudioPlayer for FakePlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    async fn play(&mut self, resource: PlayableResource) -> Result<(), TransportError> {
        let mut s = self.state.lock().unwrap();
        s.calls.push(Call::Play(self.id, resource.path.clone()));
        s.playing.insert(self.id, resource.path);
        Ok(())
    }

    fn stop(&mut self) {
        let listener = {
            let mut s = self.state.lock().unwrap();
            s.calls.push(Call::Stop(self.id));
            s.playing
                .remove(&self.id)
                .and_then(|_| s.listeners.get(&self.id).cloned())
        };
        // Like a real device, stopping a playing track reports it as ended.
        if let Some(listener) = listener {
            listener(PlayerEvent::Idle);
        }
    }
}
