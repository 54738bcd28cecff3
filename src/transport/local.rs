//! A transport that plays on the host's default audio device.
//!
//! One audio thread owns the `rodio` output stream. Players are sinks on that
//! stream, driven over a command channel, and the thread reports finished or
//! undecodable tracks back through each player's listener.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::ids::{ChannelId, GuildId, PlayerId};

use super::types::{
    AudioPlayer, PlayableResource, PlayerEvent, PlayerListener, TransportError, VoiceConnection,
    VoiceTransport,
};

enum DeviceCmd {
    Create {
        player: PlayerId,
        listener: PlayerListener,
    },
    Play {
        player: PlayerId,
        path: PathBuf,
    },
    Stop {
        player: PlayerId,
    },
    Release {
        player: PlayerId,
    },
}

pub struct LocalTransport {
    tx: Sender<DeviceCmd>,
    next_player: AtomicU64,
}

impl LocalTransport {
    /// Open the default output device on a dedicated audio thread.
    ///
    /// Blocks until the device is open or has failed to open.
    pub fn open(settings: &AudioSettings) -> Result<Self, TransportError> {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let poll = Duration::from_millis(settings.poll_interval_ms.max(1));

        thread::Builder::new()
            .name("tapedeck-audio".to_string())
            .spawn(move || {
                let mut stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                // rodio logs to stderr when the stream is dropped.
                stream.log_on_drop(false);
                let _ = ready_tx.send(Ok(()));
                run_device(&stream, rx, poll);
                debug!("audio thread stopped");
            })
            .map_err(|e| TransportError::Output(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                tx,
                next_player: AtomicU64::new(1),
            }),
            Ok(Err(reason)) => Err(TransportError::Output(reason)),
            Err(_) => Err(TransportError::Output(
                "audio thread exited during startup".to_string(),
            )),
        }
    }
}

#[async_trait]
impl VoiceTransport for LocalTransport {
    async fn connect(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError> {
        info!(%guild, %channel, "joined voice channel");
        Ok(Box::new(LocalConnection {
            guild,
            channel,
            subscribed: None,
        }))
    }

    fn create_player(&self, listener: PlayerListener) -> Result<Box<dyn AudioPlayer>, TransportError> {
        let id = PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed));
        self.tx
            .send(DeviceCmd::Create {
                player: id,
                listener,
            })
            .map_err(|_| TransportError::Output("audio thread is not running".to_string()))?;
        Ok(Box::new(LocalPlayer {
            id,
            tx: self.tx.clone(),
        }))
    }

    fn create_resource(&self, path: &Path) -> Result<PlayableResource, TransportError> {
        PlayableResource::open(path)
    }
}

struct LocalConnection {
    guild: GuildId,
    channel: ChannelId,
    subscribed: Option<PlayerId>,
}

impl VoiceConnection for LocalConnection {
    fn channel(&self) -> ChannelId {
        self.channel
    }

    fn subscribe(&mut self, player: &dyn AudioPlayer) {
        debug!(guild = %self.guild, channel = %self.channel, player = %player.id(), "subscribed player");
        self.subscribed = Some(player.id());
    }

    fn destroy(&mut self) {
        info!(guild = %self.guild, channel = %self.channel, "left voice channel");
        self.subscribed = None;
    }
}

struct LocalPlayer {
    id: PlayerId,
    tx: Sender<DeviceCmd>,
}

#[async_trait]
impl AudioPlayer for LocalPlayer {
    fn id(&self) -> PlayerId {
        self.id
    }

    async fn play(&mut self, resource: PlayableResource) -> Result<(), TransportError> {
        self.tx
            .send(DeviceCmd::Play {
                player: self.id,
                path: resource.path,
            })
            .map_err(|_| TransportError::PlayerGone(self.id))
    }

    fn stop(&mut self) {
        let _ = self.tx.send(DeviceCmd::Stop { player: self.id });
    }
}

impl Drop for LocalPlayer {
    fn drop(&mut self) {
        let _ = self.tx.send(DeviceCmd::Release { player: self.id });
    }
}

struct Voice {
    listener: PlayerListener,
    sink: Option<Sink>,
}

/// Decode `path` into a new sink on `stream`'s mixer.
fn create_sink(stream: &OutputStream, path: &Path) -> Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| format!("failed to decode {}: {e}", path.display()))?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    Ok(sink)
}

fn run_device(stream: &OutputStream, rx: Receiver<DeviceCmd>, poll: Duration) {
    let mut voices: HashMap<PlayerId, Voice> = HashMap::new();

    loop {
        match rx.recv_timeout(poll) {
            Ok(DeviceCmd::Create { player, listener }) => {
                voices.insert(
                    player,
                    Voice {
                        listener,
                        sink: None,
                    },
                );
            }
            Ok(DeviceCmd::Play { player, path }) => {
                let Some(voice) = voices.get_mut(&player) else {
                    continue;
                };
                if let Some(old) = voice.sink.take() {
                    old.stop();
                }
                match create_sink(stream, &path) {
                    Ok(sink) => {
                        sink.play();
                        voice.sink = Some(sink);
                    }
                    Err(reason) => {
                        warn!(%player, "{reason}");
                        (voice.listener)(PlayerEvent::Error(reason));
                    }
                }
            }
            Ok(DeviceCmd::Stop { player }) => {
                if let Some(voice) = voices.get_mut(&player) {
                    if let Some(sink) = voice.sink.take() {
                        sink.stop();
                        (voice.listener)(PlayerEvent::Idle);
                    }
                }
            }
            Ok(DeviceCmd::Release { player }) => {
                if let Some(sink) = voices.remove(&player).and_then(|v| v.sink) {
                    sink.stop();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // Finished tracks leave an empty sink behind.
        for voice in voices.values_mut() {
            if voice.sink.as_ref().is_some_and(Sink::empty) {
                voice.sink = None;
                (voice.listener)(PlayerEvent::Idle);
            }
        }
    }
}
