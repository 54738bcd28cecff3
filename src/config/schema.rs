use std::path::PathBuf;

use serde::Deserialize;

/// Top-level bot settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tapedeck/config.toml` or `~/.config/tapedeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAPEDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub collections: CollectionSettings,
    pub bot: BotSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root songs directory. Collections live in named subfolders.
    pub root: PathBuf,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Name of the generated playlist file, stored inside `root`.
    pub playlist_file: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("songs"),
            extensions: ["mp3", "wav", "ogg", "flac", "aac", "m4a", "wma"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            playlist_file: "playlist.json".to_string(),
        }
    }
}

impl LibrarySettings {
    /// Path of a named subfolder of the library root.
    pub fn folder(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Location of the generated playlist file.
    pub fn playlist_path(&self) -> PathBuf {
        self.root.join(&self.playlist_file)
    }
}

/// Folder names (relative to the library root) of the curated collections.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Played shuffled, forever (`band`).
    pub band: String,
    /// One subfolder per album (`lobo`).
    pub lobo: String,
    /// Played shuffled, once (`mixtape`).
    pub mixtape: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            band: "band".to_string(),
            lobo: "lobo".to_string(),
            mixtape: "mixtape".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Prefix for message-style commands, e.g. `!play 12`.
    pub prefix: String,
    /// The bot's own user id. When set, `<@ID> play 12` is accepted as well.
    pub bot_user_id: Option<u64>,
    /// Guild the console shell issues commands in.
    pub guild_id: u64,
    /// User id the console shell issues commands as.
    pub user_id: u64,
    /// Voice channel used when the invoker is not connected and no
    /// last-known channel is on record.
    pub voice_channel: Option<u64>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            bot_user_id: None,
            guild_id: 1,
            user_id: 1,
            voice_channel: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the local audio device checks for finished tracks (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 200,
        }
    }
}
