use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tapedeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", "/tmp/tapedeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn defaults_cover_the_original_extension_whitelist() {
    let s = Settings::default();
    assert_eq!(s.library.root, std::path::PathBuf::from("songs"));
    assert_eq!(s.library.extensions.len(), 7);
    assert!(s.library.extensions.iter().any(|e| e == "wma"));
    assert_eq!(s.library.playlist_path(), std::path::Path::new("songs").join("playlist.json"));
    assert_eq!(s.bot.prefix, "!");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
root = "/srv/music"
extensions = ["mp3"]
include_hidden = true
follow_links = false
playlist_file = "ids.json"

[collections]
band = "house band"
lobo = "albums"
mixtape = "tape"

[bot]
prefix = "?"
bot_user_id = 42
guild_id = 7
user_id = 9
voice_channel = 1234

[audio]
poll_interval_ms = 50
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEDECK__BOT__PREFIX");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.root, std::path::PathBuf::from("/srv/music"));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.playlist_path(), std::path::PathBuf::from("/srv/music/ids.json"));
    assert_eq!(s.collections.band, "house band");
    assert_eq!(s.collections.lobo, "albums");
    assert_eq!(s.collections.mixtape, "tape");
    assert_eq!(s.bot.prefix, "?");
    assert_eq!(s.bot.bot_user_id, Some(42));
    assert_eq!(s.bot.guild_id, 7);
    assert_eq!(s.bot.user_id, 9);
    assert_eq!(s.bot.voice_channel, Some(1234));
    assert_eq!(s.audio.poll_interval_ms, 50);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[bot]
prefix = "?"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEDECK__BOT__PREFIX", "$");

    let s = Settings::load().unwrap();
    assert_eq!(s.bot.prefix, "$");
}

#[test]
fn validate_rejects_unusable_settings() {
    let mut s = Settings::default();
    s.bot.prefix = "  ".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![".".to_string()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.poll_interval_ms = 0;
    assert!(s.validate().is_err());
}
