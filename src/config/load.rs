use std::{env, path::PathBuf};

use super::schema::Settings;

/// Anything missing from the config file falls back to the struct defaults;
/// `TAPEDECK__SECTION__KEY` variables override both.
impl Settings {
    /// Build the settings tree from the TOML file (if there is one) layered
    /// under the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TAPEDECK")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject settings the bot cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.bot.prefix.trim().is_empty() {
            return Err("bot.prefix must not be empty".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        if self.audio.poll_interval_ms == 0 {
            return Err("audio.poll_interval_ms must be >= 1".to_string());
        }
        Ok(())
    }
}

/// `TAPEDECK_CONFIG_PATH` if set, else the per-user default.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TAPEDECK_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `tapedeck/config.toml` inside the XDG config home (`~/.config` without
/// `XDG_CONFIG_HOME`). `None` when neither variable is set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("tapedeck").join("config.toml"))
}
