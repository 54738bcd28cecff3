use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults so a broken config file never
/// keeps the bot from starting.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
