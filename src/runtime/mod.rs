//! Process wiring: settings, the audio device, the session registry and the
//! console shell that feeds commands in.

mod console;
mod dispatch;
mod settings;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::commands::CommandContext;
use crate::error::Error;
use crate::session::SessionRegistry;
use crate::transport::LocalTransport;

pub use dispatch::{Dispatcher, Message, ParsedCommand, parse_prefixed};

pub async fn run() -> Result<(), Error> {
    let mut settings = settings::load_settings();
    if let Some(root) = env::args_os().nth(1) {
        settings.library.root = PathBuf::from(root);
    }
    info!(root = %settings.library.root.display(), prefix = %settings.bot.prefix, "starting");

    let transport = LocalTransport::open(&settings.audio)?;
    let sessions = Arc::new(SessionRegistry::new(Arc::new(transport)));
    let dispatcher = Dispatcher::new(CommandContext {
        settings: Arc::new(settings),
        sessions: sessions.clone(),
    });

    let result = tokio::select! {
        res = console::run(&dispatcher) => res,
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!("could not listen for ctrl-c: {e}");
            }
            info!("interrupted");
            Ok(())
        }
    };

    sessions.stop_all().await;
    info!("stopped");
    result
}
