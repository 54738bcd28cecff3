//! Per-guild playback sessions.
//!
//! Each guild gets one session actor: a task that owns the voice connection,
//! the player and the queue, and applies commands and player events one at a
//! time from its mailbox. Handlers only ever talk to a `SessionHandle`.

mod actor;
mod queue;
mod registry;
mod types;

pub use queue::shuffled;
pub use registry::{SessionHandle, SessionRegistry};
pub use types::*;
