//! The voice transport seam.
//!
//! Sessions drive audio only through the traits in `types`: connect to a
//! channel, create a player, turn a file into a playable resource, play,
//! stop, subscribe, destroy. Player lifecycle is reported back through the
//! `PlayerListener` handed over when the player is created.

mod local;
mod types;

pub use local::LocalTransport;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
