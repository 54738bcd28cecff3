//! Platform identifiers, kept opaque so the core never depends on a gateway client.

use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// A guild (server). Sessions are keyed by it.
    GuildId
);
id_type!(
    /// A voice channel inside a guild.
    ChannelId
);
id_type!(UserId);
id_type!(
    /// Transport-assigned audio player id.
    PlayerId
);
