//! Reply sinks: the two ways a command talks back to the channel it came from.

use std::fmt;

use async_trait::async_trait;

use crate::error::Error;

/// One message sent back to the invoking channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub title: Option<String>,
    pub body: String,
    pub footer: Option<String>,
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: body.into(),
            footer: None,
        }
    }

    /// A titled page, used for long listings.
    pub fn page(title: impl Into<String>, body: impl Into<String>, footer: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: body.into(),
            footer: Some(footer.into()),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
        }
        write!(f, "{}", self.body)?;
        if let Some(footer) = &self.footer {
            write!(f, "\n-- {footer}")?;
        }
        Ok(())
    }
}

/// Where replies for one invocation go.
///
/// Every command produces exactly one `primary_reply`; anything after it,
/// including notices the playback session sends later, is a `follow_up`.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn primary_reply(&self, reply: Reply) -> Result<(), Error>;
    async fn follow_up(&self, reply: Reply) -> Result<(), Error>;
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::*;

    /// One reply as the sink received it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Sent {
        Primary(String),
        FollowUp(String),
    }

    /// Captures replies, in arrival order, so tests can assert on them.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        sent: Mutex<Vec<(bool, Reply)>>,
    }

    impl RecordingSink {
        fn filtered(&self, primary: bool) -> Vec<Reply> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .filter(|(is_primary, _)| *is_primary == primary)
                .map(|(_, reply)| reply.clone())
                .collect()
        }

        pub(crate) fn primary(&self) -> Vec<Reply> {
            self.filtered(true)
        }

        pub(crate) fn follow_ups(&self) -> Vec<Reply> {
            self.filtered(false)
        }

        pub(crate) fn follow_up_texts(&self) -> Vec<String> {
            self.follow_ups().into_iter().map(|r| r.body).collect()
        }

        /// Every reply body in the order it was sent.
        pub(crate) fn transcript(&self) -> Vec<Sent> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(primary, reply)| match primary {
                    true => Sent::Primary(reply.body.clone()),
                    false => Sent::FollowUp(reply.body.clone()),
                })
                .collect()
        }
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn primary_reply(&self, reply: Reply) -> Result<(), Error> {
            self.sent.lock().unwrap().push((true, reply));
            Ok(())
        }

        async fn follow_up(&self, reply: Reply) -> Result<(), Error> {
            self.sent.lock().unwrap().push((false, reply));
            Ok(())
        }
    }
}
