//! The pending-track queue and its exhaustion rules.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::AudioFile;

use super::types::ExhaustionPolicy;

/// A shuffled copy of `files` (Fisher-Yates).
pub fn shuffled<R: Rng + ?Sized>(files: &[AudioFile], rng: &mut R) -> Vec<AudioFile> {
    let mut out = files.to_vec();
    out.shuffle(rng);
    out
}

pub(crate) struct PlayQueue {
    pending: VecDeque<AudioFile>,
    /// The full set a looping queue refills from.
    library: Vec<AudioFile>,
    policy: ExhaustionPolicy,
}

impl PlayQueue {
    pub(crate) fn new(tracks: Vec<AudioFile>, policy: ExhaustionPolicy) -> Self {
        Self {
            library: tracks.clone(),
            pending: tracks.into(),
            policy,
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            pending: VecDeque::new(),
            library: Vec::new(),
            policy: ExhaustionPolicy::Finite,
        }
    }

    pub(crate) fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    pub(crate) fn library_len(&self) -> usize {
        self.library.len()
    }

    pub(crate) fn pending(&self) -> impl Iterator<Item = &AudioFile> {
        self.pending.iter()
    }

    /// Pop the next track. A drained looping queue first refills itself with
    /// a fresh shuffle of the whole set; a drained finite queue yields `None`.
    pub(crate) fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<AudioFile> {
        if self.pending.is_empty() && self.policy == ExhaustionPolicy::Looping {
            tracing::info!(tracks = self.library.len(), "reshuffling the playlist");
            self.pending = shuffled(&self.library, rng).into();
        }
        self.pending.pop_front()
    }
}
