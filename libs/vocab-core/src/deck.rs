//! Deck selection and daily score decay.

use crate::types::VocabularyEntry;
use rand::seq::SliceRandom;
use rand::Rng;

/// Outcome of a decay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecayReport {
    /// Entries processed.
    pub visited: usize,
    /// Entries whose score actually went down.
    pub lowered: usize,
}

/// Reorder `entries` lowest score first and return the first `count` of them.
///
/// Entries are shuffled before a stable sort, so words sharing a score come
/// out in a different order each time. `count` larger than the deck yields
/// the whole deck.
pub fn select_lowest_scoring<'a, R: Rng + ?Sized>(
    entries: &'a mut [VocabularyEntry],
    count: usize,
    rng: &mut R,
) -> &'a [VocabularyEntry] {
    entries.shuffle(rng);
    entries.sort_by_key(|entry| entry.score);
    let count = count.min(entries.len());
    &entries[..count]
}

/// Lower every score by one, floor 0.
pub fn apply_daily_decay(entries: &mut [VocabularyEntry]) -> DecayReport {
    let lowered = entries
        .iter_mut()
        .map(VocabularyEntry::decay)
        .filter(|&changed| changed)
        .count();
    DecayReport {
        visited: entries.len(),
        lowered,
    }
}

/// The loaded vocabulary.
///
/// A running session owns the entries it was given; they leave the deck in
/// [`Deck::take_session`] and come back through [`Deck::restore`].
#[derive(Debug, Clone, Default)]
pub struct Deck {
    entries: Vec<VocabularyEntry>,
}

impl Deck {
    pub fn new(entries: Vec<VocabularyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the whole vocabulary (after a refresh).
    pub fn replace(&mut self, entries: Vec<VocabularyEntry>) {
        self.entries = entries;
    }

    /// Move the `count` lowest scoring entries out into a session queue.
    pub fn take_session<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<VocabularyEntry> {
        let taken = select_lowest_scoring(&mut self.entries, count, rng).len();
        self.entries.drain(..taken).collect()
    }

    /// Take back entries handed out by [`Deck::take_session`].
    pub fn restore(&mut self, entries: Vec<VocabularyEntry>) {
        self.entries.extend(entries);
    }

    pub fn apply_daily_decay(&mut self) -> DecayReport {
        apply_daily_decay(&mut self.entries)
    }
}
