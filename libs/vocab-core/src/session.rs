//! Quiz session runner.
//!
//! A session walks its queue one entry at a time. Each call to
//! [`Session::submit_answer`] re-checks the current input against the
//! expected answer; the host calls it on every edit of the input field, not
//! only on an explicit submit.
//!
//! ```text
//! AwaitingAnswer(0) --match--> AwaitingAnswer(1) --match--> ... --> Finished(correct)
//!        |                                                            ^
//!        +---------------------- empty queue ------------------------+
//! ```

use crate::matching::answers_match;
use crate::types::VocabularyEntry;

/// Notification for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Moved to the next entry; `prompt` is its source text.
    Advanced { prompt: String },
    /// Queue exhausted.
    Completed { correct_count: usize, total: usize },
    /// The session was started with nothing to ask.
    EmptyDeck,
}

/// Work the host performs on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    PlayPronunciation { audio_ref: String },
}

/// What a session step produced. Empty when nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub event: Option<SessionEvent>,
    pub effects: Vec<SessionEffect>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.event.is_none() && self.effects.is_empty()
    }
}

/// One quiz run over a fixed queue.
///
/// The session owns its entries, so it is the only writer of their scores
/// until [`Session::into_entries`] hands them back.
#[derive(Debug, Clone)]
pub struct Session {
    queue: Vec<VocabularyEntry>,
    current_index: usize,
    correct_count: usize,
    finished: bool,
    audio_enabled: bool,
}

impl Session {
    /// Start a session. The transition carries either the first
    /// pronunciation request or [`SessionEvent::EmptyDeck`].
    pub fn start(queue: Vec<VocabularyEntry>, audio_enabled: bool) -> (Self, Transition) {
        let mut session = Self {
            queue,
            current_index: 0,
            correct_count: 0,
            finished: false,
            audio_enabled,
        };

        let mut transition = Transition::default();
        if session.queue.is_empty() {
            session.finished = true;
            transition.event = Some(SessionEvent::EmptyDeck);
        } else {
            session.push_pronunciation(&mut transition);
        }
        (session, transition)
    }

    /// Check `text` against the current entry.
    ///
    /// A mismatch, or any call after the session finished, returns an empty
    /// transition and changes nothing.
    pub fn submit_answer(&mut self, text: &str) -> Transition {
        let mut transition = Transition::default();
        let Some(current) = self.current_entry_mut() else {
            return transition;
        };
        if !answers_match(text, &current.target_text) {
            return transition;
        }

        current.reward();
        self.correct_count += 1;
        self.current_index += 1;

        match self.current_entry() {
            Some(next) => {
                let prompt = next.source_text.clone();
                self.push_pronunciation(&mut transition);
                transition.event = Some(SessionEvent::Advanced { prompt });
            }
            None => {
                self.finished = true;
                transition.event = Some(SessionEvent::Completed {
                    correct_count: self.correct_count,
                    total: self.queue.len(),
                });
            }
        }
        transition
    }

    /// Expected answer of the current entry.
    pub fn reveal_answer(&self) -> Option<&str> {
        self.current_entry().map(|e| e.target_text.as_str())
    }

    /// Audio reference of the current entry, for a manual replay.
    pub fn replay_audio(&self) -> Option<&str> {
        self.current_entry().map(|e| e.audio_ref.as_str())
    }

    /// Source text to show as the prompt.
    pub fn current_prompt(&self) -> Option<&str> {
        self.current_entry().map(|e| e.source_text.as_str())
    }

    pub fn current_entry(&self) -> Option<&VocabularyEntry> {
        if self.finished {
            return None;
        }
        self.queue.get(self.current_index)
    }

    fn current_entry_mut(&mut self) -> Option<&mut VocabularyEntry> {
        if self.finished {
            return None;
        }
        self.queue.get_mut(self.current_index)
    }

    /// Flip automatic pronunciation on advance. Returns the new setting.
    pub fn toggle_audio(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        self.audio_enabled
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.queue
    }

    /// End the session and return its entries with their updated scores.
    pub fn into_entries(self) -> Vec<VocabularyEntry> {
        self.queue
    }

    fn push_pronunciation(&self, transition: &mut Transition) {
        if !self.audio_enabled {
            return;
        }
        if let Some(entry) = self.current_entry() {
            if !entry.audio_ref.is_empty() {
                transition.effects.push(SessionEffect::PlayPronunciation {
                    audio_ref: entry.audio_ref.clone(),
                });
            }
        }
    }
}
