//! Common test utilities for flow tests.
//!
//! This module provides:
//! - `MemorySheet`, an in-memory vocabulary source that records writes
//! - `RecordingPronouncer`, which remembers every clip it was asked to play
//! - `TestContext`, an `App` wired to both with a seeded RNG and fixed clock

#![allow(dead_code)]

pub mod fixtures;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::crossterm::event::KeyCode;
use uuid::Uuid;

use vocab_core::{Deck, VocabularyEntry};
use vocab_trainer::audio::Pronouncer;
use vocab_trainer::sheet::{SheetError, VocabularySource};
use vocab_trainer::state::StateStore;
use vocab_trainer::tui::{App, Screen};

/// Rows shared between the test and the source handed to the app.
#[derive(Clone, Default)]
pub struct MemorySheet {
    pub rows: Rc<RefCell<Vec<VocabularyEntry>>>,
    pub writes: Rc<Cell<usize>>,
    pub failing: Rc<Cell<bool>>,
}

impl MemorySheet {
    pub fn new(rows: Vec<VocabularyEntry>) -> Self {
        Self {
            rows: Rc::new(RefCell::new(rows)),
            ..Self::default()
        }
    }
}

impl VocabularySource for MemorySheet {
    fn describe(&self) -> String {
        "memory sheet".to_string()
    }

    fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError> {
        if self.failing.get() {
            return Err(SheetError::Network("connection refused".to_string()));
        }
        Ok(self.rows.borrow().clone())
    }

    fn persist(&self, entries: &[VocabularyEntry]) -> Result<usize, SheetError> {
        if self.failing.get() {
            return Err(SheetError::Api {
                status: 403,
                message: "forbidden".to_string(),
            });
        }
        *self.rows.borrow_mut() = entries.to_vec();
        self.writes.set(self.writes.get() + 1);
        Ok(entries.len())
    }
}

#[derive(Clone, Default)]
pub struct RecordingPronouncer {
    pub played: Rc<RefCell<Vec<String>>>,
    pub stops: Rc<Cell<usize>>,
}

impl Pronouncer for RecordingPronouncer {
    fn play(&mut self, audio_ref: &str) {
        self.played.borrow_mut().push(audio_ref.to_string());
    }

    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

/// An app over a memory sheet, with handles to inspect what it did.
pub struct TestContext {
    pub app: App,
    pub sheet: MemorySheet,
    pub audio: RecordingPronouncer,
    pub today: Rc<Cell<NaiveDate>>,
}

impl TestContext {
    pub fn new(rows: Vec<VocabularyEntry>) -> Self {
        let sheet = MemorySheet::new(rows.clone());
        let audio = RecordingPronouncer::default();
        let today = Rc::new(Cell::new(fixtures::day(2024, 3, 10)));
        let clock = Rc::clone(&today);

        let state_path = std::env::temp_dir()
            .join(format!("vocab-trainer-test-{}", Uuid::new_v4()))
            .join("state.json");

        let app = App::new(
            Deck::new(rows),
            Box::new(sheet.clone()),
            Box::new(audio.clone()),
            StateStore::new(state_path),
        )
        .with_rng(StdRng::seed_from_u64(7))
        .with_clock(move |_| clock.get());

        Self {
            app,
            sheet,
            audio,
            today,
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.app.handle_key(key);
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.app.handle_key(KeyCode::Char(c));
        }
    }

    /// Open the count form, enter `count` and start.
    pub fn start_test(&mut self, count: &str) {
        self.press(KeyCode::Char('c'));
        self.type_text(count);
        self.press(KeyCode::Enter);
    }

    pub fn notice(&self) -> Option<String> {
        match self.app.screen() {
            Screen::Notice { message } => Some(message.clone()),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Option<String> {
        match self.app.screen() {
            Screen::Quiz(view) => view.session.current_prompt().map(str::to_string),
            _ => None,
        }
    }

    /// Answer the current prompt by looking it up in the deck rows.
    pub fn answer_current(&mut self, rows: &[VocabularyEntry]) {
        let prompt = self.prompt().expect("a quiz should be running");
        let answer = rows
            .iter()
            .find(|e| e.source_text == prompt)
            .map(|e| e.target_text.clone())
            .expect("prompt should come from the rows");
        self.type_text(&answer);
    }

    pub fn score_of(&self, target: &str) -> Option<u32> {
        self.app
            .deck()
            .entries()
            .iter()
            .find(|e| e.target_text == target)
            .map(|e| e.score)
    }
}
