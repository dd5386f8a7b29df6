//! Trainer state machine.
//!
//! Every screen is a variant of [`Screen`]; key presses are routed by
//! [`App::handle_key`]. Spreadsheet calls run inline between key events,
//! audio goes through the [`Pronouncer`].

use crate::audio::Pronouncer;
use crate::sheet::VocabularySource;
use crate::state::date_utils::study_today;
use crate::state::StateStore;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::crossterm::event::KeyCode;
use vocab_core::{parse_score, Deck, Session, SessionEffect, SessionEvent, Transition};

/// Main menu entries: hotkey and label.
pub const MENU_ITEMS: [(char, &str); 5] = [
    ('c', "Create Test by Lowest Points"),
    ('r', "Refresh Data"),
    ('u', "Update Data"),
    ('d', "Decrease Points Daily"),
    ('q', "Quit"),
];

/// A running quiz and its input line.
#[derive(Debug)]
pub struct QuizView {
    pub session: Session,
    pub input: String,
    /// Answer shown after F3, cleared when the quiz advances.
    pub revealed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Scores were already decayed this study day.
    RepeatDecay,
    /// Quitting would drop score changes that were never written back.
    QuitUnsaved,
}

#[derive(Debug)]
pub enum Screen {
    Menu,
    CountForm { input: String },
    Quiz(QuizView),
    Notice { message: String },
    Confirm(Confirmation),
}

pub struct App {
    screen: Screen,
    deck: Deck,
    source: Box<dyn VocabularySource>,
    pronouncer: Box<dyn Pronouncer>,
    state_store: StateStore,
    daily_reset_hour: u32,
    audio_enabled: bool,
    dirty: bool,
    should_quit: bool,
    rng: StdRng,
    today: Box<dyn Fn(u32) -> NaiveDate>,
}

impl App {
    pub fn new(
        deck: Deck,
        source: Box<dyn VocabularySource>,
        pronouncer: Box<dyn Pronouncer>,
        state_store: StateStore,
    ) -> Self {
        Self {
            screen: Screen::Menu,
            deck,
            source,
            pronouncer,
            state_store,
            daily_reset_hour: 0,
            audio_enabled: true,
            dirty: false,
            should_quit: false,
            rng: StdRng::from_entropy(),
            today: Box::new(study_today),
        }
    }

    pub fn with_daily_reset_hour(mut self, hour: u32) -> Self {
        self.daily_reset_hour = hour;
        self
    }

    /// Whether quizzes start with automatic pronunciation.
    pub fn with_audio_enabled(mut self, enabled: bool) -> Self {
        self.audio_enabled = enabled;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Replace the study-day clock; it receives the daily reset hour.
    pub fn with_clock(mut self, today: impl Fn(u32) -> NaiveDate + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Scores changed since the last fetch or update.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Route one key press to the current screen.
    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::CountForm { .. } => self.handle_count_key(key),
            Screen::Quiz(_) => self.handle_quiz_key(key),
            Screen::Notice { .. } => self.screen = Screen::Menu,
            Screen::Confirm(confirmation) => self.handle_confirm_key(confirmation, key),
        }
    }

    /// Quit from anywhere, asking first when there are unsaved scores.
    pub fn request_quit(&mut self) {
        self.leave_quiz();
        if self.dirty {
            self.screen = Screen::Confirm(Confirmation::QuitUnsaved);
        } else {
            self.should_quit = true;
        }
    }

    fn handle_menu_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.screen = Screen::CountForm { input: String::new() };
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.refresh(),
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.update();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.decrease_points(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.request_quit(),
            _ => {}
        }
    }

    fn handle_count_key(&mut self, key: KeyCode) {
        let Screen::CountForm { input } = &mut self.screen else {
            return;
        };
        match key {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let count = parse_score(input.as_str()) as usize;
                self.start_test(count);
            }
            KeyCode::Esc => self.screen = Screen::Menu,
            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };
        match key {
            KeyCode::Char(c) => {
                view.input.push(c);
                self.check_answer();
            }
            KeyCode::Backspace => {
                view.input.pop();
                self.check_answer();
            }
            KeyCode::F(2) => {
                if let Some(audio_ref) = view.session.replay_audio().filter(|r| !r.is_empty()) {
                    self.pronouncer.play(audio_ref);
                }
            }
            KeyCode::F(3) => {
                view.revealed = view.session.reveal_answer().map(str::to_string);
            }
            KeyCode::F(4) => {
                self.audio_enabled = view.session.toggle_audio();
                if !self.audio_enabled {
                    self.pronouncer.stop();
                }
                tracing::debug!("Audio {}", if self.audio_enabled { "on" } else { "off" });
            }
            KeyCode::Esc => {
                self.leave_quiz();
                self.screen = Screen::Menu;
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, confirmation: Confirmation, key: KeyCode) {
        match (confirmation, key) {
            (Confirmation::RepeatDecay, KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y')) => {
                let today = (self.today)(self.daily_reset_hour);
                self.decay(today);
            }
            (Confirmation::QuitUnsaved, KeyCode::Char('u') | KeyCode::Char('U')) => {
                if self.update() {
                    self.should_quit = true;
                }
            }
            (Confirmation::QuitUnsaved, KeyCode::Enter) => self.should_quit = true,
            (_, KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N')) => self.screen = Screen::Menu,
            _ => {}
        }
    }

    fn start_test(&mut self, count: usize) {
        let queue = self.deck.take_session(count, &mut self.rng);
        let (session, transition) = Session::start(queue, self.audio_enabled);

        if session.is_finished() {
            self.deck.restore(session.into_entries());
            self.notify("No words available for the test.");
            return;
        }

        tracing::info!("Starting test with {} words", session.total());
        self.screen = Screen::Quiz(QuizView {
            session,
            input: String::new(),
            revealed: None,
        });
        self.apply_effects(&transition);
    }

    fn check_answer(&mut self) {
        let Screen::Quiz(view) = &mut self.screen else {
            return;
        };
        let transition = view.session.submit_answer(&view.input);
        if transition.is_empty() {
            return;
        }

        self.dirty = true;
        self.apply_effects(&transition);

        match transition.event {
            Some(SessionEvent::Advanced { .. }) => {
                if let Screen::Quiz(view) = &mut self.screen {
                    view.input.clear();
                    view.revealed = None;
                }
            }
            Some(SessionEvent::Completed { correct_count, total }) => {
                tracing::info!("Test finished: {}/{}", correct_count, total);
                self.leave_quiz();
                self.notify(format!("You got {}/{} correct!", correct_count, total));
            }
            Some(SessionEvent::EmptyDeck) | None => {}
        }
    }

    fn apply_effects(&mut self, transition: &Transition) {
        for effect in &transition.effects {
            match effect {
                SessionEffect::PlayPronunciation { audio_ref } => self.pronouncer.play(audio_ref),
            }
        }
    }

    /// Hand a running session's entries back to the deck.
    fn leave_quiz(&mut self) {
        if !matches!(self.screen, Screen::Quiz(_)) {
            return;
        }
        if let Screen::Quiz(view) = std::mem::replace(&mut self.screen, Screen::Menu) {
            self.pronouncer.stop();
            self.deck.restore(view.session.into_entries());
        }
    }

    fn refresh(&mut self) {
        match self.source.fetch() {
            Ok(entries) => {
                let count = entries.len();
                self.deck.replace(entries);
                self.dirty = false;
                tracing::info!("Refreshed {} words from {}", count, self.source.describe());
                self.notify(format!("Refreshed {} words!", count));
            }
            Err(e) => {
                tracing::error!("Refresh failed: {}", e);
                self.notify(format!("Refresh failed: {}", e));
            }
        }
    }

    /// Write the deck back to the source. Returns whether it succeeded.
    fn update(&mut self) -> bool {
        match self.source.persist(self.deck.entries()) {
            Ok(count) => {
                self.dirty = false;
                tracing::info!("Updated {} words in {}", count, self.source.describe());
                self.notify(format!("Updated {} words!", count));
                true
            }
            Err(e) => {
                tracing::error!("Update failed: {}", e);
                self.notify(format!("Update failed: {}", e));
                false
            }
        }
    }

    fn decrease_points(&mut self) {
        let today = (self.today)(self.daily_reset_hour);
        if self.state_store.load().decayed_on(today) {
            tracing::info!("Scores already decayed on {}, asking first", today);
            self.screen = Screen::Confirm(Confirmation::RepeatDecay);
            return;
        }
        self.decay(today);
    }

    fn decay(&mut self, today: NaiveDate) {
        let report = self.deck.apply_daily_decay();
        if report.lowered > 0 {
            self.dirty = true;
        }

        let mut state = self.state_store.load();
        state.mark_decayed(today);
        if let Err(e) = self.state_store.save(&state) {
            tracing::warn!("Cannot record decay day: {}", e);
        }

        tracing::info!(
            "Decayed scores: {} visited, {} lowered",
            report.visited,
            report.lowered
        );
        self.notify(format!("Decreased point for {} words!", report.visited));
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.screen = Screen::Notice {
            message: message.into(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vocab_core::VocabularyEntry;

    struct MemorySource {
        rows: Vec<VocabularyEntry>,
    }

    impl VocabularySource for MemorySource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn fetch(&self) -> Result<Vec<VocabularyEntry>, SheetError> {
            Ok(self.rows.clone())
        }

        fn persist(&self, entries: &[VocabularyEntry]) -> Result<usize, SheetError> {
            Ok(entries.len())
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Pronouncer for Recorder {
        fn play(&mut self, audio_ref: &str) {
            self.0.borrow_mut().push(audio_ref.to_string());
        }

        fn stop(&mut self) {}
    }

    fn app_with(entries: Vec<VocabularyEntry>, recorder: Recorder) -> App {
        let store = StateStore::new(
            std::env::temp_dir().join(format!("vocab-app-{}/state.json", uuid::Uuid::new_v4())),
        );
        App::new(
            Deck::new(entries.clone()),
            Box::new(MemorySource { rows: entries }),
            Box::new(recorder),
            store,
        )
        .with_rng(StdRng::seed_from_u64(1))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    fn notice(app: &App) -> Option<&str> {
        match app.screen() {
            Screen::Notice { message } => Some(message),
            _ => None,
        }
    }

    #[test]
    fn test_menu_opens_count_form() {
        let mut app = app_with(vec![VocabularyEntry::new("mèo", "cat")], Recorder::default());
        app.handle_key(KeyCode::Char('c'));
        assert!(matches!(app.screen(), Screen::CountForm { input } if input.is_empty()));

        app.handle_key(KeyCode::Esc);
        assert!(matches!(app.screen(), Screen::Menu));
    }

    #[test]
    fn test_first_prompt_is_pronounced() {
        let recorder = Recorder::default();
        let entry = VocabularyEntry::new("mèo", "cat").with_audio("https://a/cat.mp3");
        let mut app = app_with(vec![entry], recorder.clone());

        app.handle_key(KeyCode::Char('c'));
        type_str(&mut app, "1");
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.screen(), Screen::Quiz(_)));
        assert_eq!(*recorder.0.borrow(), vec!["https://a/cat.mp3".to_string()]);
    }

    #[test]
    fn test_reveal_is_cleared_on_advance() {
        let entries = vec![
            VocabularyEntry::new("mèo", "cat"),
            VocabularyEntry::new("chó", "dog").with_score(1),
        ];
        let mut app = app_with(entries, Recorder::default());
        app.handle_key(KeyCode::Char('c'));
        type_str(&mut app, "2");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::F(3));
        match app.screen() {
            Screen::Quiz(view) => assert_eq!(view.revealed.as_deref(), Some("cat")),
            _ => panic!("expected quiz"),
        }

        type_str(&mut app, "CAT");
        match app.screen() {
            Screen::Quiz(view) => {
                assert_eq!(view.revealed, None);
                assert_eq!(view.input, "");
                assert_eq!(view.session.current_prompt(), Some("chó"));
            }
            _ => panic!("expected quiz"),
        }
    }

    #[test]
    fn test_escape_keeps_earned_points() {
        let entries = vec![
            VocabularyEntry::new("mèo", "cat"),
            VocabularyEntry::new("chó", "dog").with_score(1),
        ];
        let mut app = app_with(entries, Recorder::default());
        app.handle_key(KeyCode::Char('c'));
        type_str(&mut app, "2");
        app.handle_key(KeyCode::Enter);
        type_str(&mut app, "cat");
        app.handle_key(KeyCode::Esc);

        assert!(matches!(app.screen(), Screen::Menu));
        assert_eq!(app.deck().len(), 2);
        let cat = app.deck().entries().iter().find(|e| e.target_text == "cat").unwrap();
        assert_eq!(cat.score, 2);
        assert!(app.is_dirty());
    }

    #[test]
    fn test_toggle_audio_silences_next_prompt() {
        let recorder = Recorder::default();
        let entries = vec![
            VocabularyEntry::new("mèo", "cat").with_audio("cat.mp3"),
            VocabularyEntry::new("chó", "dog").with_audio("dog.mp3").with_score(1),
        ];
        let mut app = app_with(entries, recorder.clone());
        app.handle_key(KeyCode::Char('c'));
        type_str(&mut app, "2");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::F(4));
        assert!(!app.audio_enabled());

        type_str(&mut app, "cat");
        assert_eq!(*recorder.0.borrow(), vec!["cat.mp3".to_string()]);

        app.handle_key(KeyCode::F(2));
        assert_eq!(recorder.0.borrow().last().map(String::as_str), Some("dog.mp3"));
    }

    #[test]
    fn test_invalid_count_reads_as_zero() {
        let mut app = app_with(vec![VocabularyEntry::new("mèo", "cat")], Recorder::default());
        app.handle_key(KeyCode::Char('c'));
        type_str(&mut app, "abc");
        app.handle_key(KeyCode::Enter);
        assert_eq!(notice(&app), Some("No words available for the test."));
        assert_eq!(app.deck().len(), 1);
    }

    #[test]
    fn test_repeat_decay_asks_first() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let mut app = app_with(vec![VocabularyEntry::new("mèo", "cat").with_score(3)], Recorder::default())
            .with_clock(move |_| day);

        app.handle_key(KeyCode::Char('d'));
        assert_eq!(notice(&app), Some("Decreased point for 1 words!"));
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('d'));
        assert!(matches!(app.screen(), Screen::Confirm(Confirmation::RepeatDecay)));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.deck().entries()[0].score, 2);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('y'));
        assert_eq!(app.deck().entries()[0].score, 1);
    }

    #[test]
    fn test_quit_with_unsaved_scores() {
        let mut app = app_with(vec![VocabularyEntry::new("mèo", "cat").with_score(1)], Recorder::default())
            .with_clock(|_| NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Enter);
        assert!(app.is_dirty());

        app.handle_key(KeyCode::Char('q'));
        assert!(matches!(app.screen(), Screen::Confirm(Confirmation::QuitUnsaved)));
        assert!(!app.should_quit());

        app.handle_key(KeyCode::Char('u'));
        assert!(app.should_quit());
        assert!(!app.is_dirty());
    }

    #[test]
    fn test_clean_quit() {
        let mut app = app_with(Vec::new(), Recorder::default());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
