//! Core vocabulary quiz library shared by the trainer app.
//!
//! Provides:
//! - Spreadsheet row codec for vocabulary entries
//! - Deck selection (lowest score first) and daily score decay
//! - Quiz session runner with live answer matching
//! - Shared types (VocabularyEntry, AudioStrategy, RowLayout, etc.)

pub mod deck;
pub mod error;
pub mod matching;
pub mod parser;
pub mod session;
pub mod types;

pub use deck::{apply_daily_decay, select_lowest_scoring, DecayReport, Deck};
pub use error::{CoreError, Result};
pub use matching::answers_match;
pub use parser::{parse_rows, parse_score, to_row};
pub use session::{Session, SessionEffect, SessionEvent, Transition};
pub use types::{AudioStrategy, RowLayout, VocabularyEntry, CORRECT_ANSWER_POINTS, ROW_WIDTH};
