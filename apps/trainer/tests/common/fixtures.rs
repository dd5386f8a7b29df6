//! Test fixtures and factory functions for vocabulary data.

use chrono::NaiveDate;
use vocab_core::VocabularyEntry;

/// A small deck with distinct scores, lowest first.
pub fn animals() -> Vec<VocabularyEntry> {
    vec![
        VocabularyEntry::new("mèo", "cat").with_audio("https://audio.example/cat.mp3"),
        VocabularyEntry::new("chó", "dog")
            .with_audio("https://audio.example/dog.mp3")
            .with_score(1),
        VocabularyEntry::new("bò", "cow").with_score(4),
        VocabularyEntry::new("gà", "chicken").with_score(9),
    ]
}

/// Generate `count` entries that all share one score.
pub fn uniform_deck(count: usize, score: u32) -> Vec<VocabularyEntry> {
    (0..count)
        .map(|i| VocabularyEntry::new(format!("word {}", i), format!("answer {}", i)).with_score(score))
        .collect()
}

/// CSV text with a header and one line per row.
pub fn csv_text(rows: &[[&str; 5]]) -> String {
    let mut text = String::from("source,target,audio,tag,score\n");
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    text
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
