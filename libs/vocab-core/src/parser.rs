//! Spreadsheet row codec for vocabulary entries.
//!
//! # Format
//! Five cells per row, the first two ordered by [`RowLayout`]:
//! ```text
//! source | target | audio ref | tag | score
//! mèo    | cat    | https://… | pet | 3
//! ```
//! Rows shorter than five cells are skipped. The score cell is read the way
//! `scanf("%d")` reads it; anything unreadable counts as 0.

use crate::types::{RowLayout, VocabularyEntry, ROW_WIDTH};

/// Parse spreadsheet rows into entries, skipping short rows.
pub fn parse_rows<R, C>(rows: impl IntoIterator<Item = R>, layout: RowLayout) -> Vec<VocabularyEntry>
where
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let (source_col, target_col) = layout.text_columns();

    rows.into_iter()
        .filter_map(|row| {
            let cells = row.as_ref();
            if cells.len() < ROW_WIDTH {
                return None;
            }
            Some(VocabularyEntry {
                source_text: cells[source_col].as_ref().to_string(),
                target_text: cells[target_col].as_ref().to_string(),
                audio_ref: cells[2].as_ref().to_string(),
                tag: cells[3].as_ref().to_string(),
                score: parse_score(cells[4].as_ref()),
            })
        })
        .collect()
}

/// Read a leading decimal integer; negative, empty or garbage input gives 0.
///
/// Leading whitespace and a sign are accepted, trailing text after the digits
/// is ignored (`"7 pts"` reads as 7). Values past `u32::MAX` saturate.
pub fn parse_score(cell: &str) -> u32 {
    let trimmed = cell.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let run = digits.bytes().take_while(u8::is_ascii_digit).count();
    if run == 0 || negative {
        return 0;
    }

    digits[..run].bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

/// Render an entry as five cells in layout order. The score is the last cell.
pub fn to_row(entry: &VocabularyEntry, layout: RowLayout) -> [String; ROW_WIDTH] {
    let (first, second) = match layout {
        RowLayout::SourceFirst => (&entry.source_text, &entry.target_text),
        RowLayout::TargetFirst => (&entry.target_text, &entry.source_text),
    };
    [
        first.clone(),
        second.clone(),
        entry.audio_ref.clone(),
        entry.tag.clone(),
        entry.score.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parse_single_row() {
        let rows = vec![row(&["mèo", "cat", "https://a/cat.mp3", "animal", "4"])];
        let entries = parse_rows(&rows, RowLayout::SourceFirst);
        assert_eq!(
            entries,
            vec![VocabularyEntry {
                source_text: "mèo".into(),
                target_text: "cat".into(),
                audio_ref: "https://a/cat.mp3".into(),
                tag: "animal".into(),
                score: 4,
            }]
        );
    }

    #[test]
    fn parse_target_first_layout() {
        let rows = vec![row(&["cat", "mèo", "", "animal", "0"])];
        let entries = parse_rows(&rows, RowLayout::TargetFirst);
        assert_eq!(entries[0].source_text, "mèo");
        assert_eq!(entries[0].target_text, "cat");
    }

    #[test]
    fn skip_short_rows() {
        let rows = vec![
            row(&["mèo", "cat", "", "animal"]),
            row(&["chó", "dog", "", "animal", "2"]),
            row(&[]),
        ];
        let entries = parse_rows(&rows, RowLayout::SourceFirst);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].target_text, "dog");
    }

    #[test]
    fn extra_cells_are_ignored() {
        let rows = vec![row(&["mèo", "cat", "", "animal", "1", "note"])];
        assert_eq!(parse_rows(&rows, RowLayout::SourceFirst)[0].score, 1);
    }

    #[test]
    fn score_parsing_defaults_to_zero() {
        assert_eq!(parse_score("12"), 12);
        assert_eq!(parse_score("  7 pts"), 7);
        assert_eq!(parse_score("+3"), 3);
        assert_eq!(parse_score("5.9"), 5);
        assert_eq!(parse_score(""), 0);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score("-4"), 0);
        assert_eq!(parse_score("99999999999999"), u32::MAX);
    }

    #[test]
    fn to_row_follows_layout() {
        let entry = VocabularyEntry::new("mèo", "cat").with_score(6);
        assert_eq!(
            to_row(&entry, RowLayout::TargetFirst),
            ["cat".to_string(), "mèo".into(), String::new(), String::new(), "6".into()]
        );
        let back = parse_rows([to_row(&entry, RowLayout::SourceFirst)], RowLayout::SourceFirst);
        assert_eq!(back, vec![entry]);
    }
}
