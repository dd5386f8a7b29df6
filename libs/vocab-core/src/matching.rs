//! Answer matching for live-typed answers.

/// Case-insensitive equality between a typed answer and the expected one.
///
/// Both sides are folded with Unicode lowercase mapping. Whitespace is
/// compared as-is: a trailing space is a mismatch.
pub fn answers_match(typed: &str, expected: &str) -> bool {
    typed
        .chars()
        .flat_map(char::to_lowercase)
        .eq(expected.chars().flat_map(char::to_lowercase))
}
