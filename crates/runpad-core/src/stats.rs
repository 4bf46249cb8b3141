//! Live text statistics.

use std::fmt;

/// Line and character counts of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Number of newline-separated segments; an empty buffer has one line.
    pub lines: usize,
    /// Number of characters (Unicode scalar values).
    pub chars: usize,
}

impl TextStats {
    /// Computes statistics for `text`.
    pub fn of(text: &str) -> Self {
        Self {
            lines: text.split('\n').count(),
            chars: text.chars().count(),
        }
    }
}

impl fmt::Display for TextStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines | {} characters", self.lines, self.chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(TextStats::of(""), TextStats { lines: 1, chars: 0 });
    }

    #[test]
    fn test_trailing_newline_counts_a_line() {
        assert_eq!(TextStats::of("a\nb\n").lines, 3);
    }

    #[test]
    fn test_chars_not_bytes() {
        assert_eq!(TextStats::of("héllo").chars, 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(TextStats::of("ab\nc").to_string(), "2 lines | 4 characters");
    }
}
