//! Greedy word wrapping for notes and payment details

use unicode_segmentation::UnicodeSegmentation;

/// Display width of a string in columns (grapheme clusters)
fn columns(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Wrap `text` into lines of at most `max_width` columns.
///
/// Words are split on any whitespace, so embedded newlines are reflowed
/// rather than preserved. A word wider than `max_width` gets a line of its
/// own and is never split. Empty or blank text yields no lines.
pub fn wrap(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = columns(word);

        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Number of lines `wrap` would produce
pub fn wrapped_line_count(text: &str, max_width: usize) -> usize {
    wrap(text, max_width).len()
}

/// Whether wrapping would flatten line breaks that separate content
pub fn contains_line_breaks(text: &str) -> bool {
    text.trim().lines().count() > 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_wrap() {
        assert_eq!(
            wrap("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_long_word_not_split() {
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
        assert_eq!(
            wrap("a supercalifragilistic b", 5),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("  \n\t ", 10).is_empty());
        assert_eq!(wrapped_line_count("", 10), 0);
    }

    #[test]
    fn test_exact_fit() {
        assert_eq!(wrap("abcde fghij", 11), vec!["abcde fghij"]);
        assert_eq!(wrap("abcde fghij", 10), vec!["abcde", "fghij"]);
    }

    #[test]
    fn test_newlines_reflowed() {
        assert_eq!(wrap("Net 30\nLate fees apply", 40), vec!["Net 30 Late fees apply"]);
        assert!(contains_line_breaks("Net 30\nLate fees apply"));
        assert!(!contains_line_breaks("Net 30 days\n"));
    }

    #[test]
    fn test_width_counts_graphemes() {
        // "café" written with a combining accent is 5 chars but 4 columns
        let word = "cafe\u{301}";
        assert_eq!(wrap(&format!("{} {}", word, word), 9).len(), 1);
        assert_eq!(wrap("日本語 テキスト", 8), vec!["日本語 テキスト"]);
    }
}
