//! Text wrapping for card backs
//!
//! Translations are packed greedily, word by word, into lines no wider than the
//! available cell width. Measurement is supplied by the caller so the same routine
//! works against the real font and against fixed-width test measurers.

/// Split `text` into lines whose measured width stays within `max_width`.
///
/// Words are separated by whitespace and re-joined with single spaces. A word that
/// is wider than `max_width` on its own is placed on a line by itself, unsplit.
/// Empty input yields no lines.
pub fn wrap_text<F>(text: &str, max_width: f32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line.push_str(word);
            continue;
        }

        let candidate = format!("{current_line} {word}");
        if measure(&candidate) <= max_width {
            current_line = candidate;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // One point per character keeps expectations easy to read.
    fn per_char(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(wrap_text("", 10.0, per_char).is_empty());
        assert!(wrap_text("   \t ", 10.0, per_char).is_empty());
    }

    #[test]
    fn text_that_fits_is_one_trimmed_line() {
        assert_eq!(wrap_text("  salom dunyo ", 40.0, per_char), vec!["salom dunyo"]);
    }

    #[test]
    fn greedy_split_after_third_word() {
        // "aa bb cc" = 8 fits in 9, adding " dd" would make 11.
        let lines = wrap_text("aa bb cc dd ee", 9.0, per_char);
        assert_eq!(lines, vec!["aa bb cc", "dd ee"]);
    }

    #[test]
    fn overlong_word_sits_alone() {
        let lines = wrap_text("a extraordinarily b", 5.0, per_char);
        assert_eq!(lines, vec!["a", "extraordinarily", "b"]);
    }

    #[test]
    fn overlong_first_word_does_not_emit_empty_line() {
        let lines = wrap_text("extraordinarily a", 5.0, per_char);
        assert_eq!(lines, vec!["extraordinarily", "a"]);
    }

    #[test]
    fn every_line_fits_unless_single_word() {
        let text = "bir ikki uch to'rt besh olti yetti sakkiz to'qqiz o'n \
                    juda-uzun-so'z-bu-yerda va yana bir necha so'z";
        for max_width in [6.0, 10.0, 14.0, 25.0] {
            for line in wrap_text(text, max_width, per_char) {
                assert!(
                    per_char(&line) <= max_width || !line.contains(' '),
                    "line {line:?} exceeds {max_width}"
                );
            }
        }
    }

    #[test]
    fn wrapping_preserves_words_in_order() {
        let text = "one two three four five six seven";
        let lines = wrap_text(text, 12.0, per_char);
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }
}
