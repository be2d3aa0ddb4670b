//! Helvetica advance widths and word wrapping.
//!
//! Widths are in thousandths of the font size, taken from the standard
//! Helvetica font metrics. Lengths returned by this module are millimetres.

/// Millimetres per PDF point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Widths of the printable ASCII range `' '..='~'`.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Width of the accented lowercase letters, also used for characters with
/// no metrics of their own.
const FALLBACK_WIDTH: u16 = 556;

/// The ellipsis marking truncated text.
pub const ELLIPSIS: char = '…';

/// Advance width of `c` in thousandths of the font size.
#[must_use]
pub const fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_WIDTHS[c as usize - ' ' as usize],
        '…' | '—' | '‰' | 'Æ' | 'Œ' => 1000,
        '‘' | '’' | '‚' => 222,
        '“' | '”' | '„' => 333,
        '•' => 350,
        '°' => 400,
        '×' | '÷' | '±' => 584,
        'À'..='Å' | 'È'..='Ë' | 'Ý' | 'Þ' => 667,
        'Ç' | 'Ð' | 'Ñ' | 'Ù'..='Ü' => 722,
        'Ì'..='Ï' | 'ì'..='ï' => 278,
        'Ò'..='Ö' | 'Ø' => 778,
        'ß' | 'ø' => 611,
        'æ' => 889,
        'ç' | 'ý' | 'ÿ' => 500,
        'œ' => 944,
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` set at `size` points, in millimetres.
#[must_use]
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: f32 = text.chars().map(|c| f32::from(char_width(c))).sum();
    units / 1000.0 * size * MM_PER_PT
}

/// Break `text` into lines no wider than `max_width` millimetres.
///
/// Lines break at whitespace; explicit newlines start a new line; a word
/// wider than a whole line is broken between characters.
#[must_use]
pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, size) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if text_width(&current, size) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::replace(&mut current, c.to_string()));
                    }
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// Shorten `line` so that it fits `max_width` millimetres with an ellipsis
/// appended.
#[must_use]
pub fn ellipsize(line: &str, max_width: f32, size: f32) -> String {
    let mut kept = line.trim_end().to_string();
    loop {
        let candidate = format!("{kept}{ELLIPSIS}");
        if kept.is_empty() || text_width(&candidate, size) <= max_width {
            return candidate;
        }
        kept.pop();
        kept.truncate(kept.trim_end().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        assert_eq!(char_width(' '), 278);
        assert_eq!(char_width('W'), 944);
        assert_eq!(char_width('~'), 584);
        assert_eq!(char_width('é'), char_width('e'));
        assert_eq!(char_width('É'), char_width('E'));
        assert_eq!(char_width('漢'), FALLBACK_WIDTH);
    }

    #[test]
    fn latin_1_supplement_widths() {
        assert_eq!(char_width('Æ'), 1000);
        assert_eq!(char_width('Œ'), char_width('…'));
        assert_eq!(char_width('È'), char_width('À'));
        assert_eq!(char_width('€'), 556);
        assert_eq!(char_width('«'), char_width('à'));
    }

    #[test]
    fn width_scales_with_size() {
        let small = text_width("Hardware", 10.0);
        let large = text_width("Hardware", 20.0);
        assert!((large - 2.0 * small).abs() < 1e-4);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap("Printer jam", 160.0, 11.0), vec!["Printer jam"]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "The docking station no longer detects the external monitor. ".repeat(8);
        let lines = wrap(&text, 160.0, 11.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 160.0, "line too wide: {line}");
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let lines = wrap("First line\n\nThird line", 160.0, 11.0);
        assert_eq!(lines, vec!["First line", "", "Third line"]);
    }

    #[test]
    fn oversized_word_is_broken_by_character() {
        let word = "x".repeat(200);
        let lines = wrap(&word, 50.0, 11.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 50.0);
        }
    }

    #[test]
    fn ellipsize_fits_width() {
        let line = "a line that certainly does not fit in twenty millimetres";
        let shortened = ellipsize(line, 20.0, 11.0);
        assert!(shortened.ends_with(ELLIPSIS));
        assert!(text_width(&shortened, 11.0) <= 20.0);
        assert!(line.starts_with(shortened.trim_end_matches(ELLIPSIS)));
    }
}
