//! Wrapping and handwriting-style spacing of document text.

use rand::Rng;

use crate::foundation::core::Line;

/// Letter pairs written without any extra gap.
const TIGHT_PAIRS: &[&str] = &[
    "th", "he", "in", "er", "an", "re", "on", "at", "en", "nd", "ti", "es", "or",
];

/// Letter pairs that get 0 or 1 extra space.
const WIDE_PAIRS: &[&str] = &["ow", "av", "wa", "we", "wo", "yo"];

/// No gap is ever inserted right before one of these.
const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', '\'', '"'];

/// Probability of a gap between letters of any other pair.
const DEFAULT_GAP_PROBABILITY: f64 = 0.2;

/// Number of spaces written between words.
const WORD_GAP: std::ops::RangeInclusive<usize> = 3..=5;

/// Wrap raw document text into lines of at most `max_chars` characters.
///
/// Lines that already fit pass through untouched. Longer lines are greedily word-wrapped; a
/// single word longer than `max_chars` is emitted alone rather than split. Blank input lines
/// come out as empty lines, one for one.
pub fn wrap(text: &str, max_chars: usize) -> Vec<Line> {
    let mut raw = split_lines(text);
    if raw.is_empty() {
        raw.push(text);
    }

    let mut out = Vec::<String>::with_capacity(raw.len());
    for line in raw {
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        if line.chars().count() <= max_chars {
            out.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0usize;
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            if current_len + word_len + 1 <= max_chars {
                if !current.is_empty() {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(word);
                current_len += word_len;
            } else {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                current.push_str(word);
                current_len = word_len;
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
    }

    out.into_iter()
        .enumerate()
        .map(|(index, text)| Line::new(index, text))
        .collect()
}

/// Split on every line break: `\n`, `\r\n`, a lone `\r`, and the Unicode line and paragraph
/// separators. A trailing break does not start an extra line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        out.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, n)| n == '\n').is_some() {
            end += 1;
        }
        start = end;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Re-space every line the way a hand would: uneven gaps inside words and wide, irregular gaps
/// between them.
///
/// Randomized and not idempotent; pass a seeded `rng` for reproducible output.
pub fn space_for_handwriting<R: Rng + ?Sized>(lines: &[Line], rng: &mut R) -> Vec<Line> {
    lines
        .iter()
        .map(|line| Line::new(line.index, space_line(&line.text, rng)))
        .collect()
}

fn space_line<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out = String::with_capacity(text.len() * 2);

    for (word_idx, word) in words.iter().enumerate() {
        let chars: Vec<char> = word.chars().collect();
        for (i, &ch) in chars.iter().enumerate() {
            out.push(ch);
            let Some(&next) = chars.get(i + 1) else {
                continue;
            };
            if PUNCTUATION.contains(&next) {
                continue;
            }
            let gap = match pair_class(ch, next) {
                PairClass::Tight => 0,
                PairClass::Wide => rng.gen_range(0..=1),
                PairClass::Other => {
                    if rng.gen_bool(DEFAULT_GAP_PROBABILITY) {
                        rng.gen_range(0..=1)
                    } else {
                        0
                    }
                }
            };
            push_spaces(&mut out, gap);
        }

        if word_idx + 1 < words.len() {
            let gap = rng.gen_range(WORD_GAP);
            push_spaces(&mut out, gap);
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PairClass {
    Tight,
    Wide,
    Other,
}

fn pair_class(a: char, b: char) -> PairClass {
    let pair: String = a.to_lowercase().chain(b.to_lowercase()).collect();
    if TIGHT_PAIRS.contains(&pair.as_str()) {
        PairClass::Tight
    } else if WIDE_PAIRS.contains(&pair.as_str()) {
        PairClass::Wide
    } else {
        PairClass::Other
    }
}

fn push_spaces(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
