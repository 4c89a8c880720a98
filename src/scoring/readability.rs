//! Flesch reading ease over plain English text.
//!
//! `206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)`.
//! Higher is easier to read. Short ad copy routinely lands above 100 or
//! below 0; the value is not clamped, only rounded to two decimals.
//! Text without words reads at the formula base.

use super::round2;

const BASE: f64 = 206.835;

pub fn flesch_reading_ease(text: &str) -> f64 {
    let words = lexicon(text);
    if words.is_empty() {
        return round2(BASE);
    }

    let word_count = words.len() as f64;
    let sentences = sentence_count(text) as f64;
    let syllables: usize = words.iter().map(|word| syllable_count(word)).sum();

    let words_per_sentence = word_count / sentences;
    let syllables_per_word = syllables as f64 / word_count;
    round2(BASE - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
}

/// Words with punctuation removed. Tokens made only of punctuation vanish.
pub fn lexicon(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|ch| ch.is_alphanumeric() || *ch == '\'')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Terminator-delimited runs of more than two words; never less than one.
pub fn sentence_count(text: &str) -> usize {
    let counted = text
        .split(|ch| matches!(ch, '.' | '!' | '?'))
        .filter(|sentence| lexicon(sentence).len() > 2)
        .count();
    counted.max(1)
}

/// Vowel-group estimate with a silent trailing `e`. Words without letters
/// (numbers, symbols) count as one syllable.
pub fn syllable_count(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|ch| ch.is_alphabetic())
        .flat_map(|ch| ch.to_lowercase())
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let mut groups = 0usize;
    let mut previous_vowel = false;
    for &ch in &letters {
        let vowel = is_vowel(ch);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    let len = letters.len();
    if len > 2 && letters[len - 1] == 'e' && !is_vowel(letters[len - 2]) {
        let consonant_le = letters[len - 2] == 'l' && !is_vowel(letters[len - 3]);
        if !consonant_le {
            groups = groups.saturating_sub(1);
        }
    }

    groups.max(1)
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}
