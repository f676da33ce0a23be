//! Tokenisation.
//!
//! English is split on whitespace. Chinese has no word delimiters, so it is segmented
//! by forward maximum matching against the configured vocabulary; runs of characters
//! the vocabulary does not know are cut into two-character chunks.

use std::collections::HashSet;

use super::language::{is_cjk, Language};

/// Longest dictionary entry considered during matching, in characters.
const MAX_WORD_CHARS: usize = 8;

/// Whitespace tokenizer: lowercased, surrounding punctuation trimmed, empty tokens dropped.
pub fn tokenize_en(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Dictionary-driven segmenter for Chinese text.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    vocabulary: HashSet<String>,
    max_chars: usize,
}

impl Segmenter {
    /// Builds a segmenter from the words it must keep whole. Entries that do not start
    /// with a CJK ideograph are ignored; ASCII runs are always kept whole anyway.
    pub fn new<'a>(words: impl IntoIterator<Item = &'a String>) -> Self {
        let vocabulary: HashSet<String> = words
            .into_iter()
            .filter(|w| w.chars().next().is_some_and(is_cjk))
            .cloned()
            .collect();
        let max_chars = vocabulary
            .iter()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(1)
            .min(MAX_WORD_CHARS);
        Self {
            vocabulary,
            max_chars,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Tokens for the given language's rules.
    pub fn tokenize(&self, text: &str, language: Language) -> Vec<String> {
        match language.ruleset() {
            Language::Zh => self.segment(text),
            _ => tokenize_en(text),
        }
    }

    /// Segments mixed Chinese/ASCII text. Punctuation and whitespace never become tokens.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut unknown: Vec<char> = Vec::new();
        let mut ascii = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if is_cjk(c) {
                flush_word(&mut ascii, &mut tokens);
                match self.longest_match(&chars[i..]) {
                    Some(len) => {
                        flush_unknown(&mut unknown, &mut tokens);
                        tokens.push(chars[i..i + len].iter().collect());
                        i += len;
                    }
                    None => {
                        unknown.push(c);
                        i += 1;
                    }
                }
                continue;
            }

            flush_unknown(&mut unknown, &mut tokens);
            if c.is_alphanumeric() {
                ascii.extend(c.to_lowercase());
            } else {
                flush_word(&mut ascii, &mut tokens);
            }
            i += 1;
        }

        flush_word(&mut ascii, &mut tokens);
        flush_unknown(&mut unknown, &mut tokens);
        tokens
    }

    fn longest_match(&self, rest: &[char]) -> Option<usize> {
        let upper = self.max_chars.min(rest.len());
        (1..=upper).rev().find(|&len| {
            let candidate: String = rest[..len].iter().collect();
            self.vocabulary.contains(&candidate)
        })
    }
}

fn flush_word(word: &mut String, tokens: &mut Vec<String>) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

fn flush_unknown(unknown: &mut Vec<char>, tokens: &mut Vec<String>) {
    for chunk in unknown.chunks(2) {
        tokens.push(chunk.iter().collect());
    }
    unknown.clear();
}
