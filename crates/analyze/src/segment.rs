//! Sentence segmentation and normalization for generated paragraphs.
//!
//! Mirrors the analyzer pipeline's segmentation so statistics computed
//! here agree with the per-sentence analyses it produced: sentences
//! end at terminator-plus-whitespace boundaries, and the parser sees a
//! punctuation-stripped, lowercased form of each one.

use glosa_interchange::tags::UNKNOWN_TAG;
use glosa_interchange::Token;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("invalid boundary pattern"));

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.!?,;:"'\-¿¡]+"#).expect("invalid punctuation pattern"));

/// One segmented sentence: the original punctuation-preserving text
/// and the normalized form the parser consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentedSentence {
    pub original: String,
    pub cleaned: String,
}

/// Split generated text into sentences.
///
/// A sentence ends at a terminator (`.` `!` `?`) followed by
/// whitespace; the terminator stays with its sentence. Pieces whose
/// normalized form is empty (bare punctuation) are dropped.
pub fn split_sentences(text: &str) -> Vec<SegmentedSentence> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        push_sentence(&text[start..boundary.start() + 1], &mut sentences);
        start = boundary.end();
    }
    push_sentence(&text[start..], &mut sentences);
    sentences
}

fn push_sentence(piece: &str, out: &mut Vec<SegmentedSentence>) {
    let original = piece.trim();
    if original.is_empty() {
        return;
    }
    let cleaned = normalize_sentence(original);
    if cleaned.is_empty() {
        return;
    }
    out.push(SegmentedSentence {
        original: original.to_string(),
        cleaned,
    });
}

/// Normalize a sentence the way the parser's tokenizer expects:
/// punctuation stripped, trimmed, lowercased.
pub fn normalize_sentence(sentence: &str) -> String {
    PUNCTUATION.replace_all(sentence, "").trim().to_lowercase()
}

/// Synthesize tokens for a sentence the parser could not tokenize at
/// all: one UNKNOWN-tagged token per whitespace-separated word, so
/// every word still renders with scope styling.
pub fn fallback_tokens(sentence: &str) -> Vec<Token> {
    sentence
        .split_whitespace()
        .map(|word| Token {
            word: word.to_string(),
            tag: UNKNOWN_TAG.to_string(),
            translation: String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_terminator_with_sentence() {
        let sentences = split_sentences("El gato come. ¡Hola! ¿Qué tal?");
        let originals: Vec<&str> = sentences.iter().map(|s| s.original.as_str()).collect();
        assert_eq!(originals, vec!["El gato come.", "¡Hola!", "¿Qué tal?"]);
        assert_eq!(sentences[0].cleaned, "el gato come");
        assert_eq!(sentences[1].cleaned, "hola");
        assert_eq!(sentences[2].cleaned, "qué tal");
    }

    #[test]
    fn test_ellipsis_stays_with_its_sentence() {
        let sentences = split_sentences("Espera... Ya voy.");
        let originals: Vec<&str> = sentences.iter().map(|s| s.original.as_str()).collect();
        assert_eq!(originals, vec!["Espera...", "Ya voy."]);
    }

    #[test]
    fn test_newline_counts_as_boundary_whitespace() {
        let sentences = split_sentences("Uno.\nDos.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].original, "Dos.");
    }

    #[test]
    fn test_text_without_terminator_is_one_sentence() {
        let sentences = split_sentences("el gato come pan");
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].original, "el gato come pan");
        assert_eq!(sentences[0].cleaned, "el gato come pan");
    }

    #[test]
    fn test_bare_punctuation_pieces_are_dropped() {
        assert!(split_sentences("??? !!!").is_empty());
        assert!(split_sentences("   ").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_normalize_strips_marks_and_lowercases() {
        assert_eq!(
            normalize_sentence("¿Dónde está el baño?"),
            "dónde está el baño"
        );
        assert_eq!(normalize_sentence("Se lava."), "se lava");
    }

    #[test]
    fn test_fallback_tokens_tag_every_word_unknown() {
        let tokens = fallback_tokens("xyzzy plugh");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].word, "xyzzy");
        assert_eq!(tokens[0].tag, UNKNOWN_TAG);
        assert!(tokens[1].translation.is_empty());
    }
}
