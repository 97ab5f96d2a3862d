//! Paragraph-level scope aggregation over per-sentence analyses.
//!
//! Recomputes the coverage statistics a paragraph analysis carries and
//! classifies every out-of-scope sentence as a vocabulary gap (an
//! unknown word) or a structural gap (all words known, no derivation).

use glosa_interchange::tags::UNKNOWN_TAG;
use glosa_interchange::{RuleApplied, SentenceAnalysis, XRayStats};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Why an out-of-scope sentence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// At least one word is outside the lexicon.
    Vocabulary,
    /// Every word is known but no rule derives the structure.
    Structural,
}

/// An out-of-scope sentence whose words are all known: the shape
/// itself is what the grammar cannot derive.
#[derive(Debug, Clone, Serialize)]
pub struct StructuralGap {
    pub original: String,
    /// Space-joined tag sequence of the sentence.
    pub tag_sequence: String,
}

/// A successfully parsed sentence, noted for the report.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedSentenceNote {
    pub original: String,
    pub rule_count: usize,
    pub parse_count: u64,
    pub ambiguous: bool,
}

/// Everything the scope summary presents for one paragraph.
#[derive(Debug, Clone, Serialize)]
pub struct ScopeReport {
    pub stats: XRayStats,
    /// Unknown word to the original sentences containing it, each
    /// sentence listed once in encounter order. Keys sort.
    pub unknown_words: BTreeMap<String, Vec<String>>,
    pub structural_gaps: Vec<StructuralGap>,
    pub parsed: Vec<ParsedSentenceNote>,
}

/// Classify why a sentence fell out of scope. `None` for in-scope
/// sentences.
pub fn gap_kind(analysis: &SentenceAnalysis) -> Option<GapKind> {
    if analysis.in_grammar_scope {
        return None;
    }
    let has_unknown = analysis
        .result
        .tokens
        .iter()
        .any(|token| token.tag == UNKNOWN_TAG);
    if has_unknown {
        Some(GapKind::Vocabulary)
    } else {
        Some(GapKind::Structural)
    }
}

/// Recompute paragraph coverage statistics from the sentence list.
///
/// Percentages round to one decimal and a zero denominator reports 0.
/// Rules dedupe by rule number with the first occurrence kept in
/// encounter order; tags collect into a sorted set.
pub fn paragraph_stats(sentences: &[SentenceAnalysis]) -> XRayStats {
    let total = sentences.len() as u64;
    let parsed = sentences
        .iter()
        .filter(|analysis| analysis.in_grammar_scope)
        .count() as u64;

    let mut total_words: u64 = 0;
    let mut known_words: u64 = 0;
    let mut tags: BTreeSet<String> = BTreeSet::new();
    let mut rules: Vec<RuleApplied> = Vec::new();
    let mut seen_rules: BTreeSet<u64> = BTreeSet::new();

    for analysis in sentences {
        for token in &analysis.result.tokens {
            total_words += 1;
            tags.insert(token.tag.clone());
            if token.tag != UNKNOWN_TAG {
                known_words += 1;
            }
        }
        for rule in &analysis.result.rules_applied {
            if seen_rules.insert(rule.number) {
                rules.push(rule.clone());
            }
        }
    }

    XRayStats {
        total_sentences: total,
        parsed_sentences: parsed,
        coverage_percentage: percentage(parsed, total),
        total_words,
        known_words,
        word_coverage_percentage: percentage(known_words, total_words),
        rules_used: rules,
        unique_pos_tags: tags.into_iter().collect(),
    }
}

/// Build the full scope report for one paragraph.
pub fn scope_report(sentences: &[SentenceAnalysis]) -> ScopeReport {
    let mut unknown_words: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut structural_gaps = Vec::new();
    let mut parsed = Vec::new();

    for analysis in sentences {
        for token in &analysis.result.tokens {
            if token.tag == UNKNOWN_TAG {
                let sightings = unknown_words.entry(token.word.clone()).or_default();
                if !sightings.contains(&analysis.original) {
                    sightings.push(analysis.original.clone());
                }
            }
        }

        if analysis.in_grammar_scope {
            parsed.push(ParsedSentenceNote {
                original: analysis.original.clone(),
                rule_count: analysis.result.rules_applied.len(),
                parse_count: analysis.result.parses,
                ambiguous: analysis.result.parses > 1,
            });
        } else if gap_kind(analysis) == Some(GapKind::Structural) {
            structural_gaps.push(StructuralGap {
                original: analysis.original.clone(),
                tag_sequence: analysis
                    .result
                    .tokens
                    .iter()
                    .map(|token| token.tag.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            });
        }
    }

    ScopeReport {
        stats: paragraph_stats(sentences),
        unknown_words,
        structural_gaps,
        parsed,
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(100.0 * part as f64 / whole as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
