//! Heuristic detection of problem constructions in generated text.
//!
//! The generation prompt discourages a fixed set of constructions the
//! grammar cannot derive (reflexive verbs, progressive tenses, relative
//! clauses, infinitive chains). When a sentence still falls out of
//! scope, these rules point at the likely culprit. Detection is
//! best-effort: false positives and negatives are acceptable, and it
//! never fails on any input string.

use glosa_interchange::SentenceAnalysis;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// One detected construction in an out-of-scope sentence.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationIssue {
    /// Original text of the offending sentence.
    pub sentence: String,
    /// Description of the detected construction.
    pub issue: String,
}

/// Ordered detection rules, matched against the normalized sentence
/// text. Ordering fixes the report order for multi-issue sentences.
/// Patterns stay cached for the process lifetime.
static ISSUE_RULES: LazyLock<[(Regex, &'static str); 7]> = LazyLock::new(|| {
    let rule = |pattern: &str, description: &'static str| {
        (
            Regex::new(pattern).expect("invalid issue pattern"),
            description,
        )
    };
    [
        // Reflexive marker as a standalone word.
        rule(r"(?i)\bse\b", "Reflexive pronoun \"se\" detected"),
        // Clitic object pronoun followed by a verb-like word.
        rule(
            r"(?i)\b(le|lo|la|les|los|las)\s+\w+[aeiouáéíóú]",
            "Possible object pronoun before verb",
        ),
        // estar + gerund, present and past auxiliary.
        rule(
            r"(?i)\bestá\w*\s+\w+ndo\b",
            "Progressive tense (está + gerund)",
        ),
        rule(
            r"(?i)\bestaba\w*\s+\w+ndo\b",
            "Progressive tense (estaba + gerund)",
        ),
        // que introducing a finite clause.
        rule(
            r"(?i)\bque\s+(es|tiene|está|era|son|hay|puede|quiere)\b",
            "Relative clause with \"que\"",
        ),
        // Modal or periphrastic future + infinitive.
        rule(
            r"(?i)\b(puede|quiere|necesita|debe|va\s+a)\s+\w+(ar|er|ir)\b",
            "Infinitive after modal verb",
        ),
        // Purpose preposition + infinitive.
        rule(r"(?i)\bpara\s+\w+(ar|er|ir)\b", "Infinitive after \"para\""),
    ]
});

/// Scan out-of-scope sentences for known problem constructions.
///
/// Tests every rule against each sentence's normalized text and
/// reports one issue per matching rule, in rule order, tagged with the
/// original sentence text. In-scope sentences are skipped entirely: by
/// definition they matched the grammar and need no diagnosis.
pub fn detect_issues(sentences: &[SentenceAnalysis]) -> Vec<GenerationIssue> {
    let mut issues = Vec::new();
    for analysis in sentences {
        if analysis.in_grammar_scope {
            continue;
        }
        for (pattern, description) in ISSUE_RULES.iter() {
            if pattern.is_match(&analysis.sentence) {
                issues.push(GenerationIssue {
                    sentence: analysis.original.clone(),
                    issue: (*description).to_string(),
                });
            }
        }
    }
    issues
}
