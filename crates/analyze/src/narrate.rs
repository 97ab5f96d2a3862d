//! Narration of parser search metrics and parse failures.
//!
//! Turns the raw BFS counters into the fixed explanatory paragraph
//! shown alongside a parse, and a localized failure into a one-line
//! prose explanation with an optional usage tip. All output text is
//! deterministic; renderers display it verbatim.

use glosa_interchange::tags::describe_tag;
use glosa_interchange::{FailureInfo, ParseMetrics, Token};
use serde::Serialize;

/// Narrative explanation of one parse, with its supporting ratios.
#[derive(Debug, Clone, Serialize)]
pub struct ParseNarrative {
    /// Explanatory sentences in presentation order.
    pub lines: Vec<String>,
    /// `states_explored / word_count`; 0 for an empty sentence.
    pub states_per_word: f64,
    /// Percent of terminal attempts that matched, nearest integer;
    /// 0 when nothing was attempted.
    pub terminal_success_rate: u64,
    /// `states_generated / states_explored`; None when nothing was
    /// explored.
    pub branching_factor: Option<f64>,
}

/// Narrate `metrics` for a sentence of `word_count` words.
///
/// `valid` is the outcome flag the caller presents, `rule_count` the
/// length of the derivation trace, `parse_count` the number of
/// distinct parses found. Emits, in order: search strategy, search
/// volume, terminal match rate, the outcome, an efficiency remark
/// (skipped when the states-per-word ratio is 0), and elapsed time.
pub fn narrate_metrics(
    metrics: &ParseMetrics,
    word_count: usize,
    valid: bool,
    rule_count: usize,
    parse_count: u64,
) -> ParseNarrative {
    let states_per_word = if word_count > 0 {
        metrics.states_explored as f64 / word_count as f64
    } else {
        0.0
    };
    let terminal_success_rate = if metrics.terminal_attempts > 0 {
        (100.0 * metrics.terminal_successes as f64 / metrics.terminal_attempts as f64).round()
            as u64
    } else {
        0
    };
    let branching_factor = if metrics.states_explored > 0 {
        Some(metrics.states_generated as f64 / metrics.states_explored as f64)
    } else {
        None
    };

    let mut lines = Vec::new();

    lines.push(format!(
        "The parser used breadth-first search (BFS) to try every possible way to build a \
         grammar tree for this {}-word sentence.",
        word_count
    ));

    lines.push(format!(
        "It explored {} possible parsing states, expanding {} grammar rules along the way. \
         At its busiest, {} candidate parses were being tracked simultaneously.",
        group_thousands(metrics.states_explored),
        group_thousands(metrics.rule_expansions),
        group_thousands(metrics.max_queue_size)
    ));

    lines.push(format!(
        "Of {} attempts to match words against expected part-of-speech tags, {} succeeded \
         ({}%). The other {} were dead ends where a word didn\u{2019}t fit the pattern being \
         tried.",
        group_thousands(metrics.terminal_attempts),
        group_thousands(metrics.terminal_successes),
        terminal_success_rate,
        group_thousands(metrics.terminal_attempts - metrics.terminal_successes)
    ));

    if valid {
        let found = if parse_count > 1 {
            format!("{} valid parse trees (the sentence is ambiguous)", parse_count)
        } else {
            "a valid parse tree".to_string()
        };
        lines.push(format!(
            "The search found {}, applying {} grammar rules to build the structure from \
             SENTENCE down to individual words. Each word was identified with its part of \
             speech (DET, N, V, etc.) and the full tree shows how they combine.",
            found, rule_count
        ));
    } else {
        let missing = if metrics.rule_expansions > 0 {
            "grammar rules"
        } else {
            "known words in the lexicon"
        };
        lines.push(format!(
            "After exhausting all possibilities, no valid parse tree could be built. This \
             means the sentence\u{2019}s structure doesn\u{2019}t match any combination of \
             the {}.",
            missing
        ));
    }

    if states_per_word > 500.0 {
        lines.push(format!(
            "At ~{} states per word, this sentence required significant exploration \
             \u{2014} likely due to structural ambiguity or compound clauses that create \
             many branching paths.",
            states_per_word.round()
        ));
    } else if states_per_word > 200.0 {
        lines.push(format!(
            "At ~{} states per word, this is a moderate amount of work for the parser.",
            states_per_word.round()
        ));
    } else if states_per_word > 0.0 {
        lines.push(format!(
            "At ~{} states per word, this was relatively efficient to parse.",
            states_per_word.round()
        ));
    }

    lines.push(format!("Total parse time: {} ms.", metrics.parse_time_ms));

    ParseNarrative {
        lines,
        states_per_word,
        terminal_success_rate,
        branching_factor,
    }
}

/// Prose explanation of a localized parse failure.
///
/// Describes what the grammar expected at the failure position, what
/// the offending word actually was (when it appears in the token
/// stream), and a usage tip for the two common shapes: a bare noun
/// missing its determiner, and an adjective in sentence-initial
/// position. None when the failure carries no expected categories.
pub fn explain_failure(failure: &FailureInfo, tokens: &[Token]) -> Option<String> {
    if failure.expected_categories.is_empty() {
        return None;
    }

    let expected = describe_expected(&failure.expected_categories);
    let mut text = format!(
        "The grammar expected {} at position {}",
        expected, failure.index
    );
    match describe_actual(&failure.token, tokens) {
        Some(actual) => {
            text.push_str(", but ");
            text.push_str(&actual);
            text.push('.');
        }
        None => text.push('.'),
    }

    let failed_tag = tokens
        .iter()
        .find(|t| t.word == failure.token)
        .map(|t| t.tag.as_str());
    if failure.expected_categories.iter().any(|c| c == "DET") {
        if failed_tag == Some("N") {
            text.push_str(&format!(
                " Tip: Try adding a determiner before \"{word}\" (e.g. \"el {word}\" or \
                 \"un {word}\").",
                word = failure.token
            ));
        } else if failed_tag == Some("A") {
            text.push_str(
                " Tip: Sentences in this grammar must start with a determiner or \
                 existential verb, not an adjective.",
            );
        }
    }

    Some(text)
}

fn describe_expected(categories: &[String]) -> String {
    let described: Vec<String> = categories
        .iter()
        .map(|cat| match describe_tag(cat) {
            Some(name) => name.to_string(),
            None => cat.to_lowercase(),
        })
        .collect();
    match described.len() {
        1 => described[0].clone(),
        2 => format!("{} or {}", described[0], described[1]),
        n => format!("{}, or {}", described[..n - 1].join(", "), described[n - 1]),
    }
}

fn describe_actual(word: &str, tokens: &[Token]) -> Option<String> {
    let found = tokens.iter().find(|t| t.word == word)?;
    Some(match describe_tag(&found.tag) {
        Some(name) => format!("\"{}\" is {}", word, name),
        None => format!("\"{}\" is tagged as {}", word, found.tag),
    })
}

/// Format a count with comma thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
