//! Glosa analysis layer -- interpretation over parser and verify-loop
//! output.
//!
//! The analyzers consume interchange records (glosa-interchange), not
//! raw parser state. Each concern is a separate module producing a
//! serializable result struct: token/tree alignment, metrics
//! narration, generation-issue detection, paragraph scope aggregation,
//! sentence segmentation, and experiment aggregation. The
//! `sentence_report()` and `paragraph_report()` functions bundle the
//! per-record analyses for presentation.

pub mod align;
pub mod experiment;
pub mod issues;
pub mod narrate;
pub mod scope;
pub mod segment;

pub use align::{align_tokens, AnnotatedNode};
pub use experiment::{baseline_metrics, classify_failure, summarize_run, Outcome, TrialFilter};
pub use issues::{detect_issues, GenerationIssue};
pub use narrate::{explain_failure, group_thousands, narrate_metrics, ParseNarrative};
pub use scope::{
    gap_kind, paragraph_stats, scope_report, GapKind, ParsedSentenceNote, ScopeReport,
    StructuralGap,
};
pub use segment::{fallback_tokens, normalize_sentence, split_sentences, SegmentedSentence};

use glosa_interchange::{ParseResult, XRayResponse};
use serde::Serialize;

/// Everything derived from a single parse result.
#[derive(Debug, Clone, Serialize)]
pub struct SentenceReport {
    /// Parse tree with leaves annotated from the token stream, when a
    /// tree is present.
    pub annotated_tree: Option<AnnotatedNode>,
    /// Performance narrative, when the parser reported metrics.
    pub narrative: Option<ParseNarrative>,
    /// Human-readable failure explanation, when one can be built.
    pub failure_explanation: Option<String>,
}

/// Everything derived from one paragraph analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ParagraphReport {
    pub scope: ScopeReport,
    pub issues: Vec<GenerationIssue>,
}

/// Run every per-sentence analysis that applies to `result`.
///
/// Absent optional inputs (tree, metrics, failure) simply leave their
/// section of the report empty.
pub fn sentence_report(result: &ParseResult) -> SentenceReport {
    let annotated_tree = result
        .parse_tree
        .as_ref()
        .map(|tree| align_tokens(tree, &result.tokens));
    let narrative = result.metrics.as_ref().map(|metrics| {
        narrate_metrics(
            metrics,
            result.tokens.len(),
            result.valid,
            result.rules_applied.len(),
            result.parses,
        )
    });
    let failure_explanation = result
        .failure
        .as_ref()
        .and_then(|failure| explain_failure(failure, &result.tokens));

    SentenceReport {
        annotated_tree,
        narrative,
        failure_explanation,
    }
}

/// Run the paragraph-level analyses over an x-ray response.
pub fn paragraph_report(response: &XRayResponse) -> ParagraphReport {
    ParagraphReport {
        scope: scope_report(&response.sentences),
        issues: detect_issues(&response.sentences),
    }
}
