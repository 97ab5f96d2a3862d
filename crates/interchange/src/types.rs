//! Typed structs mirroring the grammar backend's wire records.
//!
//! Field names follow the backend encoder exactly: parser records are
//! camelCase, verify-loop and experiment records snake_case. Optional
//! fields accept JSON `null` or omission on decode and always encode as
//! explicit `null`, so a decoded record re-encodes without field loss.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Parser records ──────────────────────────────────────────────────

/// A single tagged word from the tokenizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    /// Part-of-speech category, or the sentinel `UNKNOWN`.
    pub tag: String,
    #[serde(default)]
    pub translation: String,
}

/// One node of a parse tree.
///
/// A node is a leaf iff `word` is true: leaves are the terminals that
/// consumed input tokens, in left-to-right document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseTreeNode {
    pub symbol: String,
    #[serde(default)]
    pub children: Vec<ParseTreeNode>,
    #[serde(default)]
    pub word: bool,
}

impl ParseTreeNode {
    /// Number of leaves under this node, counted in document order.
    /// When the parse succeeded this equals the sentence's token count.
    pub fn leaf_count(&self) -> usize {
        if self.word {
            1
        } else {
            self.children.iter().map(ParseTreeNode::leaf_count).sum()
        }
    }
}

/// One grammar-rule application from the derivation trace.
/// Trace order is derivation order; it is never sorted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleApplied {
    pub number: u64,
    pub rule: String,
}

/// Where a failed parse first went wrong.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailureInfo {
    /// 0-based position in the token stream of the mismatched word.
    pub index: u64,
    /// The word at that position.
    pub token: String,
    /// Categories the grammar would have accepted there.
    #[serde(default)]
    pub expected_categories: Vec<String>,
    pub message: String,
}

/// Search counters reported by the parser for one sentence.
///
/// Upstream maintains `terminal_successes <= terminal_attempts` and
/// `states_generated >= states_explored`; consumers may rely on both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseMetrics {
    pub states_explored: u64,
    pub states_generated: u64,
    pub max_queue_size: u64,
    pub rule_expansions: u64,
    pub terminal_attempts: u64,
    pub terminal_successes: u64,
    pub parse_time_ms: f64,
}

/// Complete parser output for one sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub valid: bool,
    pub sentence: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub parse_tree: Option<ParseTreeNode>,
    #[serde(default)]
    pub rules_applied: Vec<RuleApplied>,
    /// Count of distinct derivations found.
    #[serde(default)]
    pub parses: u64,
    /// True iff `parses > 1`.
    #[serde(default)]
    pub ambiguous: bool,
    #[serde(default)]
    pub failure: Option<FailureInfo>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub metrics: Option<ParseMetrics>,
}

// ── Verify-loop records ─────────────────────────────────────────────

/// One message of the generation transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// One generation attempt inside a verify loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyAttempt {
    /// 1-based attempt number.
    pub attempt_number: u64,
    /// The sentence the model produced on this attempt.
    pub sentence: String,
    pub result: ParseResult,
    /// Feedback given to the model after this attempt failed, if any.
    #[serde(default)]
    pub constraint_feedback: Option<String>,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Full output of one generate-and-verify loop.
///
/// `total_attempts` equals `attempts.len()` and `success` mirrors the
/// final attempt's validity; both are carried explicitly on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerifyLoopResponse {
    pub prompt: String,
    pub language: String,
    pub attempts: Vec<VerifyAttempt>,
    pub final_result: ParseResult,
    pub success: bool,
    pub total_attempts: u64,
}

// ── X-ray records ───────────────────────────────────────────────────

/// One sentence of freely generated text, parsed and scope-classified.
///
/// `in_grammar_scope` is carried independently of `result.valid`:
/// upstream classification may diverge (segmentation boundary cases)
/// and this layer tolerates the divergence rather than resolving it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceAnalysis {
    /// Normalized sentence text, as fed to the parser.
    pub sentence: String,
    /// Original sentence text, as generated.
    pub original: String,
    pub result: ParseResult,
    pub in_grammar_scope: bool,
    #[serde(default)]
    pub translation: String,
}

/// Paragraph-level coverage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XRayStats {
    pub total_sentences: u64,
    pub parsed_sentences: u64,
    pub coverage_percentage: f64,
    pub total_words: u64,
    pub known_words: u64,
    pub word_coverage_percentage: f64,
    /// Distinct rules observed across all sentences, encounter order.
    pub rules_used: Vec<RuleApplied>,
    /// Distinct tags observed across all tokens, sorted.
    pub unique_pos_tags: Vec<String>,
}

/// Full x-ray output: generated text plus per-sentence analyses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct XRayResponse {
    pub prompt: String,
    pub language: String,
    pub generated_text: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub user_message: String,
    pub sentences: Vec<SentenceAnalysis>,
    pub stats: XRayStats,
}

// ── Experiment records ──────────────────────────────────────────────

/// One experiment trial: a prompt run through the verify loop under a
/// named feedback mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentResult {
    pub prompt: String,
    pub template_id: String,
    /// "structural", "generic", or the single-shot sentinel "none".
    pub feedback_mode: String,
    pub response: VerifyLoopResponse,
    pub elapsed_seconds: f64,
    /// Set only on failed trials; see the failure classifier.
    #[serde(default)]
    pub failure_category: Option<String>,
}

/// Pass rates for one template within a baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateStats {
    pub pass_at_1: f64,
    pub pass_at_k: f64,
    /// Trial count; carried as a float on the wire.
    pub total: f64,
}

/// Comparative metrics for one feedback-mode baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaselineMetrics {
    pub feedback_mode: String,
    pub total_prompts: u64,
    /// Percent of trials whose first attempt parsed.
    pub pass_at_1: f64,
    /// Percent of trials that succeeded within the attempt budget.
    /// Equals `pass_at_1` for the single-shot baseline.
    pub pass_at_k: f64,
    pub mean_retries_to_pass: f64,
    pub median_retries_to_pass: f64,
    pub mean_latency_seconds: f64,
    pub p95_latency_seconds: f64,
    /// Failure category -> count, over failed trials only.
    pub failure_histogram: BTreeMap<String, u64>,
    /// Template id -> pass rates restricted to that template's trials.
    pub template_breakdown: BTreeMap<String, TemplateStats>,
}

/// Aggregated metrics for a whole experiment run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentSummary {
    pub run_id: String,
    /// RFC 3339 UTC timestamp of when the summary was computed.
    pub timestamp: String,
    pub language: String,
    /// Attempt budget inferred from the trials, floored at 3.
    pub max_retries: u64,
    /// Largest baseline group size.
    pub total_prompts: u64,
    pub baselines: Vec<BaselineMetrics>,
}

/// Raw trial list for one run, as consumed by the filter view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentDetail {
    pub run_id: String,
    pub results: Vec<ExperimentResult>,
}
