//! Run-level aggregation of verify-loop trials into baseline metrics.
//!
//! Trials group by feedback mode; each group yields pass rates, retry
//! and latency statistics, a failure histogram, and a per-template
//! breakdown. A composable filter exposes ordered views over the raw
//! trial list for browsing.

use glosa_interchange::tags::{SINGLE_SHOT_MODE, UNKNOWN_TAG};
use glosa_interchange::{
    BaselineMetrics, ExperimentResult, ExperimentSummary, TemplateStats, VerifyLoopResponse,
};
use std::collections::BTreeMap;

// ── Failure classification ──────────────────────────────────────────

/// Categorize why a failed verify loop failed, from its last attempt.
///
/// Categories, in precedence order: parser `error`, any unknown token
/// (`oov_word`), a failure expecting a determiner at position zero
/// (`missing_det`), any other localized expectation (`wrong_pos`),
/// otherwise `unsupported_construction`.
pub fn classify_failure(response: &VerifyLoopResponse) -> &'static str {
    let result = response
        .attempts
        .last()
        .map(|attempt| &attempt.result)
        .unwrap_or(&response.final_result);

    if result.error.as_deref().map_or(false, |e| !e.is_empty()) {
        return "error";
    }
    if result.tokens.iter().any(|token| token.tag == UNKNOWN_TAG) {
        return "oov_word";
    }
    if let Some(failure) = &result.failure {
        if failure.expected_categories.iter().any(|c| c == "DET") && failure.index == 0 {
            return "missing_det";
        }
        if !failure.expected_categories.is_empty() {
            return "wrong_pos";
        }
    }
    "unsupported_construction"
}

// ── Baseline metrics ────────────────────────────────────────────────

/// Compute aggregate metrics for one feedback-mode group.
///
/// An empty group reports all-zero figures rather than dividing by
/// zero. For the single-shot mode `pass_at_k` is defined to equal
/// `pass_at_1`, both here and in the template breakdown.
pub fn baseline_metrics(trials: &[&ExperimentResult], feedback_mode: &str) -> BaselineMetrics {
    let total = trials.len();
    if total == 0 {
        return BaselineMetrics {
            feedback_mode: feedback_mode.to_string(),
            total_prompts: 0,
            pass_at_1: 0.0,
            pass_at_k: 0.0,
            mean_retries_to_pass: 0.0,
            median_retries_to_pass: 0.0,
            mean_latency_seconds: 0.0,
            p95_latency_seconds: 0.0,
            failure_histogram: BTreeMap::new(),
            template_breakdown: BTreeMap::new(),
        };
    }

    let (pass_at_1, pass_at_k) = pass_rates(trials, feedback_mode);

    // Retry counts only make sense for trials that eventually passed.
    let successful_retries: Vec<f64> = trials
        .iter()
        .filter(|trial| trial.response.success)
        .map(|trial| trial.response.total_attempts as f64)
        .collect();
    let (mean_retries, median_retries) = if successful_retries.is_empty() {
        (0.0, 0.0)
    } else {
        (
            round2(mean(&successful_retries)),
            round2(median(&successful_retries)),
        )
    };

    // Latency spans the whole group, pass and fail alike. p95 is
    // nearest-rank over the sorted list.
    let latencies: Vec<f64> = trials.iter().map(|trial| trial.elapsed_seconds).collect();
    let mut sorted_latencies = latencies.clone();
    sorted_latencies.sort_by(|a, b| a.total_cmp(b));
    let p95_index = ((total as f64 * 0.95) as usize).min(total - 1);

    let mut failure_histogram: BTreeMap<String, u64> = BTreeMap::new();
    for trial in trials {
        if trial.response.success {
            continue;
        }
        let category = match trial.failure_category.as_deref() {
            Some(cat) if !cat.is_empty() => cat,
            _ => "error",
        };
        *failure_histogram.entry(category.to_string()).or_insert(0) += 1;
    }

    let mut template_groups: BTreeMap<&str, Vec<&ExperimentResult>> = BTreeMap::new();
    for &trial in trials {
        template_groups
            .entry(trial.template_id.as_str())
            .or_default()
            .push(trial);
    }
    let mut template_breakdown = BTreeMap::new();
    for (template_id, group) in template_groups {
        let (template_pass_1, template_pass_k) = pass_rates(&group, feedback_mode);
        template_breakdown.insert(
            template_id.to_string(),
            TemplateStats {
                pass_at_1: template_pass_1,
                pass_at_k: template_pass_k,
                total: group.len() as f64,
            },
        );
    }

    BaselineMetrics {
        feedback_mode: feedback_mode.to_string(),
        total_prompts: total as u64,
        pass_at_1,
        pass_at_k,
        mean_retries_to_pass: mean_retries,
        median_retries_to_pass: median_retries,
        mean_latency_seconds: round2(mean(&latencies)),
        p95_latency_seconds: round2(sorted_latencies[p95_index]),
        failure_histogram,
        template_breakdown,
    }
}

/// Summarize a whole run: group trials by feedback mode and compute
/// per-baseline metrics, with the attempt budget inferred from the
/// data (floor of 3) and `total_prompts` the largest group size.
pub fn summarize_run(
    run_id: &str,
    language: &str,
    timestamp: String,
    results: &[ExperimentResult],
) -> ExperimentSummary {
    let mut groups: BTreeMap<&str, Vec<&ExperimentResult>> = BTreeMap::new();
    for result in results {
        groups
            .entry(result.feedback_mode.as_str())
            .or_default()
            .push(result);
    }

    let mut max_retries: u64 = 3;
    let mut total_prompts: u64 = 0;
    let mut baselines = Vec::new();
    for (&mode, group) in &groups {
        for trial in group {
            max_retries = max_retries.max(trial.response.total_attempts);
        }
        let metrics = baseline_metrics(group, mode);
        total_prompts = total_prompts.max(metrics.total_prompts);
        baselines.push(metrics);
    }

    ExperimentSummary {
        run_id: run_id.to_string(),
        timestamp,
        language: language.to_string(),
        max_retries,
        total_prompts,
        baselines,
    }
}

fn pass_rates(trials: &[&ExperimentResult], feedback_mode: &str) -> (f64, f64) {
    let total = trials.len();
    if total == 0 {
        return (0.0, 0.0);
    }
    let first = trials
        .iter()
        .filter(|trial| first_attempt_valid(trial))
        .count();
    let within = trials
        .iter()
        .filter(|trial| trial.response.final_result.valid)
        .count();
    let pass_at_1 = round1(100.0 * first as f64 / total as f64);
    let pass_at_k = if feedback_mode == SINGLE_SHOT_MODE {
        pass_at_1
    } else {
        round1(100.0 * within as f64 / total as f64)
    };
    (pass_at_1, pass_at_k)
}

fn first_attempt_valid(trial: &ExperimentResult) -> bool {
    trial
        .response
        .attempts
        .first()
        .map_or(false, |attempt| attempt.result.valid)
}

// ── Trial filtering ─────────────────────────────────────────────────

/// Outcome predicate for [`TrialFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

/// Composable predicates over a run's raw trial list. Unset fields
/// match everything; set fields must all hold.
#[derive(Debug, Clone, Default)]
pub struct TrialFilter {
    pub template_id: Option<String>,
    pub feedback_mode: Option<String>,
    pub outcome: Option<Outcome>,
    /// Case-insensitive substring, matched against the prompt or any
    /// attempt's generated sentence.
    pub search: Option<String>,
}

impl TrialFilter {
    /// True when the trial satisfies every set predicate.
    pub fn matches(&self, trial: &ExperimentResult) -> bool {
        if let Some(template_id) = &self.template_id {
            if trial.template_id != *template_id {
                return false;
            }
        }
        if let Some(feedback_mode) = &self.feedback_mode {
            if trial.feedback_mode != *feedback_mode {
                return false;
            }
        }
        if let Some(outcome) = self.outcome {
            if trial.response.success != (outcome == Outcome::Pass) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_prompt = trial.prompt.to_lowercase().contains(&needle);
            let in_sentences = trial
                .response
                .attempts
                .iter()
                .any(|attempt| attempt.sentence.to_lowercase().contains(&needle));
            if !in_prompt && !in_sentences {
                return false;
            }
        }
        true
    }

    /// Filtered view of `trials`, preserving relative order. The
    /// underlying list is untouched.
    pub fn apply<'a>(&self, trials: &'a [ExperimentResult]) -> Vec<&'a ExperimentResult> {
        trials.iter().filter(|trial| self.matches(trial)).collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
