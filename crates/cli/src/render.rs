//! Text rendering for CLI output.
//!
//! Each renderer builds the complete text block for one command so the
//! output can be asserted on directly; main only decides between text
//! and JSON.

use glosa_analyze::{gap_kind, AnnotatedNode, GapKind, ParagraphReport, SentenceReport};
use glosa_interchange::tags::{
    failure_label, mode_label, tag_label, template_label, SINGLE_SHOT_MODE,
};
use glosa_interchange::{
    BaselineMetrics, ExperimentResult, ExperimentSummary, ParseResult, XRayResponse,
};

pub(crate) fn render_sentence(result: &ParseResult, report: &SentenceReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Sentence: {}\n", result.sentence));
    if result.valid {
        if result.parses > 1 {
            out.push_str(&format!(
                "Valid: yes ({} parses, ambiguous)\n",
                result.parses
            ));
        } else {
            out.push_str("Valid: yes (1 parse)\n");
        }
    } else {
        out.push_str("Valid: no\n");
    }

    if !result.tokens.is_empty() {
        out.push_str("\nTokens:\n");
        for token in &result.tokens {
            out.push_str(&format!(
                "  {:<14} {:<18} {}\n",
                token.word,
                tag_label(&token.tag),
                token.translation
            ));
        }
    }

    if let Some(tree) = &report.annotated_tree {
        out.push_str("\nParse tree:\n");
        render_tree(tree, 1, &mut out);
    }

    if !result.rules_applied.is_empty() {
        out.push_str("\nRules applied:\n");
        for rule in &result.rules_applied {
            out.push_str(&format!("  [{}] {}\n", rule.number, rule.rule));
        }
    }

    if let Some(narrative) = &report.narrative {
        out.push_str("\nParser performance:\n");
        for line in &narrative.lines {
            out.push_str(&format!("  {}\n", line));
        }
    }

    if let Some(explanation) = &report.failure_explanation {
        out.push_str("\nFailure:\n");
        out.push_str(&format!("  {}\n", explanation));
    } else if let Some(failure) = &result.failure {
        out.push_str("\nFailure:\n");
        out.push_str(&format!("  {}\n", failure.message));
    }

    if let Some(error) = &result.error {
        out.push_str(&format!("\nParser error: {}\n", error));
    }

    out
}

fn render_tree(node: &AnnotatedNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if node.is_leaf {
        match (&node.matched_word, &node.matched_translation) {
            (Some(word), Some(translation)) => {
                out.push_str(&format!(
                    "{}{}: {} ({})\n",
                    indent, node.symbol, word, translation
                ));
            }
            (Some(word), None) => {
                out.push_str(&format!("{}{}: {}\n", indent, node.symbol, word));
            }
            _ => out.push_str(&format!("{}{}\n", indent, node.symbol)),
        }
    } else {
        out.push_str(&format!("{}{}\n", indent, node.symbol));
        for child in &node.children {
            render_tree(child, depth + 1, out);
        }
    }
}

pub(crate) fn render_paragraph(response: &XRayResponse, report: &ParagraphReport) -> String {
    let mut out = String::new();
    let stats = &report.scope.stats;

    out.push_str(&format!("Prompt: {}\n", response.prompt));
    out.push_str("Generated text:\n");
    out.push_str(&format!("  {}\n", response.generated_text));

    out.push_str(&format!(
        "\nCoverage: {:.1}% of sentences in grammar scope ({} of {})\n",
        stats.coverage_percentage, stats.parsed_sentences, stats.total_sentences
    ));
    out.push_str(&format!(
        "Word coverage: {:.1}% ({} of {} words known)\n",
        stats.word_coverage_percentage, stats.known_words, stats.total_words
    ));

    out.push_str("\nSentences:\n");
    for analysis in &response.sentences {
        match gap_kind(analysis) {
            None => {
                let note = format!(
                    "{} rule(s) applied, {} parse(s){}",
                    analysis.result.rules_applied.len(),
                    analysis.result.parses,
                    if analysis.result.parses > 1 {
                        ", ambiguous"
                    } else {
                        ""
                    }
                );
                if analysis.translation.is_empty() {
                    out.push_str(&format!("  [ok]   {} ({})\n", analysis.original, note));
                } else {
                    out.push_str(&format!(
                        "  [ok]   {} -> {} ({})\n",
                        analysis.original, analysis.translation, note
                    ));
                }
            }
            Some(GapKind::Vocabulary) => {
                out.push_str(&format!(
                    "  [gap]  {} (vocabulary gap)\n",
                    analysis.original
                ));
            }
            Some(GapKind::Structural) => {
                let shape = report
                    .scope
                    .structural_gaps
                    .iter()
                    .find(|gap| gap.original == analysis.original)
                    .map(|gap| gap.tag_sequence.as_str())
                    .unwrap_or("");
                out.push_str(&format!(
                    "  [gap]  {} (structural gap: {})\n",
                    analysis.original, shape
                ));
            }
        }
    }

    if !report.scope.unknown_words.is_empty() {
        out.push_str("\nUnknown words:\n");
        for (word, sentences) in &report.scope.unknown_words {
            out.push_str(&format!("  {}: {}\n", word, sentences.join("; ")));
        }
    }

    if !report.issues.is_empty() {
        out.push_str("\nPossible issues:\n");
        for issue in &report.issues {
            out.push_str(&format!("  {}: {}\n", issue.sentence, issue.issue));
        }
    }

    if !stats.rules_used.is_empty() {
        out.push_str("\nRules exercised:\n");
        for rule in &stats.rules_used {
            out.push_str(&format!("  [{}] {}\n", rule.number, rule.rule));
        }
    }

    if !stats.unique_pos_tags.is_empty() {
        let labels: Vec<&str> = stats
            .unique_pos_tags
            .iter()
            .map(|tag| tag_label(tag))
            .collect();
        out.push_str(&format!("\nPOS tags seen: {}\n", labels.join(", ")));
    }

    out
}

pub(crate) fn render_summary(summary: &ExperimentSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Run {} ({})\n", summary.run_id, summary.language));
    out.push_str(&format!(
        "Attempt budget: {}, prompts per baseline: {}\n",
        summary.max_retries, summary.total_prompts
    ));
    for baseline in &summary.baselines {
        out.push('\n');
        render_baseline(baseline, &mut out);
    }
    out
}

fn render_baseline(metrics: &BaselineMetrics, out: &mut String) {
    out.push_str(&format!(
        "[{}] {} prompts\n",
        mode_label(&metrics.feedback_mode),
        metrics.total_prompts
    ));
    out.push_str(&format!("  pass@1: {:.1}%\n", metrics.pass_at_1));
    // Single-shot gets no separate pass@k figure: with one attempt
    // allowed the two rates coincide.
    if metrics.feedback_mode != SINGLE_SHOT_MODE {
        out.push_str(&format!("  pass@k: {:.1}%\n", metrics.pass_at_k));
    }
    out.push_str(&format!(
        "  mean retries to pass: {}\n",
        metrics.mean_retries_to_pass
    ));
    out.push_str(&format!(
        "  median retries to pass: {}\n",
        metrics.median_retries_to_pass
    ));
    out.push_str(&format!(
        "  mean latency: {}s\n",
        metrics.mean_latency_seconds
    ));
    out.push_str(&format!(
        "  p95 latency: {}s\n",
        metrics.p95_latency_seconds
    ));
    if !metrics.failure_histogram.is_empty() {
        out.push_str("  failures:\n");
        for (category, count) in &metrics.failure_histogram {
            out.push_str(&format!("    {}: {}\n", failure_label(category), count));
        }
    }
    if !metrics.template_breakdown.is_empty() {
        out.push_str("  templates:\n");
        for (template_id, stats) in &metrics.template_breakdown {
            out.push_str(&format!(
                "    {}: pass@1 {:.1}%, pass@k {:.1}% ({} trial(s))\n",
                template_label(template_id),
                stats.pass_at_1,
                stats.pass_at_k,
                stats.total as u64
            ));
        }
    }
}

pub(crate) fn render_trial_line(trial: &ExperimentResult) -> String {
    let status = if trial.response.success { "PASS" } else { "FAIL" };
    let mut line = format!(
        "[{}] {}/{} attempts={} {:.1}s  {} -> {}",
        status,
        template_label(&trial.template_id),
        mode_label(&trial.feedback_mode),
        trial.response.total_attempts,
        trial.elapsed_seconds,
        trial.prompt,
        trial.response.final_result.sentence
    );
    if !trial.response.success {
        if let Some(category) = trial.failure_category.as_deref() {
            line.push_str(&format!("  [{}]", failure_label(category)));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use glosa_analyze::{paragraph_report, sentence_report};
    use serde_json::json;

    fn parse_result(value: serde_json::Value) -> ParseResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_render_sentence_valid_sections() {
        let result = parse_result(json!({
            "valid": true,
            "sentence": "el gato come",
            "tokens": [
                {"word": "el", "tag": "DET", "translation": "the"},
                {"word": "gato", "tag": "N", "translation": "cat"},
                {"word": "come", "tag": "V", "translation": "eats"}
            ],
            "parseTree": {
                "symbol": "S",
                "children": [
                    {"symbol": "NP", "children": [
                        {"symbol": "DET", "children": [], "word": true},
                        {"symbol": "N", "children": [], "word": true}
                    ]},
                    {"symbol": "VP", "children": [
                        {"symbol": "V", "children": [], "word": true}
                    ]}
                ]
            },
            "rulesApplied": [{"number": 1, "rule": "S -> NP VP"}],
            "parses": 1
        }));
        let report = sentence_report(&result);
        let text = render_sentence(&result, &report);

        assert!(text.contains("Sentence: el gato come"));
        assert!(text.contains("Valid: yes (1 parse)"));
        assert!(text.contains("Tokens:"));
        assert!(text.contains("Determiner"));
        assert!(text.contains("Parse tree:"));
        assert!(text.contains("DET: el (the)"));
        assert!(text.contains("[1] S -> NP VP"));
    }

    #[test]
    fn test_render_sentence_failure_falls_back_to_message() {
        let result = parse_result(json!({
            "valid": false,
            "sentence": "x y",
            "failure": {
                "index": 0,
                "token": "x",
                "expectedCategories": [],
                "message": "no rule matched"
            }
        }));
        let report = sentence_report(&result);
        let text = render_sentence(&result, &report);

        assert!(text.contains("Valid: no"));
        assert!(text.contains("Failure:\n  no rule matched"));
    }

    #[test]
    fn test_render_paragraph_markers_and_sections() {
        let response: XRayResponse = serde_json::from_value(json!({
            "prompt": "p",
            "language": "spanish",
            "generated_text": "El gato come. Come el gato. Hay quinoa.",
            "sentences": [
                {
                    "sentence": "el gato come",
                    "original": "El gato come.",
                    "result": {
                        "valid": true,
                        "sentence": "el gato come",
                        "rulesApplied": [{"number": 1, "rule": "S -> NP VP"}],
                        "parses": 1
                    },
                    "in_grammar_scope": true,
                    "translation": "The cat eats."
                },
                {
                    "sentence": "come el gato",
                    "original": "Come el gato.",
                    "result": {
                        "valid": false,
                        "sentence": "come el gato",
                        "tokens": [
                            {"word": "come", "tag": "V", "translation": "eats"},
                            {"word": "el", "tag": "DET", "translation": "the"},
                            {"word": "gato", "tag": "N", "translation": "cat"}
                        ]
                    },
                    "in_grammar_scope": false
                },
                {
                    "sentence": "hay quinoa",
                    "original": "Hay quinoa.",
                    "result": {
                        "valid": false,
                        "sentence": "hay quinoa",
                        "tokens": [
                            {"word": "hay", "tag": "V_EX", "translation": "there is"},
                            {"word": "quinoa", "tag": "UNKNOWN", "translation": ""}
                        ]
                    },
                    "in_grammar_scope": false
                }
            ],
            "stats": {
                "total_sentences": 3,
                "parsed_sentences": 1,
                "coverage_percentage": 33.3,
                "total_words": 5,
                "known_words": 4,
                "word_coverage_percentage": 80.0,
                "rules_used": [{"number": 1, "rule": "S -> NP VP"}],
                "unique_pos_tags": ["DET", "N", "UNKNOWN", "V", "V_EX"]
            }
        }))
        .unwrap();
        let report = paragraph_report(&response);
        let text = render_paragraph(&response, &report);

        assert!(text.contains("Coverage: 33.3% of sentences in grammar scope (1 of 3)"));
        assert!(text.contains("[ok]   El gato come. -> The cat eats."));
        assert!(text.contains("[gap]  Come el gato. (structural gap: V DET N)"));
        assert!(text.contains("[gap]  Hay quinoa. (vocabulary gap)"));
        assert!(text.contains("Unknown words:\n  quinoa: Hay quinoa."));
        assert!(text.contains("POS tags seen: Determiner, Noun, Unknown, Verb, Existential Verb"));
    }

    #[test]
    fn test_render_summary_single_shot_hides_pass_at_k_line() {
        let summary: ExperimentSummary = serde_json::from_value(json!({
            "run_id": "r1",
            "timestamp": "2026-02-07T15:30:00Z",
            "language": "spanish",
            "max_retries": 3,
            "total_prompts": 2,
            "baselines": [{
                "feedback_mode": "none",
                "total_prompts": 2,
                "pass_at_1": 50.0,
                "pass_at_k": 50.0,
                "mean_retries_to_pass": 1.0,
                "median_retries_to_pass": 1.0,
                "mean_latency_seconds": 1.2,
                "p95_latency_seconds": 1.4,
                "failure_histogram": {"error": 1},
                "template_breakdown": {
                    "copular": {"pass_at_1": 50.0, "pass_at_k": 50.0, "total": 2.0}
                }
            }]
        }))
        .unwrap();
        let text = render_summary(&summary);

        assert!(text.contains("[Single-shot (No Feedback)] 2 prompts"));
        assert!(text.contains("pass@1: 50.0%"));
        assert!(!text.contains("  pass@k:"));
        assert!(text.contains("Parser Error: 1"));
        assert!(text.contains("Copular: pass@1 50.0%, pass@k 50.0% (2 trial(s))"));
    }

    #[test]
    fn test_render_trial_line_flags_failure_category() {
        let trial: ExperimentResult = serde_json::from_value(json!({
            "prompt": "Describe al gato",
            "template_id": "copular",
            "feedback_mode": "structural",
            "response": {
                "prompt": "Describe al gato",
                "language": "spanish",
                "attempts": [],
                "final_result": {"valid": false, "sentence": "gato negro"},
                "success": false,
                "total_attempts": 2
            },
            "elapsed_seconds": 3.5,
            "failure_category": "missing_det"
        }))
        .unwrap();
        let line = render_trial_line(&trial);

        assert!(line.starts_with("[FAIL] Copular/Structural Feedback attempts=2 3.5s"));
        assert!(line.contains("Describe al gato -> gato negro"));
        assert!(line.ends_with("[Missing Determiner]"));
    }
}
