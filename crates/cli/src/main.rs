mod render;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use glosa_analyze::{paragraph_report, sentence_report, summarize_run, Outcome, TrialFilter};
use glosa_interchange::{from_json_str, from_jsonl_str, ExperimentResult, ParseResult, XRayResponse};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Record kind accepted by the validate subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordKind {
    ParseResult,
    VerifyResponse,
    XrayResponse,
    ExperimentResult,
    ExperimentSummary,
    ExperimentDetail,
}

impl RecordKind {
    /// Name of the matching definition in the embedded record schema.
    fn def_name(self) -> &'static str {
        match self {
            RecordKind::ParseResult => "parseResult",
            RecordKind::VerifyResponse => "verifyLoopResponse",
            RecordKind::XrayResponse => "xrayResponse",
            RecordKind::ExperimentResult => "experimentResult",
            RecordKind::ExperimentSummary => "experimentSummary",
            RecordKind::ExperimentDetail => "experimentDetail",
        }
    }
}

/// Trial outcome filter for the browse subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutcomeArg {
    Pass,
    Fail,
}

/// Glosa grammar analysis toolchain.
#[derive(Parser)]
#[command(name = "glosa", version, about = "Glosa grammar analysis toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate a parse result: tokens, tree, performance, failure
    Inspect {
        /// Path to a parse result JSON file
        file: PathBuf,
    },

    /// Report grammar coverage for a paragraph analysis
    Xray {
        /// Path to a paragraph x-ray JSON file
        file: PathBuf,
    },

    /// Aggregate an experiment run into per-baseline metrics
    Metrics {
        /// Path to the experiment results JSONL file
        file: PathBuf,
        /// Run identifier (defaults to the file stem)
        #[arg(long)]
        run_id: Option<String>,
        /// Language the run targeted
        #[arg(long, default_value = "spanish")]
        language: String,
    },

    /// List the trials of an experiment run, with filters
    Browse {
        /// Path to the experiment results JSONL file
        file: PathBuf,
        /// Keep only trials of this sentence template
        #[arg(long)]
        template: Option<String>,
        /// Keep only trials of this feedback mode
        #[arg(long)]
        mode: Option<String>,
        /// Keep only passed or failed trials
        #[arg(long, value_enum)]
        outcome: Option<OutcomeArg>,
        /// Keep only trials whose prompt or generated sentences contain this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Validate a record file against the formal JSON Schema
    Validate {
        /// Path to the record JSON file (.jsonl validates per line)
        file: PathBuf,
        /// Record kind to validate against
        #[arg(long, value_enum)]
        kind: RecordKind,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file } => {
            cmd_inspect(&file, cli.output, cli.quiet);
        }
        Commands::Xray { file } => {
            cmd_xray(&file, cli.output, cli.quiet);
        }
        Commands::Metrics {
            file,
            run_id,
            language,
        } => {
            cmd_metrics(&file, run_id.as_deref(), &language, cli.output, cli.quiet);
        }
        Commands::Browse {
            file,
            template,
            mode,
            outcome,
            search,
        } => {
            let filter = TrialFilter {
                template_id: template,
                feedback_mode: mode,
                outcome: outcome.map(|arg| match arg {
                    OutcomeArg::Pass => Outcome::Pass,
                    OutcomeArg::Fail => Outcome::Fail,
                }),
                search,
            };
            cmd_browse(&file, &filter, cli.output, cli.quiet);
        }
        Commands::Validate { file, kind } => {
            cmd_validate(&file, kind, cli.output, cli.quiet);
        }
    }
}

fn cmd_inspect(file: &Path, output: OutputFormat, quiet: bool) {
    let text = read_file(file, output, quiet);
    let result: ParseResult = match from_json_str(&text) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error decoding '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let report = sentence_report(&result);
    if !quiet {
        match output {
            OutputFormat::Text => {
                print!("{}", render::render_sentence(&result, &report));
            }
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        }
    }
}

fn cmd_xray(file: &Path, output: OutputFormat, quiet: bool) {
    let text = read_file(file, output, quiet);
    let response: XRayResponse = match from_json_str(&text) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error decoding '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let report = paragraph_report(&response);
    if !quiet {
        match output {
            OutputFormat::Text => {
                print!("{}", render::render_paragraph(&response, &report));
            }
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        }
    }
}

fn cmd_metrics(
    file: &Path,
    run_id: Option<&str>,
    language: &str,
    output: OutputFormat,
    quiet: bool,
) {
    let text = read_file(file, output, quiet);
    let results: Vec<ExperimentResult> = match from_jsonl_str(&text) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error decoding '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let run_id = match run_id {
        Some(id) => id.to_string(),
        None => file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("run")),
    };
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let summary = summarize_run(&run_id, language, timestamp, &results);
    if !quiet {
        match output {
            OutputFormat::Text => {
                print!("{}", render::render_summary(&summary));
            }
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&summary)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        }
    }
}

fn cmd_browse(file: &Path, filter: &TrialFilter, output: OutputFormat, quiet: bool) {
    let text = read_file(file, output, quiet);
    let trials: Vec<ExperimentResult> = match from_jsonl_str(&text) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error decoding '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let matching = filter.apply(&trials);
    if !quiet {
        match output {
            OutputFormat::Text => {
                if matching.is_empty() {
                    println!("no matching trials");
                } else {
                    for trial in &matching {
                        println!("{}", render::render_trial_line(trial));
                    }
                    println!("{} of {} trial(s)", matching.len(), trials.len());
                }
            }
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&matching)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        }
    }
}

static RECORD_SCHEMA_STR: &str = include_str!("../../../docs/record-schema.json");

fn cmd_validate(file: &Path, kind: RecordKind, output: OutputFormat, quiet: bool) {
    // Parse the embedded record schema
    let mut schema: serde_json::Value = match serde_json::from_str(RECORD_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!(
                "internal error: failed to parse embedded record schema: {}",
                e
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // Point the schema root at the requested record definition
    if let Some(root) = schema.as_object_mut() {
        root.insert(
            "$ref".to_string(),
            serde_json::Value::String(format!("#/$defs/{}", kind.def_name())),
        );
    }

    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc_str = read_file(file, output, quiet);

    // A .jsonl extension selects line-by-line validation
    let jsonl = file.extension().map(|ext| ext == "jsonl").unwrap_or(false);
    let mut errors: Vec<String> = Vec::new();
    if jsonl {
        for (idx, line) in doc_str.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(line) {
                Ok(doc) => {
                    errors.extend(
                        validator
                            .iter_errors(&doc)
                            .map(|e| format!("line {}: {}", idx + 1, e)),
                    );
                }
                Err(e) => errors.push(format!("line {}: invalid JSON: {}", idx + 1, e)),
            }
        }
    } else {
        let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
            Ok(v) => v,
            Err(e) => {
                let msg = format!("error parsing JSON in '{}': {}", file.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        };
        errors.extend(validator.iter_errors(&doc).map(|e| format!("{}", e)));
    }

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{{\"valid\": true}}"),
            }
        }
    } else {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid {}", kind.def_name());
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "kind": kind.def_name(),
                    "errors": errors
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        }
        process::exit(1);
    }
}

fn read_file(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
