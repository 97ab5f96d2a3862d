//! Validates the canned record fixtures against the formal record
//! schema at docs/record-schema.json, both as stored on disk and after
//! a decode/re-encode pass through the typed structs.
//!
//! The second pass keeps the schema honest about what the types
//! actually emit: a field the types serialize as `""` must not be
//! declared nullable-only, and vice versa.

use std::path::{Path, PathBuf};

use glosa_interchange::{from_json_str, from_jsonl_str, ExperimentResult, ParseResult, XRayResponse};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Compile the record schema with its root pointed at one definition.
fn validator_for_kind(def_name: &str) -> jsonschema::Validator {
    let schema_path = workspace_root().join("docs/record-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("failed to read schema at {}: {}", schema_path.display(), e));
    let mut schema: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    schema
        .as_object_mut()
        .unwrap()
        .insert("$ref".to_string(), format!("#/$defs/{}", def_name).into());
    jsonschema::validator_for(&schema).unwrap_or_else(|e| panic!("failed to compile schema: {}", e))
}

fn load_fixture(name: &str) -> String {
    let path = workspace_root().join("fixtures").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", name, e))
}

fn assert_valid(validator: &jsonschema::Validator, instance: &serde_json::Value, label: &str) {
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| e.to_string())
        .collect();
    assert!(
        errors.is_empty(),
        "schema validation failed for {}:\n{}",
        label,
        errors.join("\n")
    );
}

#[test]
fn parse_fixtures_conform_to_schema() {
    let validator = validator_for_kind("parseResult");
    for name in ["parse_valid.json", "parse_failed.json"] {
        let src = load_fixture(name);
        let stored: serde_json::Value = serde_json::from_str(&src).unwrap();
        assert_valid(&validator, &stored, name);

        let decoded: ParseResult = from_json_str(&src).unwrap();
        let reencoded = serde_json::to_value(&decoded).unwrap();
        assert_valid(&validator, &reencoded, &format!("{} (re-encoded)", name));
    }
}

#[test]
fn xray_fixture_conforms_to_schema() {
    let validator = validator_for_kind("xrayResponse");
    let src = load_fixture("xray_small.json");
    let stored: serde_json::Value = serde_json::from_str(&src).unwrap();
    assert_valid(&validator, &stored, "xray_small.json");

    let decoded: XRayResponse = from_json_str(&src).unwrap();
    let reencoded = serde_json::to_value(&decoded).unwrap();
    assert_valid(&validator, &reencoded, "xray_small.json (re-encoded)");
}

#[test]
fn run_fixture_lines_conform_to_schema() {
    let validator = validator_for_kind("experimentResult");
    let src = load_fixture("run_small.jsonl");

    let mut tested = 0usize;
    for (i, line) in src.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let stored: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_valid(&validator, &stored, &format!("run_small.jsonl line {}", i + 1));
        tested += 1;
    }
    assert!(tested > 0, "no trial lines found in run_small.jsonl");

    let decoded: Vec<ExperimentResult> = from_jsonl_str(&src).unwrap();
    assert_eq!(decoded.len(), tested);
    for (i, trial) in decoded.iter().enumerate() {
        let reencoded = serde_json::to_value(trial).unwrap();
        assert_valid(
            &validator,
            &reencoded,
            &format!("run_small.jsonl line {} (re-encoded)", i + 1),
        );
    }
}
