//! Developer tasks (schema generation, conformance checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or(manifest_dir)
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(tfguard_types::ScanReport)
}

fn generate_config_schema() -> schemars::Schema {
    tfguard_settings::config_schema()
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "tfguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "tfguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fail if schemas/ differs from what the types generate (for CI).
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = serialize_schema(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            _ => stale.push(spec.filename),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    eprintln!("Missing or out-of-date schemas:");
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo run -p xtask -- emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every registered rule must have a complete explanation, and every explained
/// rule must be registered.
fn explain_coverage() -> anyhow::Result<()> {
    let mut errors = Vec::new();

    for check in tfguard_domain::checks::registry() {
        match tfguard_types::lookup_explanation(check.rule_code) {
            Some(exp) => {
                if exp.title.is_empty() || exp.description.is_empty() || exp.remediation.is_empty()
                {
                    errors.push(format!("{} has an incomplete explanation", check.rule_code));
                }
            }
            None => errors.push(format!("{} has no explanation", check.rule_code)),
        }
    }

    for code in tfguard_types::explain::all_rule_codes() {
        if tfguard_domain::checks::lookup(code).is_none() {
            errors.push(format!("{code} is explained but not registered"));
        }
    }

    if errors.is_empty() {
        println!(
            "✓ {} rules have explanations",
            tfguard_domain::checks::registry().len()
        );
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!("Explain coverage failed with {} errors", errors.len())
}

/// Scan every fixture graph in-process and validate the report against the schema.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_report_schema())?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile report schema: {e}"))?;

    let mut checked = 0;
    let mut errors = Vec::new();

    let mut entries: Vec<_> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let graph_path = entry.path().join("graph.json");
        if !graph_path.exists() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let graph_json = fs::read_to_string(&graph_path)
            .with_context(|| format!("Failed to read {}", graph_path.display()))?;

        let output = tfguard_app::run_check(tfguard_app::CheckInput {
            graph_json: &graph_json,
            config_text: "",
            overrides: Default::default(),
            cancel: None,
        })
        .with_context(|| format!("scan fixture {name}"))?;

        let report = serde_json::to_value(&output.report)?;
        for err in validator.iter_errors(&report) {
            errors.push(format!("{name}: {err}"));
        }
        checked += 1;
    }

    if errors.is_empty() {
        println!("✓ {checked} fixture reports conform to tfguard.report.v1");
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!("Conformance failed with {} errors", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  explain-coverage  Validate every registered rule has an explanation");
    eprintln!("  conform           Validate fixture reports against the report schema");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "explain-coverage" => explain_coverage(),
        "conform" => conform(),
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
