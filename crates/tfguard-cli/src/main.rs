//! CLI entry point for tfguard.
//!
//! This module is thin: it handles argument parsing, I/O, logging setup, and exit codes.
//! All business logic lives in the `tfguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::time::Duration;
use tfguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, format_rules, list_rules,
    render_text, run_check, run_explain, serialize_report, verdict_exit_code,
};
use tfguard_domain::CancelFlag;
use tfguard_settings::Overrides;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "tfguard",
    version,
    about = "Security rule checks for Terraform block graphs"
)]
struct Cli {
    /// Path to tfguard config TOML. A missing file means defaults.
    #[arg(long, default_value = "tfguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|audit).
    #[arg(long)]
    profile: Option<String>,

    /// Worker threads (0 = all cores, 1 = sequential).
    #[arg(long)]
    jobs: Option<u32>,

    /// Override the maximum number of reference hops.
    #[arg(long)]
    max_resolve_depth: Option<u32>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a block graph and write the JSON report.
    Check {
        /// Block graph JSON from the parser (`-` reads stdin).
        #[arg(long)]
        graph: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/tfguard/report.json")]
        report_out: Utf8PathBuf,

        /// Stop evaluating after this many seconds; partial results are kept and flagged.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Explain a rule code or check id with remediation guidance.
    Explain {
        /// The rule code (e.g. "AZU024") or check id (e.g. "azure.network.no_public_rdp").
        identifier: String,
    },

    /// List the compiled-in rules.
    Rules {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref graph,
            ref report_out,
            timeout_secs,
        } => cmd_check(&cli, graph, report_out, timeout_secs),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
        Commands::Rules { format } => cmd_rules(format),
    }
}

/// Logs go to stderr so stdout stays clean for reports. `RUST_LOG` overrides the level.
fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_check(
    cli: &Cli,
    graph: &Utf8Path,
    report_out: &Utf8Path,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        // Missing config file is allowed (defaults apply).
        let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
        let graph_json = read_graph(graph)?;

        let overrides = Overrides {
            profile: cli.profile.clone(),
            jobs: cli.jobs,
            max_resolve_depth: cli.max_resolve_depth,
        };

        let cancel = CancelFlag::new();
        if let Some(secs) = timeout_secs {
            let timer = cancel.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_secs(secs));
                tracing::warn!(timeout_secs = secs, "scan timed out; cancelling");
                timer.cancel();
            });
        }

        let output = run_check(CheckInput {
            graph_json: &graph_json,
            config_text: &cfg_text,
            overrides,
            cancel: Some(cancel),
        })?;

        write_report_file(report_out, &serialize_report(&output.report)?)
            .context("write report json")?;
        print!("{}", render_text(&output.report));

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("tfguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn read_graph(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read block graph from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read block graph: {path}"))
}

fn write_report_file(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_codes,
            available_check_ids,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_rule_codes, available_check_ids)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_rules(format: OutputFormat) -> anyhow::Result<()> {
    let rules = list_rules();
    match format {
        OutputFormat::Text => print!("{}", format_rules(&rules)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rules).context("serialize rules")?;
            println!("{json}");
        }
    }
    Ok(())
}
