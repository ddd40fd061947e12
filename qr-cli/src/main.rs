//! qr - command-line driver for the qualitative reasoning engine.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use qr_core::{export_graph, load_model, load_state, reconstruct_path, solve, solve_path, PathOutcome};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Directory problem documents are resolved relative to, absent an
/// explicit path override.
const DATA_DIR: &str = "problems";

#[derive(Parser)]
#[command(name = "qr")]
#[command(about = "Qualitative reasoning engine: enumerate states, build the transition graph, optionally trace a path")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) tracing output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem: enumerate admissible states and build the transition graph.
    Solve {
        /// Problem base name, resolved as `problems/<name>.json` unless overridden.
        #[arg(default_value = "sink_problem")]
        problem: String,

        /// Overlay the shortest A* path from the start state to the target state.
        #[arg(long)]
        use_path: bool,

        /// Start-state document path (defaults to `problems/<name>_start.json`).
        #[arg(long)]
        start: Option<String>,

        /// Target-state document path (defaults to `problems/<name>_target.json`).
        #[arg(long)]
        target: Option<String>,

        /// Output format.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write output to this file instead of stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Validate a problem's model document without solving it.
    Validate {
        /// Problem base name, resolved as `problems/<name>.json` unless overridden.
        #[arg(default_value = "sink_problem")]
        problem: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("qr_core=debug,qr_cli=debug").init();
    }

    match cli.command {
        Commands::Solve {
            problem,
            use_path,
            start,
            target,
            format,
            output,
        } => solve_command(problem, use_path, start, target, format, output),
        Commands::Validate { problem } => validate_command(problem),
    }
}

fn model_path(problem: &str) -> PathBuf {
    Path::new(DATA_DIR).join(format!("{problem}.json"))
}

fn start_path(problem: &str, override_path: Option<String>) -> PathBuf {
    override_path
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DATA_DIR).join(format!("{problem}_start.json")))
}

fn target_path(problem: &str, override_path: Option<String>) -> PathBuf {
    override_path
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(DATA_DIR).join(format!("{problem}_target.json")))
}

fn solve_command(
    problem: String,
    use_path: bool,
    start: Option<String>,
    target: Option<String>,
    format: String,
    output: Option<String>,
) -> Result<()> {
    let start_time = Instant::now();

    let model_file = model_path(&problem);
    println!("{} Loading model from {}...", "→".blue(), model_file.display());
    let model_json = fs::read_to_string(&model_file)
        .with_context(|| format!("failed to read model document {}", model_file.display()))?;
    let model = load_model(&model_json)?;

    println!("{} Enumerating admissible states and building the transition graph...", "→".blue());
    let solution = solve(&model);

    let path_outcome = if use_path {
        let start_file = start_path(&problem, start);
        let target_file = target_path(&problem, target);

        let start_json = fs::read_to_string(&start_file)
            .with_context(|| format!("failed to read start document {}", start_file.display()))?;
        let target_json = fs::read_to_string(&target_file)
            .with_context(|| format!("failed to read target document {}", target_file.display()))?;

        let start_state = load_state(&model, &start_json)?;
        let target_state = load_state(&model, &target_json)?;

        let outcome = solve_path(&solution.graph, start_state.id(), target_state.id())?;
        match &outcome {
            PathOutcome::Found(predecessor) => {
                let path = reconstruct_path(predecessor, start_state.id(), target_state.id());
                println!("{} Path found ({} states on the path)", "✓".green(), path.len());
            }
            PathOutcome::NoPath => {
                println!("{} Target is unreachable from start; overlay disabled", "!".yellow());
            }
        }
        Some(outcome)
    } else {
        None
    };

    let exported = export_graph(&model, &solution.graph, path_outcome.as_ref());

    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&exported)?,
        "text" => render_text_summary(&exported),
        other => anyhow::bail!("unknown output format '{other}', expected 'text' or 'json'"),
    };

    match output {
        Some(path) => {
            fs::write(&path, &rendered).with_context(|| format!("failed to write output to {path}"))?;
            println!("{} Wrote output to {path}", "✓".green());
        }
        None => println!("{rendered}"),
    }

    println!(
        "\n{} Total time: {:.3}ms",
        "✓".green(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}

fn render_text_summary(graph: &qr_core::ExportGraph) -> String {
    let highlighted = graph.edges.iter().filter(|e| e.highlight).count();
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Graph Summary".blue().bold()));
    out.push_str(&format!("  {} Nodes: {}\n", "▸".blue(), graph.nodes.len()));
    out.push_str(&format!("  {} Edges: {}\n", "▸".blue(), graph.edges.len()));
    if highlighted > 0 {
        out.push_str(&format!("  {} Highlighted (on path): {}\n", "▸".blue(), highlighted));
    }
    out
}

fn validate_command(problem: String) -> Result<()> {
    let model_file = model_path(&problem);
    println!("{} Validating {}...", "→".blue(), model_file.display());

    let model_json = fs::read_to_string(&model_file)
        .with_context(|| format!("failed to read model document {}", model_file.display()))?;

    match load_model(&model_json) {
        Ok(model) => {
            println!("{} Model is valid!", "✓".green());
            println!("  Entities: {}", model.entities.len());
            println!("  Quantities: {}", model.len());
            println!("  Relations: {}", model.relations.len());
            println!("  Value constraints: {}", model.value_constraints().count());
        }
        Err(e) => {
            println!("{} Model is invalid:", "✗".red());
            println!("  {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
