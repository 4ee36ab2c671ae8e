use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use pn_app::{AppError, AppResult, AssignOptions, AssignOutcome, query, snapshot_service};
use pn_branch::Theme;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pn-cli")]
#[command(about = "Branch ids for pipe-network snapshots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign branch ids to one or more snapshot files
    Assign {
        /// Snapshot files (.json, .yaml, .yml)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output file, or directory when several files are given
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite the input files
        #[arg(long)]
        in_place: bool,
        /// Pretty-print the snapshot written to stdout
        #[arg(long)]
        pretty: bool,
        /// Set generated_at to the current time
        #[arg(long)]
        stamp: bool,
    },
    /// Show how branch ids were decided
    Explain {
        /// Snapshot file
        file: PathBuf,
        /// Only decisions taken at this node
        #[arg(long)]
        node: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Report structural issues and stale or missing branch ids
    Check {
        /// Snapshot file
        file: PathBuf,
    },
    /// Apply an authority response to a snapshot
    Apply {
        /// Snapshot file
        snapshot: PathBuf,
        /// Response JSON file
        response: PathBuf,
        /// Output file (defaults to overwriting the snapshot)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the display colour of every branch
    Colors {
        /// Snapshot file
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = ThemeArg::Dark)]
        theme: ThemeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assign {
            files,
            output,
            in_place,
            pretty,
            stamp,
        } => cmd_assign(
            &files,
            AssignOptions {
                output,
                in_place,
                pretty,
                stamp,
            },
        ),
        Commands::Explain { file, node, json } => cmd_explain(&file, node.as_deref(), json),
        Commands::Check { file } => cmd_check(&file),
        Commands::Apply {
            snapshot,
            response,
            output,
        } => cmd_apply(&snapshot, &response, output.as_deref()),
        Commands::Colors { file, theme } => cmd_colors(&file, theme.into()),
    }
}

fn cmd_assign(files: &[PathBuf], options: AssignOptions) -> AppResult<()> {
    options.validate(files.len())?;

    // A single file with nowhere to go is printed.
    if let [file] = files {
        if options.target_for(file).is_none() {
            let (snapshot, outcome) = snapshot_service::assign_file(file, &options)?;
            print_json(&snapshot, options.pretty)?;
            print_outcome(&outcome);
            return Ok(());
        }
    }

    let results = snapshot_service::assign_batch(files, &options)?;
    let mut failed = 0;
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(outcome) => print_outcome(&outcome),
            Err(err) => {
                failed += 1;
                eprintln!("✗ {}: {}", file.display(), err);
            }
        }
    }
    if failed > 0 {
        return Err(AppError::InvalidInput(format!(
            "{} of {} files failed",
            failed,
            files.len()
        )));
    }
    Ok(())
}

fn print_outcome(outcome: &AssignOutcome) {
    let name = outcome
        .source
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    eprintln!(
        "✓ {}: {} roots, {} child branches, {} relabeled",
        name,
        outcome.report.roots.len(),
        outcome.report.parents.len(),
        outcome.relabeled
    );
    if let Some(target) = &outcome.written_to {
        eprintln!("  written to {}", target.display());
    }
    if !outcome.dropped_edges.is_empty() {
        eprintln!("  edges without usable endpoints: {}", outcome.dropped_edges.join(", "));
    }
    if !outcome.orphaned_names.is_empty() {
        eprintln!("  names for ids no longer in use: {}", outcome.orphaned_names.join(", "));
    }
}

fn cmd_explain(file: &Path, node: Option<&str>, json: bool) -> AppResult<()> {
    let snapshot = snapshot_service::load_snapshot(file)?;
    let explanation = query::explain(&snapshot, node)?;
    if json {
        return print_json(&explanation, true);
    }

    if let Some(focus) = &explanation.node {
        println!("Node {} is on {}", focus.id, focus.branch);
        println!("  lineage: {}", focus.lineage.join(" <- "));
    } else {
        for root in &explanation.roots {
            println!("Root {} seeds {}", root.node, root.branch);
        }
    }
    for decision in &explanation.decisions {
        println!(
            "At {} ({}): primary {} by {}",
            decision.node, decision.branch, decision.primary, decision.reason
        );
        for rank in &decision.rankings {
            println!(
                "    {:<16} {:>8.1} mm  depth {:<4} angle {:>5.1}",
                rank.edge_id, rank.diameter_mm, rank.depth, rank.angle_delta_deg
            );
        }
        for split in &decision.splits {
            println!("  {} -> {}", split.edge, split.branch);
        }
    }
    Ok(())
}

fn cmd_check(file: &Path) -> AppResult<()> {
    let snapshot = snapshot_service::load_snapshot(file)?;
    let report = query::check(&snapshot);

    println!("Fingerprint: {}", report.fingerprint);
    for issue in &report.issues {
        println!("  ! {}", issue);
    }
    if !report.unlabeled_nodes.is_empty() {
        println!("  unlabeled nodes: {}", report.unlabeled_nodes.join(", "));
    }
    if !report.unlabeled_edges.is_empty() {
        println!("  unlabeled edges: {}", report.unlabeled_edges.join(", "));
    }
    if !report.stale.is_empty() {
        println!("  stale branch ids: {}", report.stale.join(", "));
    }
    if !report.orphaned_names.is_empty() {
        println!("  orphaned names: {}", report.orphaned_names.join(", "));
    }

    if report.is_consistent() {
        println!("✓ Branch ids are complete and current");
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} needs a branch recompute",
            file.display()
        )))
    }
}

fn cmd_apply(snapshot: &Path, response: &Path, output: Option<&Path>) -> AppResult<()> {
    let summary = pn_app::apply_response_file(snapshot, response, output)?;
    println!(
        "✓ Applied: {} nodes, {} edges updated, {} kept local",
        summary.nodes_updated, summary.edges_updated, summary.kept_local
    );
    if !summary.unmatched.is_empty() {
        println!("  unknown ids in response: {}", summary.unmatched.join(", "));
    }
    if !summary.conflicts.is_empty() {
        println!("  {} conflicts reported", summary.conflicts.len());
    }
    Ok(())
}

fn cmd_colors(file: &Path, theme: Theme) -> AppResult<()> {
    let snapshot = snapshot_service::load_snapshot(file)?;
    for color in query::branch_colors(&snapshot, theme) {
        println!("{:<24} {:<28} {:<28} {}", color.id, color.stroke, color.fill, color.name);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assign_flags_reach_options() {
        let cli = Cli::try_parse_from(["pn-cli", "assign", "a.json", "-o", "out.json", "--pretty"]).unwrap();
        let Commands::Assign {
            files,
            output,
            in_place,
            pretty,
            stamp,
        } = cli.command
        else {
            panic!("expected assign");
        };
        let options = AssignOptions {
            output,
            in_place,
            pretty,
            stamp,
        };
        assert_eq!(files, vec![PathBuf::from("a.json")]);
        assert_eq!(options.output.as_deref(), Some(Path::new("out.json")));
        assert!(options.pretty && !options.in_place && !options.stamp);
        assert!(options.validate(files.len()).is_ok());
    }
}
