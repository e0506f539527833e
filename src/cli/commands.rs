//! Command dispatch and output

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::TreeReport;
use crate::cli::args::{Cli, Commands, ConfigCommands, VisitKind};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{BuildOutcome, NodeId, TreeArena, TreeRender};
use crate::infrastructure::ServiceContainer;

/// Execute the parsed command against the wired services.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run {
            script,
            visit,
            no_tree,
        }) => cmd_run(container, script, *visit, *no_tree),
        Some(Commands::Config { command }) => cmd_config(cli, container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_run(
    container: &ServiceContainer,
    script: &Path,
    visit: VisitKind,
    no_tree: bool,
) -> CliResult<()> {
    let output = container.build.run_file(script)?;
    let builder = &output.builder;
    let tree = builder.tree();
    debug!("{} outcome(s), {} node(s)", output.outcomes.len(), tree.len());

    for outcome in &output.outcomes {
        let (label, msg) = describe(tree, outcome);
        output::action(label, &msg);
    }

    if !no_tree {
        output::header(&format!("{} [{}]", builder.name(), builder.mode()));
        output::info(&tree.to_tree_string(builder.root()));
    }

    if visit != VisitKind::None {
        print_report(&TreeReport::collect(tree, builder.root()), visit);
    }
    Ok(())
}

fn describe(tree: &TreeArena<String>, outcome: &BuildOutcome) -> (&'static str, String) {
    let name = |id: NodeId| {
        tree.get(id)
            .map(|n| n.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    match outcome {
        BuildOutcome::Split { target, added } => (
            "Split",
            format!(
                "{} -> {}",
                name(*target),
                added.iter().map(|id| name(*id)).join(", ")
            ),
        ),
        BuildOutcome::Stopped { target, leaf } => {
            ("Stopped", format!("{} -> {}", name(*target), name(*leaf)))
        }
        BuildOutcome::Pruned {
            target,
            removed: Some(child),
            freed,
        } => (
            "Pruned",
            format!("{} -x {} ({} node(s) freed)", name(*target), child, freed),
        ),
        BuildOutcome::Pruned {
            target,
            removed: None,
            ..
        } => ("Pruned", format!("{}: no children", name(*target))),
    }
}

fn print_report(report: &TreeReport, visit: VisitKind) {
    output::header("Visitors");
    for entry in &report.entries {
        let mut columns = vec![format!("{} ({})", entry.name, entry.kind)];
        if visit.depth() {
            columns.push(format!("depth={}", entry.mocked_depth));
        }
        if visit.leaves() {
            if let Some(count) = entry.leaves_so_far {
                columns.push(format!("leaves={count}"));
            }
        }
        output::detail(&columns.join("  "));
    }
    if visit.leaves() {
        output::action("Leaves", &report.leaf_count);
    }
    output::action("Height", &report.height);
}

fn cmd_config(cli: &Cli, container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no home directory, global config disabled"),
            }
            if let Some(local) = &cli.config {
                output::action("Local", &local.display());
            }
        }
    }
    Ok(())
}
