//! Command dispatch and rendering

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::Registry;
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::{RenderOptions, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let mut settings = Settings::load(cli.config_file.as_deref())?;
    if let Some(policy) = cli.duplicates {
        settings.duplicate_policy = policy;
    }
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Analyze { file, no_cleanup }) => {
            cmd_analyze(&container, file.as_deref(), !no_cleanup)
        }
        Some(Commands::Tree { file, flag }) => cmd_tree(&container, file.as_deref(), *flag),
        Some(Commands::Unmarked { file }) => cmd_unmarked(&container, file.as_deref()),
        Some(Commands::Count { file }) => cmd_count(&container, file.as_deref()),
        Some(Commands::Remove { file, names }) => cmd_remove(&container, file, names),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Pick the FILE argument, falling back to the `case_file` setting.
fn resolve_case_file(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.case_file.clone())
        .ok_or_else(|| CliError::Usage("no case file given and no case_file configured".into()))
}

fn load(container: &ServiceContainer, file: Option<&Path>) -> CliResult<Registry> {
    let path = resolve_case_file(file, &container.settings)?;
    let registry = container
        .analysis
        .load(&path, container.settings.duplicate_policy)?;
    Ok(registry)
}

fn render_options(container: &ServiceContainer, mark_flagged: bool) -> RenderOptions {
    RenderOptions {
        mark_flagged,
        show_markers: container.settings.report.show_markers,
    }
}

#[instrument(skip(container))]
fn cmd_analyze(container: &ServiceContainer, file: Option<&Path>, cleanup: bool) -> CliResult<()> {
    let mut registry = load(container, file)?;
    let report = container.analysis.analyze(&mut registry, cleanup);
    debug!("report: {:?}", report);

    output::header(&format!("Profiles of interest ({})", report.flagged.len()));
    for name in &report.flagged {
        output::matched(name);
    }
    output::header(&format!("Not of interest ({})", report.unflagged.len()));
    for name in &report.unflagged {
        output::unmatched(name);
    }

    if !cleanup {
        return Ok(());
    }
    output::action("Removed", &format!("{} profiles", report.removed.len()));
    if container.settings.report.tree_view {
        output::info(&registry.to_tree_string(&render_options(container, false)));
    } else {
        output::info(&report.remaining.iter().join("\n"));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, file: Option<&Path>, flag: bool) -> CliResult<()> {
    let mut registry = load(container, file)?;
    if flag {
        registry.flag_profiles_of_interest();
    }
    output::info(&registry.to_tree_string(&render_options(container, flag)));
    output::detail(&format!("{} profiles, depth {}", registry.len(), registry.depth()));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_unmarked(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut registry = load(container, file)?;
    registry.flag_profiles_of_interest();
    for name in registry.collect_unflagged() {
        output::info(&name);
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_count(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let mut registry = load(container, file)?;
    registry.flag_profiles_of_interest();
    output::info(&format!("of interest: {}", registry.count_by_interest(true)));
    output::info(&format!("not of interest: {}", registry.count_by_interest(false)));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_remove(container: &ServiceContainer, file: &Path, names: &[String]) -> CliResult<()> {
    let mut registry = load(container, Some(file))?;
    for name in names {
        if registry.remove(name) {
            output::action("Removed", name);
        } else {
            output::warning(&format!("not registered: {name}"));
        }
    }
    output::info(&registry.to_tree_string(&render_options(container, false)));
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(container.settings.to_toml()?.trim_end()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory on this platform".into(),
                ))
            }
        },
        ConfigCommands::Template => output::info(Settings::template().trim_end()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_explicit_file_when_resolving_then_wins_over_setting() {
        let settings = Settings {
            case_file: Some(PathBuf::from("/cases/default.txt")),
            ..Settings::default()
        };
        let path = resolve_case_file(Some(Path::new("given.txt")), &settings).unwrap();
        assert_eq!(path, PathBuf::from("given.txt"));
    }

    #[test]
    fn given_no_file_and_no_setting_when_resolving_then_usage_error() {
        let err = resolve_case_file(None, &Settings::default()).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
