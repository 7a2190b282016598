use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use uvproj_rs::logging::init_logging;
use uvproj_rs::{Project, ProjectEvent, Settings, Shell, TaskKind, Target, VSCODE_DIR};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file with Keil installation paths
    #[arg(long, global = true, value_name = "TOML")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a project and print its model as JSON
    Show {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },
    /// Print the build orchestrator invocation for a target
    Command {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,

        /// Target name
        #[arg(short, long)]
        target: String,

        /// build, rebuild or flash
        #[arg(value_name = "TASK")]
        task: TaskKind,

        /// Shell the command line is rendered for
        #[arg(long, default_value = "powershell.exe")]
        shell: String,
    },
    /// Load a project and reload it whenever the file changes
    Watch {
        #[arg(value_name = "PROJECT")]
        project: PathBuf,
    },
}

#[derive(Serialize)]
struct ProjectView<'a> {
    id: &'a str,
    label: &'a str,
    file: &'a Path,
    targets: &'a [Target],
}

fn open_loaded(path: &Path, settings: Settings) -> Result<Project, Box<dyn std::error::Error>> {
    let mut project = Project::open(path, settings)?;
    let report = project.load()?;
    for failure in &report.failures {
        eprintln!(
            "target #{} ({}) failed: {}",
            failure.index,
            failure.name.as_deref().unwrap_or("?"),
            failure.error
        );
    }
    Ok(project)
}

/// Status line for one watch tick.  A failed reload is reported and the
/// watch goes on, so fixing the file recovers without a restart.
fn poll_outcome(label: &str, targets: usize, polled: uvproj_rs::Result<bool>) -> Option<String> {
    match polled {
        Ok(true) => Some(format!("Reloaded {label}: {targets} targets")),
        Ok(false) => None,
        Err(err) => Some(format!("Reload of {label} failed, still watching: {err}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let project_path = match &cli.command {
        Commands::Show { project } | Commands::Command { project, .. } | Commands::Watch { project } => project,
    };
    let log_dir = project_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(VSCODE_DIR);
    let _guard = init_logging(&log_dir, "uvproj");

    match cli.command {
        Commands::Show { project } => {
            let project = open_loaded(&project, settings)?;
            let view = ProjectView {
                id: project.id(),
                label: project.label(),
                file: project.file(),
                targets: project.targets(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Command { project, target, task, shell } => {
            let project = open_loaded(&project, settings)?;
            let Some(found) = project.target(&target) else {
                return Err(format!("no target named '{target}' in {}", project.label()).into());
            };

            let task = found.task(task, project.settings());
            for arg in &task.args {
                println!("{arg}");
            }
            println!();
            println!(
                "{}",
                task.command_line(
                    &project.settings().builder_exe,
                    &project.context().build_log_path(),
                    Shell::detect(&shell),
                )
            );
        }
        Commands::Watch { project } => {
            let mut project = open_loaded(&project, settings)?;
            project.subscribe(|event| {
                let ProjectEvent::DataChanged { target, .. } = event;
                if let Some(target) = target {
                    println!("  loaded {target}");
                }
            });
            project.watch()?;
            println!("Watching {} ({} targets)...", project.file().display(), project.targets().len());

            loop {
                std::thread::sleep(Duration::from_millis(500));
                let polled = project.poll_changes();
                if let Some(line) = poll_outcome(project.label(), project.targets().len(), polled) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
