//! Build/rebuild/flash invocations of the external build orchestrator.
//!
//! Only the command line is produced here; spawning it is the caller's job.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Build,
    Rebuild,
    Flash,
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Build => "build",
            TaskKind::Rebuild => "rebuild",
            TaskKind::Flash => "flash",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "build" => Ok(TaskKind::Build),
            "rebuild" => Ok(TaskKind::Rebuild),
            "flash" => Ok(TaskKind::Flash),
            other => Err(format!("unknown task `{other}` (expected build, rebuild or flash)")),
        }
    }
}

/// Shell the rendered command line is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Cmd,
    PowerShell,
}

impl Shell {
    /// Classify a shell executable path; anything that is not `cmd.exe` is
    /// treated as PowerShell.
    pub fn detect(shell_path: &str) -> Self {
        if shell_path.to_ascii_lowercase().ends_with("cmd.exe") {
            Shell::Cmd
        } else {
            Shell::PowerShell
        }
    }

    fn quote(&self) -> char {
        match self {
            Shell::Cmd => '"',
            Shell::PowerShell => '\'',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildTask {
    pub kind: TaskKind,
    /// Orchestrator arguments, see [`crate::Toolchain::build_command`].
    pub args: Vec<String>,
    #[serde(rename = "problemMatchers")]
    pub problem_matchers: Vec<String>,
}

impl BuildTask {
    /// Render the full line: `<builder> -o <log_file> <args...>`.
    pub fn command_line(&self, builder_exe: &Path, log_file: &Path, shell: Shell) -> String {
        let q = shell.quote();
        let quote = |token: &str| {
            if token.contains(' ') {
                format!("{q}{token}{q}")
            } else {
                token.to_string()
            }
        };

        let mut tokens = vec![
            quote(builder_exe.display().to_string().as_str()),
            "-o".to_string(),
            quote(log_file.display().to_string().as_str()),
        ];
        tokens.extend(self.args.iter().map(|a| quote(a.as_str())));
        let line = tokens.join(" ");

        match shell {
            Shell::PowerShell => format!("& {line}"),
            Shell::Cmd => format!("\"{line}\""),
        }
    }
}
