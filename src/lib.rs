pub mod cpp_properties;
pub mod discovery;
pub mod error;
pub mod host;
pub mod logging;
pub mod macros;
pub mod project;
pub mod settings;
pub mod target;
pub mod task;
pub mod toolchain;
pub mod workspace;
pub mod xml;

pub use discovery::{MacroCache, discover_macros};
pub use error::{Result, UvprojError};
pub use host::{FileSystem, OsFileSystem, OsProcessRunner, ProcessOutput, ProcessRunner};
pub use project::{
    LoadReport, Project, ProjectBuilder, ProjectContext, ProjectEvent, TargetFailure, VSCODE_DIR,
};
pub use settings::Settings;
pub use target::{FileGroup, Source, SourceKind, Target};
pub use task::{BuildTask, Shell, TaskKind};
pub use toolchain::{ArmCompiler, Toolchain, ToolchainFamily};
pub use workspace::Workspace;
