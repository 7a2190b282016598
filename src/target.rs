//! Targets and the builder that resolves one `<Target>` node into them.
//!
//! A [`Target`] is immutable once built.  Reloading a project builds new
//! ones from scratch.

use std::collections::BTreeSet;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::cpp_properties::{self, Configuration};
use crate::error::Result;
use crate::project::ProjectContext;
use crate::settings::Settings;
use crate::task::{BuildTask, TaskKind};
use crate::toolchain::{Toolchain, ToolchainEnv};
use crate::xml::{XmlValue, as_list};

// ═══════════════════════════════════════════════════════════════════════════════
//  Sources
// ═══════════════════════════════════════════════════════════════════════════════

/// File category, derived from the suffix alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceKind {
    CSource,
    CppSource,
    Header,
    Assembly,
    Library,
    Other,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "c" => SourceKind::CSource,
            "h" | "hpp" | "hxx" | "inc" => SourceKind::Header,
            "cpp" | "c++" | "cxx" | "cc" => SourceKind::CppSource,
            "s" | "a51" | "asm" => SourceKind::Assembly,
            "lib" | "a" => SourceKind::Library,
            _ => SourceKind::Other,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SourceKind::CSource => "CFile_16x",
            SourceKind::Header => "CPPHeaderFile_16x",
            SourceKind::CppSource => "CPP_16x",
            SourceKind::Assembly => "AssemblerSourceFile_16x",
            SourceKind::Library => "Library_16x",
            SourceKind::Other => "Text_16x",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub path: PathBuf,
    pub name: String,
    /// `false` when the project excludes the file from the build.
    pub enabled: bool,
    pub kind: SourceKind,
}

impl Source {
    pub fn new(path: PathBuf, name: String, enabled: bool) -> Self {
        let kind = SourceKind::from_path(&path);
        Self { path, name, enabled, kind }
    }

    pub fn icon(&self) -> &'static str {
        if self.enabled { self.kind.icon() } else { "FileExclude_16x" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGroup {
    pub name: String,
    pub sources: Vec<Source>,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Target
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub name: String,
    pub toolchain: Toolchain,
    /// Project file the target was read from.
    #[serde(skip)]
    pub project_file: PathBuf,
    pub includes: BTreeSet<PathBuf>,
    pub defines: BTreeSet<String>,
    pub groups: Vec<FileGroup>,
}

impl Target {
    /// Resolve `node` into a target and mirror it into the project's
    /// `c_cpp_properties.json`.
    pub fn load(ctx: &ProjectContext, node: &XmlValue) -> Result<Target> {
        let target = build(ctx, node)?;

        let artifact = ctx.cpp_properties_path();
        if let Err(err) = cpp_properties::update(ctx.fs.as_ref(), &artifact, &target.configuration()) {
            warn!(target = %target.name, %err, "c_cpp_properties.json not updated");
        }

        Ok(target)
    }

    pub fn configuration(&self) -> Configuration {
        Configuration::new(
            self.name.clone(),
            self.includes.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
            self.defines.iter().cloned().collect(),
        )
    }

    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.groups.iter().flat_map(|g| g.sources.iter())
    }

    pub fn task(&self, kind: TaskKind, settings: &Settings) -> BuildTask {
        let uv4 = settings.uv4_path(&self.toolchain);
        self.toolchain.task(kind, uv4, &self.project_file, &self.name)
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Pure part of [`Target::load`]: everything except persisting.
pub fn build(ctx: &ProjectContext, node: &XmlValue) -> Result<Target> {
    let name = node.require_text(&["TargetName"])?.to_string();
    let toolchain = Toolchain::for_target(ctx.family, node);
    debug!(target = %name, %toolchain, "building target");

    let mut includes: BTreeSet<PathBuf> = split_includes(toolchain.include_string(node)?)
        .map(|token| to_absolute_path(&ctx.dir, token))
        .collect();
    let mut defines: BTreeSet<String> = split_defines(toolchain.define_string(node)?)
        .map(str::to_string)
        .collect();

    let env = ToolchainEnv {
        uv4_path: ctx.settings.uv4_path(&toolchain),
        fs: ctx.fs.as_ref(),
        runner: ctx.runner.as_ref(),
        macro_cache: ctx.macro_cache.as_ref(),
    };

    if let Some(system) = toolchain.system_includes(&env) {
        includes.extend(system.iter().map(|dir| normalize_lexically(dir)));
    }

    let mut groups = Vec::new();
    for group in toolchain.groups(node) {
        let Some(files) = group.get("Files") else {
            continue;
        };

        let mut sources = Vec::new();
        for entry in as_list(Some(files)) {
            for file in as_list(entry.get("File")) {
                let source = source_from_node(&ctx.dir, file)?;
                if let Some(dir) = source.path.parent() {
                    includes.insert(dir.to_path_buf());
                }
                sources.push(source);
            }
        }

        groups.push(FileGroup {
            name: group.text_at(&["GroupName"]).unwrap_or_default().to_string(),
            sources,
        });
    }

    defines.extend(toolchain.system_macros(&env));

    Ok(Target {
        name,
        toolchain,
        project_file: ctx.file.clone(),
        includes,
        defines,
        groups,
    })
}

fn source_from_node(base: &Path, file: &XmlValue) -> Result<Source> {
    let path = to_absolute_path(base, file.require_text(&["FilePath"])?);
    // `FileName` goes stale when a file is moved outside uVision
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let enabled = file.text_at(&["FileOption", "CommonProperty", "IncludeInBuild"]) != Some("0");
    Ok(Source::new(path, name, enabled))
}

fn split_includes(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|t| !t.is_empty())
}

fn split_defines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Path resolution
// ═══════════════════════════════════════════════════════════════════════════════

/// `C:` style prefix, recognised on every host.
fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Resolve a path written in a project file.
///
/// Drive-letter and rooted paths are kept; everything else is joined to
/// `base`.  Both separator styles are accepted and the result is normalised
/// lexically.
pub fn to_absolute_path(base: &Path, raw: &str) -> PathBuf {
    let unified = raw.replace(['/', '\\'], MAIN_SEPARATOR_STR);
    let path = PathBuf::from(&unified);
    if has_drive_prefix(raw) || path.is_absolute() {
        normalize_lexically(&path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Fold `.` and `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
