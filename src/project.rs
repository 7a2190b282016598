//! One uVision project file and the targets it defines.
//!
//! ```no_run
//! use uvproj_rs::{Project, Settings};
//!
//! let mut project = Project::open("Blinky.uvprojx", Settings::default())?;
//! project.subscribe(|event| println!("{event:?}"));
//! let report = project.load()?;
//! for failure in &report.failures {
//!     eprintln!("target #{} failed: {}", failure.index, failure.error);
//! }
//! for target in project.targets() {
//!     println!("{} ({} includes)", target.name, target.includes.len());
//! }
//! # Ok::<(), uvproj_rs::UvprojError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use tracing::{debug, error, info, warn};
use xxhash_rust::xxh3::xxh3_128;

use crate::cpp_properties;
use crate::discovery::MacroCache;
use crate::error::{Result, UvprojError};
use crate::host::{FileSystem, OsFileSystem, OsProcessRunner, ProcessRunner};
use crate::settings::Settings;
use crate::target::{Target, normalize_lexically};
use crate::toolchain::ToolchainFamily;
use crate::xml::{self, as_list};

/// Name of the per-project directory holding derived files.
pub const VSCODE_DIR: &str = ".vscode";

/// Log file handed to the build orchestrator.
pub const BUILD_LOG: &str = "uv4.log";

/// Stable identifier of a project: 128-bit xxh3 of the absolute path, hex.
pub fn project_id(path: &Path) -> String {
    format!("{:032x}", xxh3_128(path.to_string_lossy().as_bytes()))
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Context
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything a target needs from its project: identity, locations and the
/// host capabilities to resolve system includes and macros.
#[derive(Clone)]
pub struct ProjectContext {
    pub id: String,
    /// Absolute, lexically normalised project file path.
    pub file: PathBuf,
    pub dir: PathBuf,
    pub vscode_dir: PathBuf,
    pub family: ToolchainFamily,
    pub settings: Settings,
    pub fs: Arc<dyn FileSystem>,
    pub runner: Arc<dyn ProcessRunner>,
    pub macro_cache: Arc<MacroCache>,
}

impl ProjectContext {
    pub fn new(
        file: &Path,
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn ProcessRunner>,
        macro_cache: Arc<MacroCache>,
    ) -> Result<Self> {
        let file = normalize_lexically(&std::path::absolute(file)?);
        let family = ToolchainFamily::from_project_path(&file)?;
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();

        Ok(Self {
            id: project_id(&file),
            vscode_dir: dir.join(VSCODE_DIR),
            file,
            dir,
            family,
            settings,
            fs,
            runner,
            macro_cache,
        })
    }

    pub fn cpp_properties_path(&self) -> PathBuf {
        self.vscode_dir.join(cpp_properties::FILE_NAME)
    }

    pub fn build_log_path(&self) -> PathBuf {
        self.vscode_dir.join(BUILD_LOG)
    }
}

impl std::fmt::Debug for ProjectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectContext")
            .field("id", &self.id)
            .field("file", &self.file)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Events and load results
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectEvent {
    /// `target` is the target that finished loading, or `None` for a
    /// project-wide change (after a reload).
    DataChanged { project_id: String, target: Option<String> },
}

/// A `<Target>` that could not be loaded.
#[derive(Debug)]
pub struct TargetFailure {
    /// Position of the node in the document.
    pub index: usize,
    /// `TargetName`, when it could be read.
    pub name: Option<String>,
    pub error: UvprojError,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failures: Vec<TargetFailure>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

type Listener = Box<dyn FnMut(&ProjectEvent) + Send>;

struct ProjectWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Configures the host a [`Project`] runs against.
///
/// Defaults to [`Settings::default`], the OS filesystem, real process
/// execution and [`MacroCache::global`].
///
/// # Example
/// ```no_run
/// use uvproj_rs::{ProjectBuilder, Settings};
///
/// let settings = Settings::load("uvproj.toml").unwrap();
/// let mut project = ProjectBuilder::new()
///     .settings(settings)
///     .open("Blinky.uvprojx")
///     .unwrap();
/// project.load().unwrap();
/// ```
#[derive(Clone)]
pub struct ProjectBuilder {
    settings: Settings,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn ProcessRunner>,
    macro_cache: Arc<MacroCache>,
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            fs: Arc::new(OsFileSystem),
            runner: Arc::new(OsProcessRunner),
            macro_cache: MacroCache::global(),
        }
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn process_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use a private cache instead of the process-wide one.
    pub fn macro_cache(mut self, cache: Arc<MacroCache>) -> Self {
        self.macro_cache = cache;
        self
    }

    pub(crate) fn file_system_ref(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Create the project for `path`.  Fails only when the path cannot be
    /// made absolute or its extension names no known toolchain.
    pub fn open(self, path: impl AsRef<Path>) -> Result<Project> {
        let ctx = ProjectContext::new(path.as_ref(), self.settings, self.fs, self.runner, self.macro_cache)?;
        Ok(Project::from_context(ctx))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Project
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Project {
    ctx: ProjectContext,
    label: String,
    targets: Vec<Target>,
    listeners: Vec<Listener>,
    watcher: Option<ProjectWatcher>,
}

impl Project {
    /// Open `path` against the real filesystem and the process-wide macro
    /// cache.  Nothing is read until [`load`](Self::load).
    pub fn open(path: impl AsRef<Path>, settings: Settings) -> Result<Self> {
        ProjectBuilder::new().settings(settings).open(path)
    }

    pub fn builder() -> ProjectBuilder {
        ProjectBuilder::new()
    }

    fn from_context(ctx: ProjectContext) -> Self {
        let label = ctx
            .file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!(project = %label, path = %ctx.file.display(), id = %ctx.id, "project opened");
        Self {
            ctx,
            label,
            targets: Vec::new(),
            listeners: Vec::new(),
            watcher: None,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.ctx.id
    }

    /// File name without extension.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn file(&self) -> &Path {
        &self.ctx.file
    }

    pub fn dir(&self) -> &Path {
        &self.ctx.dir
    }

    pub fn context(&self) -> &ProjectContext {
        &self.ctx
    }

    pub fn settings(&self) -> &Settings {
        &self.ctx.settings
    }

    /// Targets in document order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    // ─── Notifications ──────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ProjectEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, target: Option<String>) {
        let event = ProjectEvent::DataChanged {
            project_id: self.ctx.id.clone(),
            target,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────

    /// Parse the project file and build every target, one after another.
    ///
    /// A document that cannot be read or parsed is an error.  A target that
    /// fails is logged and recorded in the report; its siblings still load.
    pub fn load(&mut self) -> Result<LoadReport> {
        self.targets.clear();

        let text = self.ctx.fs.read(&self.ctx.file).inspect_err(|err| {
            error!(project = %self.label, %err, "cannot read project file");
        })?;
        let doc = xml::parse_document(&text).inspect_err(|err| {
            error!(project = %self.label, %err, "cannot parse project file");
        })?;

        let nodes = doc.at(&["Project", "Targets", "Target"]);
        if nodes.is_none() {
            warn!(
                project = %self.label,
                err = %UvprojError::missing("Project.Targets.Target"),
                "project file defines no targets"
            );
        }

        let mut report = LoadReport::default();
        for (index, node) in as_list(nodes).into_iter().enumerate() {
            match Target::load(&self.ctx, node) {
                Ok(target) => {
                    debug!(project = %self.label, target = %target.name, "target loaded");
                    let name = target.name.clone();
                    self.targets.push(target);
                    report.loaded += 1;
                    self.emit(Some(name));
                }
                Err(err) => {
                    let name = node.text_at(&["TargetName"]).map(str::to_string);
                    error!(
                        project = %self.label,
                        target = name.as_deref().unwrap_or("?"),
                        index,
                        %err,
                        "target failed to load"
                    );
                    report.failures.push(TargetFailure { index, name, error: err });
                }
            }
        }

        info!(
            project = %self.label,
            targets = report.loaded,
            failed = report.failures.len(),
            "project loaded"
        );
        Ok(report)
    }

    /// Drop every target and load again from scratch.  Subscribers are
    /// notified even when the load fails, since the targets are gone.
    pub fn reload(&mut self) -> Result<LoadReport> {
        info!(project = %self.label, "reloading project");
        self.targets.clear();
        let result = self.load();
        self.emit(None);
        result
    }

    /// Stop watching and drop every target.
    pub fn close(&mut self) {
        self.watcher = None;
        self.targets.clear();
        info!("[Project Close]: {}", self.label);
    }

    // ─── Watching ───────────────────────────────────────────────────────

    /// Watch the project file for changes.  Events are queued until
    /// [`poll_changes`](Self::poll_changes).
    pub fn watch(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(&self.ctx.dir, RecursiveMode::NonRecursive)?;

        debug!(project = %self.label, dir = %self.ctx.dir.display(), "watching project directory");
        self.watcher = Some(ProjectWatcher { _watcher: watcher, rx });
        Ok(())
    }

    /// Drain queued file events; reload once if any touched the project
    /// file.  Returns whether a reload happened.
    pub fn poll_changes(&mut self) -> Result<bool> {
        let Some(watcher) = &self.watcher else {
            return Ok(false);
        };

        let file_name = self.ctx.file.file_name();
        let mut touched = false;
        loop {
            match watcher.rx.try_recv() {
                Ok(Ok(event)) => {
                    touched |= event.paths.iter().any(|p| p.file_name() == file_name);
                }
                Ok(Err(err)) => debug!(project = %self.label, %err, "watch error"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if touched {
            self.reload()?;
        }
        Ok(touched)
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("label", &self.label)
            .field("ctx", &self.ctx)
            .field("targets", &self.targets.len())
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
