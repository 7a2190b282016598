//! Registry of open projects and the active target.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::project::{Project, ProjectBuilder, project_id};
use crate::settings::Settings;
use crate::target::{Target, normalize_lexically};

static PROJECT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.uvprojx?$").expect("project file regex must compile"));

/// Does `path` look like a uVision project file?
pub fn is_project_file(path: &Path) -> bool {
    path.file_name()
        .map(|n| PROJECT_FILE.is_match(&n.to_string_lossy()))
        .unwrap_or(false)
}

/// `(project id, target name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTarget {
    pub project_id: String,
    pub target: String,
}

pub struct Workspace {
    builder: ProjectBuilder,
    projects: IndexMap<String, Project>,
    active: Option<ActiveTarget>,
}

impl Workspace {
    pub fn new(settings: Settings) -> Self {
        Self::with_builder(ProjectBuilder::new().settings(settings))
    }

    /// Every project is opened through a clone of `builder`.
    pub fn with_builder(builder: ProjectBuilder) -> Self {
        Self {
            builder,
            projects: IndexMap::new(),
            active: None,
        }
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.projects.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Open and load `path`.  Returns `Ok(None)` when it is already open.
    pub fn open_project(&mut self, path: &Path) -> Result<Option<&Project>> {
        let absolute = normalize_lexically(&std::path::absolute(path)?);
        let id = project_id(&absolute);
        if self.projects.contains_key(&id) {
            info!(path = %absolute.display(), "project already open");
            return Ok(None);
        }

        let mut project = self.builder.clone().open(&absolute)?;
        project.load()?;

        if self.active.is_none() {
            if let Some(first) = project.targets().first() {
                self.active = Some(ActiveTarget {
                    project_id: id.clone(),
                    target: first.name.clone(),
                });
            }
        }

        let project: &Project = self.projects.entry(id).or_insert(project);
        Ok(Some(project))
    }

    /// Open every project file directly inside `dir`.  Failures are logged
    /// and skipped.  Returns how many projects were opened.
    pub fn load_workspace(&mut self, dir: &Path) -> Result<usize> {
        let mut opened = 0;
        for path in self.builder.file_system_ref().list_dir(dir)? {
            if !self.builder.file_system_ref().is_file(&path) || !is_project_file(&path) {
                continue;
            }
            match self.open_project(&path) {
                Ok(Some(_)) => opened += 1,
                Ok(None) => {}
                Err(err) => {
                    error!(path = %path.display(), %err, "failed to open project");
                }
            }
        }
        if opened == 0 {
            warn!(dir = %dir.display(), "no uVision project found");
        }
        Ok(opened)
    }

    pub fn close_project(&mut self, id: &str) -> bool {
        let Some(mut project) = self.projects.shift_remove(id) else {
            return false;
        };
        project.close();
        if self.active.as_ref().is_some_and(|a| a.project_id == id) {
            self.active = None;
        }
        true
    }

    // ─── Active target ──────────────────────────────────────────────────

    pub fn target(&self, project_id: &str, target: &str) -> Option<&Target> {
        self.projects.get(project_id)?.target(target)
    }

    /// Returns `false` when no such target is loaded.
    pub fn set_active_target(&mut self, project_id: &str, target: &str) -> bool {
        if self.target(project_id, target).is_none() {
            return false;
        }
        self.active = Some(ActiveTarget {
            project_id: project_id.to_string(),
            target: target.to_string(),
        });
        true
    }

    pub fn active_target(&self) -> Option<&Target> {
        let active = self.active.as_ref()?;
        self.target(&active.project_id, &active.target)
    }

    pub fn active(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    // ─── Watching ───────────────────────────────────────────────────────

    pub fn watch_all(&mut self) -> Result<()> {
        for project in self.projects.values_mut() {
            project.watch()?;
        }
        Ok(())
    }

    /// Poll every project's watcher.  Returns the ids that reloaded.
    pub fn poll_changes(&mut self) -> Vec<String> {
        let mut reloaded = Vec::new();
        for (id, project) in &mut self.projects {
            match project.poll_changes() {
                Ok(true) => reloaded.push(id.clone()),
                Ok(false) => {}
                Err(err) => error!(project = %project.label(), %err, "reload failed"),
            }
        }
        reloaded
    }
}
