//! Predefined-macro discovery for toolchains that ship a real compiler.
//!
//! The compiler is asked to preprocess empty input and dump its macro
//! table (`-E -dM -`).  Every line goes through [`crate::macros`].  The call
//! is best effort: any failure yields [`FALLBACK_MACROS`] instead of an
//! error, because a missing compiler must never stop a target from loading.
//!
//! Results are memoised per compiler path in a [`MacroCache`].  The process
//! wide instance is [`MacroCache::global`]; tests inject their own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::error::{Result, UvprojError};
use crate::host::{FileSystem, ProcessRunner};
use crate::macros;

/// Baseline compiler identity reported when discovery fails.
pub const FALLBACK_MACROS: [&str; 3] = ["__GNUC__=4", "__GNUC_MINOR__=2", "__GNUC_PATCHLEVEL__=1"];

/// Flags that make armclang dump its predefined macros for empty stdin.
pub const DISCOVERY_ARGS: [&str; 4] = ["--target=arm-arm-none-eabi", "-E", "-dM", "-"];

pub fn fallback_macros() -> Vec<String> {
    FALLBACK_MACROS.iter().map(|m| m.to_string()).collect()
}

/// Run `compiler` and collect its predefined macros as expressions.
///
/// Never fails: on a missing executable, a spawn error or a non-zero exit
/// the [`FALLBACK_MACROS`] are returned.
pub fn discover_macros(
    fs: &dyn FileSystem,
    runner: &dyn ProcessRunner,
    compiler: &Path,
) -> Vec<String> {
    match try_discover(fs, runner, compiler) {
        Ok(list) => {
            debug!(compiler = %compiler.display(), count = list.len(), "discovered compiler macros");
            list
        }
        Err(err) => {
            warn!(%err, "using fallback compiler macros");
            fallback_macros()
        }
    }
}

fn try_discover(
    fs: &dyn FileSystem,
    runner: &dyn ProcessRunner,
    compiler: &Path,
) -> Result<Vec<String>> {
    let failed = |reason: String| UvprojError::MacroDiscoveryFailed {
        compiler: compiler.to_path_buf(),
        reason,
    };

    if !fs.is_file(compiler) {
        return Err(failed("executable not found".to_string()));
    }

    let output = runner
        .run(compiler, &DISCOVERY_ARGS)
        .map_err(|e| failed(e.to_string()))?;

    if !output.success {
        return Err(failed(match output.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }));
    }

    Ok(output
        .stdout
        .lines()
        .filter_map(macros::to_expression)
        .collect())
}

// ═══════════════════════════════════════════════════════════════════════════════
//  MacroCache
// ═══════════════════════════════════════════════════════════════════════════════

static GLOBAL_CACHE: Lazy<Arc<MacroCache>> = Lazy::new(|| Arc::new(MacroCache::new()));

/// Memo of discovered macro tables keyed by compiler path.
///
/// Discovery for a given path runs at most once per cache; the lock is held
/// for the duration of the run so concurrent callers wait instead of
/// spawning the compiler twice.
#[derive(Debug, Default)]
pub struct MacroCache {
    entries: Mutex<HashMap<PathBuf, Arc<[String]>>>,
}

impl MacroCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache shared by every project that does not inject
    /// its own.
    pub fn global() -> Arc<MacroCache> {
        Arc::clone(&GLOBAL_CACHE)
    }

    pub fn get_or_discover(
        &self,
        compiler: &Path,
        fs: &dyn FileSystem,
        runner: &dyn ProcessRunner,
    ) -> Arc<[String]> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = entries.get(compiler) {
            return Arc::clone(found);
        }
        let discovered: Arc<[String]> = discover_macros(fs, runner, compiler).into();
        entries.insert(compiler.to_path_buf(), Arc::clone(&discovered));
        discovered
    }

    pub fn get(&self, compiler: &Path) -> Option<Arc<[String]>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(compiler)
            .cloned()
    }

    /// Forget every memoised table.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════
