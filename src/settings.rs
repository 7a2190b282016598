//! User settings: where the Keil installations live.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! c51_uv4_path = 'C:\Keil_C51\UV4\UV4.exe'
//! arm_uv4_path = 'C:\Keil_v5\UV4\UV4.exe'
//! builder_exe  = 'C:\tools\Uv4Caller.exe'
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::toolchain::Toolchain;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `UV4.exe` of the C51 installation.
    pub c51_uv4_path: PathBuf,
    /// `UV4.exe` of the MDK-ARM installation.
    pub arm_uv4_path: PathBuf,
    /// Build orchestrator that receives the build/rebuild/flash arguments.
    pub builder_exe: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            c51_uv4_path: PathBuf::from(r"C:\Keil_v5\UV4\UV4.exe"),
            arm_uv4_path: PathBuf::from(r"C:\Keil_v5\UV4\UV4.exe"),
            builder_exe: PathBuf::from("Uv4Caller.exe"),
        }
    }
}

impl Settings {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The UV4 executable that belongs to `toolchain`.
    pub fn uv4_path(&self, toolchain: &Toolchain) -> &Path {
        match toolchain {
            Toolchain::C51 => &self.c51_uv4_path,
            Toolchain::Arm(_) => &self.arm_uv4_path,
        }
    }
}
