//! Toolchain strategies.
//!
//! The two Keil product lines keep the same information in different places
//! of a `<Target>` node:
//!
//! | family  | file        | compiler options subtree                    |
//! |---------|-------------|---------------------------------------------|
//! | C51     | `.uvproj`   | `TargetOption.Target51.C51.VariousControls`  |
//! | MDK-ARM | `.uvprojx`  | `TargetOption.TargetArmAds.Cads.VariousControls` |
//!
//! [`ToolchainFamily`] is picked from the project file extension, then
//! narrowed to a [`Toolchain`] per target (MDK-ARM targets choose between
//! ARM Compiler 5 and 6 with the `uAC6` flag).  The choice is made once when
//! the target is built and never revisited.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::discovery::MacroCache;
use crate::error::{Result, UvprojError};
use crate::host::{FileSystem, ProcessRunner};
use crate::task::{BuildTask, TaskKind};
use crate::xml::{XmlValue, as_list};

// ═══════════════════════════════════════════════════════════════════════════════
//  Built-in macro tables
// ═══════════════════════════════════════════════════════════════════════════════

// Stand-ins for vendor keywords and intrinsics so that a generic C parser
// can read Keil sources.

const C51_MACROS: &[&str] = &[
    "__C51__",
    "__VSCODE_C51__",
    "reentrant=",
    "compact=",
    "small=",
    "large=",
    "data=",
    "idata=",
    "pdata=",
    "bdata=",
    "xdata=",
    "code=",
    "bit=char",
    "sbit=char",
    "sfr=char",
    "sfr16=int",
    "sfr32=int",
    "interrupt=",
    "using=",
    "_at_=",
    "_priority_=",
    "_task_=",
];

const ARMCC_MACROS: &[&str] = &[
    "__CC_ARM",
    "__arm__",
    "__align(x)=",
    "__ALIGNOF__(x)=",
    "__alignof__(x)=",
    "__asm(x)=",
    "__forceinline=",
    "__restrict=",
    "__global_reg(n)=",
    "__inline=",
    "__int64=long long",
    "__INTADDR(expr)=",
    "__irq=",
    "__packed=",
    "__pure=",
    "__smc(n)=",
    "__svc(n)=",
    "__svc_indirect(n)=",
    "__svc_indirect_r7(n)=",
    "__value_in_regs=",
    "__weak=",
    "__writeonly=",
    "__declspec(x)=",
    "__attribute__(x)=",
    "__nonnull__(x)=",
    "__register=",
    "__enable_fiq()=",
    "__disable_fiq()=",
    "__nop()=",
    "__wfi()=",
    "__wfe()=",
    "__sev()=",
    "__isb(x)=",
    "__dsb(x)=",
    "__dmb(x)=",
    "__schedule_barrier()=",
    "__rev(x)=0U",
    "__ror(x,y)=0U",
    "__breakpoint(x)=",
    "__clz(x)=0U",
    "__ldrex(x)=0U",
    "__strex(x,y)=0U",
    "__clrex()=",
    "__ssat(x,y)=0U",
    "__usat(x,y)=0U",
    "__ldrt(x)=0U",
    "__strt(x,y)=",
];

/// Supplements the table armclang reports about itself.
const ARMCLANG_MACROS: &[&str] = &[
    "__alignof__(x)=",
    "__unaligned=",
    "__forceinline=",
    "__restrict=",
    "__volatile__=",
    "__inline=",
    "__inline__=",
    "__asm(x)=",
    "__asm__(x)=",
    "__declspec(x)=",
    "__attribute__(x)=",
    "__nonnull__(x)=",
    "__irq=",
    "__swi=",
    "__weak=",
    "__register=",
    "__pure=",
    "__value_in_regs=",
    "__builtin_arm_nop()=",
    "__builtin_arm_wfi()=",
    "__builtin_arm_wfe()=",
    "__builtin_arm_sev()=",
    "__builtin_arm_sevl()=",
    "__builtin_arm_yield()=",
    "__builtin_arm_isb(x)=",
    "__builtin_arm_dsb(x)=",
    "__builtin_arm_dmb(x)=",
    "__builtin_bswap32(x)=0U",
    "__builtin_bswap16(x)=0U",
    "__builtin_arm_rbit(x)=0U",
    "__builtin_clz(x)=0U",
    "__builtin_arm_ldrex(x)=0U",
    "__builtin_arm_strex(x,y)=0U",
    "__builtin_arm_clrex()=",
    "__builtin_arm_ssat(x,y)=0U",
    "__builtin_arm_usat(x,y)=0U",
    "__builtin_arm_ldaex(x)=0U",
    "__builtin_arm_stlex(x,y)=0U",
];

// ═══════════════════════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Product line, decided by the project file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolchainFamily {
    /// `.uvproj` – Keil C51.
    C51,
    /// `.uvprojx` – Keil MDK-ARM.
    Arm,
}

impl ToolchainFamily {
    pub fn from_project_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("uvproj") => Ok(ToolchainFamily::C51),
            Some("uvprojx") => Ok(ToolchainFamily::Arm),
            _ => Err(UvprojError::UnresolvedToolchain { path: path.to_path_buf() }),
        }
    }
}

/// Compiler generation of an MDK-ARM target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArmCompiler {
    /// ARM Compiler 5.
    ArmCc,
    /// ARM Compiler 6.
    ArmClang,
}

/// Strategy for one target: where to read options and which implicit
/// includes and macros the toolchain contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toolchain {
    C51,
    Arm(ArmCompiler),
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Toolchain::C51 => "C51",
            Toolchain::Arm(ArmCompiler::ArmCc) => "ARMCC",
            Toolchain::Arm(ArmCompiler::ArmClang) => "ARMCLANG",
        })
    }
}

impl Serialize for Toolchain {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Installation and host access needed to resolve system includes and
/// macros.
#[derive(Clone, Copy)]
pub struct ToolchainEnv<'a> {
    /// `UV4.exe` of the installation the target belongs to.
    pub uv4_path: &'a Path,
    pub fs: &'a dyn FileSystem,
    pub runner: &'a dyn ProcessRunner,
    pub macro_cache: &'a MacroCache,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Strategy
// ═══════════════════════════════════════════════════════════════════════════════

impl Toolchain {
    /// Narrow `family` for a specific `<Target>` node.
    pub fn for_target(family: ToolchainFamily, target: &XmlValue) -> Self {
        match family {
            ToolchainFamily::C51 => Toolchain::C51,
            ToolchainFamily::Arm if target.text_at(&["uAC6"]) == Some("1") => {
                Toolchain::Arm(ArmCompiler::ArmClang)
            }
            ToolchainFamily::Arm => Toolchain::Arm(ArmCompiler::ArmCc),
        }
    }

    pub fn family(&self) -> ToolchainFamily {
        match self {
            Toolchain::C51 => ToolchainFamily::C51,
            Toolchain::Arm(_) => ToolchainFamily::Arm,
        }
    }

    /// Compiler options subtree of a `<Target>`.
    fn various_controls(&self) -> &'static [&'static str] {
        match self {
            Toolchain::C51 => &["TargetOption", "Target51", "C51", "VariousControls"],
            Toolchain::Arm(_) => &["TargetOption", "TargetArmAds", "Cads", "VariousControls"],
        }
    }

    fn various_control<'a>(&self, target: &'a XmlValue, field: &str) -> Result<&'a str> {
        let path: Vec<&str> = self.various_controls().iter().copied().chain([field]).collect();
        target.require_text(&path)
    }

    /// Raw `;`-separated include path list.
    pub fn include_string<'a>(&self, target: &'a XmlValue) -> Result<&'a str> {
        self.various_control(target, "IncludePath")
    }

    /// Raw `,`/whitespace-separated define list.
    pub fn define_string<'a>(&self, target: &'a XmlValue) -> Result<&'a str> {
        self.various_control(target, "Define")
    }

    /// Raw `<Group>` nodes; absent `Groups` means no groups.
    pub fn groups<'a>(&self, target: &'a XmlValue) -> Vec<&'a XmlValue> {
        as_list(target.at(&["Groups", "Group"]))
    }

    /// Include directories of the installation; `None` when `UV4.exe` is
    /// not where the settings say.
    pub fn system_includes(&self, env: &ToolchainEnv) -> Option<Vec<PathBuf>> {
        if !env.fs.is_file(env.uv4_path) {
            debug!(
                err = %UvprojError::ExternalToolUnavailable { path: env.uv4_path.to_path_buf() },
                "no system includes"
            );
            return None;
        }

        let root = install_root(env.uv4_path);
        match self {
            Toolchain::C51 => Some(vec![root.join("C51").join("INC")]),
            Toolchain::Arm(compiler) => {
                let tool = match compiler {
                    ArmCompiler::ArmCc => "ARMCC",
                    ArmCompiler::ArmClang => "ARMCLANG",
                };
                let inc_dir = root.join("ARM").join(tool).join("include");
                let mut dirs = vec![inc_dir.clone()];
                if env.fs.is_dir(&inc_dir) {
                    let children = env.fs.list_dir(&inc_dir).unwrap_or_default();
                    dirs.extend(children.into_iter().filter(|p| env.fs.is_dir(p)));
                }
                Some(dirs)
            }
        }
    }

    /// Compiler built-ins as macro expressions.
    ///
    /// C51 and ARM Compiler 5 use fixed tables.  ARM Compiler 6 uses its
    /// supplementary table followed by whatever armclang reports (memoised in
    /// `env.macro_cache`).
    pub fn system_macros(&self, env: &ToolchainEnv) -> Vec<String> {
        let fixed = |table: &[&str]| table.iter().map(|m| m.to_string()).collect::<Vec<_>>();
        match self {
            Toolchain::C51 => fixed(C51_MACROS),
            Toolchain::Arm(ArmCompiler::ArmCc) => fixed(ARMCC_MACROS),
            Toolchain::Arm(ArmCompiler::ArmClang) => {
                let mut macros = fixed(ARMCLANG_MACROS);
                let compiler = armclang_path(env.uv4_path);
                let discovered = env.macro_cache.get_or_discover(&compiler, env.fs, env.runner);
                macros.extend(discovered.iter().cloned());
                macros
            }
        }
    }

    /// Problem matcher identifiers for the build output.
    pub fn problem_matchers(&self) -> &'static [&'static str] {
        match self {
            Toolchain::C51 => &["$c51"],
            Toolchain::Arm(_) => &["$armcc", "$gcc"],
        }
    }

    pub fn build_command(&self, uv4_path: &Path, project_file: &Path, target: &str) -> Vec<String> {
        orchestrator_args(uv4_path, project_file, target, "-b", false)
    }

    pub fn rebuild_command(&self, uv4_path: &Path, project_file: &Path, target: &str) -> Vec<String> {
        orchestrator_args(uv4_path, project_file, target, "-r", true)
    }

    pub fn flash_command(&self, uv4_path: &Path, project_file: &Path, target: &str) -> Vec<String> {
        orchestrator_args(uv4_path, project_file, target, "-f", false)
    }

    pub fn task(&self, kind: TaskKind, uv4_path: &Path, project_file: &Path, target: &str) -> BuildTask {
        let args = match kind {
            TaskKind::Build => self.build_command(uv4_path, project_file, target),
            TaskKind::Rebuild => self.rebuild_command(uv4_path, project_file, target),
            TaskKind::Flash => self.flash_command(uv4_path, project_file, target),
        };
        BuildTask {
            kind,
            args,
            problem_matchers: self.problem_matchers().iter().map(|m| m.to_string()).collect(),
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Keil root: two levels above `UV4\UV4.exe`.
fn install_root(uv4_path: &Path) -> PathBuf {
    uv4_path
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Location of `armclang.exe` inside an MDK installation.
pub fn armclang_path(uv4_path: &Path) -> PathBuf {
    install_root(uv4_path)
        .join("ARM")
        .join("ARMCLANG")
        .join("bin")
        .join("armclang.exe")
}

fn orchestrator_args(
    uv4_path: &Path,
    project_file: &Path,
    target: &str,
    flag: &str,
    clean: bool,
) -> Vec<String> {
    let clean = if clean { " -z" } else { "" };
    vec![
        "--toolPath".to_string(),
        uv4_path.display().to_string(),
        "--prjPath".to_string(),
        project_file.display().to_string(),
        "--targetName".to_string(),
        target.to_string(),
        "-c".to_string(),
        format!("${{toolPath}} {flag} ${{prjPath}} -j0{clean} -t ${{targetName}}"),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::OsFileSystem;
    use crate::host::fakes::FakeRunner;
    use crate::xml::parse_document;

    fn target_node(xml: &str) -> XmlValue {
        let doc = parse_document(xml).unwrap();
        doc.get("Target").unwrap().clone()
    }

    /// `<root>/UV4/UV4.exe` plus optional ARM include tree.
    fn fake_install(arm_tool: Option<&str>) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let uv4 = dir.path().join("UV4").join("UV4.exe");
        std::fs::create_dir_all(uv4.parent().unwrap()).unwrap();
        std::fs::write(&uv4, "").unwrap();
        if let Some(tool) = arm_tool {
            let inc = dir.path().join("ARM").join(tool).join("include");
            std::fs::create_dir_all(inc.join("libcxx")).unwrap();
            std::fs::create_dir_all(inc.join("arm_linux")).unwrap();
            std::fs::write(inc.join("stdio.h"), "").unwrap();
        }
        (dir, uv4)
    }

    // ── Selection ────────────────────────────────────────────────────────

    #[test]
    fn family_from_extension() {
        assert_eq!(
            ToolchainFamily::from_project_path(Path::new("a/b.uvproj")).unwrap(),
            ToolchainFamily::C51
        );
        assert_eq!(
            ToolchainFamily::from_project_path(Path::new("a/b.UVPROJX")).unwrap(),
            ToolchainFamily::Arm
        );
    }

    #[test]
    fn unknown_extension_is_unresolved() {
        let err = ToolchainFamily::from_project_path(Path::new("a/b.uvoptx")).unwrap_err();
        assert!(matches!(err, UvprojError::UnresolvedToolchain { .. }), "got {err:?}");
        assert!(ToolchainFamily::from_project_path(Path::new("noext")).is_err());
    }

    #[test]
    fn arm_compiler_follows_uac6() {
        let ac6 = target_node("<Target><uAC6>1</uAC6></Target>");
        let ac5 = target_node("<Target><uAC6>0</uAC6></Target>");
        let none = target_node("<Target><TargetName>x</TargetName></Target>");

        assert_eq!(Toolchain::for_target(ToolchainFamily::Arm, &ac6), Toolchain::Arm(ArmCompiler::ArmClang));
        assert_eq!(Toolchain::for_target(ToolchainFamily::Arm, &ac5), Toolchain::Arm(ArmCompiler::ArmCc));
        assert_eq!(Toolchain::for_target(ToolchainFamily::Arm, &none), Toolchain::Arm(ArmCompiler::ArmCc));
        assert_eq!(Toolchain::for_target(ToolchainFamily::C51, &ac6), Toolchain::C51);
    }

    // ── Extraction ───────────────────────────────────────────────────────

    #[test]
    fn c51_reads_target51_subtree() {
        let node = target_node(
            "<Target><TargetOption><Target51><C51><VariousControls>\
             <Define>DEBUG</Define><IncludePath>.\\inc</IncludePath>\
             </VariousControls></C51></Target51></TargetOption></Target>",
        );
        assert_eq!(Toolchain::C51.include_string(&node).unwrap(), ".\\inc");
        assert_eq!(Toolchain::C51.define_string(&node).unwrap(), "DEBUG");
        assert!(Toolchain::Arm(ArmCompiler::ArmCc).include_string(&node).is_err());
    }

    #[test]
    fn arm_reads_cads_subtree() {
        let node = target_node(
            "<Target><TargetOption><TargetArmAds><Cads><VariousControls>\
             <Define>USE_HAL_DRIVER,STM32F407xx</Define><IncludePath>../Inc;../Drivers</IncludePath>\
             </VariousControls></Cads></TargetArmAds></TargetOption></Target>",
        );
        let arm = Toolchain::Arm(ArmCompiler::ArmCc);
        assert_eq!(arm.include_string(&node).unwrap(), "../Inc;../Drivers");
        assert_eq!(arm.define_string(&node).unwrap(), "USE_HAL_DRIVER,STM32F407xx");
    }

    #[test]
    fn missing_subtree_names_the_path() {
        let node = target_node("<Target><TargetName>x</TargetName></Target>");
        match Toolchain::C51.define_string(&node).unwrap_err() {
            UvprojError::MissingNode { path } => {
                assert_eq!(path, "TargetOption.Target51.C51.VariousControls.Define")
            }
            other => panic!("expected MissingNode, got {other:?}"),
        }
    }

    #[test]
    fn groups_absent_single_and_many() {
        let none = target_node("<Target><TargetName>x</TargetName></Target>");
        let one = target_node("<Target><Groups><Group><GroupName>a</GroupName></Group></Groups></Target>");
        let two = target_node(
            "<Target><Groups><Group><GroupName>a</GroupName></Group>\
             <Group><GroupName>b</GroupName></Group></Groups></Target>",
        );
        assert!(Toolchain::C51.groups(&none).is_empty());
        assert_eq!(Toolchain::C51.groups(&one).len(), 1);
        assert_eq!(Toolchain::C51.groups(&two).len(), 2);
    }

    // ── System includes ──────────────────────────────────────────────────

    #[test]
    fn system_includes_absent_without_uv4() {
        let cache = MacroCache::new();
        let runner = FakeRunner::unspawnable();
        let env = ToolchainEnv {
            uv4_path: Path::new("/no/keil/UV4/UV4.exe"),
            fs: &OsFileSystem,
            runner: &runner,
            macro_cache: &cache,
        };
        assert!(Toolchain::C51.system_includes(&env).is_none());
        assert!(Toolchain::Arm(ArmCompiler::ArmCc).system_includes(&env).is_none());
    }

    #[test]
    fn c51_system_include_is_inc_dir() {
        let (dir, uv4) = fake_install(None);
        let cache = MacroCache::new();
        let runner = FakeRunner::unspawnable();
        let env = ToolchainEnv { uv4_path: &uv4, fs: &OsFileSystem, runner: &runner, macro_cache: &cache };

        assert_eq!(
            Toolchain::C51.system_includes(&env).unwrap(),
            vec![dir.path().join("C51").join("INC")]
        );
    }

    #[test]
    fn arm_system_includes_list_subdirectories() {
        let (dir, uv4) = fake_install(Some("ARMCLANG"));
        let cache = MacroCache::new();
        let runner = FakeRunner::unspawnable();
        let env = ToolchainEnv { uv4_path: &uv4, fs: &OsFileSystem, runner: &runner, macro_cache: &cache };

        let inc = dir.path().join("ARM").join("ARMCLANG").join("include");
        assert_eq!(
            Toolchain::Arm(ArmCompiler::ArmClang).system_includes(&env).unwrap(),
            vec![inc.clone(), inc.join("arm_linux"), inc.join("libcxx")]
        );
    }

    #[test]
    fn arm_system_includes_without_include_dir() {
        let (dir, uv4) = fake_install(None);
        let cache = MacroCache::new();
        let runner = FakeRunner::unspawnable();
        let env = ToolchainEnv { uv4_path: &uv4, fs: &OsFileSystem, runner: &runner, macro_cache: &cache };

        assert_eq!(
            Toolchain::Arm(ArmCompiler::ArmCc).system_includes(&env).unwrap(),
            vec![dir.path().join("ARM").join("ARMCC").join("include")]
        );
    }

    // ── System macros ────────────────────────────────────────────────────

    #[test]
    fn fixed_tables_do_not_spawn() {
        let cache = MacroCache::new();
        let runner = FakeRunner::printing("#define X 1\n");
        let env = ToolchainEnv {
            uv4_path: Path::new("/no/keil/UV4/UV4.exe"),
            fs: &OsFileSystem,
            runner: &runner,
            macro_cache: &cache,
        };

        let c51 = Toolchain::C51.system_macros(&env);
        assert!(c51.contains(&"sfr16=int".to_string()));
        assert!(c51.contains(&"__C51__".to_string()));

        let armcc = Toolchain::Arm(ArmCompiler::ArmCc).system_macros(&env);
        assert!(armcc.contains(&"__int64=long long".to_string()));
        assert!(armcc.contains(&"__rev(x)=0U".to_string()));

        assert_eq!(runner.call_count(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn armclang_appends_fallback_when_compiler_missing() {
        let cache = MacroCache::new();
        let runner = FakeRunner::unspawnable();
        let env = ToolchainEnv {
            uv4_path: Path::new("/no/keil/UV4/UV4.exe"),
            fs: &OsFileSystem,
            runner: &runner,
            macro_cache: &cache,
        };

        let macros = Toolchain::Arm(ArmCompiler::ArmClang).system_macros(&env);
        assert_eq!(macros.len(), ARMCLANG_MACROS.len() + 3);
        assert_eq!(macros[0], "__alignof__(x)=");
        assert_eq!(
            &macros[ARMCLANG_MACROS.len()..],
            ["__GNUC__=4", "__GNUC_MINOR__=2", "__GNUC_PATCHLEVEL__=1"]
        );
    }

    #[test]
    fn armclang_uses_discovered_table() {
        let (dir, uv4) = fake_install(None);
        let clang = dir.path().join("ARM").join("ARMCLANG").join("bin").join("armclang.exe");
        std::fs::create_dir_all(clang.parent().unwrap()).unwrap();
        std::fs::write(&clang, "").unwrap();
        assert_eq!(armclang_path(&uv4), clang);

        let cache = MacroCache::new();
        let runner = FakeRunner::printing("#define __clang__ 1\n#define __ARM_ARCH 7\n");
        let env = ToolchainEnv { uv4_path: &uv4, fs: &OsFileSystem, runner: &runner, macro_cache: &cache };

        let toolchain = Toolchain::Arm(ArmCompiler::ArmClang);
        let macros = toolchain.system_macros(&env);
        assert!(macros.ends_with(&["__clang__=1".to_string(), "__ARM_ARCH=7".to_string()]));

        toolchain.system_macros(&env);
        assert_eq!(runner.call_count(), 1, "discovery must be memoised");
    }

    // ── Commands ─────────────────────────────────────────────────────────

    #[test]
    fn command_templates() {
        let uv4 = Path::new("/keil/UV4/UV4.exe");
        let prj = Path::new("/work/blinky.uvprojx");
        let arm = Toolchain::Arm(ArmCompiler::ArmCc);

        assert_eq!(
            arm.build_command(uv4, prj, "Debug"),
            [
                "--toolPath", "/keil/UV4/UV4.exe",
                "--prjPath", "/work/blinky.uvprojx",
                "--targetName", "Debug",
                "-c", "${toolPath} -b ${prjPath} -j0 -t ${targetName}",
            ]
        );
        assert_eq!(
            arm.rebuild_command(uv4, prj, "Debug")[7],
            "${toolPath} -r ${prjPath} -j0 -z -t ${targetName}"
        );
        assert_eq!(
            arm.flash_command(uv4, prj, "Debug")[7],
            "${toolPath} -f ${prjPath} -j0 -t ${targetName}"
        );
    }

    #[test]
    fn problem_matchers_per_family() {
        assert_eq!(Toolchain::C51.problem_matchers(), ["$c51"]);
        assert_eq!(Toolchain::Arm(ArmCompiler::ArmClang).problem_matchers(), ["$armcc", "$gcc"]);
    }

    #[test]
    fn display_tags() {
        assert_eq!(Toolchain::C51.to_string(), "C51");
        assert_eq!(Toolchain::Arm(ArmCompiler::ArmCc).to_string(), "ARMCC");
        assert_eq!(Toolchain::Arm(ArmCompiler::ArmClang).to_string(), "ARMCLANG");
    }
}
