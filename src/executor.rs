//! Command executor: script file in, captured text out.
//!
//! Structure:
//! - Pure functions: output trimming, argument construction
//! - Effect functions: script file write, process invocation
//!
//! The script file lives at a fixed path and is overwritten on every
//! call ("last call wins"). It is never deleted. Callers must not run
//! two scripts at once; the TUI guarantees this by allowing a single
//! pending run.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::error::ExecError;
use crate::script::CommandScript;

/// Executable invoked when no `--tool` is given.
pub const DEFAULT_TOOL: &str = "diskpart";

/// Script file name, relative to the working directory.
pub const DEFAULT_SCRIPT_PATH: &str = "temp_script.txt";

/// Flag selecting "run script from file" mode.
pub const SCRIPT_FLAG: &str = "/s";

// ============================================================================
// TYPES
// ============================================================================

/// Where the tool lives and where scripts are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub tool: PathBuf,
    pub script_path: PathBuf,
}

/// What came back from one run of the tool.
///
/// Both streams are trimmed of surrounding whitespace only.
/// `exit_code` is None when the process was killed by a signal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// True when the tool exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Decode captured bytes and strip leading/trailing whitespace.
///
/// Internal text, including blank lines, is kept verbatim.
///
/// Bytes are decoded as UTF-8 with lossy replacement. On Windows diskpart
/// writes in the console OEM code page, so non-ASCII characters in
/// localized output show up as U+FFFD.
pub fn trim_output(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}

/// Arguments passed to the tool for a given script path.
pub fn tool_args(script_path: &Path) -> [&OsStr; 2] {
    [OsStr::new(SCRIPT_FLAG), script_path.as_os_str()]
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Overwrite the script file with the script's lines.
pub fn write_script(path: &Path, script: &CommandScript) -> Result<(), ExecError> {
    fs::write(path, script.to_text()).map_err(|source| ExecError::WriteScript {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the script, run the tool against it, and capture its output.
///
/// Blocks until the tool exits. A non-zero exit is reported through
/// `ExecutionResult::exit_code`, not as an error.
pub fn run_script(config: &ExecutorConfig, script: &CommandScript) -> Result<ExecutionResult, ExecError> {
    write_script(&config.script_path, script)?;
    debug!(path = %config.script_path.display(), lines = ?script.lines(), "script written");

    let output = Command::new(&config.tool)
        .args(tool_args(&config.script_path))
        .output()
        .map_err(|source| ExecError::Spawn {
            tool: config.tool.clone(),
            source,
        })?;

    let result = ExecutionResult {
        stdout: trim_output(&output.stdout),
        stderr: trim_output(&output.stderr),
        exit_code: output.status.code(),
    };

    if result.success() {
        info!(tool = %config.tool.display(), "script finished");
    } else {
        warn!(tool = %config.tool.display(), exit_code = ?result.exit_code, "script exited non-zero");
    }

    Ok(result)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{DiskIndex, PartitionSize};

    #[test]
    fn trim_output_keeps_internal_blank_lines() {
        let raw = b"\n\n  Disk 0  Online\n\n  Disk 1  Online  \n\n";
        assert_eq!(trim_output(raw), "Disk 0  Online\n\n  Disk 1  Online");
    }

    #[test]
    fn trim_output_of_whitespace_is_empty() {
        assert_eq!(trim_output(b" \r\n\t "), "");
    }

    #[test]
    fn tool_args_select_script_mode() {
        let args = tool_args(Path::new("temp_script.txt"));
        assert_eq!(args[0], "/s");
        assert_eq!(args[1], "temp_script.txt");
    }

    #[test]
    fn write_script_contains_exactly_the_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        let script = CommandScript::create_partition(DiskIndex(1), PartitionSize::new(10240).unwrap());

        write_script(&path, &script).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "select disk 1\ncreate partition primary size=10240\nformat fs=ntfs quick\nassign"
        );
        assert_eq!(written.lines().count(), 4);
    }

    #[test]
    fn write_script_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");

        write_script(&path, &CommandScript::clean(DiskIndex(2))).unwrap();
        write_script(&path, &CommandScript::list_disks()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "list disk");
    }

    #[test]
    fn write_script_into_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("script.txt");
        let err = write_script(&path, &CommandScript::list_disks()).unwrap_err();
        assert!(matches!(err, ExecError::WriteScript { .. }));
    }

    #[test]
    fn missing_tool_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExecutorConfig {
            tool: dir.path().join("no-such-tool"),
            script_path: dir.path().join("script.txt"),
        };
        let err = run_script(&config, &CommandScript::list_disks()).unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
        // The script is written before the spawn attempt.
        assert!(config.script_path.exists());
    }

    #[cfg(unix)]
    fn fake_tool(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-diskpart");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn run_script_echoes_tool_stdout() {
        let dir = tempfile::tempdir().unwrap();
        // $1 is the /s flag, $2 the script path
        let config = ExecutorConfig {
            tool: fake_tool(dir.path(), "printf '\\n  header\\n\\n'; cat \"$2\"; printf '\\n\\n'"),
            script_path: dir.path().join("script.txt"),
        };

        let result = run_script(&config, &CommandScript::clean(DiskIndex(1))).unwrap();

        assert_eq!(result.stdout, "header\n\nselect disk 1\nclean");
        assert_eq!(result.stderr, "");
        assert!(result.success());
    }

    #[cfg(unix)]
    #[test]
    fn run_script_exposes_stderr_and_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExecutorConfig {
            tool: fake_tool(dir.path(), "echo 'partial'; echo 'access denied' >&2; exit 5"),
            script_path: dir.path().join("script.txt"),
        };

        let result = run_script(&config, &CommandScript::list_disks()).unwrap();

        assert_eq!(result.stdout, "partial");
        assert_eq!(result.stderr, "access denied");
        assert_eq!(result.exit_code, Some(5));
        assert!(!result.success());
    }
}
