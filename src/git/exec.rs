use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::{ImportError, ImportResult};

/// Runs an external program and hands back its stdout.
///
/// Implementations must fail with [`ImportError::CommandFailed`] carrying the
/// captured stderr when the program exits non-zero. Output is returned as raw
/// bytes; nothing is decoded or normalized.
pub trait CommandExecutor {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> ImportResult<Vec<u8>>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &E {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> ImportResult<Vec<u8>> {
        (**self).run(dir, program, args)
    }
}

/// [`CommandExecutor`] backed by [`std::process::Command`].
///
/// Spawns one short-lived child per call and waits for it; there is no
/// timeout, so a hung command blocks the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> ImportResult<Vec<u8>> {
        debug!(program, ?args, dir = %dir.display(), "running command");
        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ImportError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ImportError::CommandFailed {
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn returns_stdout_bytes_untouched() {
        let td = tempdir().unwrap();
        let out = SystemExecutor
            .run(td.path(), "sh", &sh("printf 'a\\r\\nb\\377'"))
            .unwrap();
        assert_eq!(out, b"a\r\nb\xff");
    }

    #[test]
    fn runs_inside_the_given_directory() {
        let td = tempdir().unwrap();
        std::fs::write(td.path().join("marker.txt"), "here").unwrap();
        let out = SystemExecutor
            .run(td.path(), "sh", &sh("cat marker.txt"))
            .unwrap();
        assert_eq!(out, b"here");
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let td = tempdir().unwrap();
        let err = SystemExecutor
            .run(td.path(), "sh", &sh("echo out; echo 'boom' >&2; exit 3"))
            .unwrap_err();
        match err {
            ImportError::CommandFailed { stderr } => assert_eq!(stderr, "boom\n"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_zero_exit_with_silent_stderr_is_still_a_failure() {
        let td = tempdir().unwrap();
        let err = SystemExecutor
            .run(td.path(), "sh", &sh("exit 1"))
            .unwrap_err();
        assert!(matches!(err, ImportError::CommandFailed { ref stderr } if stderr.is_empty()));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let td = tempdir().unwrap();
        let err = SystemExecutor
            .run(td.path(), "gitds-no-such-binary", &[])
            .unwrap_err();
        assert!(matches!(err, ImportError::Spawn { .. }));
    }
}
