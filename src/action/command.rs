//! External program execution
//!
//! Every step that shells out (makepkg, updpkgsums, git) goes through the
//! `CommandRunner` trait so tests can substitute a recording fake.

use crate::error::CommandError;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Runs an external program and returns its standard output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `cwd`
    async fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>, CommandError>;
}

/// Runner executing real processes
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Create a new system command runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<Vec<u8>, CommandError> {
        let command = command_line(program, args);
        debug!("running '{}' in {}", command, cwd.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

/// Program and arguments joined for messages
pub(crate) fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line("makepkg", &["--force", "--clean"]),
            "makepkg --force --clean"
        );
        assert_eq!(command_line("updpkgsums", &[]), "updpkgsums");
    }

    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output = SystemCommandRunner::new()
            .run(temp_dir.path(), "echo", &["hello"])
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&output).trim(), "hello");
    }

    #[tokio::test]
    async fn test_system_runner_reports_failure_with_stderr() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = SystemCommandRunner::new()
            .run(temp_dir.path(), "sh", &["-c", "echo oops >&2; exit 3"])
            .await
            .unwrap_err();

        match err {
            CommandError::Failed {
                command, stderr, ..
            } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stderr, "oops");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_system_runner_missing_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = SystemCommandRunner::new()
            .run(temp_dir.path(), "definitely-not-a-real-program-xyz", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
    }
}
