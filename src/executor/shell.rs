use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

use super::{CommandExecutor, ExecutorError};

pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs commands through `<shell> -c <command>`
///
/// Each launch gets a detached tokio task that waits for the child so it is
/// reaped and its exit status ends up in the log. Must be used from within a
/// tokio runtime.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: PathBuf,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl ShellExecutor {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }

    // Spawn the shell without waiting on it
    pub fn launch(&self, command: &str) -> Result<Child, ExecutorError> {
        Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| ExecutorError::LaunchFailure {
                command: command.to_string(),
                source,
            })
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, command: &str) {
        let mut child = match self.launch(command) {
            Ok(child) => child,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        info!("Launched `{}` (pid {:?})", command, child.id());

        let command = command.to_string();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => debug!("`{}` finished", command),
                Ok(status) => warn!("`{}` exited with {}", command, status),
                Err(e) => error!("Failed to wait for `{}`: {}", command, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn launch_runs_through_shell() {
        let mut child = ShellExecutor::default().launch("exit 3").unwrap();
        let status = child.wait().await.unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn missing_shell_is_a_launch_failure() {
        let executor = ShellExecutor::new("/nonexistent/shell");
        match executor.launch("true") {
            Err(ExecutorError::LaunchFailure { command, .. }) => assert_eq!(command, "true"),
            Ok(_) => panic!("launch should fail without a shell"),
        }

        // Logged, not raised
        executor.execute("true");
    }

    #[tokio::test]
    async fn execute_does_not_wait_for_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("fired");
        let command = format!("sleep 0.2 && touch '{}'", marker.display());

        ShellExecutor::default().execute(&command);
        assert!(!marker.exists());

        for _ in 0..50 {
            if marker.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("command never ran");
    }
}
