//! Command execution
//!
//! The dispatcher hands a command string to a [`CommandExecutor`] and moves on.
//! Executors own their failure path: nothing they do is reported back to the
//! caller, so a command that cannot be launched never disturbs button state or
//! the read loop.

pub mod shell;

pub use shell::ShellExecutor;

/// Executor errors
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Failed to launch command `{command}`: {source}")]
    LaunchFailure {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Fire-and-forget command sink
pub trait CommandExecutor {
    /// Starts `command` without waiting for it to finish.
    fn execute(&self, command: &str);
}
