//! Error definitions for the mapping module

use thiserror::Error;

/// Errors raised while building a button mapping
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// The same button id was bound twice
    #[error("Button {0} is mapped more than once")]
    DuplicateButton(u8),

    /// A binding has no command to run
    #[error("Button {0} has an empty command")]
    EmptyCommand(u8),
}
