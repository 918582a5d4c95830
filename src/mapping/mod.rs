//! Turning button events into commands.
//!
//! [`ButtonMapping`] is the static id → command table loaded from the
//! configuration; [`Dispatcher`] walks decoded events through a per-button
//! edge detector and hands commands to a [`CommandExecutor`](crate::executor::CommandExecutor).

pub mod button_mapping;
pub mod dispatcher;
pub mod error;

// Re-exports for easier access
pub use button_mapping::ButtonMapping;
pub use dispatcher::{ButtonState, DispatchOutcome, Dispatcher};
pub use error::MappingError;
