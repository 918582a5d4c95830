//! gamepad-shortcuts - run shell commands from joystick buttons
//!
//! Reads 8-byte records from a Linux joystick device, detects the rising edge
//! of each mapped button and launches the bound command.

pub mod app;
pub mod config;
pub mod controller;
pub mod executor;
pub mod mapping;

pub use app::{run, RunOutcome, RunStats};
pub use config::ShortcutConfig;
