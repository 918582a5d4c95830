//! Controller subsystem for joystick input handling
//!
//! Implements the input side of the pipeline:
//!
//! 1. [`device_reader`] - Owns the device node and pulls fixed-size records
//! 2. [`event_decoder`] - Turns each record into an [`InputEvent`]
//!
//! # Architecture
//!
//! ```text
//! /dev/input/jsN ──► DeviceReader ──► decode ──► InputEvent
//!                    (8-byte reads)
//! ```

pub mod device_reader;
pub mod event_decoder;

pub use crate::controller::device_reader::{Closed, DeviceReader, ReaderError, Streaming};
pub use crate::controller::event_decoder::{
    decode, DecodeError, InputEvent, EVENT_AXIS, EVENT_BUTTON, EVENT_INIT, EVENT_SIZE,
};

// Controller errors
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("Reader error: {0}")]
    ReaderError(#[from] ReaderError),
}

impl From<DecodeError> for ControllerError {
    fn from(e: DecodeError) -> Self {
        ControllerError::ReaderError(ReaderError::Decode(e))
    }
}
