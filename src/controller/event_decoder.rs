//! Joystick record decoding
//!
//! The joystick interface (`/dev/input/jsN`) emits one fixed 8-byte record per
//! event:
//!
//! ```text
//! offset  0        4       6      7      8
//!         ├────────┼───────┼──────┼──────┤
//!         │ u32 ts │ i16 v │ kind │  id  │
//!         └────────┴───────┴──────┴──────┘
//! ```
//!
//! Fields are in host byte order with no padding. Decoding is a pure
//! reinterpretation of those bytes; nothing here touches the device.

/// Width of one encoded record in bytes
pub const EVENT_SIZE: usize = 8;

/// Button pressed/released
pub const EVENT_BUTTON: u8 = 0x01;
/// Axis moved
pub const EVENT_AXIS: u8 = 0x02;
/// Synthetic initial-state flag the kernel ORs into the kind on open
pub const EVENT_INIT: u8 = 0x80;

// Decoder errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed record: expected {} bytes, got {len}", EVENT_SIZE)]
    MalformedRecord { len: usize },
}

/// One decoded device event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    /// Device clock in milliseconds, passed through untouched
    pub timestamp: u32,
    /// 0 = released, anything else = pressed (for buttons)
    pub value: i16,
    pub kind: u8,
    pub id: u8,
}

impl InputEvent {
    pub fn new(timestamp: u32, value: i16, kind: u8, id: u8) -> Self {
        Self {
            timestamp,
            value,
            kind,
            id,
        }
    }

    /// Only a plain button record counts; init-flagged records do not.
    pub fn is_button(&self) -> bool {
        self.kind == EVENT_BUTTON
    }

    pub fn is_pressed(&self) -> bool {
        self.value != 0
    }

    /// Encodes the event in the device's wire layout.
    pub fn to_ne_bytes(&self) -> [u8; EVENT_SIZE] {
        let mut bytes = [0u8; EVENT_SIZE];
        bytes[0..4].copy_from_slice(&self.timestamp.to_ne_bytes());
        bytes[4..6].copy_from_slice(&self.value.to_ne_bytes());
        bytes[6] = self.kind;
        bytes[7] = self.id;
        bytes
    }
}

/// Decodes the first [`EVENT_SIZE`] bytes of `bytes` into an [`InputEvent`].
///
/// An empty slice is also reported as [`DecodeError::MalformedRecord`]; the
/// reader is responsible for recognising a clean end of stream before it
/// gets here.
pub fn decode(bytes: &[u8]) -> Result<InputEvent, DecodeError> {
    if bytes.len() < EVENT_SIZE {
        return Err(DecodeError::MalformedRecord { len: bytes.len() });
    }

    let timestamp = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let value = i16::from_ne_bytes([bytes[4], bytes[5]]);

    Ok(InputEvent {
        timestamp,
        value,
        kind: bytes[6],
        id: bytes[7],
    })
}
