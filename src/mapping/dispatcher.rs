//! Edge-triggered dispatch of button presses
//!
//! Many joystick drivers repeat "still pressed" records while a button is
//! held. The dispatcher keeps one [`ButtonState`] per mapped button and only
//! runs a command on the released → pressed transition.
//!
//! ```text
//!            value != 0 / execute
//! Released ───────────────────────► Pressed ──┐ value != 0
//!     ▲                                │  ▲    │ (repeat, ignored)
//!     └──────── value == 0 ────────────┘  └────┘
//! ```

use std::collections::HashMap;
use tracing::{debug, info};

use crate::controller::event_decoder::InputEvent;
use crate::executor::CommandExecutor;
use crate::mapping::ButtonMapping;

// Button state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// What the dispatcher did with one event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Axis or init record
    NotAButton,
    /// Button has no binding
    Unmapped,
    /// Rising edge, command handed to the executor
    Fired,
    /// Pressed again while already pressed
    Repeat,
    Released,
}

// A mapped button with its last observed state
#[derive(Debug)]
struct TrackedButton {
    command: String,
    state: ButtonState,
}

pub struct Dispatcher<E: CommandExecutor> {
    buttons: HashMap<u8, TrackedButton>,
    executor: E,
}

impl<E: CommandExecutor> Dispatcher<E> {
    /// Creates a dispatcher with every mapped button released.
    pub fn new(mapping: ButtonMapping, executor: E) -> Self {
        let buttons = mapping
            .into_iter()
            .map(|(id, command)| {
                let button = TrackedButton {
                    command,
                    state: ButtonState::Released,
                };
                (id, button)
            })
            .collect();

        Self { buttons, executor }
    }

    pub fn command(&self, id: u8) -> Option<&str> {
        self.buttons.get(&id).map(|b| b.command.as_str())
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Last observed state of a mapped button; `None` for unmapped ids.
    pub fn state(&self, id: u8) -> Option<ButtonState> {
        self.buttons.get(&id).map(|b| b.state)
    }

    pub fn dispatch(&mut self, event: &InputEvent) -> DispatchOutcome {
        if !event.is_button() {
            return DispatchOutcome::NotAButton;
        }

        let Some(button) = self.buttons.get_mut(&event.id) else {
            debug!("Ignoring unmapped button {}", event.id);
            return DispatchOutcome::Unmapped;
        };

        if !event.is_pressed() {
            if button.state == ButtonState::Pressed {
                debug!("Button {} released", event.id);
            }
            button.state = ButtonState::Released;
            return DispatchOutcome::Released;
        }

        if button.state == ButtonState::Pressed {
            debug!("Button {} still held (t={})", event.id, event.timestamp);
            return DispatchOutcome::Repeat;
        }

        button.state = ButtonState::Pressed;
        info!("Executing command for button {}", event.id);
        self.executor.execute(&button.command);

        DispatchOutcome::Fired
    }
}
