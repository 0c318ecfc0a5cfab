//! Controller buttons, command bindings and auto-repeat.

use crate::geom::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Default delay before a held direction starts repeating (milliseconds).
pub const DEFAULT_REPEAT_DELAY_MS: u64 = 400;

/// Default time between repeats of a held direction (milliseconds).
pub const DEFAULT_REPEAT_RATE_MS: u64 = 120;

/// Physical buttons of the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Accept,
    Back,
    Menu,
    X,
    Y,
    ShoulderLeft,
    ShoulderRight,
}

/// Engine-level command a button maps to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavCommand {
    Move(Direction),
    Activate,
    ExitScope,
    /// Invoke the shortcut bound to this key.
    Shortcut(String),
}

impl NavCommand {
    /// Held buttons repeat only directional moves.
    pub fn repeats(&self) -> bool {
        matches!(self, NavCommand::Move(_))
    }
}

/// Button bindings and repeat timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub bindings: HashMap<Button, NavCommand>,
    pub repeat_delay_ms: u64,
    pub repeat_rate_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        let mut config = Self::empty();
        config.setup_default_bindings();
        config
    }
}

impl InputConfig {
    /// Config with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            repeat_rate_ms: DEFAULT_REPEAT_RATE_MS,
        }
    }

    fn setup_default_bindings(&mut self) {
        // D-pad moves focus
        self.bindings
            .insert(Button::DpadUp, NavCommand::Move(Direction::Up));
        self.bindings
            .insert(Button::DpadDown, NavCommand::Move(Direction::Down));
        self.bindings
            .insert(Button::DpadLeft, NavCommand::Move(Direction::Left));
        self.bindings
            .insert(Button::DpadRight, NavCommand::Move(Direction::Right));

        self.bindings.insert(Button::Accept, NavCommand::Activate);
        self.bindings.insert(Button::Back, NavCommand::ExitScope);

        // Face and shoulder buttons fire shortcuts named after them
        self.bindings
            .insert(Button::X, NavCommand::Shortcut("X".into()));
        self.bindings
            .insert(Button::Y, NavCommand::Shortcut("Y".into()));
        self.bindings
            .insert(Button::ShoulderLeft, NavCommand::Shortcut("LB".into()));
        self.bindings
            .insert(Button::ShoulderRight, NavCommand::Shortcut("RB".into()));
        self.bindings
            .insert(Button::Menu, NavCommand::Shortcut("Menu".into()));
    }

    /// Command bound to `button`.
    pub fn command_for(&self, button: Button) -> Option<&NavCommand> {
        self.bindings.get(&button)
    }

    /// Check value ranges. Returns the offending field and reason.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        if self.repeat_rate_ms == 0 {
            return Err(("input.repeat_rate_ms", "must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct HeldButton {
    button: Button,
    command: NavCommand,
    next_repeat_ms: u64,
}

/// Turns button presses into commands, repeating held directions.
///
/// Time is passed in by the caller as monotonic milliseconds.
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    config: InputConfig,
    held: Option<HeldButton>,
}

impl InputProcessor {
    pub fn new(config: InputConfig) -> Self {
        Self { config, held: None }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Rebind a button. Returns the previous command.
    pub fn bind(&mut self, button: Button, command: NavCommand) -> Option<NavCommand> {
        self.config.bindings.insert(button, command)
    }

    pub fn unbind(&mut self, button: Button) -> Option<NavCommand> {
        if self.held.as_ref().is_some_and(|h| h.button == button) {
            self.held = None;
        }
        self.config.bindings.remove(&button)
    }

    /// Button went down. Returns the command to run now.
    pub fn press(&mut self, button: Button, now_ms: u64) -> Option<NavCommand> {
        let command = self.config.command_for(button)?.clone();
        if command.repeats() {
            self.held = Some(HeldButton {
                button,
                command: command.clone(),
                next_repeat_ms: now_ms.saturating_add(self.config.repeat_delay_ms),
            });
        }
        trace!(?button, ?command, "press");
        Some(command)
    }

    pub fn release(&mut self, button: Button) {
        if self.held.as_ref().is_some_and(|h| h.button == button) {
            self.held = None;
        }
    }

    /// Repeats due by `now_ms` for the held button.
    pub fn tick(&mut self, now_ms: u64) -> Vec<NavCommand> {
        let rate = self.config.repeat_rate_ms.max(1);
        let Some(held) = self.held.as_mut() else {
            return Vec::new();
        };
        let mut due = Vec::new();
        while held.next_repeat_ms <= now_ms {
            due.push(held.command.clone());
            held.next_repeat_ms = held.next_repeat_ms.saturating_add(rate);
        }
        due
    }
}
