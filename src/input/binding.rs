//! Hotkey binding and key code naming

use std::fmt;

use crate::constants::input::KEY_SPACE;

/// A keyboard hotkey binding with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    /// evdev key code (e.g., KEY_SPACE = 57)
    pub key_code: u16,

    /// Control key pressed
    pub ctrl: bool,

    /// Shift key pressed
    pub shift: bool,

    /// Alt key pressed
    pub alt: bool,

    /// Super/Windows key pressed
    pub super_key: bool,
}

impl HotkeyBinding {
    pub const fn new(key_code: u16, ctrl: bool, shift: bool, alt: bool, super_key: bool) -> Self {
        Self {
            key_code,
            ctrl,
            shift,
            alt,
            super_key,
        }
    }

    /// The application's popup binding: Ctrl+Space
    pub const fn trigger() -> Self {
        Self::new(KEY_SPACE, true, false, false, false)
    }

    /// Get human-readable display name for this binding (for UI and logs)
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();

        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        if self.alt {
            parts.push("Alt".to_string());
        }
        if self.super_key {
            parts.push("Super".to_string());
        }

        parts.push(key_code_to_name(self.key_code));

        parts.join("+")
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self::trigger()
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Name for an evdev key code. Only Space is ever bound.
fn key_code_to_name(code: u16) -> String {
    match code {
        KEY_SPACE => "Space".to_string(),
        other => format!("Key{other}"),
    }
}
