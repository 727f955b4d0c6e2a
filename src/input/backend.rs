//! Hotkey backend abstraction layer
//!
//! Provides a trait-based interface for display-server specific global hotkey
//! registration. Currently supports:
//! - X11 XGrabKey (Linux, also works under XWayland for X11 clients)

use anyhow::Result;
use std::thread::JoinHandle;

use crate::input::HotkeyBinding;
use crate::input::trigger::TriggerSender;

/// Hotkey backend trait
///
/// Each backend must implement this trait to be used by [`crate::input::HotkeyListener`]
pub trait HotkeyBackend: Sized {
    /// Register `binding` and spawn the blocking wait thread.
    ///
    /// Registration happens before this returns, so a conflicting grab is
    /// reported here rather than from inside the thread.
    fn spawn(binding: HotkeyBinding, sender: TriggerSender) -> Result<JoinHandle<()>>;

    /// Check if this backend is available on the current system
    fn is_available() -> bool;

    /// Get human-readable backend name
    fn name() -> &'static str;
}
