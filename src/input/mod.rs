//! Global hotkey handling
//!
//! A backend registers the trigger binding with the display server and
//! forwards each press into the bounded trigger channel read by the UI.

pub mod backend;
pub mod binding;
pub mod listener;
pub mod trigger;
#[cfg(target_os = "linux")]
pub mod x11_backend;

pub use binding::HotkeyBinding;
pub use listener::HotkeyListener;
pub use trigger::{SendOutcome, TriggerReceiver, TriggerSender, TriggerSource, trigger_channel};
