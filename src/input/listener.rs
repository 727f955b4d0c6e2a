//! Hotkey listener public API
//!
//! Picks the backend for the current platform and starts the single
//! background thread that forwards hotkey presses as triggers.

use std::thread::JoinHandle;

use crate::error::AppError;
use crate::input::HotkeyBinding;
use crate::input::trigger::TriggerSender;

/// A registered global hotkey. The grab lives until process exit.
pub struct HotkeyListener {
    binding: HotkeyBinding,
    backend: &'static str,
    _thread: JoinHandle<()>,
}

impl HotkeyListener {
    #[cfg(target_os = "linux")]
    pub fn start(binding: HotkeyBinding, sender: TriggerSender) -> Result<Self, AppError> {
        use crate::input::backend::HotkeyBackend;
        use crate::input::x11_backend::X11Backend;
        use tracing::info;

        if !X11Backend::is_available() {
            return Err(AppError::HotkeyRegistration(anyhow::anyhow!(
                "No X11 display available for {}; use the tray menu instead",
                binding.display_name()
            )));
        }

        let thread = X11Backend::spawn(binding, sender).map_err(AppError::HotkeyRegistration)?;
        info!(binding = %binding, backend = X11Backend::name(), "Hotkey listener started");

        Ok(Self {
            binding,
            backend: X11Backend::name(),
            _thread: thread,
        })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn start(binding: HotkeyBinding, _sender: TriggerSender) -> Result<Self, AppError> {
        Err(AppError::HotkeyRegistration(anyhow::anyhow!(
            "No global hotkey backend for this platform ({})",
            binding.display_name()
        )))
    }

    pub fn binding(&self) -> HotkeyBinding {
        self.binding
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend
    }
}
