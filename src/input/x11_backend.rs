//! X11 XGrabKey hotkey backend
//!
//! Uses X11's native global hotkey registration via XGrabKey.
//! Requires no special permissions.
//!
//! Limitations:
//! - Fails when another client already grabbed the same combination
//! - Under Wayland only works through XWayland for X11-focused windows

use anyhow::{Context, Result};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::input::HotkeyBinding;
use crate::input::backend::HotkeyBackend;
use crate::input::trigger::{SendOutcome, TriggerSender, TriggerSource};

pub struct X11Backend;

impl HotkeyBackend for X11Backend {
    fn spawn(binding: HotkeyBinding, sender: TriggerSender) -> Result<JoinHandle<()>> {
        let (conn, screen_num) =
            x11rb::connect(None).context("Failed to connect to X11 for hotkey listening")?;
        let root = conn.setup().roots[screen_num].root;

        let (keycode, modmask) = binding_to_x11(&binding)
            .with_context(|| format!("Cannot map {} to an X11 keycode", binding.display_name()))?;

        register_hotkey(&conn, root, keycode, modmask)?;
        conn.flush().context("Failed to flush X11 connection")?;

        info!(
            binding = %binding.display_name(),
            x11_keycode = keycode,
            modmask = ?modmask,
            "Registered global hotkey"
        );

        let handle = thread::Builder::new()
            .name("hotkey".into())
            .spawn(move || {
                if let Err(e) = run_x11_listener(&conn, keycode, modmask, &sender) {
                    error!(error = %e, "X11 hotkey listener error");
                }
            })
            .context("Failed to spawn hotkey thread")?;

        Ok(handle)
    }

    fn is_available() -> bool {
        // Check if we can connect to X11
        x11rb::connect(None).is_ok()
    }

    fn name() -> &'static str {
        "X11"
    }
}

/// Blocking event loop: one trigger per matching KeyPress
fn run_x11_listener(
    conn: &RustConnection,
    keycode: Keycode,
    modmask: ModMask,
    sender: &TriggerSender,
) -> Result<()> {
    info!("X11 hotkey listener entering event loop");

    loop {
        let event = conn
            .wait_for_event()
            .context("Lost connection to X11 while waiting for hotkey")?;

        match event {
            Event::KeyPress(key_event) => {
                let pressed_mask = normalize_modmask(key_event.state);
                if key_event.detail != keycode || pressed_mask != modmask {
                    debug!(
                        keycode = key_event.detail,
                        modmask = ?pressed_mask,
                        "KeyPress event didn't match the registered hotkey"
                    );
                    continue;
                }

                match sender.send(TriggerSource::Hotkey) {
                    SendOutcome::Queued => info!("Hotkey pressed, trigger sent"),
                    SendOutcome::Coalesced => debug!("Hotkey pressed, trigger already pending"),
                    SendOutcome::Closed => {
                        info!("UI gone, stopping hotkey listener");
                        return Ok(());
                    }
                }
            }
            Event::MappingNotify(_) => {
                warn!("Keyboard mapping changed - hotkey may not work correctly until restart");
            }
            _ => {}
        }
    }
}

/// Lock-key permutations grabbed alongside the real binding
fn ignore_masks() -> [ModMask; 4] {
    [
        ModMask::from(0u16),         // No lock keys
        ModMask::M2,                 // NumLock (Mod2)
        ModMask::LOCK,               // CapsLock
        ModMask::M2 | ModMask::LOCK, // NumLock + CapsLock
    ]
}

/// Register a global hotkey with X11
fn register_hotkey(
    conn: &RustConnection,
    root: Window,
    keycode: Keycode,
    modmask: ModMask,
) -> Result<()> {
    // X11 treats "Ctrl+Space" and "Ctrl+Space+NumLock" as different hotkeys,
    // so every lock-key permutation has to be grabbed.
    for ignore_mask in ignore_masks() {
        let effective_modmask = modmask | ignore_mask;

        conn.grab_key(
            false, // owner_events: false = Send events to this client only
            root,
            effective_modmask,
            keycode,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
        )
        .context("Failed to send GrabKey request")?
        .check()
        .with_context(|| {
            format!(
                "Failed to grab key (already taken by another client?): keycode={}, modmask={:?}",
                keycode, effective_modmask
            )
        })?;
    }

    Ok(())
}

/// Normalize modifier mask by removing lock keys
fn normalize_modmask(state: KeyButMask) -> ModMask {
    let state_u16: u16 = state.into();

    // Keep only Shift, Control, Mod1 (Alt), Mod4 (Super)
    let normalized = state_u16
        & (ModMask::SHIFT.bits()
            | ModMask::CONTROL.bits()
            | ModMask::M1.bits()
            | ModMask::M4.bits());

    ModMask::from(normalized)
}

/// Convert evdev key binding to X11 keycode and modifier mask
fn binding_to_x11(binding: &HotkeyBinding) -> Option<(Keycode, ModMask)> {
    let x11_keycode = evdev_keycode_to_x11(binding.key_code)?;

    let mut modmask = ModMask::from(0u16);

    if binding.ctrl {
        modmask |= ModMask::CONTROL;
    }
    if binding.shift {
        modmask |= ModMask::SHIFT;
    }
    if binding.alt {
        modmask |= ModMask::M1; // Alt is typically Mod1
    }
    if binding.super_key {
        modmask |= ModMask::M4; // Super is typically Mod4
    }

    Some((x11_keycode, modmask))
}

/// Convert evdev keycode to X11 keycode
///
/// X11 keycodes are evdev keycode + 8 on modern Linux systems.
/// Valid X11 keycodes are 8-255.
fn evdev_keycode_to_x11(evdev_code: u16) -> Option<Keycode> {
    let x11_code = evdev_code.checked_add(8)?;

    if (8..=255).contains(&x11_code) {
        Some(x11_code as Keycode)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evdev_to_x11_keycode() {
        assert_eq!(evdev_keycode_to_x11(1), Some(9)); // ESC: 1 -> 9
        assert_eq!(evdev_keycode_to_x11(57), Some(65)); // SPACE: 57 -> 65

        // Boundary cases
        assert_eq!(evdev_keycode_to_x11(0), Some(8));
        assert_eq!(evdev_keycode_to_x11(247), Some(255));
        assert_eq!(evdev_keycode_to_x11(248), None);
    }

    #[test]
    fn test_trigger_binding_to_x11() {
        let result = binding_to_x11(&HotkeyBinding::trigger());
        assert_eq!(result, Some((65, ModMask::CONTROL)));

        let binding = HotkeyBinding::new(59, true, false, true, false);
        assert_eq!(
            binding_to_x11(&binding),
            Some((67, ModMask::CONTROL | ModMask::M1))
        );
    }

    #[test]
    fn test_normalize_modmask_strips_lock_keys() {
        let state = KeyButMask::from(ModMask::CONTROL.bits() | ModMask::M2.bits());
        assert_eq!(normalize_modmask(state), ModMask::CONTROL);

        let state = KeyButMask::from(ModMask::CONTROL.bits() | ModMask::LOCK.bits());
        assert_eq!(normalize_modmask(state), ModMask::CONTROL);

        let state = KeyButMask::from(ModMask::SHIFT.bits());
        assert_eq!(normalize_modmask(state), ModMask::SHIFT);
    }

    #[test]
    fn test_ignore_masks_cover_lock_combinations() {
        let masks = ignore_masks();
        assert_eq!(masks.len(), 4);
        assert!(masks.contains(&(ModMask::M2 | ModMask::LOCK)));
    }
}
