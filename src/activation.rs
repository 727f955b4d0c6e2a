//! Forcing the popup window to the foreground
//!
//! egui's `ViewportCommand::Focus` is only a hint, and many window managers
//! refuse focus to a window that was not clicked. On X11 the popup is
//! additionally activated through `_NET_ACTIVE_WINDOW`, the same way a pager
//! would do it.

use anyhow::Result;

/// Raises and focuses a top-level window identified by its title
pub trait WindowActivator {
    fn name(&self) -> &'static str;

    fn activate(&self, title: &str) -> Result<()>;
}

/// Activator for platforms without a window-manager protocol we can drive
pub struct NoopActivator;

impl WindowActivator for NoopActivator {
    fn name(&self) -> &'static str {
        "none"
    }

    fn activate(&self, _title: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(target_os = "linux")]
pub use linux::X11Activator;

#[cfg(target_os = "linux")]
mod linux {
    use anyhow::{Context, Result, anyhow};
    use tracing::debug;
    use x11rb::connection::Connection;
    use x11rb::rust_connection::RustConnection;

    use super::WindowActivator;
    use crate::x11::{CachedAtoms, activate_window, find_window_by_title};

    pub struct X11Activator {
        conn: RustConnection,
        screen_num: usize,
        atoms: CachedAtoms,
    }

    impl X11Activator {
        pub fn connect() -> Result<Self> {
            let (conn, screen_num) =
                x11rb::connect(None).context("Failed to connect to X11 for window activation")?;
            let atoms = CachedAtoms::new(&conn)?;
            Ok(Self {
                conn,
                screen_num,
                atoms,
            })
        }
    }

    impl WindowActivator for X11Activator {
        fn name(&self) -> &'static str {
            "X11"
        }

        fn activate(&self, title: &str) -> Result<()> {
            let screen = &self.conn.setup().roots[self.screen_num];
            let window = find_window_by_title(&self.conn, screen, &self.atoms, title)?
                .ok_or_else(|| anyhow!("No client window titled {:?}", title))?;

            debug!(window = window, title = %title, "Activating popup window");
            activate_window(&self.conn, screen, &self.atoms, window)
        }
    }
}

/// Best activator for the running session, chosen once at startup
pub fn platform_activator() -> Box<dyn WindowActivator> {
    #[cfg(target_os = "linux")]
    {
        match X11Activator::connect() {
            Ok(activator) => return Box::new(activator),
            Err(e) => tracing::warn!(error = %e, "X11 window activation unavailable"),
        }
    }

    Box::new(NoopActivator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_activator_always_succeeds() {
        let activator = NoopActivator;
        assert_eq!(activator.name(), "none");
        assert!(activator.activate("User Input").is_ok());
    }
}
