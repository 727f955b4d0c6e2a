//! Cached X11 state

use anyhow::{Context, Result};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

/// Pre-cached X11 atoms to avoid repeated roundtrips
#[derive(Debug, Clone, Copy)]
pub struct CachedAtoms {
    pub wm_name: Atom,
    pub net_wm_name: Atom,
    pub utf8_string: Atom,
    pub net_client_list: Atom,
    pub net_active_window: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        Ok(Self {
            wm_name: intern(conn, b"WM_NAME")?,
            net_wm_name: intern(conn, b"_NET_WM_NAME")?,
            utf8_string: intern(conn, b"UTF8_STRING")?,
            net_client_list: intern(conn, b"_NET_CLIENT_LIST")?,
            net_active_window: intern(conn, b"_NET_ACTIVE_WINDOW")?,
        })
    }
}

fn intern(conn: &RustConnection, name: &[u8]) -> Result<Atom> {
    let label = String::from_utf8_lossy(name);
    Ok(conn
        .intern_atom(false, name)
        .with_context(|| format!("Failed to intern {} atom", label))?
        .reply()
        .with_context(|| format!("Failed to get reply for {} atom", label))?
        .atom)
}
