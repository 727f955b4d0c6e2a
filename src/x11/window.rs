//! X11 window queries and operations

use anyhow::{Context, Result};
use tracing::debug;
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::constants::x11;

use super::CachedAtoms;

/// Top-level client windows as published by the window manager
pub fn client_windows(conn: &RustConnection, screen: &Screen, atoms: &CachedAtoms) -> Result<Vec<Window>> {
    let reply = conn
        .get_property(
            false,
            screen.root,
            atoms.net_client_list,
            AtomEnum::WINDOW,
            0,
            x11::CLIENT_LIST_MAX,
        )
        .context("Failed to query _NET_CLIENT_LIST property")?
        .reply()
        .context("Failed to get reply for _NET_CLIENT_LIST query")?;

    Ok(reply.value32().map(|ids| ids.collect()).unwrap_or_default())
}

/// Window title, preferring `_NET_WM_NAME` over the legacy `WM_NAME`.
///
/// Returns `None` when the window disappeared before the reply arrived.
pub fn window_title(conn: &RustConnection, window: Window, atoms: &CachedAtoms) -> Result<Option<String>> {
    let net_name = match read_text_property(conn, window, atoms.net_wm_name, atoms.utf8_string)? {
        Some(value) => value,
        None => return Ok(None),
    };
    if !net_name.is_empty() {
        return Ok(Some(String::from_utf8_lossy(&net_name).into_owned()));
    }

    let name = read_text_property(conn, window, atoms.wm_name, AtomEnum::STRING.into())?;
    Ok(name.map(|value| String::from_utf8_lossy(&value).into_owned()))
}

fn read_text_property(
    conn: &RustConnection,
    window: Window,
    property: Atom,
    type_: Atom,
) -> Result<Option<Vec<u8>>> {
    let cookie = conn
        .get_property(false, window, property, type_, 0, x11::TITLE_MAX_LEN)
        .context(format!("Failed to query title property for window {}", window))?;
    match cookie.reply() {
        Ok(reply) => Ok(Some(reply.value)),
        Err(ReplyError::X11Error(err)) if err.error_kind == x11rb::protocol::ErrorKind::Window => {
            debug!(window = window, "Window destroyed before title reply, skipping");
            Ok(None)
        }
        Err(err) => Err(err).context(format!("Failed to get title reply for window {}", window)),
    }
}

/// First client window whose title matches exactly
pub fn find_window_by_title(
    conn: &RustConnection,
    screen: &Screen,
    atoms: &CachedAtoms,
    title: &str,
) -> Result<Option<Window>> {
    for window in client_windows(conn, screen, atoms)? {
        if window_title(conn, window, atoms)?.as_deref() == Some(title) {
            return Ok(Some(window));
        }
    }
    Ok(None)
}

/// Raise an X11 window and request focus through _NET_ACTIVE_WINDOW
pub fn activate_window(
    conn: &RustConnection,
    screen: &Screen,
    atoms: &CachedAtoms,
    window: Window,
) -> Result<()> {
    conn.configure_window(
        window,
        &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE),
    )
    .context(format!("Failed to raise window {} to top of stack", window))?;

    let event = ClientMessageEvent {
        response_type: CLIENT_MESSAGE_EVENT,
        format: 32,
        sequence: 0,
        window,
        type_: atoms.net_active_window,
        data: ClientMessageData::from([
            x11::ACTIVE_WINDOW_SOURCE_PAGER,
            x11rb::CURRENT_TIME,
            0,
            0,
            0,
        ]),
    };

    conn.send_event(
        false,
        screen.root,
        EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
        event,
    )
    .context(format!("Failed to send _NET_ACTIVE_WINDOW event for window {}", window))?;

    conn.flush()
        .context("Failed to flush X11 connection after window activation")?;
    Ok(())
}
