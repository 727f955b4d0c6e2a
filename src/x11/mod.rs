//! X11 utilities and cached state
//!
//! Helpers for locating the popup's own top-level window by title and
//! asking the window manager to raise and focus it.

mod context;
mod window;

pub use context::CachedAtoms;
pub use window::{activate_window, find_window_by_title};
