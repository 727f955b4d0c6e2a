//! Popup UI: label selection, text input and the tray icon

mod app;
pub mod flow;
pub mod input_window;
pub mod label_window;
pub mod style;
#[cfg(target_os = "linux")]
mod tray;
mod utils;

pub use app::run_gui;
