//! Configuration management
//!
//! Loads `config.json` once at startup into an explicitly passed [`Config`].
//! Sections are kept as raw JSON maps for lookup, with typed views on top
//! for the settings the windows and logger actually read.

pub mod settings;

pub use settings::{AppSettings, Config, UiSettings};
