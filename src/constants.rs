//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Configuration file location and section names
pub mod config {
    /// Configuration filename, resolved against the working directory
    pub const FILENAME: &str = "config.json";

    pub const SECTION_APP: &str = "app";
    pub const SECTION_UI: &str = "ui";
    pub const SECTION_LABELS: &str = "labels";
    pub const SECTION_PATHS: &str = "paths";
}

/// Log file naming and line formats
pub mod logging {
    /// General log file prefix (`urge_YYYYMMDD.log`)
    pub const GENERAL_PREFIX: &str = "urge";

    /// Inputs log file prefix (`inputs_YYYYMMDD.log`)
    pub const INPUTS_PREFIX: &str = "inputs";

    /// Date stamp embedded in log file names
    pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

    /// Timestamp of general log lines (milliseconds after the comma)
    pub const GENERAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

    /// Timestamp of inputs log lines
    pub const INPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Input event constants (Linux input-event-codes.h)
pub mod input {
    /// Key code for Space
    pub const KEY_SPACE: u16 = 57;

    /// Capacity of the trigger channel between hotkey/tray threads and the UI
    pub const TRIGGER_CHANNEL_CAPACITY: usize = 1;
}

/// X11 protocol constants
pub mod x11 {
    /// Source indication for _NET_ACTIVE_WINDOW (2 = pager/direct user action)
    pub const ACTIVE_WINDOW_SOURCE_PAGER: u32 = 2;

    /// Upper bound on _NET_CLIENT_LIST entries fetched per query
    pub const CLIENT_LIST_MAX: u32 = 1024;

    /// Upper bound (in 32-bit units) on window title property reads
    pub const TITLE_MAX_LEN: u32 = 1024;

    /// Frames to keep re-activating a freshly shown popup while the WM maps it
    pub const ACTIVATION_ATTEMPTS: u8 = 5;
}

/// Popup window constants
pub mod gui {
    /// Title of the label selection window
    pub const LABEL_WINDOW_TITLE: &str = "Select a Label";

    /// Base title of the input window (label appended as " - <label>")
    pub const INPUT_WINDOW_TITLE: &str = "User Input";

    /// Prompt above the label row
    pub const LABEL_PROMPT: &str = "Select a Urge:";

    /// Placeholder inside the input field
    pub const INPUT_PLACEHOLDER: &str = "Enter your text...";

    /// Label window padding (all sides) in pixels
    pub const LABEL_WINDOW_MARGIN: i8 = 20;

    /// Spacing between label columns
    pub const LABEL_COLUMN_SPACING: f32 = 20.0;

    /// Label window height in pixels (width comes from config)
    pub const LABEL_WINDOW_HEIGHT: f32 = 150.0;

    /// Input field padding in pixels
    pub const INPUT_PADDING: i8 = 10;

    /// Reserved width for the trailing clock
    pub const CLOCK_WIDTH: f32 = 50.0;

    /// Gap between the Enter glyph and the clock
    pub const TRAILING_SPACER: f32 = 10.0;

    /// Glyph shown at the trailing edge of the input field
    pub const ENTER_GLYPH: &str = "⏎";

    /// Clock refresh interval
    pub const CLOCK_REFRESH_MS: u64 = 1000;

    /// Idle poll interval while the popup is hidden
    pub const IDLE_POLL_MS: u64 = 250;

    /// Clock display format
    pub const CLOCK_FORMAT: &str = "%H:%M";
}

/// Tray icon constants
pub mod tray {
    pub const ID: &str = "urge";

    pub const TITLE: &str = "Urge";

    /// Edge length of the generated tray pixmap
    pub const ICON_SIZE: i32 = 32;

    /// Tray icon fill (ARGB)
    pub const ICON_ARGB: [u8; 4] = [0xFF, 0xE0, 0x8A, 0x2E];
}

/// Default configuration values
/// These are used when the config file is absent or a key is missing
pub mod defaults {
    pub mod app {
        pub const NAME: &str = "Urge";
        pub const WINDOW_WIDTH: u32 = 600;
        pub const WINDOW_HEIGHT: u32 = 40;
    }

    pub mod ui {
        pub const BACKGROUND_COLOR: &str = "#333";
        pub const TEXT_COLOR: &str = "#fff";
        pub const FONT_SIZE_NORMAL: &str = "14px";
        pub const FONT_SIZE_LARGE: &str = "16px";
    }

    pub mod paths {
        pub const LOGS: &str = "./logs";
        pub const ASSETS: &str = "./assets";
    }

    /// Shortcut key → label text
    pub const LABELS: &[(&str, &str)] = &[
        ("1", "Label 1"),
        ("2", "Label 2"),
        ("3", "Label 3"),
        ("4", "Label 4"),
        ("5", "Label 5"),
    ];
}
