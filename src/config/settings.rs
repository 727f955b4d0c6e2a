//! JSON-backed application configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::constants::config::{FILENAME, SECTION_APP, SECTION_LABELS, SECTION_PATHS, SECTION_UI};
use crate::constants::defaults;
use crate::error::AppError;

/// One config section: key → JSON value
pub type Section = Map<String, Value>;

static EMPTY_SECTION: LazyLock<Section> = LazyLock::new(Section::new);

/// Section name → key → value, read-only after load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    sections: BTreeMap<String, Section>,
}

/// `app` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub name: String,
    pub window_width: u32,
    pub window_height: u32,
}

/// `ui` section, still in config notation (`"#333"`, `"14px"`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSettings {
    pub background_color: String,
    pub text_color: String,
    pub font_size_normal: String,
    pub font_size_large: String,
}

/// `paths` section with `~/` expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    pub logs: PathBuf,
    pub assets: PathBuf,
}

impl Config {
    /// Fixed location of the config file, relative to the working directory
    pub fn path() -> PathBuf {
        PathBuf::from(FILENAME)
    }

    /// Load from [`Config::path`]
    pub fn load_default_location() -> Result<Self, AppError> {
        Self::load(&Self::path())
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the built-in defaults. A file that exists but
    /// cannot be read or parsed is a [`AppError::ConfigLoad`].
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using built-in defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::ConfigLoad {
                    path: path.to_path_buf(),
                    source: anyhow::Error::new(e).context("Failed to read config file"),
                });
            }
        };

        let config = Self::parse(&contents).map_err(|source| AppError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            sections = config.sections.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Parse a JSON document of the form `{"section": {"key": value}}`
    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config JSON")
    }

    /// Whole section, or an empty map when the section is absent
    pub fn section(&self, name: &str) -> &Section {
        self.sections.get(name).unwrap_or(&EMPTY_SECTION)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.section(section).get(key)
    }

    fn get_u32(&self, section: &str, key: &str, default: u32) -> u32 {
        match self.get(section, key) {
            Some(value) => match value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(v) => v,
                None => {
                    warn!(section, key, value = %value, "Expected an unsigned integer, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        match self.get(section, key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                warn!(section, key, value = %other, "Expected a string, using default");
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    pub fn app(&self) -> AppSettings {
        AppSettings {
            name: self.get_string(SECTION_APP, "name", defaults::app::NAME),
            window_width: self.get_u32(SECTION_APP, "window_width", defaults::app::WINDOW_WIDTH),
            window_height: self.get_u32(SECTION_APP, "window_height", defaults::app::WINDOW_HEIGHT),
        }
    }

    pub fn ui(&self) -> UiSettings {
        UiSettings {
            background_color: self.get_string(SECTION_UI, "background_color", defaults::ui::BACKGROUND_COLOR),
            text_color: self.get_string(SECTION_UI, "text_color", defaults::ui::TEXT_COLOR),
            font_size_normal: self.get_string(SECTION_UI, "font_size_normal", defaults::ui::FONT_SIZE_NORMAL),
            font_size_large: self.get_string(SECTION_UI, "font_size_large", defaults::ui::FONT_SIZE_LARGE),
        }
    }

    pub fn paths(&self) -> PathSettings {
        PathSettings {
            logs: expand_home(&self.get_string(SECTION_PATHS, "logs", defaults::paths::LOGS)),
            assets: expand_home(&self.get_string(SECTION_PATHS, "assets", defaults::paths::ASSETS)),
        }
    }

    /// Label shortcuts in file order. Non-string values are shown as their JSON text.
    pub fn labels(&self) -> Vec<(String, String)> {
        self.section(SECTION_LABELS)
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut sections = BTreeMap::new();

        let mut app = Section::new();
        app.insert("name".into(), Value::from(defaults::app::NAME));
        app.insert("window_width".into(), Value::from(defaults::app::WINDOW_WIDTH));
        app.insert("window_height".into(), Value::from(defaults::app::WINDOW_HEIGHT));
        sections.insert(SECTION_APP.to_string(), app);

        let mut ui = Section::new();
        ui.insert("background_color".into(), Value::from(defaults::ui::BACKGROUND_COLOR));
        ui.insert("text_color".into(), Value::from(defaults::ui::TEXT_COLOR));
        ui.insert("font_size_normal".into(), Value::from(defaults::ui::FONT_SIZE_NORMAL));
        ui.insert("font_size_large".into(), Value::from(defaults::ui::FONT_SIZE_LARGE));
        sections.insert(SECTION_UI.to_string(), ui);

        let labels = defaults::LABELS
            .iter()
            .map(|(key, text)| (key.to_string(), Value::from(*text)))
            .collect();
        sections.insert(SECTION_LABELS.to_string(), labels);

        let mut paths = Section::new();
        paths.insert("logs".into(), Value::from(defaults::paths::LOGS));
        paths.insert("assets".into(), Value::from(defaults::paths::ASSETS));
        sections.insert(SECTION_PATHS.to_string(), paths);

        Self { sections }
    }
}

/// Expand a leading `~/` against the home directory
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
