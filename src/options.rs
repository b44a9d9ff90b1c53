//! Centralized switcher options with TOML preset support.
//!
//! All tweakable settings (slot spacing, zoom policy, swipe actions,
//! flick friction, animation duration) are consolidated here. Options
//! serialize to/from TOML, and the engine treats a loaded `Options`
//! value as an immutable snapshot: the session controller swaps the
//! whole value when the host signals a configuration change, so "when
//! config changed" stays decoupled from "what config is".

use std::path::Path;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SwipedeckError;

/// Action performed on a committed vertical swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    /// Close the swiped item.
    Close,
    /// Minimize the swiped item on commit.
    Minimize,
    /// Unrecognized action string: do nothing.
    None,
}

impl SwipeAction {
    /// Parse an action name. Unknown values are a silent no-op
    /// (logged at debug level).
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "close" => Self::Close,
            "minimize" => Self::Minimize,
            other => {
                log::debug!("unrecognized swipe action {other:?}, ignoring");
                Self::None
            }
        }
    }
}

/// Action performed on tapping the empty background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundAction {
    /// Ignore the tap, switcher stays active.
    Ignore,
    /// Clear the selection and minimize everything on commit.
    ShowDesktop,
    /// Default: end the switcher with the current selection.
    Commit,
}

impl BackgroundAction {
    /// Parse a background action name. Unknown values get the default
    /// commit semantics.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "ignore" => Self::Ignore,
            "showdesktop" => Self::ShowDesktop,
            _ => Self::Commit,
        }
    }
}

/// Switcher configuration snapshot. All fields use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `spacing`) work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Gap in pixels between carousel slots.
    pub spacing: f64,
    /// Permit upscaling items past 100%.
    pub allow_zoom: bool,
    /// Fraction of the workarea a slot occupies.
    pub window_scale: f64,
    /// Minimize all non-selected items on commit.
    pub minimize_others: bool,
    /// Action name executed on an upward swipe (`close`, `minimize`).
    pub pull_up: String,
    /// Action name executed on a downward swipe (`close`, `minimize`).
    pub pull_down: String,
    /// Action on tapping empty background (`ignore`, `showdesktop`,
    /// anything else commits the current selection).
    pub background_touch: String,
    /// Per-frame flick friction multiplier, in (0, 1).
    pub flick_motion: f64,
    /// Eased transition duration in milliseconds.
    pub duration_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            allow_zoom: false,
            window_scale: 0.6,
            minimize_others: false,
            pull_up: "close".into(),
            pull_down: "minimize".into(),
            background_touch: "ignore".into(),
            flick_motion: 0.97,
            duration_ms: 300,
        }
    }
}

impl Options {
    /// Parsed upward-swipe action.
    #[must_use]
    pub fn up_action(&self) -> SwipeAction {
        SwipeAction::parse(&self.pull_up)
    }

    /// Parsed downward-swipe action.
    #[must_use]
    pub fn down_action(&self) -> SwipeAction {
        SwipeAction::parse(&self.pull_down)
    }

    /// Parsed background-tap action.
    #[must_use]
    pub fn background_action(&self) -> BackgroundAction {
        BackgroundAction::parse(&self.background_touch)
    }

    /// Eased transition duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Generate JSON Schema describing the options surface.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse as TOML.
    pub fn load(path: &Path) -> Result<Self, SwipedeckError> {
        let content = std::fs::read_to_string(path).map_err(SwipedeckError::Io)?;
        toml::from_str(&content)
            .map_err(|e| SwipedeckError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Fails when serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SwipedeckError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SwipedeckError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SwipedeckError::Io)?;
        }
        std::fs::write(path, content).map_err(SwipedeckError::Io)
    }
}
