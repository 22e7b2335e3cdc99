//! Wizard configuration: defaults, name table, and generation timing.
//!
//! ```
//! use mapbuilder_logic::config::{validate_config, WizardConfig};
//!
//! let config = WizardConfig::from_json(r#"{ "generation_delay_secs": 0.5 }"#).unwrap();
//! assert_eq!(config.generation_delay_secs, 0.5);
//! assert_eq!(config.room_names.len(), 10);
//! assert!(validate_config(&config).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::details::{ProjectDetails, MAX_FLOORS, MIN_FLOORS};
use crate::generation::PLACEHOLDER_IMAGE;
use crate::plot::{PlotSize, RoomCount};
use crate::rooms::ROOM_NAMES;

/// Session-level settings. Every field has a default, so a partial JSON
/// document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Plot shown when a session starts or is reset.
    pub default_plot: PlotSize,
    pub default_room_count: RoomCount,
    pub default_details: ProjectDetails,
    /// Names given to rooms in order; rooms past the end get `Room N`.
    pub room_names: Vec<String>,
    /// Image returned by the placeholder backend.
    pub placeholder_image: String,
    /// Simulated backend latency.
    pub generation_delay_secs: f32,
    /// A request still pending after this long fails.
    pub generation_timeout_secs: f32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_plot: PlotSize::default(),
            default_room_count: RoomCount::default(),
            default_details: ProjectDetails::default(),
            room_names: ROOM_NAMES.iter().map(|s| s.to_string()).collect(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            generation_delay_secs: 2.0,
            generation_timeout_secs: 30.0,
        }
    }
}

impl WizardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: WizardConfig = serde_json::from_str(text)?;
        let issues = validate_config(&config);
        if issues.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// A single problem found by [`validate_config`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssue {
    InvalidDefaultPlot(PlotSize),
    InvalidDefaultRoomCount(usize),
    /// Default plot has fewer cells than the default room count.
    DefaultPlotTooSmall { cells: usize, rooms: usize },
    InvalidDefaultFloors(u8),
    EmptyRoomName(usize),
    EmptyPlaceholderImage,
    NegativeDelay(f32),
    /// Timeout must leave room for the simulated delay.
    TimeoutNotAfterDelay { delay: f32, timeout: f32 },
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigIssue::InvalidDefaultPlot(p) => {
                write!(f, "default plot {}x{} is out of range", p.width, p.height)
            }
            ConfigIssue::InvalidDefaultRoomCount(n) => {
                write!(f, "default room count {} is out of range", n)
            }
            ConfigIssue::DefaultPlotTooSmall { cells, rooms } => {
                write!(f, "default plot has {} cells for {} rooms", cells, rooms)
            }
            ConfigIssue::InvalidDefaultFloors(n) => {
                write!(f, "default floor count {} is out of range", n)
            }
            ConfigIssue::EmptyRoomName(i) => write!(f, "room name #{} is empty", i + 1),
            ConfigIssue::EmptyPlaceholderImage => write!(f, "placeholder image is empty"),
            ConfigIssue::NegativeDelay(d) => write!(f, "generation delay {} is negative", d),
            ConfigIssue::TimeoutNotAfterDelay { delay, timeout } => write!(
                f,
                "generation timeout {} must exceed delay {}",
                timeout, delay
            ),
        }
    }
}

/// Validate a configuration, returning all issues found.
pub fn validate_config(config: &WizardConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if !config.default_plot.is_valid() {
        issues.push(ConfigIssue::InvalidDefaultPlot(config.default_plot));
    }
    let rooms = config.default_room_count.get();
    if RoomCount::new(rooms as i32).is_none() {
        issues.push(ConfigIssue::InvalidDefaultRoomCount(rooms));
    }
    if !config.default_plot.fits(rooms) {
        issues.push(ConfigIssue::DefaultPlotTooSmall {
            cells: config.default_plot.cell_count(),
            rooms,
        });
    }
    let floors = config.default_details.floors;
    if !(MIN_FLOORS..=MAX_FLOORS).contains(&floors) {
        issues.push(ConfigIssue::InvalidDefaultFloors(floors));
    }
    for (i, name) in config.room_names.iter().enumerate() {
        if name.trim().is_empty() {
            issues.push(ConfigIssue::EmptyRoomName(i));
        }
    }
    if config.placeholder_image.trim().is_empty() {
        issues.push(ConfigIssue::EmptyPlaceholderImage);
    }
    if config.generation_delay_secs < 0.0 {
        issues.push(ConfigIssue::NegativeDelay(config.generation_delay_secs));
    }
    if config.generation_timeout_secs <= config.generation_delay_secs {
        issues.push(ConfigIssue::TimeoutNotAfterDelay {
            delay: config.generation_delay_secs,
            timeout: config.generation_timeout_secs,
        });
    }

    issues
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(Vec<ConfigIssue>),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(issues) => {
                let list: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
                write!(f, "Invalid config: {}", list.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
