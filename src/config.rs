//! Unified configuration for bangbang.
//!
//! Settings are read from `bangbang.toml` in the board directory and layered
//! file → environment → CLI. Every section is optional.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! port = 9000
//! board_file = ".bangbang.md"
//!
//! [sync]
//! base_url = "http://localhost:9000"
//!
//! [gesture]
//! max_swipe_ms = 300
//! min_swipe_distance = 50.0
//! edge_margin = 10.0
//!
//! [drag]
//! touch_delay_ms = 150
//! move_threshold = 5.0
//! swap_threshold = 0.5
//! invert_swap = true
//! empty_insert_threshold = 5.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::store::BOARD_FILE_NAME;
use crate::errors::ConfigError;
use crate::reorder::drag::DragConfig;
use crate::reorder::gesture::GestureConfig;

pub const CONFIG_FILE_NAME: &str = "bangbang.toml";

pub const ENV_PORT: &str = "BANGBANG_PORT";
pub const ENV_URL: &str = "BANGBANG_URL";

/// Reference server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Board file name, relative to the board directory
    #[serde(default = "default_board_file")]
    pub board_file: String,
}

fn default_port() -> u16 {
    9000
}

fn default_board_file() -> String {
    BOARD_FILE_NAME.to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            board_file: default_board_file(),
        }
    }
}

/// Where the sync client sends replace-order requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    format!("http://localhost:{}", default_port())
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Touch gesture classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureSection {
    /// Longest touch that still counts as a swipe
    #[serde(default = "default_max_swipe_ms")]
    pub max_swipe_ms: u64,
    /// Shortest horizontal travel that counts as a swipe, in px
    #[serde(default = "default_min_swipe_distance")]
    pub min_swipe_distance: f64,
    /// Touches this close to an item's top edge never start a drag, in px
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
}

fn default_max_swipe_ms() -> u64 {
    300
}

fn default_min_swipe_distance() -> f64 {
    50.0
}

fn default_edge_margin() -> f64 {
    10.0
}

impl Default for GestureSection {
    fn default() -> Self {
        Self {
            max_swipe_ms: default_max_swipe_ms(),
            min_swipe_distance: default_min_swipe_distance(),
            edge_margin: default_edge_margin(),
        }
    }
}

impl GestureSection {
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            max_swipe_time: Duration::from_millis(self.max_swipe_ms),
            min_swipe_distance: self.min_swipe_distance,
            edge_margin: self.edge_margin,
        }
    }
}

/// Drag session activation and drop-target resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragSection {
    /// Hold time before a touch may start dragging
    #[serde(default = "default_touch_delay_ms")]
    pub touch_delay_ms: u64,
    /// Pointer travel required before a drag activates, in px
    #[serde(default = "default_move_threshold")]
    pub move_threshold: f64,
    /// Fraction of a sibling the pointer must cross before swapping
    #[serde(default = "default_swap_threshold")]
    pub swap_threshold: f64,
    /// Measure the swap fraction from the edge the item approaches
    #[serde(default = "default_invert_swap")]
    pub invert_swap: bool,
    /// Extra tolerance around an empty column, in px
    #[serde(default = "default_empty_insert_threshold")]
    pub empty_insert_threshold: f64,
}

fn default_touch_delay_ms() -> u64 {
    150
}

fn default_move_threshold() -> f64 {
    5.0
}

fn default_swap_threshold() -> f64 {
    0.5
}

fn default_invert_swap() -> bool {
    true
}

fn default_empty_insert_threshold() -> f64 {
    5.0
}

impl Default for DragSection {
    fn default() -> Self {
        Self {
            touch_delay_ms: default_touch_delay_ms(),
            move_threshold: default_move_threshold(),
            swap_threshold: default_swap_threshold(),
            invert_swap: default_invert_swap(),
            empty_insert_threshold: default_empty_insert_threshold(),
        }
    }
}

impl DragSection {
    pub fn to_drag_config(&self, edge_margin: f64) -> DragConfig {
        DragConfig {
            touch_delay: Duration::from_millis(self.touch_delay_ms),
            move_threshold: self.move_threshold,
            swap_threshold: self.swap_threshold,
            invert_swap: self.invert_swap,
            empty_insert_threshold: self.empty_insert_threshold,
            edge_margin,
        }
    }
}

/// The complete bangbang.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BangbangToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub gesture: GestureSection,
    #[serde(default)]
    pub drag: DragSection,
}

impl BangbangToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse bangbang.toml")
    }

    /// Load `bangbang.toml` from `dir`, or defaults when it does not exist.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize bangbang.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let drag = &self.drag;
        if !(drag.swap_threshold > 0.0 && drag.swap_threshold <= 1.0) {
            return Err(ConfigError::SwapThreshold(drag.swap_threshold));
        }
        for (field, value) in [
            ("drag.move_threshold", drag.move_threshold),
            ("drag.empty_insert_threshold", drag.empty_insert_threshold),
            ("gesture.min_swipe_distance", self.gesture.min_swipe_distance),
            ("gesture.edge_margin", self.gesture.edge_margin),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.gesture.max_swipe_ms == 0 {
            return Err(ConfigError::ZeroSwipeWindow);
        }
        Ok(())
    }
}

/// Effective configuration: bangbang.toml, then environment, then CLI.
#[derive(Debug, Clone)]
pub struct BangbangConfig {
    /// Board directory holding the board file and bangbang.toml
    pub dir: PathBuf,
    pub toml: BangbangToml,
    pub verbose: bool,
}

impl BangbangConfig {
    pub fn load(dir: PathBuf) -> Result<Self> {
        let toml = BangbangToml::load_or_default(&dir)?;
        let mut config = Self {
            dir,
            toml,
            verbose: false,
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        config.toml.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).and_then(|p| p.parse().ok()) {
            self.toml.server.port = port;
        }
        if let Some(url) = lookup(ENV_URL).filter(|u| !u.is_empty()) {
            self.toml.sync.base_url = url;
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.toml.server.port = port;
        }
        self
    }

    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.toml.sync.base_url = url;
        }
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn board_file(&self) -> PathBuf {
        self.dir.join(&self.toml.server.board_file)
    }

    pub fn port(&self) -> u16 {
        self.toml.server.port
    }

    pub fn base_url(&self) -> &str {
        self.toml.sync.base_url.trim_end_matches('/')
    }

    pub fn gesture(&self) -> GestureConfig {
        self.toml.gesture.to_gesture_config()
    }

    pub fn drag(&self) -> DragConfig {
        self.toml.drag.to_drag_config(self.toml.gesture.edge_margin)
    }
}
