use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Engine defaults
pub const DEFAULT_EPSILON: f64 = 0.1;
pub const DEFAULT_DRAG_EASE: f64 = 1.0;
pub const DEFAULT_FRICTION: f64 = 0.95;
pub const DEFAULT_PAGE_SWITCH_THRESHOLD: f64 = 40.0;
pub const DEFAULT_PAGE_SWITCH_DRAG_DAMP: f64 = 0.3;
pub const DEFAULT_PAGE_SNAP_EASE: f64 = 5.0;
pub const DEFAULT_PAGE_BOUNCE_EASE: f64 = 3.5;
pub const DEFAULT_PAGE_SNAP_FRICTION: f64 = 0.9;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub roller: RollerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Frame interval in milliseconds for paced playback
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            frame_ms: default_frame_ms(),
        }
    }
}

/// Physical constants and initial state of a roller.
///
/// Immutable once handed to the engine; the engine keeps it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollerConfig {
    /// Distance under which motion is considered settled
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Smoothing divisor while dragging (1.0 = follow the finger exactly)
    #[serde(default = "default_drag_ease")]
    pub drag_ease: f64,
    /// Per-tick momentum decay (0.0-1.0)
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Overscroll past a page bound needed to switch page on release
    #[serde(default = "default_page_switch_threshold")]
    pub page_switch_threshold: f64,
    /// How much drag overextension past a bound is kept (0.0-1.0)
    #[serde(default = "default_page_switch_drag_damp")]
    pub page_switch_drag_damp: f64,
    /// Smoothing divisor while not dragging
    #[serde(default = "default_page_snap_ease")]
    pub page_snap_ease: f64,
    /// Divisor for the elastic pull back into bounds
    #[serde(default = "default_page_bounce_ease")]
    pub page_bounce_ease: f64,
    /// Extra momentum decay applied while out of bounds
    #[serde(default = "default_page_snap_friction")]
    pub page_snap_friction: f64,
    /// Use the horizontal drag component instead of the vertical one
    #[serde(default)]
    pub horizontal: bool,
    /// Start enabled
    #[serde(default)]
    pub enabled: bool,
    /// Initial page index
    #[serde(default)]
    pub current_page: usize,
    /// Global upper bound, used without paging
    #[serde(default)]
    pub upper_bound: f64,
    /// Global lower bound, used without paging
    #[serde(default)]
    pub lower_bound: f64,
    /// Page table; `None` disables paging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            drag_ease: default_drag_ease(),
            friction: default_friction(),
            page_switch_threshold: default_page_switch_threshold(),
            page_switch_drag_damp: default_page_switch_drag_damp(),
            page_snap_ease: default_page_snap_ease(),
            page_bounce_ease: default_page_bounce_ease(),
            page_snap_friction: default_page_snap_friction(),
            horizontal: false,
            enabled: false,
            current_page: 0,
            upper_bound: 0.0,
            lower_bound: 0.0,
            pages: None,
        }
    }
}

/// A page region. Missing bounds resolve to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
}

impl Page {
    pub fn new(upper_bound: f64, lower_bound: f64) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            lower_bound: Some(lower_bound),
        }
    }

    pub fn upper(&self) -> f64 {
        self.upper_bound.unwrap_or(0.0)
    }

    pub fn lower(&self) -> f64 {
        self.lower_bound.unwrap_or(0.0)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_ms() -> u64 {
    16 // ~60fps
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_drag_ease() -> f64 {
    DEFAULT_DRAG_EASE
}

fn default_friction() -> f64 {
    DEFAULT_FRICTION
}

fn default_page_switch_threshold() -> f64 {
    DEFAULT_PAGE_SWITCH_THRESHOLD
}

fn default_page_switch_drag_damp() -> f64 {
    DEFAULT_PAGE_SWITCH_DRAG_DAMP
}

fn default_page_snap_ease() -> f64 {
    DEFAULT_PAGE_SNAP_EASE
}

fn default_page_bounce_ease() -> f64 {
    DEFAULT_PAGE_BOUNCE_EASE
}

fn default_page_snap_friction() -> f64 {
    DEFAULT_PAGE_SNAP_FRICTION
}

impl RollerConfig {
    /// Check the constants for values the engine cannot work with.
    ///
    /// Inverted global bounds are not rejected here; the engine reports
    /// them while ticking.
    pub fn validate(&self) -> crate::Result<()> {
        let finite = [
            ("epsilon", self.epsilon),
            ("drag_ease", self.drag_ease),
            ("friction", self.friction),
            ("page_switch_threshold", self.page_switch_threshold),
            ("page_switch_drag_damp", self.page_switch_drag_damp),
            ("page_snap_ease", self.page_snap_ease),
            ("page_bounce_ease", self.page_bounce_ease),
            ("page_snap_friction", self.page_snap_friction),
            ("upper_bound", self.upper_bound),
            ("lower_bound", self.lower_bound),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(crate::Error::Config(format!("{name} must be finite, got {value}")));
            }
        }

        for (name, value) in [
            ("epsilon", self.epsilon),
            ("drag_ease", self.drag_ease),
            ("page_snap_ease", self.page_snap_ease),
            ("page_bounce_ease", self.page_bounce_ease),
        ] {
            if value <= 0.0 {
                return Err(crate::Error::Config(format!("{name} must be positive, got {value}")));
            }
        }

        for (name, value) in [
            ("friction", self.friction),
            ("page_switch_drag_damp", self.page_switch_drag_damp),
            ("page_snap_friction", self.page_snap_friction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!(
                    "{name} must be within 0.0-1.0, got {value}"
                )));
            }
        }

        if let Some(pages) = &self.pages {
            validate_pages(pages)?;
            if self.current_page >= pages.len() {
                return Err(crate::Error::PageOutOfRange {
                    page: self.current_page,
                    len: pages.len(),
                });
            }
        }

        Ok(())
    }
}

pub(crate) fn validate_pages(pages: &[Page]) -> crate::Result<()> {
    if pages.is_empty() {
        return Err(crate::Error::EmptyPages);
    }
    let all_finite = pages.iter().all(|p| p.upper().is_finite() && p.lower().is_finite());
    if !all_finite {
        return Err(crate::Error::Config("page bounds must be finite".to_string()));
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.roller.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/roller/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("roller")
            .join("config.toml")
    }
}
