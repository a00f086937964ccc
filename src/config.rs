//! Picker configuration
//!
//! `PickerConfig` is the file-backed part (TOML). `PickerProps` is what a
//! host hands to an overlay or picker: the config-derived presentation
//! values plus the callbacks.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::Platform;
use crate::dataset::Category;

/// Callback invoked with the selected emoji
pub type SelectCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback invoked when the dismiss layer is tapped
pub type TapOutsideCallback = Arc<dyn Fn() + Send + Sync>;

/// Which emoji a picker shows in its grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryView {
    /// A single category, whether or not it has been revealed
    Single(Category),
    /// Every revealed category, concatenated in display order
    Revealed,
}

impl Default for CategoryView {
    fn default() -> Self {
        CategoryView::Single(Category::People)
    }
}

impl CategoryView {
    /// Parse from config: "revealed" or a category name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("revealed") {
            return Some(CategoryView::Revealed);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .map(CategoryView::Single)
    }
}

impl<'de> Deserialize<'de> for CategoryView {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CategoryView::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category view: {}", s)))
    }
}

/// Presentation overrides merged over the container's base style
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleOverrides {
    /// Foreground color: hex (#rrggbb) or a named color
    pub fg: Option<String>,
    /// Background color for the dismiss layer
    pub bg: Option<String>,
    /// Inner padding in cells
    pub padding: Option<u16>,
    /// Anything else, passed through untouched to the presentation layer
    #[serde(default)]
    pub extra_style: BTreeMap<String, toml::Value>,
}

impl StyleOverrides {
    /// Overlay `other` on top of `self`; `other` wins where it sets a value
    pub fn merged(&self, other: &StyleOverrides) -> StyleOverrides {
        let mut extra_style = self.extra_style.clone();
        extra_style.extend(other.extra_style.clone());
        StyleOverrides {
            fg: other.fg.clone().or_else(|| self.fg.clone()),
            bg: other.bg.clone().or_else(|| self.bg.clone()),
            padding: other.padding.or(self.padding),
            extra_style,
        }
    }
}

/// Config file structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickerConfig {
    /// Platform override (default: the running platform)
    #[serde(default)]
    pub platform: Option<Platform>,
    /// Grid columns
    #[serde(default = "default_columns")]
    pub columns: u16,
    /// Glyph size used when the host gives none
    #[serde(default = "default_emoji_size")]
    pub default_emoji_size: f32,
    /// Which emoji the grid shows
    #[serde(default)]
    pub category_view: CategoryView,
    /// Full emoji-datasource catalog to use instead of the bundled one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    /// Base container style
    #[serde(default)]
    pub style: StyleOverrides,
}

fn default_columns() -> u16 {
    9
}

fn default_emoji_size() -> f32 {
    17.0
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            platform: None,
            columns: default_columns(),
            default_emoji_size: default_emoji_size(),
            category_view: CategoryView::default(),
            catalog_path: None,
            style: StyleOverrides {
                padding: Some(1),
                ..Default::default()
            },
        }
    }
}

impl PickerConfig {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("picker config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!("loaded picker config from {}", path.display());

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: PickerConfig = toml::from_str(content)?;
        if config.columns == 0 {
            anyhow::bail!("columns must be at least 1");
        }
        // file style only overrides what it sets
        config.style = PickerConfig::default().style.merged(&config.style);
        Ok(config)
    }

    /// The platform to prepare the dataset for
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

/// Host-supplied picker configuration
///
/// The selection callback is a constructor argument, so a picker without
/// one cannot be built.
#[derive(Clone)]
pub struct PickerProps {
    pub on_emoji_selected: SelectCallback,
    pub on_tap_outside: Option<TapOutsideCallback>,
    pub emoji_size: Option<f32>,
    pub style: Option<StyleOverrides>,
    pub category_view: CategoryView,
    pub columns: u16,
    pub default_emoji_size: f32,
    pub base_style: StyleOverrides,
}

impl PickerProps {
    pub fn new(on_emoji_selected: impl Fn(&str) + Send + Sync + 'static) -> Self {
        let config = PickerConfig::default();
        Self {
            on_emoji_selected: Arc::new(on_emoji_selected),
            on_tap_outside: None,
            emoji_size: None,
            style: None,
            category_view: config.category_view,
            columns: config.columns,
            default_emoji_size: config.default_emoji_size,
            base_style: config.style,
        }
    }

    /// Take presentation defaults from a loaded config
    pub fn with_config(mut self, config: &PickerConfig) -> Self {
        self.category_view = config.category_view;
        self.columns = config.columns;
        self.default_emoji_size = config.default_emoji_size;
        self.base_style = config.style.clone();
        self
    }

    pub fn on_tap_outside(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_tap_outside = Some(Arc::new(callback));
        self
    }

    pub fn emoji_size(mut self, size: f32) -> Self {
        self.emoji_size = Some(size);
        self
    }

    pub fn style(mut self, style: StyleOverrides) -> Self {
        self.style = Some(style);
        self
    }

    pub fn category_view(mut self, view: CategoryView) -> Self {
        self.category_view = view;
        self
    }

    /// Glyph size: the host override or the configured default
    pub fn resolved_emoji_size(&self) -> f32 {
        self.emoji_size.unwrap_or(self.default_emoji_size)
    }

    /// Container style: base style with host overrides on top
    pub fn resolved_style(&self) -> StyleOverrides {
        match &self.style {
            Some(style) => self.base_style.merged(style),
            None => self.base_style.clone(),
        }
    }
}

impl fmt::Debug for PickerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickerProps")
            .field("on_tap_outside", &self.on_tap_outside.is_some())
            .field("emoji_size", &self.emoji_size)
            .field("style", &self.style)
            .field("category_view", &self.category_view)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}
