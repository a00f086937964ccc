//! Emoji catalog loading
//!
//! Reads emoji metadata in the emoji-datasource JSON layout. Only the
//! fields the picker needs are kept; everything else in the file is
//! ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

/// Catalog compiled into the binary (a subset of emoji-datasource)
const BUNDLED_JSON: &str = include_str!("../data/emoji.json");

/// Platforms the catalog distinguishes
///
/// `Android` is the restricted variant: an emoji is only offered there
/// when the catalog says Google ships an image for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Desktop => "desktop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "android" => Some(Platform::Android),
            "ios" => Some(Platform::Ios),
            "desktop" => Some(Platform::Desktop),
            _ => None,
        }
    }

    /// Platform of the running process
    pub fn current() -> Self {
        match std::env::consts::OS {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            _ => Platform::Desktop,
        }
    }

    /// Whether this platform filters by support flag instead of blacklist
    pub fn is_restricted(&self) -> bool {
        matches!(self, Platform::Android)
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmojiRecord {
    /// Short name, e.g. "grinning"
    pub short_name: String,
    /// Hyphen-delimited hex code points, e.g. "0039-FE0F-20E3"
    pub unified: String,
    /// Category label, e.g. "People"
    pub category: String,
    /// Global display order
    pub sort_order: u32,
    /// Google ships an image for this emoji (older datasets call it `google`)
    #[serde(rename = "has_img_google", alias = "google", default)]
    pub has_img_google: bool,
}

impl EmojiRecord {
    /// Whether the record is supported on the given platform
    pub fn supported_on(&self, platform: Platform) -> bool {
        match platform {
            Platform::Android => self.has_img_google,
            Platform::Ios | Platform::Desktop => true,
        }
    }
}

/// An ordered list of catalog records, exactly as read
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EmojiRecord>,
}

impl Catalog {
    /// Parse a catalog from emoji-datasource JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<EmojiRecord> =
            serde_json::from_str(json).context("failed to parse emoji catalog")?;
        Ok(Self { records })
    }

    /// The catalog embedded at compile time
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_JSON).context("bundled catalog is invalid")
    }

    /// Load a catalog file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let catalog = Self::from_json(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        info!(
            "loaded {} emoji records from {}",
            catalog.len(),
            path.display()
        );

        Ok(catalog)
    }

    pub fn records(&self) -> &[EmojiRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
