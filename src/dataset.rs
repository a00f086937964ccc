//! Dataset preparation
//!
//! Filters a catalog for a platform, orders it by `sort_order`, groups it
//! into the eight picker categories and decodes every record to its
//! displayable string. The result is immutable and built once.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::Result;
use tracing::{debug, warn};

use crate::catalog::{Catalog, EmojiRecord, Platform};
use crate::codepoint;

/// Short names hidden on non-restricted platforms (no universal glyph)
pub const BLACKLIST: &[&str] = &["white_frowning_face", "keycap_star", "eject"];

/// Picker categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    People,
    Nature,
    Foods,
    Activity,
    Places,
    Objects,
    Symbols,
    Flags,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::People,
        Category::Nature,
        Category::Foods,
        Category::Activity,
        Category::Places,
        Category::Objects,
        Category::Symbols,
        Category::Flags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::People => "People",
            Category::Nature => "Nature",
            Category::Foods => "Foods",
            Category::Activity => "Activity",
            Category::Places => "Places",
            Category::Objects => "Objects",
            Category::Symbols => "Symbols",
            Category::Flags => "Flags",
        }
    }

    /// Parse a catalog category label (exact match)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Position in `Category::ALL`
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded, displayable emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmojiChar(String);

impl EmojiChar {
    /// Decode a catalog record
    pub fn from_record(record: &EmojiRecord) -> Result<Self, codepoint::CodepointError> {
        codepoint::decode(&record.unified).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmojiChar {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmojiChar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a record survives the platform filter
///
/// The restricted platform only checks the support flag; every other
/// platform only checks the blacklist.
pub fn keep_record(record: &EmojiRecord, platform: Platform) -> bool {
    if platform.is_restricted() {
        record.supported_on(platform)
    } else {
        !BLACKLIST.contains(&record.short_name.as_str())
    }
}

/// Emoji grouped by category, each group in `sort_order`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    groups: [Vec<EmojiChar>; 8],
}

impl CategoryIndex {
    /// Emoji in a category (empty if the catalog has none)
    pub fn get(&self, category: Category) -> &[EmojiChar] {
        &self.groups[category.position()]
    }

    /// Categories with their emoji, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[EmojiChar])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Total emoji across all categories
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index built from the bundled catalog, computed once per platform
    pub fn shared(platform: Platform) -> Result<Arc<CategoryIndex>> {
        static CACHE: OnceLock<Mutex<HashMap<Platform, Arc<CategoryIndex>>>> = OnceLock::new();

        let cache = CACHE.get_or_init(Default::default);
        let mut guard = cache
            .lock()
            .map_err(|_| anyhow::anyhow!("category index cache poisoned"))?;

        if let Some(index) = guard.get(&platform) {
            return Ok(index.clone());
        }

        let catalog = Catalog::bundled()?;
        let index = Arc::new(prepare(catalog.records(), platform));
        guard.insert(platform, index.clone());
        Ok(index)
    }
}

/// Build the category index for a platform
///
/// Records outside the eight picker categories and records whose code
/// points fail to decode are skipped.
pub fn prepare(records: &[EmojiRecord], platform: Platform) -> CategoryIndex {
    let mut kept: Vec<(Category, &EmojiRecord)> = records
        .iter()
        .filter(|r| keep_record(r, platform))
        .filter_map(|r| match Category::parse(&r.category) {
            Some(category) => Some((category, r)),
            None => {
                debug!(
                    short_name = %r.short_name,
                    category = %r.category,
                    "skipping emoji outside picker categories"
                );
                None
            }
        })
        .collect();

    // sort_by_key is stable: equal sort_order keeps catalog order
    kept.sort_by_key(|(_, r)| r.sort_order);

    let mut groups: [Vec<EmojiChar>; 8] = Default::default();
    for (category, record) in kept {
        match EmojiChar::from_record(record) {
            Ok(emoji) => groups[category.position()].push(emoji),
            Err(e) => warn!(short_name = %record.short_name, "skipping emoji: {}", e),
        }
    }

    let index = CategoryIndex { groups };
    debug!(
        platform = platform.as_str(),
        total = index.len(),
        "prepared category index"
    );
    index
}
