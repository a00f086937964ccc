//! emoji-overlay - emoji picker overlay with progressive category reveal
//!
//! The dataset side (`catalog`, `codepoint`, `dataset`) turns an emoji
//! catalog into a read-only `CategoryIndex` once. The view side
//! (`picker`, `overlay`, `render`) reads from it and forwards taps to the
//! host. The demo binary is in `main.rs`.

pub mod catalog;
pub mod codepoint;
pub mod config;
pub mod dataset;
pub mod overlay;
pub mod paths;
pub mod picker;
pub mod render;

pub use catalog::{Catalog, EmojiRecord, Platform};
pub use config::{CategoryView, PickerConfig, PickerProps, StyleOverrides};
pub use dataset::{prepare, Category, CategoryIndex, EmojiChar};
pub use overlay::{Overlay, OverlayView, TapOutcome};
pub use picker::{Lifecycle, Picker, PickerError, PickerView, RevealState};
