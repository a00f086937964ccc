//! Emoji picker controller
//!
//! A picker starts out `Constructed` and renders nothing. `mount()`
//! schedules one deferred task on the tokio runtime that flips it to
//! `Ready` on the next scheduling turn, so the first frame is drawn only
//! once layout is known. Categories are revealed one at a time with
//! `advance_category()`. Taps are forwarded to the host callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::config::{CategoryView, PickerProps};
use crate::dataset::{Category, CategoryIndex, EmojiChar};

/// Errors from picker operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("mount requires a running tokio runtime")]
    NoRuntime,
    #[error("picker has been unmounted")]
    Unmounted,
    #[error("picker is not mounted yet")]
    NotMounted,
    #[error("overlay is hidden")]
    Hidden,
    #[error("no emoji at index {index} (visible: {len})")]
    NoSuchEmoji { index: usize, len: usize },
}

/// Picker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Built, deferred mount pending (or not scheduled yet)
    Constructed,
    /// Deferred mount has fired; the grid renders
    Ready,
    /// Torn down
    Unmounted,
}

impl Lifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Constructed => "constructed",
            Lifecycle::Ready => "ready",
            Lifecycle::Unmounted => "unmounted",
        }
    }
}

/// Categories made available to the view so far
///
/// Always a non-empty prefix of `Category::ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealState {
    len: usize,
}

impl Default for RevealState {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealState {
    /// Only the first category revealed
    pub fn new() -> Self {
        Self { len: 1 }
    }

    pub fn categories(&self) -> &'static [Category] {
        &Category::ALL[..self.len]
    }

    /// Reveal the next category; false once everything is revealed
    pub fn advance(&mut self) -> bool {
        if self.len < Category::ALL.len() {
            self.len += 1;
            true
        } else {
            false
        }
    }

    pub fn is_complete(&self) -> bool {
        self.len == Category::ALL.len()
    }

    pub fn contains(&self, category: Category) -> bool {
        category.position() < self.len
    }
}

/// One tappable grid entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiTile {
    /// Position in the visible sequence (what `on_tap` takes)
    pub index: usize,
    pub emoji: EmojiChar,
}

/// What a picker draws
#[derive(Debug, Clone, PartialEq)]
pub enum PickerView {
    /// Not mounted yet: an empty container
    Placeholder,
    Grid {
        categories: Vec<Category>,
        tiles: Vec<EmojiTile>,
        emoji_size: f32,
        columns: u16,
    },
}

impl PickerView {
    pub fn tiles(&self) -> &[EmojiTile] {
        match self {
            PickerView::Placeholder => &[],
            PickerView::Grid { tiles, .. } => tiles,
        }
    }
}

/// The pending deferred mount
struct MountTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Picker controller
pub struct Picker {
    props: PickerProps,
    index: Arc<CategoryIndex>,
    revealed: RevealState,
    mounted: Arc<AtomicBool>,
    mount_task: Option<MountTask>,
    torn_down: bool,
}

impl Picker {
    pub fn new(props: PickerProps, index: Arc<CategoryIndex>) -> Self {
        Self {
            props,
            index,
            revealed: RevealState::new(),
            mounted: Arc::new(AtomicBool::new(false)),
            mount_task: None,
            torn_down: false,
        }
    }

    /// Schedule the deferred mount
    ///
    /// Scheduling again while a mount is pending or done is a no-op.
    #[instrument(skip(self))]
    pub fn mount(&mut self) -> Result<(), PickerError> {
        if self.torn_down {
            return Err(PickerError::Unmounted);
        }
        if self.mount_task.is_some() || self.is_mounted() {
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| PickerError::NoRuntime)?;

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let mounted = self.mounted.clone();

        let handle = runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("deferred mount cancelled");
                }
                _ = tokio::task::yield_now() => {
                    // may have been cancelled while enqueued
                    if !token.is_cancelled() {
                        mounted.store(true, Ordering::Release);
                        debug!("picker mounted");
                    }
                }
            }
        });

        self.mount_task = Some(MountTask { cancel, handle });
        Ok(())
    }

    /// Wait for the deferred mount to run, returning whether it mounted
    pub async fn ready(&mut self) -> bool {
        // only released once finished; unmount must still reach it if
        // this future is dropped mid-await
        if let Some(task) = self.mount_task.as_mut() {
            let _ = (&mut task.handle).await;
            self.mount_task = None;
        }
        self.is_mounted()
    }

    /// Tear down: cancel a pending mount
    pub fn unmount(&mut self) {
        if let Some(task) = self.mount_task.take() {
            task.cancel.cancel();
            task.handle.abort();
        }
        if !self.torn_down {
            debug!(
                from = self.lifecycle().as_str(),
                revealed = self.revealed.categories().len(),
                "picker unmounted"
            );
        }
        self.torn_down = true;
    }

    pub fn is_mounted(&self) -> bool {
        !self.torn_down && self.mounted.load(Ordering::Acquire)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.torn_down {
            Lifecycle::Unmounted
        } else if self.is_mounted() {
            Lifecycle::Ready
        } else {
            Lifecycle::Constructed
        }
    }

    pub fn revealed(&self) -> &RevealState {
        &self.revealed
    }

    /// Reveal one more category, if any remain
    pub fn advance_category(&mut self) -> bool {
        let advanced = self.revealed.advance();
        if advanced {
            debug!(
                count = self.revealed.categories().len(),
                "revealed category"
            );
        }
        advanced
    }

    /// Categories the grid currently shows
    pub fn visible_categories(&self) -> Vec<Category> {
        match self.props.category_view {
            CategoryView::Single(category) => vec![category],
            CategoryView::Revealed => self.revealed.categories().to_vec(),
        }
    }

    /// Emoji the grid currently shows, in order
    pub fn visible(&self) -> Vec<&EmojiChar> {
        self.visible_categories()
            .into_iter()
            .flat_map(|c| self.index.get(c))
            .collect()
    }

    pub fn render_visible(&self) -> PickerView {
        if !self.is_mounted() {
            return PickerView::Placeholder;
        }

        let tiles = self
            .visible()
            .into_iter()
            .enumerate()
            .map(|(index, emoji)| EmojiTile {
                index,
                emoji: emoji.clone(),
            })
            .collect();

        PickerView::Grid {
            categories: self.visible_categories(),
            tiles,
            emoji_size: self.props.resolved_emoji_size(),
            columns: self.props.columns,
        }
    }

    /// Forward a tap on the `index`th visible emoji to the host
    pub fn on_tap(&self, index: usize) -> Result<(), PickerError> {
        if self.torn_down {
            return Err(PickerError::Unmounted);
        }
        if !self.is_mounted() {
            return Err(PickerError::NotMounted);
        }

        let visible = self.visible();
        let emoji = visible.get(index).ok_or(PickerError::NoSuchEmoji {
            index,
            len: visible.len(),
        })?;

        debug!(index, emoji = emoji.as_str(), "emoji selected");
        (self.props.on_emoji_selected)(emoji.as_str());
        Ok(())
    }

    pub fn props(&self) -> &PickerProps {
        &self.props
    }
}

impl Drop for Picker {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Platform};
    use crate::dataset::prepare;
    use std::sync::Mutex;

    fn index() -> Arc<CategoryIndex> {
        let catalog = Catalog::bundled().unwrap();
        Arc::new(prepare(catalog.records(), Platform::Desktop))
    }

    fn recording_props() -> (PickerProps, Arc<Mutex<Vec<String>>>) {
        let selected = Arc::new(Mutex::new(Vec::new()));
        let sink = selected.clone();
        let props = PickerProps::new(move |emoji| sink.lock().unwrap().push(emoji.to_string()));
        (props, selected)
    }

    #[test]
    fn test_reveal_state_prefix() {
        let mut state = RevealState::new();
        assert_eq!(state.categories(), &[Category::People]);
        assert!(state.contains(Category::People));
        assert!(!state.contains(Category::Nature));

        for _ in 0..7 {
            assert!(state.advance());
        }
        assert!(state.is_complete());
        assert_eq!(state.categories(), &Category::ALL);

        assert!(!state.advance());
        assert_eq!(state.categories(), &Category::ALL);
    }

    #[test]
    fn test_advance_category_steps() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());

        assert!(picker.advance_category());
        assert_eq!(
            picker.revealed().categories(),
            &[Category::People, Category::Nature]
        );
    }

    #[test]
    fn test_placeholder_before_mount() {
        let (props, _) = recording_props();
        let picker = Picker::new(props, index());
        assert_eq!(picker.lifecycle(), Lifecycle::Constructed);
        assert_eq!(picker.render_visible(), PickerView::Placeholder);
        assert_eq!(picker.on_tap(0), Err(PickerError::NotMounted));
    }

    #[test]
    fn test_mount_without_runtime() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());
        assert_eq!(picker.mount(), Err(PickerError::NoRuntime));
    }

    #[tokio::test]
    async fn test_mount_is_deferred() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());

        picker.mount().unwrap();
        // nothing has yielded to the runtime yet
        assert!(!picker.is_mounted());

        assert!(picker.ready().await);
        assert_eq!(picker.lifecycle(), Lifecycle::Ready);
    }

    #[tokio::test]
    async fn test_mount_twice_is_noop() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());

        picker.mount().unwrap();
        picker.mount().unwrap();
        assert!(picker.ready().await);
        picker.mount().unwrap();
        assert!(picker.is_mounted());
        assert!(picker.ready().await);
    }

    #[tokio::test]
    async fn test_unmount_cancels_pending_mount() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());
        let flag = picker.mounted.clone();

        picker.mount().unwrap();
        picker.unmount();

        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(!flag.load(Ordering::Acquire));
        assert_eq!(picker.lifecycle(), Lifecycle::Unmounted);
        assert_eq!(picker.mount(), Err(PickerError::Unmounted));
    }

    #[tokio::test]
    async fn test_abandoned_ready_still_cancelled_by_unmount() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());
        let flag = picker.mounted.clone();

        picker.mount().unwrap();
        {
            let mut ready = tokio_test::task::spawn(picker.ready());
            tokio_test::assert_pending!(ready.poll());
        }
        picker.unmount();

        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(!flag.load(Ordering::Acquire));
        assert_eq!(picker.lifecycle(), Lifecycle::Unmounted);
    }

    #[test]
    fn test_lifecycle_names() {
        assert_eq!(Lifecycle::Constructed.as_str(), "constructed");
        assert_eq!(Lifecycle::Ready.as_str(), "ready");
        assert_eq!(Lifecycle::Unmounted.as_str(), "unmounted");
    }

    #[tokio::test]
    async fn test_drop_cancels_pending_mount() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props, index());
        let flag = picker.mounted.clone();

        picker.mount().unwrap();
        drop(picker);

        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert!(!flag.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_tap_forwards_visible_emoji() {
        let (props, selected) = recording_props();
        let index = index();
        let mut picker = Picker::new(props, index.clone());
        picker.mount().unwrap();
        picker.ready().await;

        let people = index.get(Category::People);
        picker.on_tap(3).unwrap();

        assert_eq!(*selected.lock().unwrap(), vec![people[3].to_string()]);
        assert_eq!(picker.revealed().categories(), &[Category::People]);
        assert!(picker.is_mounted());
    }

    #[tokio::test]
    async fn test_tap_out_of_range() {
        let (props, selected) = recording_props();
        let index = index();
        let len = index.get(Category::People).len();
        let mut picker = Picker::new(props, index);
        picker.mount().unwrap();
        picker.ready().await;

        assert_eq!(
            picker.on_tap(len),
            Err(PickerError::NoSuchEmoji { index: len, len })
        );
        assert!(selected.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_view_ignores_reveal() {
        let (props, _) = recording_props();
        let index = index();
        let mut picker = Picker::new(props, index.clone());
        picker.mount().unwrap();
        picker.ready().await;

        picker.advance_category();
        let view = picker.render_visible();
        assert_eq!(view.tiles().len(), index.get(Category::People).len());
    }

    #[tokio::test]
    async fn test_revealed_view_concatenates() {
        let (props, selected) = recording_props();
        let props = props.category_view(CategoryView::Revealed);
        let index = index();
        let mut picker = Picker::new(props, index.clone());
        picker.mount().unwrap();
        picker.ready().await;
        picker.advance_category();

        let people = index.get(Category::People);
        let nature = index.get(Category::Nature);
        let view = picker.render_visible();
        assert_eq!(view.tiles().len(), people.len() + nature.len());
        match &view {
            PickerView::Grid { categories, .. } => {
                assert_eq!(categories, &vec![Category::People, Category::Nature]);
            }
            PickerView::Placeholder => panic!("expected grid"),
        }

        // first Nature emoji sits right after the last People emoji
        picker.on_tap(people.len()).unwrap();
        assert_eq!(*selected.lock().unwrap(), vec![nature[0].to_string()]);
    }

    #[tokio::test]
    async fn test_grid_carries_presentation() {
        let (props, _) = recording_props();
        let mut picker = Picker::new(props.emoji_size(32.0), index());
        picker.mount().unwrap();
        picker.ready().await;

        match picker.render_visible() {
            PickerView::Grid {
                emoji_size,
                columns,
                tiles,
                ..
            } => {
                assert_eq!(emoji_size, 32.0);
                assert_eq!(columns, 9);
                assert!(tiles.iter().enumerate().all(|(i, t)| t.index == i));
            }
            PickerView::Placeholder => panic!("expected grid"),
        }
    }
}
