//! Emoji overlay
//!
//! Wraps a picker with a host-controlled visibility flag and a dismiss
//! layer. The picker only exists while the overlay is visible; each show
//! builds a fresh one.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::PickerProps;
use crate::dataset::CategoryIndex;
use crate::picker::{Picker, PickerError, PickerView};
use crate::render::GridLayout;

/// What an overlay draws
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayView {
    /// Off-view, nothing interactive
    Hidden,
    /// Dismiss layer with the picker on top
    Visible { picker: PickerView },
}

/// Result of a positional tap on the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// An emoji was selected
    Selected(usize),
    /// The dismiss layer was hit
    Dismissed,
    /// Hidden overlay
    Ignored,
}

pub struct Overlay {
    props: PickerProps,
    index: Arc<CategoryIndex>,
    picker: Option<Picker>,
}

impl Overlay {
    /// A hidden overlay
    pub fn new(props: PickerProps, index: Arc<CategoryIndex>) -> Self {
        Self {
            props,
            index,
            picker: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.picker.is_some()
    }

    /// Show or hide
    ///
    /// Showing builds and mounts a fresh picker from the overlay's props;
    /// hiding drops the current one. Setting the current value does nothing.
    pub fn set_visible(&mut self, visible: bool) -> Result<(), PickerError> {
        match (visible, self.picker.is_some()) {
            (true, false) => {
                let mut picker = Picker::new(self.props.clone(), self.index.clone());
                picker.mount()?;
                self.picker = Some(picker);
                info!("emoji overlay shown");
            }
            (false, true) => {
                if let Some(mut picker) = self.picker.take() {
                    picker.unmount();
                }
                info!("emoji overlay hidden");
            }
            _ => {}
        }
        Ok(())
    }

    pub fn toggle(&mut self) -> Result<(), PickerError> {
        self.set_visible(!self.is_visible())
    }

    pub fn picker(&self) -> Option<&Picker> {
        self.picker.as_ref()
    }

    pub fn picker_mut(&mut self) -> Option<&mut Picker> {
        self.picker.as_mut()
    }

    pub fn render(&self) -> OverlayView {
        match &self.picker {
            Some(picker) => OverlayView::Visible {
                picker: picker.render_visible(),
            },
            None => OverlayView::Hidden,
        }
    }

    /// Tap on the dismiss layer; false when hidden
    pub fn tap_outside(&self) -> bool {
        if !self.is_visible() {
            return false;
        }
        debug!("tap outside emoji grid");
        if let Some(callback) = &self.props.on_tap_outside {
            callback();
        }
        true
    }

    /// Tap on the `index`th visible emoji
    pub fn tap_emoji(&self, index: usize) -> Result<(), PickerError> {
        match &self.picker {
            Some(picker) => picker.on_tap(index),
            None => Err(PickerError::Hidden),
        }
    }

    /// Route a tap at a terminal cell to the grid or the dismiss layer
    pub fn tap_at(&self, layout: &GridLayout, x: u16, y: u16) -> TapOutcome {
        let Some(picker) = &self.picker else {
            return TapOutcome::Ignored;
        };
        // before mount the grid is an empty placeholder: all dismiss layer
        if !picker.is_mounted() {
            self.tap_outside();
            return TapOutcome::Dismissed;
        }

        match layout.hit(x, y) {
            Some(index) if picker.on_tap(index).is_ok() => TapOutcome::Selected(index),
            _ => {
                self.tap_outside();
                TapOutcome::Dismissed
            }
        }
    }

    pub fn props(&self) -> &PickerProps {
        &self.props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Platform};
    use crate::dataset::{prepare, Category};
    use crate::picker::Lifecycle;
    use crate::render::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn index() -> Arc<CategoryIndex> {
        let catalog = Catalog::bundled().unwrap();
        Arc::new(prepare(catalog.records(), Platform::Ios))
    }

    struct Counters {
        selected: Arc<AtomicUsize>,
        outside: Arc<AtomicUsize>,
    }

    fn overlay() -> (Overlay, Counters) {
        let selected = Arc::new(AtomicUsize::new(0));
        let outside = Arc::new(AtomicUsize::new(0));
        let (s, o) = (selected.clone(), outside.clone());
        let props = PickerProps::new(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        })
        .on_tap_outside(move || {
            o.fetch_add(1, Ordering::SeqCst);
        });
        (Overlay::new(props, index()), Counters { selected, outside })
    }

    #[test]
    fn test_hidden_by_default() {
        let (overlay, counters) = overlay();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.render(), OverlayView::Hidden);
        assert!(!overlay.tap_outside());
        assert_eq!(overlay.tap_emoji(0), Err(PickerError::Hidden));
        assert_eq!(counters.outside.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_show_mounts_picker() {
        let (mut overlay, _) = overlay();
        overlay.set_visible(true).unwrap();

        assert_eq!(
            overlay.render(),
            OverlayView::Visible {
                picker: PickerView::Placeholder
            }
        );

        assert!(overlay.picker_mut().unwrap().ready().await);
        match overlay.render() {
            OverlayView::Visible {
                picker: PickerView::Grid { tiles, .. },
            } => assert!(!tiles.is_empty()),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tap_outside_when_visible() {
        let (mut overlay, counters) = overlay();
        overlay.set_visible(true).unwrap();
        assert!(overlay.tap_outside());
        assert_eq!(counters.outside.load(Ordering::SeqCst), 1);
        assert_eq!(counters.selected.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tap_outside_without_callback() {
        let mut overlay = Overlay::new(PickerProps::new(|_| {}), index());
        overlay.set_visible(true).unwrap();
        assert!(overlay.tap_outside());
    }

    #[tokio::test]
    async fn test_reshow_builds_fresh_picker() {
        let (mut overlay, _) = overlay();
        overlay.set_visible(true).unwrap();
        {
            let picker = overlay.picker_mut().unwrap();
            picker.ready().await;
            picker.advance_category();
            picker.advance_category();
            assert_eq!(picker.revealed().categories().len(), 3);
        }

        overlay.set_visible(false).unwrap();
        assert!(overlay.picker().is_none());

        overlay.set_visible(true).unwrap();
        let picker = overlay.picker().unwrap();
        assert_eq!(picker.revealed().categories(), &[Category::People]);
        assert_eq!(picker.lifecycle(), Lifecycle::Constructed);
    }

    #[tokio::test]
    async fn test_hide_before_mount_fires() {
        let (mut overlay, _) = overlay();
        overlay.set_visible(true).unwrap();
        overlay.set_visible(false).unwrap();

        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(overlay.render(), OverlayView::Hidden);
    }

    #[tokio::test]
    async fn test_set_same_visibility_keeps_picker() {
        let (mut overlay, _) = overlay();
        overlay.set_visible(true).unwrap();
        overlay.picker_mut().unwrap().advance_category();
        overlay.set_visible(true).unwrap();
        assert_eq!(overlay.picker().unwrap().revealed().categories().len(), 2);
    }

    #[tokio::test]
    async fn test_tap_at_routes_by_position() {
        let (mut overlay, counters) = overlay();
        overlay.set_visible(true).unwrap();
        overlay.picker_mut().unwrap().ready().await;

        let layout = GridLayout::new(Rect::full(40, 20), 9, 17.0, 1);
        let cell = layout.cell(2).unwrap();
        assert_eq!(
            overlay.tap_at(&layout, cell.x, cell.y),
            TapOutcome::Selected(2)
        );
        assert_eq!(counters.selected.load(Ordering::SeqCst), 1);

        // padding belongs to the dismiss layer
        assert_eq!(overlay.tap_at(&layout, 0, 0), TapOutcome::Dismissed);
        assert_eq!(counters.outside.load(Ordering::SeqCst), 1);

        // a cell past the last emoji is empty space too
        let empty = layout.cell(100).unwrap();
        assert_eq!(
            overlay.tap_at(&layout, empty.x, empty.y),
            TapOutcome::Dismissed
        );
        assert_eq!(counters.selected.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tap_at_before_mount_dismisses() {
        let (mut overlay, counters) = overlay();
        let layout = GridLayout::new(Rect::full(40, 20), 9, 17.0, 1);
        assert_eq!(overlay.tap_at(&layout, 0, 0), TapOutcome::Ignored);
        assert_eq!(counters.outside.load(Ordering::SeqCst), 0);

        overlay.set_visible(true).unwrap();
        let cell = layout.cell(2).unwrap();
        assert_eq!(
            overlay.tap_at(&layout, cell.x, cell.y),
            TapOutcome::Dismissed
        );
        assert_eq!(counters.outside.load(Ordering::SeqCst), 1);
        assert_eq!(counters.selected.load(Ordering::SeqCst), 0);
    }
}
