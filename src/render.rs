//! Terminal presentation
//!
//! Lays the picker grid out in terminal cells, maps cell coordinates back
//! to tiles for hit testing, and formats the overlay as styled lines.

use crossterm::style::{Color, Stylize};
use unicode_display_width::width as display_width;

use crate::config::StyleOverrides;
use crate::overlay::OverlayView;
use crate::picker::PickerView;

/// A rectangular region in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full terminal
    pub fn full(cols: u16, rows: u16) -> Self {
        Self::new(0, 0, cols, rows)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by the same margin on every side
    pub fn inset(&self, margin: u16) -> Self {
        Self {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            width: self.width.saturating_sub(margin.saturating_mul(2)),
            height: self.height.saturating_sub(margin.saturating_mul(2)),
        }
    }
}

/// Grid geometry for a picker view inside an area
///
/// Row 0 of the inner area holds the category header; tiles start on the
/// row below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    inner: Rect,
    columns: u16,
    cell_width: u16,
}

impl GridLayout {
    /// Rows taken by the category header
    const HEADER_ROWS: u16 = 1;

    pub fn new(area: Rect, columns: u16, emoji_size: f32, padding: u16) -> Self {
        let inner = area.inset(padding);
        let columns = columns.max(1);
        Self {
            inner,
            columns,
            cell_width: (inner.width / columns).max(min_cell_width(emoji_size)),
        }
    }

    /// Layout for a rendered picker view (None for the placeholder)
    pub fn for_view(area: Rect, view: &PickerView, style: &StyleOverrides) -> Option<Self> {
        match view {
            PickerView::Placeholder => None,
            PickerView::Grid {
                emoji_size,
                columns,
                ..
            } => Some(Self::new(
                area,
                *columns,
                *emoji_size,
                style.padding.unwrap_or(0),
            )),
        }
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    /// Cell occupied by the tile at `index`, if it fits the area
    pub fn cell(&self, index: usize) -> Option<Rect> {
        let columns = usize::from(self.columns);
        let col = u16::try_from(index % columns).ok()?;
        let row = u16::try_from(index / columns).ok()?;

        let x = self.inner.x.checked_add(col.checked_mul(self.cell_width)?)?;
        let y = self
            .inner
            .y
            .checked_add(Self::HEADER_ROWS)?
            .checked_add(row)?;

        if y >= self.inner.bottom() {
            return None;
        }
        Some(Rect::new(x, y, self.cell_width, 1))
    }

    /// Tile index under a terminal cell, if any
    ///
    /// Does not know how many tiles exist; callers check the bound.
    pub fn hit(&self, x: u16, y: u16) -> Option<usize> {
        // narrow areas let the last columns spill past the right edge
        let top = self.inner.y.saturating_add(Self::HEADER_ROWS);
        if x < self.inner.x || y < top || y >= self.inner.bottom() {
            return None;
        }

        let col = (x - self.inner.x) / self.cell_width;
        if col >= self.columns {
            return None;
        }
        let row = y - top;
        Some(usize::from(row) * usize::from(self.columns) + usize::from(col))
    }

    /// Tiles that fit in the area
    pub fn capacity(&self) -> usize {
        let rows = self.inner.height.saturating_sub(Self::HEADER_ROWS);
        usize::from(rows) * usize::from(self.columns)
    }
}

/// Narrowest cell for a glyph size (emoji are two columns wide)
fn min_cell_width(emoji_size: f32) -> u16 {
    let cells = (emoji_size / 8.0).ceil();
    if cells.is_finite() && cells > 2.0 {
        cells.min(f32::from(u16::MAX)) as u16
    } else {
        2
    }
}

/// Parse a color: hex (#rrggbb) or a basic name
pub fn parse_color(s: &str) -> Option<Color> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        return Some(Color::Rgb { r, g, b });
    }

    Some(match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "white" => Color::White,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "grey" | "gray" => Color::Grey,
        "darkgrey" | "darkgray" => Color::DarkGrey,
        _ => return None,
    })
}

/// Pad `text` with spaces to `width` display columns
fn pad(text: &str, width: u16) -> String {
    let used = display_width(text) as usize;
    let fill = usize::from(width).saturating_sub(used);
    format!("{}{}", text, " ".repeat(fill))
}

/// Category header, e.g. "People · Nature"
fn header(view: &PickerView) -> String {
    match view {
        PickerView::Placeholder => String::new(),
        PickerView::Grid { categories, .. } => categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" · "),
    }
}

/// Unstyled grid lines for a picker view
///
/// The placeholder renders as blank lines: the container exists but has
/// no content yet.
pub fn grid_lines(view: &PickerView, layout: Option<&GridLayout>, area: Rect) -> Vec<String> {
    let (Some(layout), PickerView::Grid { tiles, .. }) = (layout, view) else {
        return vec![String::new(); usize::from(area.height)];
    };

    let margin = " ".repeat(usize::from(layout.inner.x.saturating_sub(area.x)));
    let mut lines = vec![String::new(); usize::from(layout.inner.y.saturating_sub(area.y))];
    lines.push(format!("{}{}", margin, header(view)));

    let visible = tiles.len().min(layout.capacity());
    for row in tiles[..visible].chunks(usize::from(layout.columns)) {
        let line: String = row
            .iter()
            .map(|tile| pad(tile.emoji.as_str(), layout.cell_width))
            .collect();
        lines.push(format!("{}{}", margin, line.trim_end()));
    }

    lines
}

/// Styled lines for the whole overlay
///
/// Hidden overlays render nothing. Visible overlays draw the grid and a
/// dimmed dismiss hint standing in for the tap-outside layer.
pub fn overlay_lines(view: &OverlayView, style: &StyleOverrides, area: Rect) -> Vec<String> {
    let OverlayView::Visible { picker } = view else {
        return Vec::new();
    };

    let layout = GridLayout::for_view(area, picker, style);
    let fg = style.fg.as_deref().and_then(parse_color);
    let header_row = layout.map(|l| usize::from(l.inner.y.saturating_sub(area.y)));

    let mut lines: Vec<String> = grid_lines(picker, layout.as_ref(), area)
        .into_iter()
        .enumerate()
        .map(|(i, line)| match (Some(i) == header_row, fg) {
            (true, Some(color)) => format!("{}", line.with(color).bold()),
            (true, None) => format!("{}", line.bold()),
            (false, Some(color)) => format!("{}", line.with(color)),
            (false, None) => line,
        })
        .collect();

    let hint = "tap outside to close";
    lines.push(match style.bg.as_deref().and_then(parse_color) {
        Some(color) => format!("{}", hint.on(color).dim()),
        None => format!("{}", hint.dark_grey()),
    });
    lines
}
