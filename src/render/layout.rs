//! Bar placement for the four layout modes.
//!
//! Bars are placed in the theme's order. A bar that is hidden, has no known
//! maximum, or is full while `hide_when_full` is set gets no slot and takes no
//! space.

use crate::capture::Rect;
use crate::stats::{LifeState, StatKind};
use crate::style::{LayoutMode, StyleDescriptor, TextPosition};

/// Space between the first row and the full-width Adrenaline row.
const ADRENALINE_ROW_MARGIN: i32 = 5;

/// Space between the icon zone and the progress bar when icons are shown.
pub const ICON_GAP: i32 = 4;

/// Where and how one bar is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSlot {
    pub kind: StatKind,
    /// Outer box: icon zone plus progress bar.
    pub rect: Rect,
    /// Fill grows bottom-up instead of left-to-right.
    pub transposed: bool,
}

/// Whether a stat gets drawn at all.
pub fn is_drawn(kind: StatKind, state: &LifeState, style: &StyleDescriptor) -> bool {
    if !style.shows(kind) {
        return false;
    }
    let (current, max) = state.reading(kind);
    let valid = kind == StatKind::Adrenaline || max > 0;
    valid && !(style.hide_when_full && current == max)
}

/// Height of one line of text above a bar; zero when text sits inside.
pub fn text_line_height(style: &StyleDescriptor) -> i32 {
    match style.text_position {
        TextPosition::Above => style.font_size as i32 + 4,
        TextPosition::Inside => 0,
    }
}

/// Width of the icon zone plus its gap.
pub fn icon_zone(style: &StyleDescriptor) -> i32 {
    if style.show_icons {
        style.theme_layout.icon_area_width as i32 + ICON_GAP
    } else {
        0
    }
}

pub fn plan_slots(state: &LifeState, style: &StyleDescriptor) -> Vec<BarSlot> {
    let gap = style.theme_layout.gap as i32;
    let bar_width = style.bar_width as i32;
    let bar_height = style.bar_height as i32;
    let text_line = text_line_height(style);
    let start_x = style.position.x + gap;
    let start_y = style.position.y + gap;

    let drawn: Vec<StatKind> = style
        .theme_layout
        .order
        .iter()
        .copied()
        .filter(|kind| is_drawn(*kind, state, style))
        .collect();

    let full_width_adrenaline =
        style.layout == LayoutMode::Horizontal && style.theme_layout.adrenaline_full_width;

    let mut slots = Vec::with_capacity(drawn.len());
    let (mut x, mut y) = (start_x, start_y);

    for (index, kind) in drawn.iter().copied().enumerate() {
        if full_width_adrenaline && kind == StatKind::Adrenaline {
            let top_row = drawn.iter().filter(|k| **k != StatKind::Adrenaline).count() as i32;
            let width = if top_row > 0 {
                top_row * bar_width + (top_row - 1) * gap
            } else {
                bar_width
            };
            let row_y = start_y + bar_height + text_line + ADRENALINE_ROW_MARGIN;
            slots.push(BarSlot {
                kind,
                rect: Rect::new(start_x, row_y, width.max(0) as u32, bar_height.max(0) as u32),
                transposed: false,
            });
            continue;
        }

        let slot = match style.layout {
            LayoutMode::Vertical => transposed_slot(kind, x, y, style),
            _ => BarSlot {
                kind,
                rect: Rect::new(x, y, bar_width.max(0) as u32, bar_height.max(0) as u32),
                transposed: false,
            },
        };
        slots.push(slot);

        match style.layout {
            LayoutMode::Horizontal => x += bar_width + gap,
            LayoutMode::Vertical => y += slot.rect.height as i32 + gap + text_line,
            LayoutMode::Compact => {
                if index % 2 == 0 {
                    x += bar_width + gap;
                } else {
                    x = start_x;
                    y += bar_height + gap + text_line;
                }
            }
            // Half gap, rounded up
            LayoutMode::Minimal => x += bar_width + (gap + 1) / 2,
        }
    }

    slots
}

/// A vertical-mode slot: the progress bar's width and height are swapped, so
/// its length runs down the screen. The icon zone stays on the left.
fn transposed_slot(kind: StatKind, x: i32, y: i32, style: &StyleDescriptor) -> BarSlot {
    let icons = icon_zone(style);
    let length = (style.bar_width as i32 - icons).max(0);
    let thickness = style.bar_height as i32;
    BarSlot {
        kind,
        rect: Rect::new(x, y, (icons + thickness).max(0) as u32, length as u32),
        transposed: true,
    }
}
