//! Turns one planned bar slot into drawing primitives.

use super::compositor::Compositor;
use super::layout::{BarSlot, ICON_GAP};
use super::surface::{PixelBuffer, Primitive};
use super::text::{TextStyle, bar_segments, layout_segments, round_half_up};
use crate::capture::Rect;
use crate::stats::{LifeState, StatKind};
use crate::style::{Rgba8, StyleDescriptor, TextPosition, opacity_alpha};

/// Inset of the fill inside the bar frame.
const FILL_INSET: i32 = 2;

/// Fill percentage, unclamped. Zero when the maximum is unknown.
pub fn fill_percent(kind: StatKind, state: &LifeState) -> f64 {
    let (current, max) = state.reading(kind);
    if max == 0 {
        return 0.0;
    }
    current as f64 / max as f64 * 100.0
}

/// Primitives for one bar, in draw order: background, border, icon, fill, text.
pub fn paint_bar(
    slot: &BarSlot,
    state: &LifeState,
    style: &StyleDescriptor,
    compositor: &mut Compositor,
    icon: Option<&PixelBuffer>,
) -> Vec<Primitive> {
    let kind = slot.kind;
    let Rect {
        x,
        y,
        width,
        height,
    } = slot.rect;
    let (w, h) = (width as i32, height as i32);

    let icon_area = if style.show_icons {
        style.theme_layout.icon_area_width as i32
    } else {
        0
    };
    let icon_gap = if style.show_icons { ICON_GAP } else { 0 };
    let bar_x = x + icon_area + icon_gap;
    let bar_w = w - icon_area - icon_gap;

    let alpha = opacity_alpha(style.opacity);
    let mut primitives = Vec::new();

    if bar_w > 0 {
        let background = style.colors.background.resolve(alpha);
        primitives.push(Primitive::Image {
            x: bar_x,
            y,
            image: compositor.solid(bar_w as u32, height, background),
        });

        let border = style.colors.border.resolve(alpha).to_argb();
        let edges = [
            Rect::new(bar_x, y, bar_w as u32, 1),
            Rect::new(bar_x, y + h - 1, bar_w as u32, 1),
            Rect::new(bar_x, y, 1, height),
            Rect::new(bar_x + bar_w - 1, y, 1, height),
        ];
        primitives.extend(edges.into_iter().map(|rect| Primitive::Rect {
            color: border,
            rect,
            thickness: 1,
        }));
    }

    if let Some(icon) = icon.filter(|_| icon_area > 0) {
        primitives.push(Primitive::Image {
            x: x + (icon_area - icon.width as i32) / 2,
            y: y + (h - icon.height as i32) / 2,
            image: icon.clone(),
        });
    }

    let raw_percent = fill_percent(kind, state);
    let percent = raw_percent.clamp(0.0, 100.0);
    if percent > 0.0 {
        let inner_w = bar_w - 2 * FILL_INSET;
        let inner_h = h - 2 * FILL_INSET;
        let (fill_w, fill_h) = if slot.transposed {
            (inner_w, round_half_up(inner_h as f64 * percent / 100.0))
        } else {
            (round_half_up(inner_w as f64 * percent / 100.0), inner_h)
        };
        let fill_y = if slot.transposed {
            y + FILL_INSET + (inner_h - fill_h)
        } else {
            y + FILL_INSET
        };

        if fill_w > 0 && fill_h > 0 {
            let low = kind == StatKind::Hp && raw_percent <= style.low_hp_threshold as f64;
            let stops = style
                .gradient
                .as_ref()
                .and_then(|g| g.stops(kind).map(|stops| (stops, g.orientation)));
            let image = match stops {
                Some((stops, orientation)) => compositor.gradient(
                    fill_w as u32,
                    fill_h as u32,
                    stops.from.resolve(alpha),
                    stops.to.resolve(alpha),
                    orientation,
                ),
                None => {
                    let c = style.colors.fill(kind, low);
                    compositor.solid(fill_w as u32, fill_h as u32, Rgba8::new(c.r, c.g, c.b, alpha))
                }
            };
            primitives.push(Primitive::Image {
                x: bar_x + FILL_INSET,
                y: fill_y,
                image,
            });
        }
    }

    if style.show_text {
        let (current, max) = state.reading(kind);
        let segments = bar_segments(kind, current, max, &style.overcap_text_format);
        let text_y = match style.text_position {
            TextPosition::Above => round_half_up(y as f64 - 2.0 - style.font_size as f64 / 2.0),
            TextPosition::Inside => round_half_up(y as f64 + h as f64 / 2.0),
        };
        let color = style.colors.text.resolve(255);
        let text_style = TextStyle {
            font_size: style.font_size,
            align: style.text_align,
            color,
            highlight: style
                .overcap_text_color
                .map(|c| c.resolve(255))
                .unwrap_or(color),
            shadow: style.text_shadow,
        };
        primitives.extend(
            layout_segments(&segments, bar_x, bar_w, text_y, &text_style)
                .into_iter()
                .map(Primitive::Text),
        );
    }

    primitives
}
