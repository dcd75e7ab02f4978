#![forbid(unsafe_code)]

//! Bubble styling and per-frame render props.
//!
//! [`BubbleStyle`] depends only on the overlay data and theme, so it is
//! resolved once per show. [`style`] is the per-frame part: a pure function
//! of the cell snapshot.
//!
//! # Corner radii
//!
//! All corners use the large radius, except the corner nearest the author
//! (bottom-left for left-aligned bubbles, bottom-right for right-aligned
//! ones), which uses the small radius when the message is last in its group
//! and no thread-reply summary hangs under it.
//!
//! # Fill
//!
//! | Content | Fill |
//! |---------|------|
//! | emoji only, no quoted reply | none |
//! | non-file attachments, first is a rich embed | transparent |
//! | non-file attachments | tinted |
//! | anything else | neutral, by alignment |

use veil_core::geometry::{Alignment, Rect};
use veil_runtime::overlay::{GroupPosition, OverlayData};

use crate::content::is_emoji_only;
use crate::measurer::{Geometry, GrowTransform};
use crate::values::ValueSnapshot;

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }
}

/// Numeric and color tokens the overlay needs from the host theme.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayTheme {
    pub radius_large: f64,
    pub radius_small: f64,
    /// Neutral fill of the current user's bubbles.
    pub own_fill: Rgba,
    /// Neutral fill of other participants' bubbles.
    pub other_fill: Rgba,
    /// Fill behind non-file attachments.
    pub attachment_tint: Rgba,
}

impl Default for OverlayTheme {
    fn default() -> Self {
        Self {
            radius_large: 16.0,
            radius_small: 2.0,
            own_fill: Rgba::rgb(0xE9, 0xEA, 0xED),
            other_fill: Rgba::rgb(0xFF, 0xFF, 0xFF),
            attachment_tint: Rgba::rgb(0xF2, 0xF2, 0xF2),
        }
    }
}

/// Per-corner radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl CornerRadii {
    #[must_use]
    pub const fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_left: radius,
            bottom_right: radius,
        }
    }
}

/// Radii for a bubble with the given placement.
#[must_use]
pub fn corner_radii(
    alignment: Alignment,
    group_position: GroupPosition,
    thread_summary: bool,
    theme: &OverlayTheme,
) -> CornerRadii {
    let mut radii = CornerRadii::uniform(theme.radius_large);
    if group_position.is_last() && !thread_summary {
        match alignment {
            Alignment::Left => radii.bottom_left = theme.radius_small,
            Alignment::Right => radii.bottom_right = theme.radius_small,
        }
    }
    radii
}

/// Background treatment of the bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleFill {
    /// No background at all (large emoji).
    None,
    /// Background present but transparent (rich embeds draw their own).
    Transparent,
    Tinted(Rgba),
    Neutral(Rgba),
}

impl BubbleFill {
    #[must_use]
    pub const fn color(self) -> Option<Rgba> {
        match self {
            Self::None => None,
            Self::Transparent => Some(Rgba::TRANSPARENT),
            Self::Tinted(c) | Self::Neutral(c) => Some(c),
        }
    }
}

/// Fill for `data`'s bubble.
#[must_use]
pub fn bubble_fill(data: &OverlayData, theme: &OverlayTheme) -> BubbleFill {
    let Some(message) = data.message.as_ref() else {
        return BubbleFill::None;
    };
    if message.quoted.is_none() && is_emoji_only(&message.text) {
        return BubbleFill::None;
    }
    if let Some(first) = data.attachments.other.first() {
        if first.is_rich_embed() {
            return BubbleFill::Transparent;
        }
        return BubbleFill::Tinted(theme.attachment_tint);
    }
    BubbleFill::Neutral(match data.alignment {
        Alignment::Left => theme.other_fill,
        Alignment::Right => theme.own_fill,
    })
}

/// Static styling of one shown message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleStyle {
    pub radii: CornerRadii,
    pub fill: BubbleFill,
}

impl BubbleStyle {
    #[must_use]
    pub fn resolve(data: &OverlayData, theme: &OverlayTheme) -> Self {
        Self {
            radii: corner_radii(
                data.alignment,
                data.group_position,
                data.shows_thread_summary(),
                theme,
            ),
            fill: bubble_fill(data, theme),
        }
    }
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderProps {
    /// Backdrop opacity; fades with both the show transition and the drag.
    pub backdrop_opacity: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub bubble: BubbleStyle,
    /// Transform of the reaction picker, grown out of the bubble anchor.
    pub picker: Option<GrowTransform>,
}

/// Derive one frame's render props from the cell snapshot.
#[must_use]
pub fn style(
    snapshot: &ValueSnapshot,
    bubble: &BubbleStyle,
    geometry: Option<&Geometry>,
    picker: Option<&Rect>,
) -> RenderProps {
    let show = snapshot.show_screen.clamp(0.0, 1.0);
    RenderProps {
        backdrop_opacity: show * snapshot.opacity,
        translate_y: snapshot.translate_y,
        scale: snapshot.scale,
        opacity: snapshot.opacity,
        bubble: *bubble,
        picker: geometry
            .zip(picker)
            .map(|(g, rect)| g.grow_transform(rect, show)),
    }
}
