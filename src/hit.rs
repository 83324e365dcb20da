//! Hit-testing against zones and their resize handles.
//!
//! Priority mirrors what the operator sees: the selected zone's resize
//! handles sit on top of everything, then print areas (topmost, i.e.
//! last-added, first), then restriction areas. All tests run in logical
//! canvas coordinates.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HANDLE_RADIUS_PX;
use crate::geom::{Point, Rect};
use crate::product::{Selection, Side, ZoneKind};

/// Anchor position for resize handles: corners plus edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// All anchors in the order of [`handle_positions`].
    pub const ALL: [Self; 8] = [
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    /// CSS cursor name for hovering this handle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }

    /// Whether dragging this anchor moves the rect's left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    /// Whether dragging this anchor moves the rect's right edge.
    #[must_use]
    pub fn moves_right(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    /// Whether dragging this anchor moves the rect's top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    /// Whether dragging this anchor moves the rect's bottom edge.
    #[must_use]
    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }
}

/// Which part of a zone was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(ResizeAnchor),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub kind: ZoneKind,
    pub index: usize,
    pub part: HitPart,
}

/// Handle center positions for a rect, in [`ResizeAnchor::ALL`] order.
#[must_use]
pub fn handle_positions(rect: &Rect) -> [Point; 8] {
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    [
        Point::new(cx, rect.y),              // N
        Point::new(rect.right(), rect.y),    // NE
        Point::new(rect.right(), cy),        // E
        Point::new(rect.right(), rect.bottom()), // SE
        Point::new(cx, rect.bottom()),       // S
        Point::new(rect.x, rect.bottom()),   // SW
        Point::new(rect.x, cy),              // W
        Point::new(rect.x, rect.y),          // NW
    ]
}

/// The handle under `pt`, if any: a square hit target of half-extent
/// [`HANDLE_RADIUS_PX`] centered on each handle position. Degenerate rects
/// still expose handles (they coincide).
#[must_use]
pub fn handle_at(pt: Point, rect: &Rect) -> Option<ResizeAnchor> {
    handle_positions(rect)
        .iter()
        .zip(ResizeAnchor::ALL)
        .find(|(pos, _)| {
            (pt.x - pos.x).abs() <= HANDLE_RADIUS_PX && (pt.y - pos.y).abs() <= HANDLE_RADIUS_PX
        })
        .map(|(_, anchor)| anchor)
}

/// Test what lies under `pt` on a side: the selected zone's handles first,
/// then print-area bodies topmost-first, then restriction-area bodies.
#[must_use]
pub fn hit_test(pt: Point, side: &Side, selection: Option<Selection>) -> Option<Hit> {
    if let Some(sel) = selection {
        if let Some(zone) = side.zones(sel.kind).get(sel.index) {
            if let Some(anchor) = handle_at(pt, &zone.rect) {
                return Some(Hit {
                    kind: sel.kind,
                    index: sel.index,
                    part: HitPart::Handle(anchor),
                });
            }
        }
    }

    for kind in [ZoneKind::Print, ZoneKind::Restriction] {
        let zones = side.zones(kind);
        for (index, zone) in zones.iter().enumerate().rev() {
            if zone.rect.contains(pt) {
                return Some(Hit { kind, index, part: HitPart::Body });
            }
        }
    }

    None
}
