//! Shared numeric constants for the print-studio engine.

// ── Canvas ──────────────────────────────────────────────────────

/// Logical canvas width in pixels. All zone geometry lives in this space.
pub const CANVAS_WIDTH: f64 = 500.0;

/// Logical canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 500.0;

// ── Zones ───────────────────────────────────────────────────────

/// Minimum zone edge length enforced by resizes and panel edits.
pub const MIN_ZONE_SIZE: f64 = 20.0;

/// A drawn rectangle smaller than this in either dimension is silently
/// discarded on pointer-up instead of committed as a zone.
pub const MIN_DRAW_SIZE: f64 = 10.0;

/// Offset applied to a duplicated zone so the copy does not sit exactly on
/// top of its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Bounding box of a zone created via an explicit "add" command rather than
/// a drag: x, y, width, height.
pub const DEFAULT_ZONE_RECT: (f64, f64, f64, f64) = (40.0, 40.0, 100.0, 100.0);

// ── Hit-testing ─────────────────────────────────────────────────

/// Hit slop in pixels for resize handles: half-extent of the square hit
/// target centered on each handle.
pub const HANDLE_RADIUS_PX: f64 = 8.0;
