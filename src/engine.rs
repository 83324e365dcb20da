//! The editor engine: command reducer, pointer gesture handling, and the
//! WASM wrapper that owns the canvas element.
//!
//! All UI intents funnel through two entry points on [`EngineCore`]:
//! [`EngineCore::apply`] for discrete commands (tool changes, panel edits,
//! side management) and the `on_pointer_*` handlers for gestures. Both
//! return [`Effect`]s for the host to process — the engine never touches the
//! DOM itself.
//!
//! `EngineCore` is separated from [`Engine`] so the whole state machine can
//! be tested without WASM/browser dependencies.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_ZONE_RECT, MIN_DRAW_SIZE, MIN_ZONE_SIZE};
use crate::geom::{CanvasBounds, Point, Rect, canvas_point, clamp_to_canvas, normalize_zone_rect};
use crate::hit::{self, HitPart, ResizeAnchor};
use crate::input::{Gesture, Tool};
use crate::product::{Product, Selection, SideId, ZoneKind};
use crate::render;
use crate::session::EditorSession;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// A discrete UI intent, dispatched through the single [`EngineCore::apply`]
/// reducer.
#[derive(Debug, Clone)]
pub enum Command {
    SetTool(Tool),
    SetProductName(String),
    SelectZone { kind: ZoneKind, index: usize },
    ClearSelection,
    AddSide { name: String },
    SelectSide { index: usize },
    RenameSide { index: usize, name: String },
    DeleteSide { index: usize },
    SetSideImage { index: usize, url: Option<String> },
    SetPendingImage { index: usize, file_name: String, object_url: String },
    AddZone { kind: ZoneKind },
    DuplicateSelected,
    DeleteSelected,
    SetZoneName { kind: ZoneKind, index: usize, name: String },
    SetZoneRect { kind: ZoneKind, index: usize, rect: Rect },
}

/// Instructions returned to the host after a command or pointer event.
///
/// `PanelRefreshNeeded` is emitted only for mutations that did not originate
/// in the side panel, so a field the operator is typing in is never
/// overwritten under their cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The scene changed; redraw the canvas.
    RenderNeeded,
    /// Set the canvas cursor style.
    SetCursor(String),
    /// The selection changed; the host may want to update panel visibility.
    SelectionChanged,
    /// Re-read zone fields into the side panel.
    PanelRefreshNeeded,
    /// A new zone was committed (drawn, added, or duplicated).
    ZoneCommitted { kind: ZoneKind, index: usize },
}

/// Core engine state — all logic that doesn't depend on the canvas element.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub session: EditorSession,
    pub tool: Tool,
    pub gesture: Gesture,
    cursor: String,
}

impl EngineCore {
    /// Open the engine over a working copy of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            session: EditorSession::new(product),
            tool: Tool::default(),
            gesture: Gesture::default(),
            cursor: String::from("default"),
        }
    }

    // ── Command reducer ─────────────────────────────────────────

    /// Apply a discrete command and return the effects for the host.
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::SetTool(tool) => {
                self.tool = tool;
                let cursor = if tool.draw_kind().is_some() { "crosshair" } else { "default" };
                self.cursor_effect(cursor).into_iter().collect()
            }
            Command::SetProductName(name) => {
                self.session.product.name = name;
                Vec::new()
            }
            Command::SelectZone { kind, index } => {
                if self.session.select(kind, index) {
                    vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::ClearSelection => {
                if self.session.selection().is_some() {
                    self.session.clear_selection();
                    vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::AddSide { name } => {
                self.session.add_side(name);
                vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
            }
            Command::SelectSide { index } => {
                if self.session.set_active_side(index) {
                    vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::RenameSide { index, name } => {
                self.session.rename_side(index, name);
                Vec::new()
            }
            Command::DeleteSide { index } => {
                if self.session.delete_side(index) {
                    vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::SetSideImage { index, url } => {
                if self.session.set_side_image(index, url) {
                    vec![Effect::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::SetPendingImage { index, file_name, object_url } => {
                if self.session.set_pending_image(index, file_name, object_url) {
                    vec![Effect::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::AddZone { kind } => {
                let (x, y, w, h) = DEFAULT_ZONE_RECT;
                let rect = normalize_zone_rect(Rect::new(x, y, w, h));
                match self.session.add_zone(kind, rect) {
                    Some(sel) => vec![
                        Effect::RenderNeeded,
                        Effect::SelectionChanged,
                        Effect::PanelRefreshNeeded,
                        Effect::ZoneCommitted { kind: sel.kind, index: sel.index },
                    ],
                    None => Vec::new(),
                }
            }
            Command::DuplicateSelected => match self.session.duplicate_selected() {
                Some(sel) => vec![
                    Effect::RenderNeeded,
                    Effect::SelectionChanged,
                    Effect::PanelRefreshNeeded,
                    Effect::ZoneCommitted { kind: sel.kind, index: sel.index },
                ],
                None => Vec::new(),
            },
            Command::DeleteSelected => {
                if self.session.delete_selected() {
                    vec![Effect::RenderNeeded, Effect::SelectionChanged, Effect::PanelRefreshNeeded]
                } else {
                    Vec::new()
                }
            }
            // Panel-originated edits: no PanelRefreshNeeded, by contract.
            Command::SetZoneName { kind, index, name } => {
                if self.session.set_zone_name(kind, index, name) {
                    vec![Effect::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Command::SetZoneRect { kind, index, rect } => {
                if self.session.set_zone_rect(kind, index, rect) {
                    vec![Effect::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    // ── Pointer events ──────────────────────────────────────────

    /// Pointer-down in canvas coordinates. Starts a draw, move, or resize
    /// gesture, or updates the selection. No-op without an active side.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Effect> {
        if self.session.active_side().is_none() {
            return Vec::new();
        }

        if let Some(kind) = self.tool.draw_kind() {
            let anchor = clamp_to_canvas(pt);
            self.gesture = Gesture::Drawing { kind, anchor, current: anchor };
            return vec![Effect::RenderNeeded];
        }

        let selection = self.session.selection();
        let hit = self
            .session
            .active_side()
            .and_then(|side| hit::hit_test(pt, side, selection));

        match hit {
            Some(h) => match h.part {
                HitPart::Handle(anchor) => {
                    let Some(orig) = self
                        .session
                        .active_side()
                        .and_then(|side| side.zones(h.kind).get(h.index))
                        .map(|z| z.rect)
                    else {
                        return Vec::new();
                    };
                    self.gesture = Gesture::Resizing {
                        kind: h.kind,
                        index: h.index,
                        anchor,
                        orig,
                        start: pt,
                    };
                    self.cursor_effect(anchor.cursor()).into_iter().collect()
                }
                HitPart::Body => {
                    let mut effects = Vec::new();
                    if selection != Some(Selection { kind: h.kind, index: h.index }) {
                        self.session.select(h.kind, h.index);
                        effects.extend([
                            Effect::RenderNeeded,
                            Effect::SelectionChanged,
                            Effect::PanelRefreshNeeded,
                        ]);
                    }
                    let Some(rect) = self
                        .session
                        .active_side()
                        .and_then(|side| side.zones(h.kind).get(h.index))
                        .map(|z| z.rect)
                    else {
                        return effects;
                    };
                    self.gesture = Gesture::Moving {
                        kind: h.kind,
                        index: h.index,
                        grab_offset: Point::new(pt.x - rect.x, pt.y - rect.y),
                    };
                    effects.extend(self.cursor_effect("move"));
                    effects
                }
            },
            // Click on empty canvas clears the selection.
            None => self.apply(Command::ClearSelection),
        }
    }

    /// Pointer-move in canvas coordinates. Advances the active gesture, or
    /// reports hover cursor changes when idle.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Effect> {
        match self.gesture {
            Gesture::Drawing { kind, anchor, .. } => {
                self.gesture = Gesture::Drawing { kind, anchor, current: clamp_to_canvas(pt) };
                vec![Effect::RenderNeeded]
            }
            Gesture::Moving { kind, index, grab_offset } => {
                let Some(zone) = self
                    .session
                    .active_side_mut()
                    .and_then(|side| side.zones_mut(kind).get_mut(index))
                else {
                    return Vec::new();
                };
                let moved = Rect {
                    x: (pt.x - grab_offset.x).round(),
                    y: (pt.y - grab_offset.y).round(),
                    ..zone.rect
                }
                .clamped_position();
                if moved == zone.rect {
                    return Vec::new();
                }
                zone.rect = moved;
                vec![Effect::RenderNeeded, Effect::PanelRefreshNeeded]
            }
            Gesture::Resizing { kind, index, anchor, orig, start } => {
                let resized = resize_rect(orig, anchor, Point::new(pt.x - start.x, pt.y - start.y));
                let Some(zone) = self
                    .session
                    .active_side_mut()
                    .and_then(|side| side.zones_mut(kind).get_mut(index))
                else {
                    return Vec::new();
                };
                if resized == zone.rect {
                    return Vec::new();
                }
                zone.rect = resized;
                vec![Effect::RenderNeeded, Effect::PanelRefreshNeeded]
            }
            Gesture::Idle => self.hover_cursor(pt).into_iter().collect(),
        }
    }

    /// Pointer-up in canvas coordinates. Commits or discards the active
    /// gesture and always resets to idle.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Effect> {
        self.finish_gesture(Some(pt))
    }

    /// Pointer left the canvas: treated as an implicit pointer-up at the
    /// last tracked position so no gesture can get stuck.
    pub fn on_pointer_leave(&mut self) -> Vec<Effect> {
        if self.gesture.is_active() {
            self.finish_gesture(None)
        } else {
            Vec::new()
        }
    }

    fn finish_gesture(&mut self, release: Option<Point>) -> Vec<Effect> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => Vec::new(),
            Gesture::Drawing { kind, anchor, current } => {
                let end = release.map_or(current, clamp_to_canvas);
                // Rounding x and width independently can push the far edge
                // one pixel past the canvas; settle inside like move/resize.
                let rect = Rect::from_corners(anchor, end).rounded().clamped_position();
                if rect.width < MIN_DRAW_SIZE || rect.height < MIN_DRAW_SIZE {
                    // Too small to be a deliberate zone; discard silently.
                    return vec![Effect::RenderNeeded];
                }
                let mut effects = vec![Effect::RenderNeeded];
                effects.extend(self.apply(Command::SetTool(Tool::Select)));
                if let Some(sel) = self.session.add_zone(kind, rect) {
                    log::debug!("committed {:?} zone at index {}", sel.kind, sel.index);
                    effects.extend([
                        Effect::SelectionChanged,
                        Effect::PanelRefreshNeeded,
                        Effect::ZoneCommitted { kind: sel.kind, index: sel.index },
                    ]);
                }
                effects
            }
            Gesture::Moving { kind, index, .. } | Gesture::Resizing { kind, index, .. } => {
                // Geometry was applied incrementally; just settle on whole
                // pixels inside the canvas.
                let Some(zone) = self
                    .session
                    .active_side_mut()
                    .and_then(|side| side.zones_mut(kind).get_mut(index))
                else {
                    return Vec::new();
                };
                zone.rect = zone.rect.rounded().clamped_position();
                vec![Effect::RenderNeeded, Effect::PanelRefreshNeeded]
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The in-progress draw rect for the renderer, if a draw gesture is
    /// active.
    #[must_use]
    pub fn gesture_rect(&self) -> Option<(ZoneKind, Rect)> {
        match self.gesture {
            Gesture::Drawing { kind, anchor, current } => {
                Some((kind, Rect::from_corners(anchor, current)))
            }
            _ => None,
        }
    }

    /// The current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.session.selection()
    }

    // ── Internals ───────────────────────────────────────────────

    fn hover_cursor(&mut self, pt: Point) -> Option<Effect> {
        let cursor = if self.tool.draw_kind().is_some() {
            "crosshair"
        } else {
            let hit = self
                .session
                .active_side()
                .and_then(|side| hit::hit_test(pt, side, self.session.selection()));
            match hit {
                Some(h) => match h.part {
                    HitPart::Handle(anchor) => anchor.cursor(),
                    HitPart::Body => "move",
                },
                None => "default",
            }
        };
        self.cursor_effect(cursor)
    }

    /// Emit a cursor effect only when the cursor actually changes.
    fn cursor_effect(&mut self, cursor: &str) -> Option<Effect> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor.to_owned();
        Some(Effect::SetCursor(cursor.to_owned()))
    }
}

/// Recompute a rect from its gesture-start snapshot plus the pointer delta,
/// per resize anchor. Bounds win over the minimum size for degenerate zones
/// pinned against a canvas edge; for anything the minimum applies to, edges
/// are ordered so the result never drops below [`MIN_ZONE_SIZE`].
fn resize_rect(orig: Rect, anchor: ResizeAnchor, delta: Point) -> Rect {
    let mut left = orig.x;
    let mut right = orig.right();
    let mut top = orig.y;
    let mut bottom = orig.bottom();

    if anchor.moves_left() {
        left = (orig.x + delta.x).min(right - MIN_ZONE_SIZE).max(0.0);
    }
    if anchor.moves_right() {
        right = (orig.right() + delta.x).max(left + MIN_ZONE_SIZE).min(CANVAS_WIDTH);
    }
    if anchor.moves_top() {
        top = (orig.y + delta.y).min(bottom - MIN_ZONE_SIZE).max(0.0);
    }
    if anchor.moves_bottom() {
        bottom = (orig.bottom() + delta.y).max(top + MIN_ZONE_SIZE).min(CANVAS_HEIGHT);
    }

    let left = left.round();
    let right = right.round();
    let top = top.round();
    let bottom = bottom.round();
    Rect::new(left, top, right - left, bottom - top)
}

/// The full canvas engine. Wraps [`EngineCore`] and owns the browser canvas
/// element, the template-image cache, and the pending-upload file handles.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    images: HashMap<String, HtmlImageElement>,
    image_load: Option<js_sys::Function>,
    pending_files: HashMap<SideId, web_sys::File>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element, editing a
    /// working copy of `product`. The element's backing store is fixed to
    /// the logical canvas size; CSS may scale it freely.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(canvas: HtmlCanvasElement, product: Product) -> Self {
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        Self {
            canvas,
            core: EngineCore::new(product),
            images: HashMap::new(),
            image_load: None,
            pending_files: HashMap::new(),
        }
    }

    /// Register a callback invoked when a template image finishes loading;
    /// the host should re-render from it.
    pub fn set_image_load_callback(&mut self, callback: js_sys::Function) {
        self.image_load = Some(callback);
    }

    // ── Delegated input, in client (CSS pixel) coordinates ──────

    pub fn pointer_down(&mut self, client_x: f64, client_y: f64) -> Vec<Effect> {
        let pt = self.to_canvas(client_x, client_y);
        self.core.on_pointer_down(pt)
    }

    pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> Vec<Effect> {
        let pt = self.to_canvas(client_x, client_y);
        self.core.on_pointer_move(pt)
    }

    pub fn pointer_up(&mut self, client_x: f64, client_y: f64) -> Vec<Effect> {
        let pt = self.to_canvas(client_x, client_y);
        self.core.on_pointer_up(pt)
    }

    pub fn pointer_leave(&mut self) -> Vec<Effect> {
        self.core.on_pointer_leave()
    }

    /// Apply a discrete command.
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        self.core.apply(cmd)
    }

    // ── Pending uploads ─────────────────────────────────────────

    /// Record a template image picked for a side: the file handle is kept
    /// here for upload at save time, and the session tracks the transient
    /// `object_url` for display.
    pub fn set_pending_file(
        &mut self,
        side_index: usize,
        file: web_sys::File,
        object_url: String,
    ) -> Vec<Effect> {
        let Some(side_id) = self.core.session.product.sides.get(side_index).map(|s| s.id) else {
            return Vec::new();
        };
        let file_name = file.name();
        self.pending_files.insert(side_id, file);
        self.core.apply(Command::SetPendingImage { index: side_index, file_name, object_url })
    }

    /// File handles awaiting upload, keyed by side id. Passed to
    /// [`crate::net::Gateway::save_product`].
    #[must_use]
    pub fn pending_files(&self) -> &HashMap<SideId, web_sys::File> {
        &self.pending_files
    }

    /// Forget uploaded file handles after a successful save.
    pub fn clear_pending_files(&mut self) {
        self.pending_files.clear();
    }

    // ── Render ──────────────────────────────────────────────────

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a Canvas2D call
    /// fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;

        let image_url = self
            .core
            .session
            .active_side()
            .and_then(|side| side.image_url.clone());
        let image = image_url.and_then(|url| self.image_for(&url).cloned());

        let Some(side) = self.core.session.active_side() else {
            ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);
            return Ok(());
        };

        render::draw(
            &ctx,
            side,
            self.core.session.selection(),
            self.core.gesture_rect(),
            image.as_ref(),
        )
    }

    fn image_for(&mut self, url: &str) -> Option<&HtmlImageElement> {
        if !self.images.contains_key(url) {
            let img = match HtmlImageElement::new() {
                Ok(img) => img,
                Err(err) => {
                    log::warn!("failed to create image element: {err:?}");
                    return None;
                }
            };
            if let Some(cb) = &self.image_load {
                img.set_onload(Some(cb));
            }
            img.set_src(url);
            self.images.insert(url.to_owned(), img);
        }
        self.images.get(url)
    }

    fn to_canvas(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        let bounds = CanvasBounds {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        };
        canvas_point(Point::new(client_x, client_y), &bounds)
    }
}
