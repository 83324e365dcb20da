//! Editor session: the working copy of a product and the catalog around it.
//!
//! An [`EditorSession`] exclusively owns a deep copy of the product being
//! edited. All structural mutations (sides, zones, selection) go through it,
//! so the invariants — active-side index validity, selection validity, zone
//! minimum sizes and canvas bounds — are enforced in one place. The session
//! is discarded on cancel and replaced by the store's canonical product on a
//! successful save.
//!
//! Pending template-image uploads are tracked in a side table keyed by side
//! id, never inside the JSON-serializable [`Side`] itself.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;

use thiserror::Error;

use crate::consts::DUPLICATE_OFFSET;
use crate::geom::{Rect, normalize_zone_rect};
use crate::product::{Product, Selection, Side, SideId, Zone, ZoneKind};

/// Why a product cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("product name is required")]
    MissingName,
    #[error("product must have at least one side")]
    NoSides,
}

/// Check a product against the save preconditions. Runs before any network
/// call; a failure here means nothing was sent.
///
/// # Errors
///
/// Returns the first violated precondition.
pub fn validate_for_save(product: &Product) -> Result<(), ValidationError> {
    if product.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if product.sides.is_empty() {
        return Err(ValidationError::NoSides);
    }
    Ok(())
}

/// A template image picked by the operator but not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    /// Original file name, used in error messages.
    pub file_name: String,
    /// Transient object URL shown on canvas until the durable URL arrives.
    pub object_url: String,
}

/// The working copy of a product under edit.
#[derive(Debug, Clone)]
pub struct EditorSession {
    /// The product being edited. Committed to the store only on save.
    pub product: Product,
    active_side: usize,
    selection: Option<Selection>,
    pending_images: HashMap<SideId, PendingImage>,
}

impl EditorSession {
    /// Open a session over a working copy of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            active_side: 0,
            selection: None,
            pending_images: HashMap::new(),
        }
    }

    // ── Sides ───────────────────────────────────────────────────

    /// Index of the side currently being edited.
    #[must_use]
    pub fn active_side_index(&self) -> usize {
        self.active_side
    }

    /// The side currently being edited, if the product has any.
    #[must_use]
    pub fn active_side(&self) -> Option<&Side> {
        self.product.sides.get(self.active_side)
    }

    /// Mutable view of the side currently being edited.
    pub fn active_side_mut(&mut self) -> Option<&mut Side> {
        self.product.sides.get_mut(self.active_side)
    }

    /// Add a side and make it active. Returns its id.
    pub fn add_side(&mut self, name: impl Into<String>) -> SideId {
        let side = Side::new(name);
        let id = side.id;
        self.product.sides.push(side);
        self.active_side = self.product.sides.len() - 1;
        self.selection = None;
        id
    }

    /// Switch the active side. Clears the selection. Returns false for an
    /// out-of-range index.
    pub fn set_active_side(&mut self, index: usize) -> bool {
        if index >= self.product.sides.len() {
            return false;
        }
        if index != self.active_side {
            self.selection = None;
        }
        self.active_side = index;
        true
    }

    /// Rename a side. Returns false for an out-of-range index.
    pub fn rename_side(&mut self, index: usize, name: impl Into<String>) -> bool {
        let Some(side) = self.product.sides.get_mut(index) else {
            return false;
        };
        side.name = name.into();
        true
    }

    /// Delete a side, cascading deletion of all its zones and any pending
    /// image. The active-side index is re-corrected and the selection is
    /// cleared. Returns false for an out-of-range index.
    pub fn delete_side(&mut self, index: usize) -> bool {
        if index >= self.product.sides.len() {
            return false;
        }
        let removed = self.product.sides.remove(index);
        self.pending_images.remove(&removed.id);
        if self.active_side >= index {
            self.active_side = self.active_side.saturating_sub(1);
        }
        self.selection = None;
        true
    }

    /// Record a durable template-image URL on a side, dropping any pending
    /// upload for it. Returns false for an out-of-range index.
    pub fn set_side_image(&mut self, index: usize, url: Option<String>) -> bool {
        let Some(side) = self.product.sides.get_mut(index) else {
            return false;
        };
        self.pending_images.remove(&side.id);
        side.image_url = url;
        true
    }

    /// Record a freshly picked template image awaiting upload. The side shows
    /// the transient object URL until save substitutes the durable one.
    /// Returns false for an out-of-range index.
    pub fn set_pending_image(
        &mut self,
        index: usize,
        file_name: impl Into<String>,
        object_url: impl Into<String>,
    ) -> bool {
        let Some(side) = self.product.sides.get_mut(index) else {
            return false;
        };
        let object_url = object_url.into();
        side.image_url = Some(object_url.clone());
        self.pending_images
            .insert(side.id, PendingImage { file_name: file_name.into(), object_url });
        true
    }

    /// Sides whose template image still needs uploading.
    #[must_use]
    pub fn pending_images(&self) -> &HashMap<SideId, PendingImage> {
        &self.pending_images
    }

    /// Drop the pending-upload record for a side (after its durable URL has
    /// been substituted).
    pub fn clear_pending_image(&mut self, side_id: &SideId) {
        self.pending_images.remove(side_id);
    }

    // ── Selection ───────────────────────────────────────────────

    /// The current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Select a zone on the active side. Returns false if the index is out
    /// of range for that zone list.
    pub fn select(&mut self, kind: ZoneKind, index: usize) -> bool {
        let Some(side) = self.active_side() else {
            return false;
        };
        if index >= side.zones(kind).len() {
            return false;
        }
        self.selection = Some(Selection { kind, index });
        true
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The currently selected zone, if any.
    #[must_use]
    pub fn selected_zone(&self) -> Option<&Zone> {
        let sel = self.selection?;
        self.active_side()?.zones(sel.kind).get(sel.index)
    }

    /// Mutable view of the currently selected zone, if any.
    pub fn selected_zone_mut(&mut self) -> Option<&mut Zone> {
        let sel = self.selection?;
        self.active_side_mut()?.zones_mut(sel.kind).get_mut(sel.index)
    }

    // ── Zones ───────────────────────────────────────────────────

    /// Add a zone to the active side with a sequence-numbered name, select
    /// it, and return the selection. `rect` is taken as committed by the
    /// caller (already rounded and in bounds). No-op without an active side.
    pub fn add_zone(&mut self, kind: ZoneKind, rect: Rect) -> Option<Selection> {
        let side = self.active_side_mut()?;
        let name = side.next_zone_name(kind);
        side.zones_mut(kind).push(Zone::new(name, rect));
        let index = side.zones(kind).len() - 1;
        self.selection = Some(Selection { kind, index });
        self.selection
    }

    /// Delete a zone from the active side. Clears the selection if it
    /// pointed at the deleted zone, and shifts it if it pointed past it.
    /// Returns false for an out-of-range index.
    pub fn delete_zone(&mut self, kind: ZoneKind, index: usize) -> bool {
        let Some(side) = self.active_side_mut() else {
            return false;
        };
        let zones = side.zones_mut(kind);
        if index >= zones.len() {
            return false;
        }
        zones.remove(index);
        match self.selection {
            Some(sel) if sel.kind == kind && sel.index == index => self.selection = None,
            Some(sel) if sel.kind == kind && sel.index > index => {
                self.selection = Some(Selection { kind, index: sel.index - 1 });
            }
            _ => {}
        }
        true
    }

    /// Delete the currently selected zone. Returns false with no selection.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Some(sel) => self.delete_zone(sel.kind, sel.index),
            None => false,
        }
    }

    /// Duplicate the currently selected zone: same size, offset by
    /// (+20, +20) clamped to the canvas, a fresh id, name `"{name} (Copy)"`.
    /// The copy becomes selected. Returns the new selection.
    pub fn duplicate_selected(&mut self) -> Option<Selection> {
        let sel = self.selection?;
        let source = self.selected_zone()?.clone();
        let rect = Rect {
            x: source.rect.x + DUPLICATE_OFFSET,
            y: source.rect.y + DUPLICATE_OFFSET,
            ..source.rect
        }
        .clamped_position();
        let copy = Zone::new(format!("{} (Copy)", source.name), rect);
        let side = self.active_side_mut()?;
        side.zones_mut(sel.kind).push(copy);
        let index = side.zones(sel.kind).len() - 1;
        self.selection = Some(Selection { kind: sel.kind, index });
        self.selection
    }

    /// Rename a zone on the active side. Returns false for an out-of-range
    /// index.
    pub fn set_zone_name(&mut self, kind: ZoneKind, index: usize, name: impl Into<String>) -> bool {
        let Some(side) = self.active_side_mut() else {
            return false;
        };
        let Some(zone) = side.zones_mut(kind).get_mut(index) else {
            return false;
        };
        zone.name = name.into();
        true
    }

    /// Replace a zone's geometry from a panel edit. The rect is re-clamped
    /// and minimum-enforced like a resize. Returns false for an out-of-range
    /// index.
    pub fn set_zone_rect(&mut self, kind: ZoneKind, index: usize, rect: Rect) -> bool {
        let Some(side) = self.active_side_mut() else {
            return false;
        };
        let Some(zone) = side.zones_mut(kind).get_mut(index) else {
            return false;
        };
        zone.rect = normalize_zone_rect(rect);
        true
    }
}

/// The dashboard's canonical product list. Replaced wholesale from load and
/// save responses; never edited in place by the editor.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a store snapshot.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    /// Merge the canonical form of a saved product: replaces the entry with
    /// the same store id, or appends a newly created one.
    pub fn upsert(&mut self, saved: Product) {
        match self
            .products
            .iter_mut()
            .find(|p| p.id.is_some() && p.id == saved.id)
        {
            Some(slot) => *slot = saved,
            None => self.products.push(saved),
        }
    }

    /// Apply a status toggle confirmed by the store. Returns false if the
    /// product is not in the catalog.
    pub fn set_status(&mut self, id: i64, active: bool) -> bool {
        match self.products.iter_mut().find(|p| p.id == Some(id)) {
            Some(product) => {
                product.active = active;
                true
            }
            None => false,
        }
    }

    /// All products, in store order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
