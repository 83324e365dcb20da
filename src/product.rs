//! Data model: products, sides, zones, and the flat reference entities.
//!
//! These are the types that cross the wire. A [`Product`] is a tree of
//! [`Side`]s, each carrying its template image reference and two ordered zone
//! lists. Zone coordinates live in logical canvas space and serialize as
//! whole pixels (see [`crate::geom::Rect`]).
//!
//! Data flows into this layer from the network (JSON deserialization) and
//! from the editor session (mutations). The renderer reads sides and zones
//! directly to determine draw order.

#[cfg(test)]
#[path = "product_test.rs"]
mod product_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a side of a product.
pub type SideId = Uuid;

/// Unique identifier for a zone.
pub type ZoneId = Uuid;

/// Whether a zone permits or forbids customer designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// A zone where a customer's design may be placed.
    Print,
    /// A zone where designs are disallowed (seams, collars, ...).
    Restriction,
}

impl ZoneKind {
    /// Display prefix used for sequence-numbered zone names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Print => "Print Area",
            Self::Restriction => "Restriction Area",
        }
    }
}

/// A rectangular print or restriction zone on a side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Unique identifier for this zone.
    pub id: ZoneId,
    /// Operator-visible name, e.g. `"Print Area 1"`.
    pub name: String,
    /// Bounding box in logical canvas pixels.
    #[serde(flatten)]
    pub rect: crate::geom::Rect,
}

impl Zone {
    /// A fresh zone with a new id.
    #[must_use]
    pub fn new(name: impl Into<String>, rect: crate::geom::Rect) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), rect }
    }
}

/// One face/view of a physical product (front, back, sleeve, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Side {
    /// Unique identifier for this side.
    pub id: SideId,
    /// Operator-visible name.
    pub name: String,
    /// Template image reference. Either a durable store URL or, while an
    /// upload is pending, a transient object URL (the pending file itself is
    /// tracked outside this struct; see [`crate::session::EditorSession`]).
    pub image_url: Option<String>,
    /// Zones where designs are allowed, in creation order.
    pub print_areas: Vec<Zone>,
    /// Zones where designs are forbidden, in creation order.
    pub restriction_areas: Vec<Zone>,
}

impl Side {
    /// A fresh side with a new id and no zones.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image_url: None,
            print_areas: Vec::new(),
            restriction_areas: Vec::new(),
        }
    }

    /// The zone list for `kind`.
    #[must_use]
    pub fn zones(&self, kind: ZoneKind) -> &[Zone] {
        match kind {
            ZoneKind::Print => &self.print_areas,
            ZoneKind::Restriction => &self.restriction_areas,
        }
    }

    /// Mutable zone list for `kind`.
    pub fn zones_mut(&mut self, kind: ZoneKind) -> &mut Vec<Zone> {
        match kind {
            ZoneKind::Print => &mut self.print_areas,
            ZoneKind::Restriction => &mut self.restriction_areas,
        }
    }

    /// Next sequence-numbered name for a new zone of `kind` on this side.
    #[must_use]
    pub fn next_zone_name(&self, kind: ZoneKind) -> String {
        format!("{} {}", kind.label(), self.zones(kind).len() + 1)
    }
}

/// A configurable product as stored in the catalog and on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier. `None` until the first save; its presence
    /// selects create vs. update on the backend.
    pub id: Option<i64>,
    /// Operator-visible name. Required before save.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Base price in store currency units.
    pub base_price: f64,
    /// Discounted price, if the product is on sale.
    pub sale_price: Option<f64>,
    /// Owning category, if assigned.
    pub category_id: Option<i64>,
    /// Whether the product is visible in the shop.
    pub active: bool,
    /// Store ids of the colors this product is offered in.
    pub color_ids: Vec<i64>,
    /// Store ids of the print types enabled for this product.
    pub print_type_ids: Vec<i64>,
    /// Ordered sides. A product must have at least one side to be saved.
    pub sides: Vec<Side>,
}

impl Product {
    /// A fresh unsaved product with no sides.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            base_price: 0.0,
            sale_price: None,
            category_id: None,
            active: true,
            color_ids: Vec::new(),
            print_type_ids: Vec::new(),
            sides: Vec::new(),
        }
    }
}

/// Transient pointer to a zone in the active side. Cleared whenever the side
/// changes or the referenced zone is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: ZoneKind,
    pub index: usize,
}

// ── Reference entities ──────────────────────────────────────────
//
// Flat store-owned rows, persisted by whole-collection replacement.

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A color option offered on products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Color {
    pub id: i64,
    pub name: String,
    /// CSS hex color, e.g. `"#1F1A17"`.
    pub hex: String,
}

/// A fabric with per-unit pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fabric {
    pub id: i64,
    pub name: String,
    pub price_per_unit: f64,
}

/// A printing technique with flat pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintType {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// Everything the editor needs at startup, fetched once from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub colors: Vec<Color>,
    pub fabrics: Vec<Fabric>,
    pub print_types: Vec<PrintType>,
}
