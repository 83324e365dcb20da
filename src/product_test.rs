#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::geom::Rect;

fn zone(name: &str) -> Zone {
    Zone::new(name, Rect::new(10.0, 10.0, 100.0, 100.0))
}

// =============================================================
// ZoneKind
// =============================================================

#[test]
fn zone_kind_serde_lowercase() {
    assert_eq!(serde_json::to_string(&ZoneKind::Print).unwrap(), "\"print\"");
    assert_eq!(serde_json::to_string(&ZoneKind::Restriction).unwrap(), "\"restriction\"");
}

#[test]
fn zone_kind_deserialize_roundtrip() {
    let back: ZoneKind = serde_json::from_str("\"restriction\"").unwrap();
    assert_eq!(back, ZoneKind::Restriction);
}

#[test]
fn zone_kind_deserialize_invalid_rejects() {
    assert!(serde_json::from_str::<ZoneKind>("\"margin\"").is_err());
}

#[test]
fn zone_kind_labels() {
    assert_eq!(ZoneKind::Print.label(), "Print Area");
    assert_eq!(ZoneKind::Restriction.label(), "Restriction Area");
}

// =============================================================
// Zone
// =============================================================

#[test]
fn zone_new_assigns_distinct_ids() {
    assert_ne!(zone("a").id, zone("a").id);
}

#[test]
fn zone_serializes_rect_flattened_as_integers() {
    let z = Zone::new("Print Area 1", Rect::new(100.0, 100.0, 150.2, 199.8));
    let v = serde_json::to_value(&z).unwrap();
    assert_eq!(v["name"], "Print Area 1");
    assert_eq!(v["x"], 100);
    assert_eq!(v["y"], 100);
    assert_eq!(v["width"], 150);
    assert_eq!(v["height"], 200);
    assert!(v.get("rect").is_none());
}

#[test]
fn zone_deserializes_flat_geometry() {
    let z: Zone = serde_json::from_value(json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "name": "Print Area 1",
        "x": 10, "y": 20, "width": 30, "height": 40,
    }))
    .unwrap();
    assert_eq!(z.rect, Rect::new(10.0, 20.0, 30.0, 40.0));
}

// =============================================================
// Side
// =============================================================

#[test]
fn side_new_is_empty() {
    let s = Side::new("Front");
    assert_eq!(s.name, "Front");
    assert!(s.image_url.is_none());
    assert!(s.print_areas.is_empty());
    assert!(s.restriction_areas.is_empty());
}

#[test]
fn side_zones_selects_list_by_kind() {
    let mut s = Side::new("Front");
    s.print_areas.push(zone("p"));
    s.restriction_areas.push(zone("r1"));
    s.restriction_areas.push(zone("r2"));
    assert_eq!(s.zones(ZoneKind::Print).len(), 1);
    assert_eq!(s.zones(ZoneKind::Restriction).len(), 2);
}

#[test]
fn side_zones_mut_targets_same_list() {
    let mut s = Side::new("Front");
    s.zones_mut(ZoneKind::Restriction).push(zone("r"));
    assert_eq!(s.restriction_areas.len(), 1);
    assert!(s.print_areas.is_empty());
}

#[test]
fn next_zone_name_counts_per_kind() {
    let mut s = Side::new("Front");
    assert_eq!(s.next_zone_name(ZoneKind::Print), "Print Area 1");
    s.print_areas.push(zone("Print Area 1"));
    assert_eq!(s.next_zone_name(ZoneKind::Print), "Print Area 2");
    // Restriction numbering is independent.
    assert_eq!(s.next_zone_name(ZoneKind::Restriction), "Restriction Area 1");
}

#[test]
fn side_serde_roundtrip() {
    let mut s = Side::new("Back");
    s.image_url = Some("https://store.example/tpl.png".to_owned());
    s.print_areas.push(zone("Print Area 1"));
    let back: Side = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
    assert_eq!(back.id, s.id);
    assert_eq!(back.name, "Back");
    assert_eq!(back.image_url.as_deref(), Some("https://store.example/tpl.png"));
    assert_eq!(back.print_areas.len(), 1);
}

// =============================================================
// Product
// =============================================================

#[test]
fn product_new_is_unsaved_and_active() {
    let p = Product::new("Tee");
    assert!(p.id.is_none());
    assert!(p.active);
    assert!(p.sides.is_empty());
    assert_eq!(p.base_price, 0.0);
    assert!(p.sale_price.is_none());
}

#[test]
fn product_serde_roundtrip() {
    let mut p = Product::new("Tee");
    p.id = Some(42);
    p.base_price = 19.5;
    p.sale_price = Some(14.0);
    p.category_id = Some(3);
    p.color_ids = vec![1, 2];
    p.print_type_ids = vec![7];
    p.sides.push(Side::new("Front"));

    let back: Product = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
    assert_eq!(back.id, Some(42));
    assert_eq!(back.name, "Tee");
    assert_eq!(back.base_price, 19.5);
    assert_eq!(back.sale_price, Some(14.0));
    assert_eq!(back.category_id, Some(3));
    assert_eq!(back.color_ids, vec![1, 2]);
    assert_eq!(back.print_type_ids, vec![7]);
    assert_eq!(back.sides.len(), 1);
}

#[test]
fn product_unsaved_id_serializes_null() {
    let p = Product::new("Tee");
    let v = serde_json::to_value(&p).unwrap();
    assert!(v["id"].is_null());
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_equality() {
    let a = Selection { kind: ZoneKind::Print, index: 0 };
    let b = Selection { kind: ZoneKind::Print, index: 0 };
    assert_eq!(a, b);
    assert_ne!(a, Selection { kind: ZoneKind::Print, index: 1 });
    assert_ne!(a, Selection { kind: ZoneKind::Restriction, index: 0 });
}

// =============================================================
// Reference entities / InitialData
// =============================================================

#[test]
fn initial_data_deserializes_all_collections() {
    let data: InitialData = serde_json::from_value(json!({
        "products": [],
        "categories": [{"id": 1, "name": "Shirts"}],
        "colors": [{"id": 2, "name": "Ink", "hex": "#1F1A17"}],
        "fabrics": [{"id": 3, "name": "Cotton", "price_per_unit": 2.5}],
        "print_types": [{"id": 4, "name": "Screen", "price": 5.0}],
    }))
    .unwrap();
    assert!(data.products.is_empty());
    assert_eq!(data.categories[0].name, "Shirts");
    assert_eq!(data.colors[0].hex, "#1F1A17");
    assert_eq!(data.fabrics[0].price_per_unit, 2.5);
    assert_eq!(data.print_types[0].price, 5.0);
}
