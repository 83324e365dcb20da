//! Canvas engine for the print-studio product configurator.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the zone editor: translating raw DOM input events into
//! working-copy mutations, hit-testing print and restriction zones, rendering
//! the scene over the side's template image, and persisting the product graph
//! to the backing store over HTTP. The host page is responsible only for
//! wiring DOM events to the engine, applying the [`engine::Effect`]s it
//! returns, and rendering the surrounding UI chrome.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`session`] | Working-copy editor session and product catalog |
//! | [`product`] | Product / Side / Zone data model and wire types |
//! | [`geom`] | Points, rectangles, and screen→canvas conversion |
//! | [`hit`] | Hit-testing against zones and resize handles |
//! | [`input`] | Tool and gesture state-machine types |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`net`] | Persistence gateway to the backing store |
//! | [`consts`] | Shared numeric constants (canvas size, minimum sizes, etc.) |

pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod net;
pub mod product;
pub mod render;
pub mod session;
