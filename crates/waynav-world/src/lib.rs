//! `waynav-world` — the spatial query port and its default implementation.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`shape`] | `Shape` (sphere / axis-aligned box) and intersection math |
//! | [`port`]  | `SpatialQuery` / `CollisionWorld` traits                  |
//! | [`world`] | `StaticWorld` (R-tree broad phase, exact narrow phase)    |
//!
//! # Pluggability
//!
//! The graph, search, and scheduler crates consume spatial queries only
//! through the [`SpatialQuery`] trait, so hosts with their own physics or
//! scene representation can implement the port themselves.  [`StaticWorld`]
//! is the self-contained default: sphere and box bodies on collision
//! layers, indexed by an `rstar` R-tree.

pub mod port;
pub mod shape;
pub mod world;


pub use port::{CollisionWorld, SpatialQuery};
pub use shape::Shape;
pub use world::StaticWorld;
