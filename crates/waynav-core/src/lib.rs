//! `waynav-core` — foundational types for the `waynav` navigation engine.
//!
//! This crate is a dependency of every other `waynav-*` crate.  It
//! intentionally has no `waynav-*` dependencies and minimal external ones
//! (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                          |
//! |------------|---------------------------------------------------|
//! | [`ids`]    | `WaypointId`, `QueryId`, `ObstacleId`, `BodyHandle` |
//! | [`math`]   | `Vec3` and distance/normalization helpers          |
//! | [`layer`]  | `Layers` collision-filter bitmask                  |
//! | [`time`]   | `Tick` scheduler counter                           |
//! | [`config`] | `NavConfig`, `CastMode`                            |
//! | [`error`]  | `CoreError`, `CoreResult`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod config;
pub mod error;
pub mod ids;
pub mod layer;
pub mod math;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CastMode, NavConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{BodyHandle, ObstacleId, QueryId, WaypointId};
pub use layer::Layers;
pub use math::Vec3;
pub use time::Tick;
