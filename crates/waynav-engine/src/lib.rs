//! `waynav-engine` — the top-level navigation engine and scheduler.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`engine`]   | `NavEngine`: tick loop, queues, waypoint/query APIs     |
//! | [`obstacle`] | `ObstacleVolume` dynamic blockers                       |
//! | [`observer`] | `NavObserver` callbacks and the per-tick `TickReport`   |
//! | [`error`]    | `EngineError`                                           |
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut nav = NavEngine::new(NavConfig::default(), StaticWorld::new());
//! for p in floor_positions {
//!     nav.add_waypoint(WaypointParams::at(p));
//! }
//! let agent = nav.add_query(PathQuery::new(spawn, target));
//! nav.start_updates(agent)?;
//! loop {
//!     nav.tick(&mut NoopObserver);
//!     let steer = nav.query(agent)?.direction_to_next();
//!     // move the agent, write its position back via query_mut …
//! }
//! ```

pub mod engine;
pub mod error;
pub mod observer;
pub mod obstacle;


pub use engine::{NavEngine, PendingCounts};
pub use error::{EngineError, EngineResult};
pub use observer::{NavObserver, NoopObserver, TickReport};
pub use obstacle::ObstacleVolume;
