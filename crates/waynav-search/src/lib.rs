//! `waynav-search` — best-first path search over the waypoint graph.
//!
//! # Crate layout
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`policy`] | `SearchPolicy` trait and the default implementation   |
//! | [`query`]  | `PathQuery` per-agent state, `next_position` rule     |
//! | [`engine`] | `PathSearch`: the search loop and reconstruction      |
//!
//! # Algorithm contract
//!
//! The search is a faithful reproduction of a greedy best-first scheme, not
//! textbook A*: visited nodes are never re-relaxed even when a cheaper
//! route through the current node appears later, and the frontier is a
//! plain list re-sorted every expansion round with the cheapest element at
//! the tail.  Both choices bound work per query and keep results
//! reproducible; do not "fix" them without flagging the behaviour change.

pub mod engine;
pub mod policy;
pub mod query;

#[cfg(test)]
mod tests;

pub use engine::PathSearch;
pub use policy::{DefaultPolicy, SearchPolicy};
pub use query::PathQuery;
