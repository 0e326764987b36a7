//! Typed handle and ID newtypes.
//!
//! Waypoints, queries, obstacles and collision bodies all live in slot
//! arenas indexed by `u32`, and a bare integer makes it far too easy to
//! hand a query slot to a graph call.  Each arena therefore gets its own
//! wrapper type.  The inner value stays `pub` because the arenas mint IDs
//! from slot indices directly; everything downstream should go through
//! [`index`](WaypointId::index) instead of touching `.0`.

use std::fmt;

/// Define one ID newtype with the sentinel, ordering and conversion
/// plumbing every arena handle needs.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The all-ones sentinel.  Never a live slot; `Default` yields
            /// it so a forgotten assignment is loud rather than silently
            /// aliasing slot zero.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The slot index this ID names.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.index()
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Slot index of a waypoint in the graph arena.
    pub struct WaypointId(u32);
}

typed_id! {
    /// Slot index of a registered agent path query.
    pub struct QueryId(u32);
}

typed_id! {
    /// Slot index of a dynamic obstacle volume.
    pub struct ObstacleId(u32);
}

typed_id! {
    /// Slot index of a collision body in the spatial world.
    pub struct BodyHandle(u32);
}
