//! Collision-layer bitmask.
//!
//! Spatial queries filter bodies by layer: waypoints live on one layer,
//! level geometry and obstacle volumes on others.  A query matches a body
//! when the masks intersect.

/// A 32-bit collision-layer mask.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layers(pub u32);

impl Layers {
    pub const NONE: Layers = Layers(0);
    pub const ALL: Layers = Layers(u32::MAX);

    /// The mask containing only layer bit `n` (0‥31).
    #[inline]
    pub const fn bit(n: u32) -> Layers {
        Layers(1 << n)
    }

    /// `true` if the two masks share any layer.
    #[inline]
    pub const fn intersects(self, other: Layers) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Layers {
    type Output = Layers;
    #[inline]
    fn bitor(self, rhs: Layers) -> Layers {
        Layers(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Layers {
    #[inline]
    fn bitor_assign(&mut self, rhs: Layers) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Layers {
    type Output = Layers;
    #[inline]
    fn bitand(self, rhs: Layers) -> Layers {
        Layers(self.0 & rhs.0)
    }
}
