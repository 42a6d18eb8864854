//! Depth and Ply types for search.
//!
//! Provides type-safe wrappers for remaining search depth and distance from
//! the root. Depth is unsigned: a negative depth cannot be expressed.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Maximum search depth accepted from configuration
pub const MAX_DEPTH: u32 = 64;

/// Remaining search depth (in plies).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Depth(pub u32);

impl Depth {
    pub const ZERO: Depth = Depth(0);
    pub const ONE: Depth = Depth(1);

    #[inline]
    pub const fn new(d: u32) -> Self {
        Depth(d)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if the search horizon has been reached
    #[inline]
    pub const fn is_horizon(self) -> bool {
        self.0 == 0
    }
}

impl Sub<u32> for Depth {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: u32) -> Self {
        Depth(self.0.saturating_sub(rhs))
    }
}

/// Ply count (half-moves from the root position).
///
/// Used to track distance from root for mate distance scoring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
#[repr(transparent)]
pub struct Ply(pub i32);

impl Ply {
    pub const ZERO: Ply = Ply(0);

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Increment ply (for going deeper in search)
    #[inline]
    pub const fn next(self) -> Self {
        Ply(self.0 + 1)
    }
}
