//! # Lattice
//!
//! Block-space substrate for objective-driven matches.
//!
//! Lattice describes *where* and *what* in a block world without knowing
//! anything about the game rules built on top of it:
//!
//! - **Bounds**: Axis-aligned extents with inclusive corners and block enumeration
//! - **Regions**: Spatial predicates (cuboids and their unions, intersections,
//!   complements) that may be enumerable and randomly samplable
//! - **Material patterns**: A compact predicate language over (type, variant) pairs
//! - **Documents**: An abstract attribute-bearing node tree with source positions,
//!   plus the parsers that turn it into regions and patterns
//! - **World snapshots**: Read-only block lookups used to classify blocks
//!
//! ## Quick Start
//!
//! ```rust
//! use glam::{DVec3, IVec3};
//! use lattice::{Bounds, Material, MaterialPattern, Region};
//!
//! let region = Region::cuboid(Bounds::between(DVec3::ZERO, DVec3::splat(2.0)));
//! assert!(region.contains(DVec3::splat(1.0)));
//! assert_eq!(region.blocks().unwrap().len(), 27);
//!
//! let pattern: MaterialPattern = "wool:14;obsidian".parse().unwrap();
//! assert!(pattern.contains(Material::Wool, 14));
//! assert!(!pattern.contains(Material::Wool, 1));
//! # let _ = IVec3::ZERO;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod material;
pub mod node;
pub mod parse;
pub mod region;
pub mod world;

// Re-exports for convenience
pub use error::{ConfigError, RegionError};
pub use material::{Material, MaterialData, MaterialEntry, MaterialPattern};
pub use node::{children_named, first_attribute, Element, Node, SourcePosition};
pub use parse::{AttributeScope, RegionParser};
pub use region::{Extent, Region, Shape};
pub use world::{BlockAccess, BlockGrid};

use glam::{DVec3, IVec3};

/// Axis-aligned bounding box with inclusive corners.
///
/// Corners are always normalized so that `min <= max` component-wise.
/// Components may be infinite, in which case the bounds describe an
/// unbounded slab and cannot be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Bounds {
    /// Create bounds spanning two arbitrary corners.
    #[must_use]
    pub fn between(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create bounds covering exactly the blocks from `a` to `b` inclusive.
    #[must_use]
    pub fn from_blocks(a: IVec3, b: IVec3) -> Self {
        Self::between(a.as_dvec3(), b.as_dvec3())
    }

    /// Whether every component of both corners is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds (inclusive on both corners).
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if a block coordinate is inside the bounds.
    #[must_use]
    pub fn contains_block(&self, block: IVec3) -> bool {
        self.contains(block.as_dvec3())
    }

    /// Smallest bounds covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlap of `self` and `other`, or `None` when they are disjoint.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if min.cmple(max).all() {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Inclusive range of block coordinates inside the bounds.
    ///
    /// Returns `None` if the bounds are not finite or contain no whole block.
    #[must_use]
    pub fn block_range(&self) -> Option<(IVec3, IVec3)> {
        if !self.is_finite() {
            return None;
        }
        let lo = self.min.ceil().as_ivec3();
        let hi = self.max.floor().as_ivec3();
        if lo.cmple(hi).all() {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// Iterate every block inside the bounds in x-major, then y, then z order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = IVec3> {
        let range = self.block_range();
        range.into_iter().flat_map(|(lo, hi)| {
            (lo.x..=hi.x).flat_map(move |x| {
                (lo.y..=hi.y).flat_map(move |y| (lo.z..=hi.z).map(move |z| IVec3::new(x, y, z)))
            })
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::between(DVec3::ZERO, DVec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_normalized() {
        let bounds = Bounds::between(DVec3::new(5.0, -1.0, 3.0), DVec3::new(1.0, 4.0, -2.0));
        assert_eq!(bounds.min, DVec3::new(1.0, -1.0, -2.0));
        assert_eq!(bounds.max, DVec3::new(5.0, 4.0, 3.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::between(DVec3::ZERO, DVec3::splat(2.0));
        assert!(bounds.contains(DVec3::ZERO));
        assert!(bounds.contains(DVec3::splat(2.0)));
        assert!(!bounds.contains(DVec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn test_block_range_and_iteration() {
        let bounds = Bounds::between(DVec3::ZERO, DVec3::splat(2.0));
        assert_eq!(bounds.block_range(), Some((IVec3::ZERO, IVec3::splat(2))));
        assert_eq!(bounds.iter_blocks().count(), 27);

        let fractional = Bounds::between(DVec3::splat(0.5), DVec3::splat(0.9));
        assert_eq!(fractional.block_range(), None);
        assert_eq!(fractional.iter_blocks().count(), 0);
    }

    #[test]
    fn test_infinite_bounds_have_no_blocks() {
        let bounds = Bounds::between(DVec3::splat(f64::NEG_INFINITY), DVec3::ZERO);
        assert!(!bounds.is_finite());
        assert!(bounds.contains(DVec3::splat(-1.0e9)));
        assert_eq!(bounds.block_range(), None);
        assert_eq!(bounds.iter_blocks().count(), 0);
    }

    #[test]
    fn test_union_and_intersection() {
        let a = Bounds::between(DVec3::ZERO, DVec3::splat(4.0));
        let b = Bounds::between(DVec3::splat(2.0), DVec3::splat(6.0));
        assert_eq!(a.union(&b), Bounds::between(DVec3::ZERO, DVec3::splat(6.0)));
        assert_eq!(
            a.intersection(&b),
            Some(Bounds::between(DVec3::splat(2.0), DVec3::splat(4.0)))
        );

        let far = Bounds::between(DVec3::splat(10.0), DVec3::splat(11.0));
        assert_eq!(a.intersection(&far), None);
    }
}
