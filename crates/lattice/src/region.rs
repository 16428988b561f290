//! Regions: spatial predicates over block space.
//!
//! Every region answers `contains(point)`. Bounded regions can additionally
//! enumerate their blocks, and cuboids can be sampled for random points.
//!
//! Regions are built once when a match loads and are immutable afterwards.
//! They are shared between objectives through [`Arc`], and all read paths are
//! safe to call from any thread.
//!
//! # Boundedness
//!
//! | Shape        | Bounded when                  |
//! |--------------|-------------------------------|
//! | `Cuboid`     | every corner is finite        |
//! | `Union`      | every child is bounded        |
//! | `Intersect`  | any child is bounded          |
//! | `Complement` | the base region is bounded    |
//! | `Negative`   | never                         |
//! | `Everywhere` | never                         |
//! | `Nowhere`    | always (and empty)            |

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use glam::{DVec3, IVec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::RegionError;
use crate::Bounds;

/// The geometric definition of a region.
#[derive(Debug)]
pub enum Shape {
    /// Axis-aligned box with inclusive corners
    Cuboid(Bounds),
    /// Points in any child
    Union(Vec<Arc<Region>>),
    /// Points in every child
    Intersect(Vec<Arc<Region>>),
    /// Points in `base` but in none of `subtract`
    Complement {
        /// Region to subtract from
        base: Arc<Region>,
        /// Regions removed from the base
        subtract: Vec<Arc<Region>>,
    },
    /// Points outside the child
    Negative(Arc<Region>),
    /// Every point
    Everywhere,
    /// No point
    Nowhere,
}

/// How far a region reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Infinite in at least one direction
    Unbounded,
    /// Bounded and containing nothing
    Empty,
    /// Bounded by a finite box
    Finite(Bounds),
}

impl Extent {
    fn union(self, other: Self) -> Self {
        match (self, other) {
            (Extent::Unbounded, _) | (_, Extent::Unbounded) => Extent::Unbounded,
            (Extent::Empty, e) | (e, Extent::Empty) => e,
            (Extent::Finite(a), Extent::Finite(b)) => Extent::Finite(a.union(&b)),
        }
    }

    fn intersect(self, other: Self) -> Self {
        match (self, other) {
            (Extent::Empty, _) | (_, Extent::Empty) => Extent::Empty,
            (Extent::Unbounded, e) | (e, Extent::Unbounded) => e,
            (Extent::Finite(a), Extent::Finite(b)) => {
                a.intersection(&b).map_or(Extent::Empty, Extent::Finite)
            }
        }
    }
}

/// A spatial predicate with optional enumeration and sampling.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use lattice::{Bounds, Region};
///
/// let region = Region::cuboid(Bounds::between(DVec3::ZERO, DVec3::splat(2.0)));
/// assert!(region.is_bounded());
/// let first = region.blocks().unwrap();
/// let second = region.blocks().unwrap();
/// assert!(std::ptr::eq(first, second)); // cached
///
/// let point = region.random_point().unwrap();
/// assert!(region.contains(point));
/// ```
#[derive(Debug)]
pub struct Region {
    shape: Shape,
    extent: Extent,
    /// Block list, computed on first request.
    blocks: OnceLock<Vec<IVec3>>,
    /// Independent sampling source for this instance.
    rng: Mutex<ChaCha8Rng>,
}

impl Region {
    /// Build a region from its shape.
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        let extent = Self::compute_extent(&shape);
        Self {
            shape,
            extent,
            blocks: OnceLock::new(),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(rand::random())),
        }
    }

    /// Axis-aligned cuboid.
    #[must_use]
    pub fn cuboid(bounds: Bounds) -> Self {
        Self::new(Shape::Cuboid(bounds))
    }

    /// Union of several regions.
    #[must_use]
    pub fn union(children: Vec<Arc<Region>>) -> Self {
        Self::new(Shape::Union(children))
    }

    /// Intersection of several regions.
    #[must_use]
    pub fn intersect(children: Vec<Arc<Region>>) -> Self {
        Self::new(Shape::Intersect(children))
    }

    /// `base` with every region in `subtract` removed.
    #[must_use]
    pub fn complement(base: Arc<Region>, subtract: Vec<Arc<Region>>) -> Self {
        Self::new(Shape::Complement { base, subtract })
    }

    /// Everything outside `child`.
    #[must_use]
    pub fn negative(child: Arc<Region>) -> Self {
        Self::new(Shape::Negative(child))
    }

    /// The whole world.
    #[must_use]
    pub fn everywhere() -> Self {
        Self::new(Shape::Everywhere)
    }

    /// The empty region.
    #[must_use]
    pub fn nowhere() -> Self {
        Self::new(Shape::Nowhere)
    }

    fn compute_extent(shape: &Shape) -> Extent {
        match shape {
            Shape::Cuboid(bounds) => {
                if bounds.is_finite() {
                    Extent::Finite(*bounds)
                } else {
                    Extent::Unbounded
                }
            }
            Shape::Union(children) => children
                .iter()
                .fold(Extent::Empty, |acc, child| acc.union(child.extent)),
            Shape::Intersect(children) => {
                if children.is_empty() {
                    return Extent::Empty;
                }
                children
                    .iter()
                    .fold(Extent::Unbounded, |acc, child| acc.intersect(child.extent))
            }
            Shape::Complement { base, .. } => base.extent,
            Shape::Negative(_) | Shape::Everywhere => Extent::Unbounded,
            Shape::Nowhere => Extent::Empty,
        }
    }

    /// The shape this region was built from.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// How far the region reaches.
    #[must_use]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Finite bounding box, if the region is bounded and non-empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        match self.extent {
            Extent::Finite(bounds) => Some(bounds),
            Extent::Empty | Extent::Unbounded => None,
        }
    }

    /// Whether a point lies inside the region.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        match &self.shape {
            Shape::Cuboid(bounds) => bounds.contains(point),
            Shape::Union(children) => children.iter().any(|c| c.contains(point)),
            Shape::Intersect(children) => {
                !children.is_empty() && children.iter().all(|c| c.contains(point))
            }
            Shape::Complement { base, subtract } => {
                base.contains(point) && !subtract.iter().any(|c| c.contains(point))
            }
            Shape::Negative(child) => !child.contains(point),
            Shape::Everywhere => true,
            Shape::Nowhere => false,
        }
    }

    /// Whether a block coordinate lies inside the region.
    #[must_use]
    pub fn contains_block(&self, block: IVec3) -> bool {
        self.contains(block.as_dvec3())
    }

    /// Whether the region has a finite extent.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        !matches!(self.extent, Extent::Unbounded)
    }

    /// Whether [`random_point`](Self::random_point) is supported.
    ///
    /// Only bounded cuboids can be sampled uniformly.
    #[must_use]
    pub fn is_randomizable(&self) -> bool {
        matches!(self.shape, Shape::Cuboid(_)) && self.is_bounded()
    }

    /// Representative point used for proximity: the center of the bounds.
    #[must_use]
    pub fn center(&self) -> Option<DVec3> {
        self.bounds().map(|b| b.center())
    }

    /// Every block coordinate inside the region.
    ///
    /// Computed on the first call and cached for the lifetime of the region;
    /// later calls return the same slice.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::UnsupportedGeometry`] if the region is unbounded.
    pub fn blocks(&self) -> Result<&[IVec3], RegionError> {
        let bounds = match self.extent {
            Extent::Unbounded => {
                return Err(RegionError::UnsupportedGeometry {
                    operation: "blocks",
                    reason: "unbounded",
                })
            }
            Extent::Empty => None,
            Extent::Finite(bounds) => Some(bounds),
        };
        let blocks = self.blocks.get_or_init(|| {
            let Some(bounds) = bounds else {
                return Vec::new();
            };
            let blocks: Vec<IVec3> = match self.shape {
                Shape::Cuboid(_) => bounds.iter_blocks().collect(),
                _ => bounds
                    .iter_blocks()
                    .filter(|b| self.contains_block(*b))
                    .collect(),
            };
            tracing::debug!(count = blocks.len(), "enumerated region blocks");
            blocks
        });
        Ok(blocks)
    }

    /// A uniformly sampled point inside the region.
    ///
    /// Each region owns an independently seeded generator; sampling is not
    /// reproducible across runs.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::UnsupportedGeometry`] if the region is not
    /// randomizable.
    pub fn random_point(&self) -> Result<DVec3, RegionError> {
        let (Shape::Cuboid(bounds), true) = (&self.shape, self.is_bounded()) else {
            return Err(RegionError::UnsupportedGeometry {
                operation: "random_point",
                reason: "non-randomizable",
            });
        };
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let t = DVec3::new(rng.gen(), rng.gen(), rng.gen());
        Ok((bounds.min + bounds.size() * t).clamp(bounds.min, bounds.max))
    }
}
