//! Objectives: trackable, completable goals bound to a region.
//!
//! Every objective is an [`Objective`]: a shared [`ObjectiveBase`] record plus
//! an [`ObjectiveKind`] payload. Event handling is split in two phases, the
//! same way for every kind:
//!
//! 1. [`Objective::evaluate`] reads the objective and an event and proposes a
//!    [`StateDelta`] (or nothing).
//! 2. [`Objective::apply`] commits the delta and reports what changed as
//!    [`ObjectiveEvent`]s.
//!
//! Only the owning module calls `apply`, so completion flags and block counters
//! have exactly one writer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::IVec3;
//! use lattice::{BlockGrid, Bounds, Material, MaterialPattern, Region};
//! use rampart_core::{BlockState, Objective, ObjectiveBase, TeamId, WorldEvent};
//!
//! let bounds = Bounds::from_blocks(IVec3::ZERO, IVec3::new(1, 0, 1));
//! let mut world = BlockGrid::new();
//! world.fill(&bounds, Material::GoldBlock);
//!
//! let base = ObjectiveBase::new("monument", "Monument", Arc::new(Region::cuboid(bounds)))
//!     .with_team(TeamId::new("blue"));
//! let mut monument = Objective::destroyable(
//!     base,
//!     MaterialPattern::single(Material::GoldBlock),
//!     50.0,
//!     &world,
//! )
//! .unwrap();
//!
//! let hit = WorldEvent::BlockBreak { block: BlockState::new(IVec3::ZERO, Material::GoldBlock) };
//! let delta = monument.evaluate(&hit).unwrap();
//! monument.apply(delta);
//! assert_eq!(monument.completion_percentage(), Some(25.0));
//! ```

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use glam::{DVec3, IVec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use lattice::{BlockAccess, MaterialEntry, MaterialPattern, Region, RegionError};

use crate::event::{ObjectiveEvent, WorldEvent};
use crate::proximity::{self, ProximityMetric};

// =============================================================================
// Identifiers
// =============================================================================

/// Stable objective identifier, used for cross-references and display keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectiveId(String);

impl ObjectiveId {
    /// Create an objective id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectiveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Team identifier as declared in the map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(String);

impl TeamId {
    /// Create a team id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Boolean objective options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ObjectiveFlags: u8 {
        /// Must be completed to win
        const REQUIRED = 1 << 0;
        /// Shown on the scoreboard
        const SHOW = 1 << 1;
        /// Follows mode changes
        const MODE_CHANGES = 1 << 2;
        /// Proximity ignores the vertical axis
        const PROXIMITY_HORIZONTAL = 1 << 3;
        /// Destroyable: placing matching blocks restores it
        const REPAIRABLE = 1 << 4;
        /// Destroyable: breaks emit sparks
        const SPARKS = 1 << 5;
        /// Destroyable: completion is displayed
        const SHOW_PROGRESS = 1 << 6;
    }
}

impl Default for ObjectiveFlags {
    fn default() -> Self {
        Self::REQUIRED | Self::SHOW
    }
}

// =============================================================================
// Objective
// =============================================================================

/// State shared by every objective kind.
#[derive(Debug, Clone)]
pub struct ObjectiveBase {
    /// Stable id
    pub id: ObjectiveId,
    /// Display name
    pub name: String,
    /// Boolean options
    pub flags: ObjectiveFlags,
    /// Owning team, `None` for neutral objectives
    pub team: Option<TeamId>,
    /// Player proximity metric
    pub proximity_metric: ProximityMetric,
    /// Region the objective lives in
    pub region: Arc<Region>,
}

impl ObjectiveBase {
    /// Create a base record with default flags and metric and no team.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, region: Arc<Region>) -> Self {
        Self {
            id: ObjectiveId::new(id),
            name: name.into(),
            flags: ObjectiveFlags::default(),
            team: None,
            proximity_metric: ProximityMetric::default(),
            region,
        }
    }

    /// Set the owning team.
    #[must_use]
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ObjectiveFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the proximity metric.
    #[must_use]
    pub fn with_proximity_metric(mut self, metric: ProximityMetric) -> Self {
        self.proximity_metric = metric;
        self
    }
}

/// Core payload: a block structure that is lost when lava leaks out of it.
#[derive(Debug, Clone)]
pub struct CoreState {
    material: MaterialEntry,
    leak: i32,
    body: Vec<IVec3>,
    lava: Vec<IVec3>,
    leaked: bool,
}

impl CoreState {
    /// Material identity of the core body.
    #[must_use]
    pub fn material(&self) -> MaterialEntry {
        self.material
    }

    /// Leak distance.
    #[must_use]
    pub fn leak(&self) -> i32 {
        self.leak
    }

    /// Blocks of the region that matched the core material at load time.
    #[must_use]
    pub fn body(&self) -> &[IVec3] {
        &self.body
    }

    /// Blocks of the region that were lava at load time.
    #[must_use]
    pub fn lava(&self) -> &[IVec3] {
        &self.lava
    }

    /// Lowest Y of the core body, if the body is not empty.
    #[must_use]
    pub fn bottom_y(&self) -> Option<i32> {
        self.body.iter().map(|b| b.y).min()
    }

    /// Returns true once the core has leaked.
    #[must_use]
    pub fn is_leaked(&self) -> bool {
        self.leaked
    }
}

/// Destroyable payload: a structure completed by breaking enough of it.
#[derive(Debug, Clone)]
pub struct DestroyableState {
    pattern: MaterialPattern,
    threshold: f64,
    original: usize,
    remaining: usize,
    complete: bool,
}

impl DestroyableState {
    /// Materials that count towards the objective.
    #[must_use]
    pub fn pattern(&self) -> &MaterialPattern {
        &self.pattern
    }

    /// Completion percentage at which the objective is complete.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Matching blocks at load time.
    #[must_use]
    pub fn original(&self) -> usize {
        self.original
    }

    /// Matching blocks still standing.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Live completion in percent; 0 when nothing matched at load time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        100.0 * (self.original - self.remaining) as f64 / self.original as f64
    }

    /// Returns true once the threshold has been reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Kind-specific objective state.
#[derive(Debug, Clone)]
pub enum ObjectiveKind {
    /// Core objective
    Core(CoreState),
    /// Destroyable objective
    Destroyable(DestroyableState),
}

/// A change proposed by [`Objective::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateDelta {
    /// The core leaked; lava reached `distance` blocks below its bottom.
    Leak {
        /// Vertical distance below the core bottom
        distance: i64,
    },
    /// One matching destroyable block was broken.
    Damage,
    /// One matching destroyable block was placed back.
    Repair,
}

/// A live objective.
#[derive(Debug, Clone)]
pub struct Objective {
    base: ObjectiveBase,
    kind: ObjectiveKind,
}

impl Objective {
    /// Build a core, classifying the region's blocks against `world`.
    ///
    /// # Errors
    ///
    /// [`RegionError`] if the region cannot enumerate its blocks.
    pub fn core(
        base: ObjectiveBase,
        material: MaterialEntry,
        leak: i32,
        world: &dyn BlockAccess,
    ) -> Result<Self, RegionError> {
        let blocks = base.region.blocks()?;
        let body: Vec<IVec3> = blocks
            .par_iter()
            .filter(|p| {
                let block = world.block(**p);
                material.matches(block.material, block.data)
            })
            .copied()
            .collect();
        let lava: Vec<IVec3> = blocks
            .par_iter()
            .filter(|p| world.block(**p).material.is_lava())
            .copied()
            .collect();
        tracing::debug!(
            core = %base.id,
            body = body.len(),
            lava = lava.len(),
            "core scanned"
        );
        Ok(Self {
            base,
            kind: ObjectiveKind::Core(CoreState {
                material,
                leak,
                body,
                lava,
                leaked: false,
            }),
        })
    }

    /// Build a destroyable, counting the region's matching blocks in `world`.
    ///
    /// # Errors
    ///
    /// [`RegionError`] if the region cannot enumerate its blocks.
    pub fn destroyable(
        base: ObjectiveBase,
        pattern: MaterialPattern,
        threshold: f64,
        world: &dyn BlockAccess,
    ) -> Result<Self, RegionError> {
        let original = base
            .region
            .blocks()?
            .par_iter()
            .filter(|p| pattern.matches(world.block(**p)))
            .count();
        tracing::debug!(destroyable = %base.id, original, "destroyable scanned");
        let mut state = DestroyableState {
            pattern,
            threshold,
            original,
            remaining: original,
            complete: false,
        };
        // A zero threshold is already met by an intact objective
        if state.original > 0 && state.completion() >= state.threshold {
            state.complete = true;
            tracing::info!(destroyable = %base.id, threshold, "destroyable complete at load");
        }
        Ok(Self {
            base,
            kind: ObjectiveKind::Destroyable(state),
        })
    }

    /// Shared state.
    #[must_use]
    pub fn base(&self) -> &ObjectiveBase {
        &self.base
    }

    /// Kind-specific state.
    #[must_use]
    pub fn kind(&self) -> &ObjectiveKind {
        &self.kind
    }

    /// Stable id.
    #[must_use]
    pub fn id(&self) -> &ObjectiveId {
        &self.base.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    /// Owning team.
    #[must_use]
    pub fn team(&self) -> Option<&TeamId> {
        self.base.team.as_ref()
    }

    /// Boolean options.
    #[must_use]
    pub fn flags(&self) -> ObjectiveFlags {
        self.base.flags
    }

    /// Returns true if the objective must be completed to win.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.base.flags.contains(ObjectiveFlags::REQUIRED)
    }

    /// Core payload, if this is a core.
    #[must_use]
    pub const fn as_core(&self) -> Option<&CoreState> {
        match &self.kind {
            ObjectiveKind::Core(core) => Some(core),
            ObjectiveKind::Destroyable(_) => None,
        }
    }

    /// Destroyable payload, if this is a destroyable.
    #[must_use]
    pub const fn as_destroyable(&self) -> Option<&DestroyableState> {
        match &self.kind {
            ObjectiveKind::Destroyable(destroyable) => Some(destroyable),
            ObjectiveKind::Core(_) => None,
        }
    }

    /// Returns true once the objective is complete. Completion never reverts.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match &self.kind {
            ObjectiveKind::Core(core) => core.leaked,
            ObjectiveKind::Destroyable(destroyable) => destroyable.complete,
        }
    }

    /// Live completion percentage. Only destroyables have one.
    #[must_use]
    pub fn completion_percentage(&self) -> Option<f64> {
        self.as_destroyable().map(DestroyableState::completion)
    }

    /// Representative point used for proximity: the center of the region.
    #[must_use]
    pub fn anchor(&self) -> Option<DVec3> {
        self.base.region.center()
    }

    /// Distance from `point` to the anchor, honouring horizontal-only proximity.
    #[must_use]
    pub fn proximity_distance(&self, point: DVec3) -> Option<f64> {
        let horizontal = self.base.flags.contains(ObjectiveFlags::PROXIMITY_HORIZONTAL);
        self.anchor()
            .map(|anchor| proximity::distance(anchor, point, horizontal))
    }

    /// Propose a state change for `event` without mutating anything.
    ///
    /// Cores only react to lava flowing into air. Routing a flow to the
    /// closest core is the caller's job.
    #[must_use]
    pub fn evaluate(&self, event: &WorldEvent) -> Option<StateDelta> {
        match (&self.kind, event) {
            (ObjectiveKind::Core(core), WorldEvent::BlockFlow { from, to }) => {
                if core.leaked || !from.material.material.is_lava() || !to.material.material.is_air() {
                    return None;
                }
                let distance = i64::from(core.bottom_y()?) - i64::from(to.position.y);
                (distance >= i64::from(core.leak)).then_some(StateDelta::Leak { distance })
            }
            (ObjectiveKind::Destroyable(destroyable), WorldEvent::BlockBreak { block }) => {
                let counts = self.base.region.contains_block(block.position)
                    && destroyable.pattern.matches(block.material);
                (counts && destroyable.remaining > 0).then_some(StateDelta::Damage)
            }
            (ObjectiveKind::Destroyable(destroyable), WorldEvent::BlockPlace { block }) => {
                let counts = self.base.flags.contains(ObjectiveFlags::REPAIRABLE)
                    && self.base.region.contains_block(block.position)
                    && destroyable.pattern.matches(block.material);
                (counts && destroyable.remaining < destroyable.original).then_some(StateDelta::Repair)
            }
            _ => None,
        }
    }

    /// Commit a delta proposed by [`Objective::evaluate`].
    ///
    /// Deltas that do not fit the objective's kind or current state are
    /// ignored.
    pub fn apply(&mut self, delta: StateDelta) -> Vec<ObjectiveEvent> {
        let id = self.base.id.clone();
        match (&mut self.kind, delta) {
            (ObjectiveKind::Core(core), StateDelta::Leak { distance }) => {
                if core.leaked {
                    return Vec::new();
                }
                core.leaked = true;
                tracing::info!(core = %id, distance, "core leaked");
                vec![ObjectiveEvent::CoreLeaked {
                    objective: id,
                    team: self.base.team.clone(),
                    distance,
                }]
            }
            (ObjectiveKind::Destroyable(destroyable), StateDelta::Damage) => {
                if destroyable.remaining == 0 {
                    return Vec::new();
                }
                destroyable.remaining -= 1;
                let completion = destroyable.completion();
                let mut events = vec![ObjectiveEvent::DestroyableDamaged {
                    objective: id.clone(),
                    remaining: destroyable.remaining,
                    completion,
                }];
                if !destroyable.complete && destroyable.original > 0 && completion >= destroyable.threshold {
                    destroyable.complete = true;
                    tracing::info!(destroyable = %id, completion, "destroyable completed");
                    events.push(ObjectiveEvent::DestroyableCompleted {
                        objective: id,
                        owner: self.base.team.clone(),
                    });
                }
                events
            }
            (ObjectiveKind::Destroyable(destroyable), StateDelta::Repair) => {
                if destroyable.remaining >= destroyable.original {
                    return Vec::new();
                }
                destroyable.remaining += 1;
                vec![ObjectiveEvent::DestroyableRepaired {
                    objective: id,
                    remaining: destroyable.remaining,
                    completion: destroyable.completion(),
                }]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BlockState;
    use lattice::{BlockGrid, Bounds, Material, MaterialData};

    fn region(min: IVec3, max: IVec3) -> Arc<Region> {
        Arc::new(Region::cuboid(Bounds::from_blocks(min, max)))
    }

    fn lava_flow(to_y: i32) -> WorldEvent {
        WorldEvent::BlockFlow {
            from: BlockState::new(IVec3::new(1, to_y + 1, 1), Material::StationaryLava),
            to: BlockState::new(IVec3::new(1, to_y, 1), MaterialData::AIR),
        }
    }

    /// Obsidian core spanning Y 10..=12 with lava in its middle.
    fn core(leak: i32) -> Objective {
        let mut world = BlockGrid::new();
        world.fill(&Bounds::from_blocks(IVec3::new(0, 10, 0), IVec3::new(2, 12, 2)), Material::Obsidian);
        world.set(IVec3::new(1, 11, 1), Material::StationaryLava);
        Objective::core(
            ObjectiveBase::new("core", "Core", region(IVec3::new(0, 10, 0), IVec3::new(2, 12, 2))),
            MaterialEntry::any(Material::Obsidian),
            leak,
            &world,
        )
        .unwrap()
    }

    fn destroyable(blocks: i32, threshold: f64, flags: ObjectiveFlags) -> (Objective, Vec<IVec3>) {
        let mut world = BlockGrid::new();
        let positions: Vec<IVec3> = (0..blocks).map(|x| IVec3::new(x, 0, 0)).collect();
        for p in &positions {
            world.set(*p, Material::Wool);
        }
        let base = ObjectiveBase::new("monument", "Monument", region(IVec3::ZERO, IVec3::new(15, 0, 0)))
            .with_team(TeamId::new("blue"))
            .with_flags(flags);
        let objective =
            Objective::destroyable(base, MaterialPattern::single(Material::Wool), threshold, &world)
                .unwrap();
        (objective, positions)
    }

    fn breaks(at: IVec3) -> WorldEvent {
        WorldEvent::BlockBreak {
            block: BlockState::new(at, Material::Wool),
        }
    }

    fn places(at: IVec3) -> WorldEvent {
        WorldEvent::BlockPlace {
            block: BlockState::new(at, Material::Wool),
        }
    }

    mod core_tests {
        use super::*;

        #[test]
        fn scan_classifies_body_and_lava() {
            let core = core(5);
            let state = core.as_core().unwrap();
            assert_eq!(state.body().len(), 26);
            assert_eq!(state.lava(), &[IVec3::new(1, 11, 1)]);
            assert_eq!(state.bottom_y(), Some(10));
        }

        #[test]
        fn leak_threshold_is_inclusive() {
            let core = core(5);
            assert_eq!(core.evaluate(&lava_flow(6)), None);
            assert_eq!(core.evaluate(&lava_flow(5)), Some(StateDelta::Leak { distance: 5 }));
            assert_eq!(core.evaluate(&lava_flow(2)), Some(StateDelta::Leak { distance: 8 }));
        }

        #[test]
        fn extreme_depth_does_not_overflow() {
            let mut core = core(5);
            let delta = core.evaluate(&lava_flow(i32::MIN)).unwrap();
            assert_eq!(delta, StateDelta::Leak { distance: 10 - i64::from(i32::MIN) });
            assert_eq!(core.apply(delta).len(), 1);

            // Far above the core is simply no leak
            assert_eq!(core.evaluate(&lava_flow(i32::MAX - 1)), None);
        }

        #[test]
        fn only_lava_into_air_triggers() {
            let core = core(5);
            let water = WorldEvent::BlockFlow {
                from: BlockState::new(IVec3::new(1, 1, 1), Material::Water),
                to: BlockState::new(IVec3::ZERO, MaterialData::AIR),
            };
            let into_stone = WorldEvent::BlockFlow {
                from: BlockState::new(IVec3::new(1, 1, 1), Material::Lava),
                to: BlockState::new(IVec3::ZERO, Material::Stone),
            };
            assert_eq!(core.evaluate(&water), None);
            assert_eq!(core.evaluate(&into_stone), None);
            assert_eq!(core.evaluate(&breaks(IVec3::new(0, 10, 0))), None);
        }

        #[test]
        fn leak_latches() {
            let mut core = core(5);
            let delta = core.evaluate(&lava_flow(0)).unwrap();
            let events = core.apply(delta);
            assert_eq!(events.len(), 1);
            assert!(core.is_complete());

            assert_eq!(core.evaluate(&lava_flow(0)), None);
            assert!(core.apply(StateDelta::Leak { distance: 9 }).is_empty());
            assert!(core.is_complete());
        }

        #[test]
        fn empty_body_never_leaks() {
            let world = BlockGrid::new();
            let core = Objective::core(
                ObjectiveBase::new("c", "Core", region(IVec3::ZERO, IVec3::ONE)),
                MaterialEntry::any(Material::Obsidian),
                0,
                &world,
            )
            .unwrap();
            assert_eq!(core.evaluate(&lava_flow(-50)), None);
        }

        #[test]
        fn unbounded_region_is_rejected() {
            let world = BlockGrid::new();
            let result = Objective::core(
                ObjectiveBase::new("c", "Core", Arc::new(Region::everywhere())),
                MaterialEntry::any(Material::Obsidian),
                5,
                &world,
            );
            assert!(result.is_err());
        }
    }

    mod destroyable_tests {
        use super::*;

        #[test]
        fn half_destroyed_is_complete_at_fifty() {
            let (mut monument, positions) = destroyable(10, 50.0, ObjectiveFlags::default());
            assert_eq!(monument.as_destroyable().unwrap().original(), 10);

            let mut completed = 0;
            for p in &positions[..5] {
                let delta = monument.evaluate(&breaks(*p)).unwrap();
                completed += monument
                    .apply(delta)
                    .iter()
                    .filter(|e| e.is_completion())
                    .count();
            }
            assert_eq!(monument.completion_percentage(), Some(50.0));
            assert!(monument.is_complete());
            assert_eq!(completed, 1);
        }

        #[test]
        fn zero_threshold_is_complete_at_load() {
            let (mut monument, positions) = destroyable(10, 0.0, ObjectiveFlags::default());
            assert!(monument.is_complete());
            assert_eq!(monument.completion_percentage(), Some(0.0));

            // Already latched, so damage reports no second completion
            let delta = monument.evaluate(&breaks(positions[0])).unwrap();
            assert!(monument.apply(delta).iter().all(|e| !e.is_completion()));
        }

        #[test]
        fn non_repairable_ignores_placement() {
            let flags = ObjectiveFlags::default() - ObjectiveFlags::REPAIRABLE;
            let (mut monument, positions) = destroyable(10, 50.0, flags);
            let delta = monument.evaluate(&breaks(positions[0])).unwrap();
            monument.apply(delta);
            assert_eq!(monument.evaluate(&places(positions[0])), None);
            assert_eq!(monument.as_destroyable().unwrap().remaining(), 9);
        }

        #[test]
        fn repair_is_capped_and_completion_latches() {
            let flags = ObjectiveFlags::default() | ObjectiveFlags::REPAIRABLE;
            let (mut monument, positions) = destroyable(4, 50.0, flags);
            assert_eq!(monument.evaluate(&places(positions[0])), None);

            for p in &positions[..2] {
                let delta = monument.evaluate(&breaks(*p)).unwrap();
                monument.apply(delta);
            }
            assert!(monument.is_complete());

            let delta = monument.evaluate(&places(positions[0])).unwrap();
            let events = monument.apply(delta);
            assert!(matches!(
                events.as_slice(),
                [ObjectiveEvent::DestroyableRepaired { remaining: 3, .. }]
            ));
            assert_eq!(monument.completion_percentage(), Some(25.0));
            assert!(monument.is_complete());
        }

        #[test]
        fn outside_region_or_wrong_material_is_ignored() {
            let (monument, _) = destroyable(4, 100.0, ObjectiveFlags::default());
            assert_eq!(monument.evaluate(&breaks(IVec3::new(0, 5, 0))), None);
            let stone = WorldEvent::BlockBreak {
                block: BlockState::new(IVec3::ZERO, Material::Stone),
            };
            assert_eq!(monument.evaluate(&stone), None);
        }

        #[test]
        fn remaining_is_floored_at_zero() {
            let (mut monument, positions) = destroyable(1, 100.0, ObjectiveFlags::default());
            let delta = monument.evaluate(&breaks(positions[0])).unwrap();
            monument.apply(delta);
            assert_eq!(monument.evaluate(&breaks(positions[0])), None);
            assert!(monument.apply(StateDelta::Damage).is_empty());
            assert_eq!(monument.as_destroyable().unwrap().remaining(), 0);
        }

        #[test]
        fn nothing_to_destroy_never_completes() {
            let (monument, _) = destroyable(0, 0.0, ObjectiveFlags::default());
            assert_eq!(monument.completion_percentage(), Some(0.0));
            assert!(!monument.is_complete());
        }
    }

    mod proximity_tests {
        use super::*;

        #[test]
        fn horizontal_flag_changes_distance() {
            let base = ObjectiveBase::new("a", "A", region(IVec3::ZERO, IVec3::splat(2)));
            let world = BlockGrid::new();
            let plain = Objective::destroyable(base.clone(), MaterialPattern::new(), 100.0, &world).unwrap();
            let flat = Objective::destroyable(
                base.with_flags(ObjectiveFlags::default() | ObjectiveFlags::PROXIMITY_HORIZONTAL),
                MaterialPattern::new(),
                100.0,
                &world,
            )
            .unwrap();

            let point = DVec3::new(1.0, 51.0, 1.0);
            assert_eq!(plain.anchor(), Some(DVec3::ONE));
            assert_eq!(plain.proximity_distance(point), Some(50.0));
            assert_eq!(flat.proximity_distance(point), Some(0.0));
        }
    }
}
