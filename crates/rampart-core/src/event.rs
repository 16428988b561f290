//! Events flowing into and out of the engine.
//!
//! [`WorldEvent`]s describe one mutation of the world each and are delivered in
//! mutation order. [`ObjectiveEvent`]s are notifications produced when an
//! objective's state actually changes.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use lattice::MaterialData;

use crate::objective::{ObjectiveId, TeamId};

/// A block position together with its material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// Block coordinate
    pub position: IVec3,
    /// Material at that coordinate
    pub material: MaterialData,
}

impl BlockState {
    /// Create a block state.
    #[must_use]
    pub fn new(position: IVec3, material: impl Into<MaterialData>) -> Self {
        Self {
            position,
            material: material.into(),
        }
    }
}

/// A single world mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEvent {
    /// Liquid flowing from one cell into another.
    BlockFlow {
        /// Cell the liquid flows from
        from: BlockState,
        /// Cell the liquid flows into, before the flow
        to: BlockState,
    },
    /// A block was placed.
    BlockPlace {
        /// The placed block
        block: BlockState,
    },
    /// A block was broken.
    BlockBreak {
        /// The block as it was before breaking
        block: BlockState,
    },
    /// An item entity is about to spawn.
    ItemSpawn {
        /// The item's material
        material: MaterialData,
    },
}

/// Notification of an objective state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectiveEvent {
    /// Lava escaped a core far enough to leak it.
    CoreLeaked {
        /// Core id
        objective: ObjectiveId,
        /// Team owning the core
        team: Option<TeamId>,
        /// Vertical distance between the core's bottom and the lava
        distance: i64,
    },
    /// A matching block of a destroyable was broken.
    DestroyableDamaged {
        /// Destroyable id
        objective: ObjectiveId,
        /// Matching blocks left
        remaining: usize,
        /// Completion after the break, in percent
        completion: f64,
    },
    /// A matching block of a destroyable was placed back.
    DestroyableRepaired {
        /// Destroyable id
        objective: ObjectiveId,
        /// Matching blocks left
        remaining: usize,
        /// Completion after the repair, in percent
        completion: f64,
    },
    /// A destroyable crossed its completion threshold.
    DestroyableCompleted {
        /// Destroyable id
        objective: ObjectiveId,
        /// Team that owned it
        owner: Option<TeamId>,
    },
}

impl ObjectiveEvent {
    /// Id of the objective the event is about.
    #[must_use]
    pub fn objective(&self) -> &ObjectiveId {
        match self {
            Self::CoreLeaked { objective, .. }
            | Self::DestroyableDamaged { objective, .. }
            | Self::DestroyableRepaired { objective, .. }
            | Self::DestroyableCompleted { objective, .. } => objective,
        }
    }

    /// Returns true if the event marks an objective as complete.
    #[must_use]
    pub const fn is_completion(&self) -> bool {
        matches!(self, Self::CoreLeaked { .. } | Self::DestroyableCompleted { .. })
    }
}
