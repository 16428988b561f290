//! # Rampart Core
//!
//! Objective engine for team-objective block matches.
//!
//! This crate turns a declarative map document into live, per-match objectives
//! and evaluates them as the world changes block by block.
//!
//! ## Architecture
//!
//! - **Modules**: Per-match factories that parse declarations into state and
//!   route world events to it ([`module::RegionModule`], [`module::CoreModule`],
//!   [`module::DestroyableModule`], [`module::ItemRemoveModule`])
//! - **Objectives**: A shared base record plus a kind-specific payload. Each
//!   objective proposes a [`StateDelta`] for an event and the owning module
//!   applies it
//! - **Engine**: The explicit match context. It allocates match ids, runs
//!   module loads in dependency order, dispatches events and records
//!   [`ObjectiveEvent`]s
//!
//! ## Usage
//!
//! ```rust
//! use glam::IVec3;
//! use lattice::{BlockGrid, Bounds, Element, Material, MaterialData};
//! use rampart_core::{BlockState, Engine, EngineConfig, MatchState, TeamId, WorldEvent};
//!
//! let mut world = BlockGrid::new();
//! world.fill(&Bounds::from_blocks(IVec3::new(0, 10, 0), IVec3::new(2, 12, 2)), Material::Obsidian);
//!
//! let document = Element::new("map").child(
//!     Element::new("cores").child(
//!         Element::new("core")
//!             .attr("id", "red-core")
//!             .attr("team", "red")
//!             .child(Element::new("cuboid").attr("min", "0,10,0").attr("max", "2,12,2")),
//!     ),
//! );
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let report = engine.load_match(&document, &world, &[TeamId::new("red")]);
//! assert!(report.errors.is_empty());
//! engine.transition(report.match_id, MatchState::Starting).unwrap();
//! engine.transition(report.match_id, MatchState::Playing).unwrap();
//!
//! let flow = WorldEvent::BlockFlow {
//!     from: BlockState::new(IVec3::new(1, 6, 1), Material::Lava),
//!     to: BlockState::new(IVec3::new(1, 5, 1), MaterialData::AIR),
//! };
//! engine.dispatch(report.match_id, &flow);
//!
//! let core = engine.closest_core(report.match_id, glam::DVec3::new(1.0, 5.0, 1.0)).unwrap();
//! assert!(core.is_complete());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export lattice for regions, materials and documents
pub use lattice;

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod module;
pub mod objective;
pub mod proximity;

pub use config::EngineConfig;
pub use engine::{Dispatch, Engine, LoadReport, MatchId, MatchState};
pub use error::{EngineError, ModuleError};
pub use event::{BlockState, ObjectiveEvent, WorldEvent};
pub use objective::{
    CoreState, DestroyableState, Objective, ObjectiveBase, ObjectiveFlags, ObjectiveId,
    ObjectiveKind, StateDelta, TeamId,
};
pub use proximity::ProximityMetric;

#[cfg(test)]
mod tests;
