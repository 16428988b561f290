//! Test helper functions for building worlds, documents and events.

use glam::IVec3;

use lattice::{BlockGrid, Bounds, Element, Material, MaterialData};

use crate::engine::{Engine, MatchId, MatchState};
use crate::event::{BlockState, WorldEvent};
use crate::objective::TeamId;

// =============================================================================
// Setup
// =============================================================================

/// Install a test-writer subscriber once so `tracing` output shows on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// The two teams used by every scenario.
pub fn teams() -> [TeamId; 2] {
    [TeamId::new("red"), TeamId::new("blue")]
}

/// Move a freshly loaded match straight to `Playing`.
pub fn start(engine: &mut Engine, match_id: MatchId) {
    engine.transition(match_id, MatchState::Starting).unwrap();
    engine.transition(match_id, MatchState::Playing).unwrap();
}

// =============================================================================
// Documents
// =============================================================================

/// `<cuboid>` covering the blocks from `min` to `max` inclusive.
pub fn cuboid(min: IVec3, max: IVec3) -> Element {
    Element::new("cuboid")
        .attr("min", format!("{},{},{}", min.x, min.y, min.z))
        .attr("max", format!("{},{},{}", max.x, max.y, max.z))
}

/// `<core>` with an inline cuboid.
pub fn core(id: &str, team: &str, min: IVec3, max: IVec3) -> Element {
    Element::new("core")
        .attr("id", id)
        .attr("team", team)
        .child(cuboid(min, max))
}

/// Gold `<destroyable>` owned by blue with an inline cuboid.
pub fn monument(id: &str, min: IVec3, max: IVec3) -> Element {
    Element::new("destroyable")
        .attr("id", id)
        .attr("name", "Monument")
        .attr("owner", "blue")
        .attr("materials", "gold block")
        .child(cuboid(min, max))
}

/// Root `<map>` with the given top-level groups.
pub fn map(groups: impl IntoIterator<Item = Element>) -> Element {
    groups.into_iter().fold(Element::new("map"), Element::child)
}

// =============================================================================
// Worlds
// =============================================================================

/// Fill the blocks from `min` to `max` inclusive.
pub fn fill(world: &mut BlockGrid, min: IVec3, max: IVec3, material: Material) {
    world.fill(&Bounds::from_blocks(min, max), material);
}

// =============================================================================
// Events
// =============================================================================

/// Lava flowing down into air at `to`.
pub fn lava_into(to: IVec3) -> WorldEvent {
    WorldEvent::BlockFlow {
        from: BlockState::new(to + IVec3::Y, Material::Lava),
        to: BlockState::new(to, MaterialData::AIR),
    }
}

/// A block of `material` broken at `position`.
pub fn break_block(position: IVec3, material: Material) -> WorldEvent {
    WorldEvent::BlockBreak {
        block: BlockState::new(position, material),
    }
}

/// A block of `material` placed at `position`.
pub fn place_block(position: IVec3, material: Material) -> WorldEvent {
    WorldEvent::BlockPlace {
        block: BlockState::new(position, material),
    }
}
