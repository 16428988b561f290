//! Match modules.
//!
//! A module owns one concern of a match (named regions, cores, destroyables,
//! item removal). For every match it parses its declarations from the map
//! document, keeps the resulting state keyed by [`MatchId`], routes world
//! events to that state and drops it when the match is cleared.
//!
//! # Loading
//!
//! Declarations are parsed independently. A bad declaration produces a
//! [`ModuleError`] and is skipped; it never aborts the rest of the load.
//!
//! # Available Modules
//!
//! - [`RegionModule`]: Named regions other modules refer to by id
//! - [`CoreModule`]: Cores, leaked by lava
//! - [`DestroyableModule`]: Destroyables, completed by breaking blocks
//! - [`ItemRemoveModule`]: Cancels spawning of listed items

mod cores;
mod destroyables;
mod item_remove;
mod regions;

pub use cores::CoreModule;
pub use destroyables::DestroyableModule;
pub use item_remove::ItemRemoveModule;
pub use regions::RegionModule;

use std::collections::BTreeMap;
use std::sync::Arc;

use lattice::{children_named, AttributeScope, BlockAccess, ConfigError, Node, Region, RegionParser};

use crate::config::EngineConfig;
use crate::engine::MatchId;
use crate::error::ModuleError;
use crate::event::{ObjectiveEvent, WorldEvent};
use crate::objective::{ObjectiveFlags, TeamId};
use crate::proximity::ProximityMetric;

/// Everything a module may read while loading a match.
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    /// Match being loaded
    pub match_id: MatchId,
    /// World snapshot at load time
    pub world: &'a dyn BlockAccess,
    /// Teams taking part in the match
    pub teams: &'a [TeamId],
    /// Named regions of the match
    pub regions: &'a BTreeMap<String, Arc<Region>>,
    /// Engine defaults
    pub config: &'a EngineConfig,
}

impl LoadContext<'_> {
    /// Resolve an optional team reference.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownTeam`] if the attribute names a team that is not
    /// in the match.
    pub fn team(&self, scope: &AttributeScope<'_>, attribute: &str) -> Result<Option<TeamId>, ConfigError> {
        let Some(id) = scope.get(attribute) else {
            return Ok(None);
        };
        self.teams
            .iter()
            .find(|team| team.as_str() == id)
            .cloned()
            .map(Some)
            .ok_or_else(|| ConfigError::UnknownTeam {
                id: id.to_string(),
                position: scope.position(),
            })
    }

    /// Resolve the region of a declaration, which must be bounded.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownRegion`] or a parse error if no usable region is
    /// declared, [`ConfigError::UnboundedRegion`] if it is not bounded.
    pub fn bounded_region(&self, scope: &AttributeScope<'_>, owner: &str) -> Result<Arc<Region>, ConfigError> {
        let region = RegionParser::new(self.regions).resolve(scope)?;
        if region.is_bounded() {
            Ok(region)
        } else {
            Err(ConfigError::UnboundedRegion {
                owner: owner.to_string(),
                position: scope.position(),
            })
        }
    }

    /// Proximity metric of a declaration, or the configured default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownProximityMetric`] for an unrecognised name.
    pub fn proximity_metric(&self, scope: &AttributeScope<'_>) -> Result<ProximityMetric, ConfigError> {
        match scope.get("proximity-metric") {
            None => Ok(self.config.proximity_metric),
            Some(name) => name.parse().map_err(|_| ConfigError::UnknownProximityMetric {
                name: name.to_string(),
                position: scope.position(),
            }),
        }
    }
}

/// Result of routing one world event through a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handled {
    /// The event should be cancelled in the world
    pub cancelled: bool,
    /// Objective state changes the event caused
    pub events: Vec<ObjectiveEvent>,
}

impl Handled {
    /// Fold another module's result into this one.
    pub fn merge(&mut self, other: Handled) {
        self.cancelled |= other.cancelled;
        self.events.extend(other.events);
    }
}

/// A per-match module.
///
/// Modules only mutate their own per-match state. The engine calls
/// `load_match` before any event for that match and `clear_match` after the
/// last one.
pub trait Module: Send {
    /// Short name used in diagnostics (e.g. `cores`).
    fn name(&self) -> &'static str;

    /// Parse this module's declarations for a new match.
    ///
    /// Returns one diagnostic per skipped declaration.
    fn load_match(&mut self, ctx: &LoadContext<'_>, document: &dyn Node) -> Vec<ModuleError>;

    /// Drop all state for a match. Unknown matches are ignored.
    fn clear_match(&mut self, match_id: MatchId);

    /// Route a world event to the match's state.
    fn handle(&mut self, match_id: MatchId, event: &WorldEvent) -> Handled {
        let _ = (match_id, event);
        Handled::default()
    }

    /// Returns true if state for the match is loaded.
    fn is_loaded(&self, match_id: MatchId) -> bool;
}

/// Every `<item>` inside a `<group>` under the document root, paired with its
/// group, in document order.
pub(crate) fn declarations<'d>(document: &'d dyn Node, group: &'d str, item: &'d str) -> Vec<[&'d dyn Node; 2]> {
    children_named(document, group)
        .flat_map(|parent| children_named(parent, item).map(move |child| [child, parent]))
        .collect()
}

/// Read boolean attributes into flags. Each entry is `(attribute, flag, default)`.
pub(crate) fn read_flags(
    scope: &AttributeScope<'_>,
    entries: &[(&str, ObjectiveFlags, bool)],
) -> Result<ObjectiveFlags, ConfigError> {
    let mut flags = ObjectiveFlags::empty();
    for (attribute, flag, default) in entries {
        flags.set(*flag, scope.bool_or(attribute, *default)?);
    }
    Ok(flags)
}

/// Record a skipped declaration.
pub(crate) fn skipped(module: &'static str, match_id: MatchId, error: ConfigError) -> ModuleError {
    tracing::warn!(module, %match_id, %error, "declaration skipped");
    ModuleError::new(module, error)
}
