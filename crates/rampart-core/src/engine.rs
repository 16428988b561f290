//! The engine: explicit context for every running match.
//!
//! The `Engine` owns one instance of each module and a record per match. It
//! provides:
//! - Match id allocation (monotonic, never reused)
//! - Loading in dependency order (named regions before objectives)
//! - Event dispatch to every module of one match
//! - Match state transitions
//! - Queries over the loaded objectives
//! - An objective event log drained with [`Engine::take_events`]
//!
//! # Event model
//!
//! All calls take `&mut self` and run to completion, so an event handler never
//! observes another handler half way. Clearing a match removes all of its state
//! before returning; later events for it are silently ignored.
//!
//! # Example
//!
//! ```
//! use lattice::{BlockGrid, Element, Material, MaterialData};
//! use rampart_core::{Engine, EngineConfig, WorldEvent};
//!
//! let document = Element::new("map")
//!     .child(Element::new("item-remove").child(Element::new("item").with_text("bone")));
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! let report = engine.load_match(&document, &BlockGrid::new(), &[]);
//!
//! let spawn = WorldEvent::ItemSpawn { material: MaterialData::from(Material::Bone) };
//! assert!(engine.dispatch(report.match_id, &spawn).cancelled);
//!
//! engine.clear_match(report.match_id);
//! assert!(!engine.dispatch(report.match_id, &spawn).cancelled);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use lattice::{BlockAccess, Node, Region};

use crate::config::EngineConfig;
use crate::error::{EngineError, ModuleError};
use crate::event::{ObjectiveEvent, WorldEvent};
use crate::module::{
    CoreModule, DestroyableModule, Handled, ItemRemoveModule, LoadContext, Module, RegionModule,
};
use crate::objective::{Objective, TeamId};

// =============================================================================
// Match
// =============================================================================

/// Unique identifier for a loaded match.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(u64);

impl MatchId {
    /// Creates a new `MatchId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({})", self.0)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MatchId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Lifecycle state of a match.
///
/// ```text
/// Waiting -> Starting -> Playing -> Ended
///    ^          |
///    +----------+  (countdown cancelled)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchState {
    /// Loaded, waiting for players
    #[default]
    Waiting,
    /// Countdown running
    Starting,
    /// In progress
    Playing,
    /// Finished; world events are ignored
    Ended,
}

impl MatchState {
    /// Returns true if the match may go from `self` to `to`.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Waiting, Self::Starting)
                | (Self::Starting, Self::Waiting | Self::Playing)
                | (Self::Playing, Self::Ended)
        )
    }
}

/// Engine-side record of a loaded match.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    state: MatchState,
    teams: Vec<TeamId>,
}

impl Match {
    /// Match id.
    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Teams taking part.
    #[must_use]
    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }
}

/// Outcome of [`Engine::load_match`].
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Id of the new match
    pub match_id: MatchId,
    /// Declarations that were skipped, in module order
    pub errors: Vec<ModuleError>,
}

impl LoadReport {
    /// Returns true if every declaration loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of [`Engine::dispatch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The host should cancel the world mutation
    pub cancelled: bool,
    /// Number of objective events recorded for it
    pub objective_events: usize,
}

// =============================================================================
// Engine
// =============================================================================

/// Match context owning all modules and per-match records.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    next_id: u64,
    matches: BTreeMap<MatchId, Match>,
    regions: RegionModule,
    cores: CoreModule,
    destroyables: DestroyableModule,
    item_remove: ItemRemoveModule,
    event_log: Vec<(MatchId, ObjectiveEvent)>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Creates an engine with no matches.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            next_id: 1,
            matches: BTreeMap::new(),
            regions: RegionModule::new(),
            cores: CoreModule::new(),
            destroyables: DestroyableModule::new(),
            item_remove: ItemRemoveModule::new(),
            event_log: Vec::new(),
        }
    }

    /// Engine defaults.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load a new match from a map document.
    ///
    /// Named regions load first so that objectives can refer to them. Bad
    /// declarations are reported in the returned [`LoadReport`] and skipped;
    /// the match is always created.
    ///
    /// # Arguments
    ///
    /// * `document` - Root element of the map
    /// * `world` - World snapshot used to classify objective blocks
    /// * `teams` - Teams taking part in the match
    pub fn load_match(&mut self, document: &dyn Node, world: &dyn BlockAccess, teams: &[TeamId]) -> LoadReport {
        let match_id = MatchId::new(self.next_id);
        self.next_id += 1;

        let no_regions = BTreeMap::new();
        let mut errors = self.regions.load_match(
            &LoadContext {
                match_id,
                world,
                teams,
                regions: &no_regions,
                config: &self.config,
            },
            document,
        );

        let ctx = LoadContext {
            match_id,
            world,
            teams,
            regions: self.regions.named(match_id).unwrap_or(&no_regions),
            config: &self.config,
        };
        let objectives: [&mut dyn Module; 3] = [&mut self.cores, &mut self.destroyables, &mut self.item_remove];
        for module in objectives {
            errors.extend(module.load_match(&ctx, document));
        }

        self.matches.insert(
            match_id,
            Match {
                id: match_id,
                state: MatchState::Waiting,
                teams: teams.to_vec(),
            },
        );
        tracing::info!(
            %match_id,
            cores = self.cores.cores(match_id).len(),
            destroyables = self.destroyables.destroyables(match_id).len(),
            errors = errors.len(),
            "match loaded"
        );
        LoadReport { match_id, errors }
    }

    /// Remove a match and all of its module state. Unknown matches are ignored.
    pub fn clear_match(&mut self, match_id: MatchId) {
        for module in self.modules_mut() {
            module.clear_match(match_id);
        }
        if self.matches.remove(&match_id).is_some() {
            tracing::debug!(%match_id, "match cleared");
        }
    }

    /// Deliver one world event to every module of a match.
    ///
    /// Events for unknown or ended matches are ignored.
    pub fn dispatch(&mut self, match_id: MatchId, event: &WorldEvent) -> Dispatch {
        match self.matches.get(&match_id) {
            Some(m) if m.state != MatchState::Ended => {}
            _ => return Dispatch::default(),
        }

        let mut handled = Handled::default();
        for module in self.modules_mut() {
            handled.merge(module.handle(match_id, event));
        }

        let objective_events = handled.events.len();
        self.event_log
            .extend(handled.events.into_iter().map(|event| (match_id, event)));
        Dispatch {
            cancelled: handled.cancelled,
            objective_events,
        }
    }

    /// Move a match to a new state.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownMatch`] if the match is not loaded,
    /// [`EngineError::InvalidTransition`] if the change is not allowed.
    pub fn transition(&mut self, match_id: MatchId, to: MatchState) -> Result<(), EngineError> {
        let record = self
            .matches
            .get_mut(&match_id)
            .ok_or(EngineError::UnknownMatch(match_id))?;
        let from = record.state;
        if !from.can_transition(to) {
            return Err(EngineError::InvalidTransition { id: match_id, from, to });
        }
        record.state = to;
        tracing::info!(%match_id, ?from, ?to, "match state changed");
        Ok(())
    }

    /// A loaded match.
    #[must_use]
    pub fn get_match(&self, match_id: MatchId) -> Option<&Match> {
        self.matches.get(&match_id)
    }

    /// State of a loaded match.
    #[must_use]
    pub fn state(&self, match_id: MatchId) -> Option<MatchState> {
        self.matches.get(&match_id).map(Match::state)
    }

    /// All loaded matches in id order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.values()
    }

    /// Cores of a match in declaration order.
    #[must_use]
    pub fn cores(&self, match_id: MatchId) -> &[Objective] {
        self.cores.cores(match_id)
    }

    /// Destroyables of a match in declaration order.
    #[must_use]
    pub fn destroyables(&self, match_id: MatchId) -> &[Objective] {
        self.destroyables.destroyables(match_id)
    }

    /// The core closest to `point`; ties go to the first declared.
    #[must_use]
    pub fn closest_core(&self, match_id: MatchId, point: DVec3) -> Option<&Objective> {
        self.cores.closest(match_id, point)
    }

    /// The destroyable closest to `point`; ties go to the first declared.
    #[must_use]
    pub fn closest_destroyable(&self, match_id: MatchId, point: DVec3) -> Option<&Objective> {
        self.destroyables.closest(match_id, point)
    }

    /// Any objective of a match by id.
    #[must_use]
    pub fn objective(&self, match_id: MatchId, id: &str) -> Option<&Objective> {
        self.cores(match_id)
            .iter()
            .chain(self.destroyables(match_id))
            .find(|objective| objective.id().as_str() == id)
    }

    /// A named region of a match.
    #[must_use]
    pub fn region(&self, match_id: MatchId, id: &str) -> Option<Arc<Region>> {
        self.regions.get(match_id, id)
    }

    /// Drains and returns all recorded objective events, oldest first.
    pub fn take_events(&mut self) -> Vec<(MatchId, ObjectiveEvent)> {
        std::mem::take(&mut self.event_log)
    }

    /// Returns the number of events currently in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.event_log.len()
    }

    fn modules_mut(&mut self) -> [&mut dyn Module; 4] {
        [
            &mut self.regions,
            &mut self.cores,
            &mut self.destroyables,
            &mut self.item_remove,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice::{BlockGrid, Element};

    mod match_id_tests {
        use super::*;

        #[test]
        fn display_and_ordering() {
            assert!(MatchId::new(1) < MatchId::new(2));
            assert_eq!(MatchId::new(5).to_string(), "5");
            assert_eq!(format!("{:?}", MatchId::new(5)), "MatchId(5)");
            assert_eq!(MatchId::from(8).as_u64(), 8);
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn allowed_transitions() {
            use MatchState::{Ended, Playing, Starting, Waiting};
            assert!(Waiting.can_transition(Starting));
            assert!(Starting.can_transition(Waiting));
            assert!(Starting.can_transition(Playing));
            assert!(Playing.can_transition(Ended));

            assert!(!Waiting.can_transition(Playing));
            assert!(!Playing.can_transition(Waiting));
            assert!(!Ended.can_transition(Waiting));
            assert!(!Playing.can_transition(Playing));
        }

        #[test]
        fn engine_enforces_transitions() {
            let mut engine = Engine::default();
            let id = engine.load_match(&Element::new("map"), &BlockGrid::new(), &[]).match_id;
            assert_eq!(engine.state(id), Some(MatchState::Waiting));

            assert_eq!(
                engine.transition(id, MatchState::Ended),
                Err(EngineError::InvalidTransition {
                    id,
                    from: MatchState::Waiting,
                    to: MatchState::Ended,
                })
            );
            engine.transition(id, MatchState::Starting).unwrap();
            engine.transition(id, MatchState::Playing).unwrap();
            assert_eq!(engine.state(id), Some(MatchState::Playing));

            let unknown = MatchId::new(404);
            assert_eq!(
                engine.transition(unknown, MatchState::Starting),
                Err(EngineError::UnknownMatch(unknown))
            );
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn ids_are_never_reused() {
            let mut engine = Engine::default();
            let doc = Element::new("map");
            let a = engine.load_match(&doc, &BlockGrid::new(), &[]).match_id;
            engine.clear_match(a);
            let b = engine.load_match(&doc, &BlockGrid::new(), &[]).match_id;
            assert_ne!(a, b);
            assert_eq!(engine.matches().map(Match::id).collect::<Vec<_>>(), vec![b]);
        }

        #[test]
        fn clearing_unknown_match_is_a_no_op() {
            let mut engine = Engine::default();
            engine.clear_match(MatchId::new(12));
            assert!(engine.get_match(MatchId::new(12)).is_none());
        }

        #[test]
        fn load_records_teams() {
            let mut engine = Engine::default();
            let teams = [TeamId::new("red"), TeamId::new("blue")];
            let report = engine.load_match(&Element::new("map"), &BlockGrid::new(), &teams);
            assert!(report.is_clean());
            assert_eq!(engine.get_match(report.match_id).unwrap().teams(), &teams);
        }
    }
}
