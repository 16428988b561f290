//! Core objectives.
//!
//! Declared as `<cores><core .../></cores>`. Attributes on `<cores>` apply to
//! every nested `<core>` that does not override them.
//!
//! A lava flow is only ever offered to the core closest to the flow's
//! destination, so one flow can leak at most one core.

use std::collections::BTreeMap;

use glam::DVec3;

use lattice::{AttributeScope, ConfigError, MaterialEntry, Node};

use crate::engine::MatchId;
use crate::error::ModuleError;
use crate::event::WorldEvent;
use crate::objective::{Objective, ObjectiveBase, ObjectiveFlags};
use crate::proximity;

use super::{declarations, read_flags, skipped, Handled, LoadContext, Module};

/// Per-match cores in declaration order.
#[derive(Debug, Default)]
pub struct CoreModule {
    cores: BTreeMap<MatchId, Vec<Objective>>,
}

impl CoreModule {
    /// Diagnostic name.
    pub const NAME: &'static str = "cores";

    /// Create a module with no loaded matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cores of a match in declaration order; empty for unknown matches.
    #[must_use]
    pub fn cores(&self, match_id: MatchId) -> &[Objective] {
        self.cores.get(&match_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// The core whose region center is closest to `point`.
    ///
    /// Ties go to the core declared first.
    #[must_use]
    pub fn closest(&self, match_id: MatchId, point: DVec3) -> Option<&Objective> {
        proximity::closest(self.cores(match_id), point, Objective::anchor)
    }

    fn parse(ctx: &LoadContext<'_>, scope: &AttributeScope<'_>, index: usize) -> Result<Objective, ConfigError> {
        let config = ctx.config;
        let id = scope.get("id").map_or_else(|| format!("core-{index}"), str::to_string);
        let name = scope.get("name").unwrap_or(config.core_name.as_str()).to_string();
        let region = ctx.bounded_region(scope, "core")?;

        let leak = scope.int_or("leak", config.core_leak)?;
        if leak < 0 {
            return Err(scope.invalid("leak", &leak.to_string()));
        }
        let material = match scope.get("material") {
            Some(value) => MaterialEntry::parse(value)?,
            None => config.core_material,
        };
        let team = ctx.team(scope, "team")?;
        let flags = read_flags(
            scope,
            &[
                ("required", ObjectiveFlags::REQUIRED, true),
                ("show", ObjectiveFlags::SHOW, true),
                ("mode-changes", ObjectiveFlags::MODE_CHANGES, true),
                ("proximity-horizontal", ObjectiveFlags::PROXIMITY_HORIZONTAL, false),
            ],
        )?;
        let metric = ctx.proximity_metric(scope)?;

        let mut base = ObjectiveBase::new(id, name, region)
            .with_flags(flags)
            .with_proximity_metric(metric);
        base.team = team;

        Objective::core(base, material, leak, ctx.world).map_err(|_| ConfigError::UnboundedRegion {
            owner: "core".to_string(),
            position: scope.position(),
        })
    }
}

impl Module for CoreModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load_match(&mut self, ctx: &LoadContext<'_>, document: &dyn Node) -> Vec<ModuleError> {
        let mut cores = Vec::new();
        let mut errors = Vec::new();
        for (index, nodes) in declarations(document, "cores", "core").iter().enumerate() {
            match Self::parse(ctx, &AttributeScope::new(nodes), index) {
                Ok(core) => cores.push(core),
                Err(error) => errors.push(skipped(Self::NAME, ctx.match_id, error)),
            }
        }
        tracing::debug!(match_id = %ctx.match_id, cores = cores.len(), "cores loaded");
        self.cores.insert(ctx.match_id, cores);
        errors
    }

    fn clear_match(&mut self, match_id: MatchId) {
        self.cores.remove(&match_id);
    }

    fn handle(&mut self, match_id: MatchId, event: &WorldEvent) -> Handled {
        let WorldEvent::BlockFlow { to, .. } = event else {
            return Handled::default();
        };
        let Some(cores) = self.cores.get_mut(&match_id) else {
            return Handled::default();
        };
        let Some(index) = proximity::closest_index(cores.iter(), to.position.as_dvec3(), Objective::anchor) else {
            return Handled::default();
        };
        let core = &mut cores[index];
        let events = core.evaluate(event).map(|delta| core.apply(delta)).unwrap_or_default();
        Handled {
            cancelled: false,
            events,
        }
    }

    fn is_loaded(&self, match_id: MatchId) -> bool {
        self.cores.contains_key(&match_id)
    }
}
