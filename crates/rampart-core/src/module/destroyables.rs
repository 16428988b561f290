//! Destroyable objectives.
//!
//! Declared as `<destroyables><destroyable .../></destroyables>`. Every
//! destroyable sees every block break and place of its match and decides by
//! itself whether the block counts.

use std::collections::BTreeMap;

use glam::DVec3;

use lattice::{AttributeScope, ConfigError, Node};

use crate::engine::MatchId;
use crate::error::ModuleError;
use crate::event::WorldEvent;
use crate::objective::{Objective, ObjectiveBase, ObjectiveFlags};
use crate::proximity;

use super::{declarations, read_flags, skipped, Handled, LoadContext, Module};

/// Per-match destroyables in declaration order.
#[derive(Debug, Default)]
pub struct DestroyableModule {
    destroyables: BTreeMap<MatchId, Vec<Objective>>,
}

impl DestroyableModule {
    /// Diagnostic name.
    pub const NAME: &'static str = "destroyables";

    /// Create a module with no loaded matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroyables of a match in declaration order; empty for unknown matches.
    #[must_use]
    pub fn destroyables(&self, match_id: MatchId) -> &[Objective] {
        self.destroyables
            .get(&match_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The destroyable whose region center is closest to `point`.
    ///
    /// Ties go to the destroyable declared first.
    #[must_use]
    pub fn closest(&self, match_id: MatchId, point: DVec3) -> Option<&Objective> {
        proximity::closest(self.destroyables(match_id), point, Objective::anchor)
    }

    fn parse(ctx: &LoadContext<'_>, scope: &AttributeScope<'_>, index: usize) -> Result<Objective, ConfigError> {
        let name = scope.required("name")?;
        let id = scope
            .get("id")
            .map_or_else(|| format!("destroyable-{index}"), str::to_string);
        let region = ctx.bounded_region(scope, "destroyable")?;
        let pattern = scope
            .material_pattern(&["materials", "material"])?
            .unwrap_or_default();

        let owner = scope.required("owner")?;
        let owner = ctx
            .team(scope, "owner")?
            .ok_or_else(|| ConfigError::UnknownTeam {
                id: owner.to_string(),
                position: scope.position(),
            })?;

        let threshold = scope.percentage_or("completion", ctx.config.destroyable_completion)?;
        let flags = read_flags(
            scope,
            &[
                ("required", ObjectiveFlags::REQUIRED, true),
                ("show", ObjectiveFlags::SHOW, true),
                ("mode-changes", ObjectiveFlags::MODE_CHANGES, false),
                ("show-progress", ObjectiveFlags::SHOW_PROGRESS, false),
                ("repairable", ObjectiveFlags::REPAIRABLE, true),
                ("sparks", ObjectiveFlags::SPARKS, false),
                ("proximity-horizontal", ObjectiveFlags::PROXIMITY_HORIZONTAL, false),
            ],
        )?;
        let metric = ctx.proximity_metric(scope)?;

        let base = ObjectiveBase::new(id, name, region)
            .with_team(owner)
            .with_flags(flags)
            .with_proximity_metric(metric);

        Objective::destroyable(base, pattern, threshold, ctx.world).map_err(|_| {
            ConfigError::UnboundedRegion {
                owner: "destroyable".to_string(),
                position: scope.position(),
            }
        })
    }
}

impl Module for DestroyableModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load_match(&mut self, ctx: &LoadContext<'_>, document: &dyn Node) -> Vec<ModuleError> {
        let mut destroyables = Vec::new();
        let mut errors = Vec::new();
        for (index, nodes) in declarations(document, "destroyables", "destroyable").iter().enumerate() {
            match Self::parse(ctx, &AttributeScope::new(nodes), index) {
                Ok(destroyable) => destroyables.push(destroyable),
                Err(error) => errors.push(skipped(Self::NAME, ctx.match_id, error)),
            }
        }
        tracing::debug!(
            match_id = %ctx.match_id,
            destroyables = destroyables.len(),
            "destroyables loaded"
        );
        self.destroyables.insert(ctx.match_id, destroyables);
        errors
    }

    fn clear_match(&mut self, match_id: MatchId) {
        self.destroyables.remove(&match_id);
    }

    fn handle(&mut self, match_id: MatchId, event: &WorldEvent) -> Handled {
        if !matches!(event, WorldEvent::BlockBreak { .. } | WorldEvent::BlockPlace { .. }) {
            return Handled::default();
        }
        let mut handled = Handled::default();
        for destroyable in self.destroyables.get_mut(&match_id).into_iter().flatten() {
            if let Some(delta) = destroyable.evaluate(event) {
                handled.events.extend(destroyable.apply(delta));
            }
        }
        handled
    }

    fn is_loaded(&self, match_id: MatchId) -> bool {
        self.destroyables.contains_key(&match_id)
    }
}
