//! Named regions.
//!
//! Children of `<regions>` are parsed in document order into a per-match
//! registry. A region may refer to any region named before it.

use std::collections::BTreeMap;
use std::sync::Arc;

use lattice::{children_named, ConfigError, Node, Region, RegionParser};

use crate::engine::MatchId;
use crate::error::ModuleError;

use super::{skipped, LoadContext, Module};

type Registry = BTreeMap<String, Arc<Region>>;

/// Per-match registry of named regions.
#[derive(Debug, Default)]
pub struct RegionModule {
    regions: BTreeMap<MatchId, Registry>,
}

impl RegionModule {
    /// Diagnostic name.
    pub const NAME: &'static str = "regions";

    /// Create a module with no loaded matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All named regions of a match.
    #[must_use]
    pub fn named(&self, match_id: MatchId) -> Option<&BTreeMap<String, Arc<Region>>> {
        self.regions.get(&match_id)
    }

    /// A named region of a match.
    #[must_use]
    pub fn get(&self, match_id: MatchId, id: &str) -> Option<Arc<Region>> {
        self.regions.get(&match_id)?.get(id).cloned()
    }

    fn register(registry: &mut Registry, node: &dyn Node) -> Result<(), ConfigError> {
        let region = RegionParser::new(registry).parse(node)?;
        // A bare <region id=".."/> is a reference, not a definition
        if node.name() == "region" {
            return Ok(());
        }
        if let Some(id) = node.attribute("id") {
            if registry.contains_key(id) {
                return Err(ConfigError::DuplicateRegion {
                    id: id.to_string(),
                    position: node.position(),
                });
            }
            registry.insert(id.to_string(), region);
        }
        Ok(())
    }
}

impl Module for RegionModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load_match(&mut self, ctx: &LoadContext<'_>, document: &dyn Node) -> Vec<ModuleError> {
        let mut registry = Registry::new();
        let mut errors = Vec::new();
        for group in children_named(document, "regions") {
            for node in group.children() {
                if let Err(error) = Self::register(&mut registry, node) {
                    errors.push(skipped(Self::NAME, ctx.match_id, error));
                }
            }
        }
        tracing::debug!(match_id = %ctx.match_id, regions = registry.len(), "regions loaded");
        self.regions.insert(ctx.match_id, registry);
        errors
    }

    fn clear_match(&mut self, match_id: MatchId) {
        self.regions.remove(&match_id);
    }

    fn is_loaded(&self, match_id: MatchId) -> bool {
        self.regions.contains_key(&match_id)
    }
}
