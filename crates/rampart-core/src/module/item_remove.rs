//! Item removal.
//!
//! `<item-remove>` lists item types that must never spawn in the match, one
//! `TYPE[:variant]` per `<item>` (or `<type>`) child.

use std::collections::BTreeMap;

use lattice::{children_named, ConfigError, MaterialData, MaterialEntry, Node};

use crate::engine::MatchId;
use crate::error::ModuleError;
use crate::event::WorldEvent;

use super::{skipped, Handled, LoadContext, Module};

/// Per-match list of items whose spawning is cancelled.
#[derive(Debug, Default)]
pub struct ItemRemoveModule {
    items: BTreeMap<MatchId, Vec<MaterialEntry>>,
}

impl ItemRemoveModule {
    /// Diagnostic name.
    pub const NAME: &'static str = "item-remove";

    /// Create a module with no loaded matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if an item of this material is removed in the match.
    #[must_use]
    pub fn removes(&self, match_id: MatchId, item: MaterialData) -> bool {
        self.items
            .get(&match_id)
            .is_some_and(|items| items.iter().any(|e| e.matches(item.material, item.data)))
    }

    fn parse(node: &dyn Node) -> Result<MaterialEntry, ConfigError> {
        let text = node
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingText {
                element: node.name().to_string(),
                position: node.position(),
            })?;
        MaterialEntry::parse(text)
    }
}

impl Module for ItemRemoveModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn load_match(&mut self, ctx: &LoadContext<'_>, document: &dyn Node) -> Vec<ModuleError> {
        let mut items = Vec::new();
        let mut errors = Vec::new();
        for group in children_named(document, "item-remove") {
            for node in group.children() {
                if !matches!(node.name(), "item" | "type") {
                    continue;
                }
                match Self::parse(node) {
                    Ok(entry) => items.push(entry),
                    Err(error) => errors.push(skipped(Self::NAME, ctx.match_id, error)),
                }
            }
        }
        self.items.insert(ctx.match_id, items);
        errors
    }

    fn clear_match(&mut self, match_id: MatchId) {
        self.items.remove(&match_id);
    }

    fn handle(&mut self, match_id: MatchId, event: &WorldEvent) -> Handled {
        match event {
            WorldEvent::ItemSpawn { material } => Handled {
                cancelled: self.removes(match_id, *material),
                events: Vec::new(),
            },
            _ => Handled::default(),
        }
    }

    fn is_loaded(&self, match_id: MatchId) -> bool {
        self.items.contains_key(&match_id)
    }
}
