//! Read-only block lookups.
//!
//! Objectives classify the blocks of their region once, when a match is
//! loaded. They only need to ask "what is at this position", so the world is
//! abstracted behind [`BlockAccess`]. The trait requires `Sync` so the scan can
//! run in parallel.

use std::collections::HashMap;

use glam::IVec3;

use crate::material::{Material, MaterialData};
use crate::Bounds;

/// Lookup of the block at a position.
pub trait BlockAccess: Sync {
    /// Material and variant at `position`. Unknown positions are air.
    fn block(&self, position: IVec3) -> MaterialData;
}

/// Sparse in-memory block world. Unset positions read as air.
#[derive(Debug, Clone, Default)]
pub struct BlockGrid {
    blocks: HashMap<IVec3, MaterialData>,
}

impl BlockGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single block. Setting air removes the entry.
    pub fn set(&mut self, position: IVec3, block: impl Into<MaterialData>) {
        let block = block.into();
        if block.material == Material::Air {
            self.blocks.remove(&position);
        } else {
            self.blocks.insert(position, block);
        }
    }

    /// Fill every block inside `bounds`.
    pub fn fill(&mut self, bounds: &Bounds, block: impl Into<MaterialData>) {
        let block = block.into();
        for position in bounds.iter_blocks() {
            self.set(position, block);
        }
    }

    /// Clear a block back to air, returning what was there.
    pub fn remove(&mut self, position: IVec3) -> MaterialData {
        self.blocks.remove(&position).unwrap_or(MaterialData::AIR)
    }

    /// Number of non-air blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the grid holds only air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockAccess for BlockGrid {
    fn block(&self, position: IVec3) -> MaterialData {
        self.blocks
            .get(&position)
            .copied()
            .unwrap_or(MaterialData::AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_blocks_are_air() {
        let grid = BlockGrid::new();
        assert_eq!(grid.block(IVec3::new(4, 5, 6)), MaterialData::AIR);
        assert!(grid.is_empty());
    }

    #[test]
    fn fill_set_and_remove() {
        let mut grid = BlockGrid::new();
        grid.fill(&Bounds::from_blocks(IVec3::ZERO, IVec3::splat(1)), Material::Obsidian);
        assert_eq!(grid.len(), 8);

        grid.set(IVec3::ZERO, MaterialData::new(Material::Wool, 14));
        assert_eq!(grid.block(IVec3::ZERO), MaterialData::new(Material::Wool, 14));

        assert_eq!(grid.remove(IVec3::ONE), MaterialData::from(Material::Obsidian));
        assert_eq!(grid.block(IVec3::ONE), MaterialData::AIR);

        grid.set(IVec3::ZERO, Material::Air);
        assert_eq!(grid.len(), 6);
    }
}
