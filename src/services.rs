//! Contracts for the game-state services the map builders query.
//!
//! The engine never reaches into the game's entity system or terrain
//! classification directly; builders are handed trait objects and treat
//! every query as a read-only lookup. Any failure is
//! [`GridError::ServiceUnavailable`] and aborts the current planning pass —
//! a grid partially populated from bad data is worse than no grid.

use glam::Vec2;

use crate::types::GridError;

/// Terrain passability classification.
///
/// Recognized class names include at minimum `"default"`,
/// `"foundationObstruction"`, `"building-land"` and `"building-shore"`;
/// an unknown name is a configuration error, not an empty mask.
pub trait Passability {
    /// Bitmask for a named passability class.
    fn class_mask(&self, name: &str) -> Result<u16, GridError>;

    /// Passability bits for the cell at a flattened grid index.
    fn passability_at(&self, index: usize) -> Result<u16, GridError>;
}

/// Per-cell territory ownership, on the same dimensions as the main map.
///
/// The low 6 bits of each cell encode the owning player id (0 = neutral);
/// higher bits are terrain/boundary flags owned by the service.
pub trait Territory {
    fn data(&self) -> Result<&[u16], GridError>;
}

/// Connected-region classification of the terrain.
pub trait Accessibility {
    /// Region id of the cell at a flattened grid index.
    fn region_id(&self, index: usize) -> Result<u32, GridError>;

    /// Cell count of the region containing the given cell.
    fn region_size(&self, index: usize) -> Result<u32, GridError>;

    /// Region id the querying player operates from.
    fn my_region_id(&self) -> Result<u32, GridError>;
}

/// Diplomatic stance predicates, relative to the querying player.
pub trait Diplomacy {
    fn is_ally(&self, player: u8) -> bool;
    fn is_enemy(&self, player: u8) -> bool;
}

/// Snapshot of one of the querying player's own entities.
#[derive(Debug, Clone, Default)]
pub struct EntitySnapshot {
    pub build_category: Option<String>,
    pub position: Option<Vec2>,
}

/// Enumeration of the querying player's own entities.
pub trait OwnEntities {
    fn own_entities(&self) -> Result<Vec<EntitySnapshot>, GridError>;
}

/// Per-cell terrain-analysis codes (used by shoreline placement).
pub trait TerrainAnalysis {
    fn terrain_code(&self, index: usize) -> Result<u8, GridError>;
}

/// One-way export sink for map visualizations. Not part of the
/// algorithmic contract; stub it in tests.
pub trait DebugSink {
    fn dump(&mut self, name: &str, data: &[u16], width: u32, height: u32, threshold: u16);
}

/// All collaborator services a builder needs, threaded explicitly instead
/// of read from ambient game state.
pub struct WorldServices<'a> {
    pub passability: &'a dyn Passability,
    pub territory: &'a dyn Territory,
    pub accessibility: &'a dyn Accessibility,
    pub diplomacy: &'a dyn Diplomacy,
    pub entities: &'a dyn OwnEntities,
    pub terrain: &'a dyn TerrainAnalysis,
    /// Id of the player this planning pass runs for.
    pub player_id: u8,
}
