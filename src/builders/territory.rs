//! Territory map: per-cell player ownership, borrowed from the territory
//! service without copying.

use glam::Vec2;

use crate::services::Territory;
use crate::types::{GridError, GridInfo, TERRITORY_PLAYER_MASK};

/// Read-only view over the territory service's raw grid.
///
/// A distinct wrapper type rather than an `InfluenceMap` with extra
/// accessors: territory cells are not influence values, and only the low
/// 6 bits carry ownership — the rest belongs to the external service.
#[derive(Debug, Clone, Copy)]
pub struct TerritoryMap<'a> {
    info: GridInfo,
    data: &'a [u16],
}

impl<'a> TerritoryMap<'a> {
    /// Wrap a raw territory grid. Fails if the grid does not match the
    /// map dimensions.
    pub fn new(info: GridInfo, data: &'a [u16]) -> Result<Self, GridError> {
        if data.len() != info.len() {
            return Err(GridError::ShapeMismatch(format!(
                "territory grid length {} does not match {}x{} map",
                data.len(),
                info.width,
                info.height
            )));
        }
        Ok(Self { info, data })
    }

    /// Wrap the grid exposed by a [`Territory`] service.
    pub fn from_service(info: GridInfo, territory: &'a dyn Territory) -> Result<Self, GridError> {
        Self::new(info, territory.data()?)
    }

    pub fn info(&self) -> &GridInfo {
        &self.info
    }

    /// Owning player id at a flattened grid index (0 = neutral).
    pub fn owner_at(&self, index: usize) -> Result<u8, GridError> {
        let cell = self.data.get(index).ok_or_else(|| {
            GridError::OutOfBounds(format!(
                "index {index} out of bounds for territory grid of length {}",
                self.data.len()
            ))
        })?;
        Ok((cell & TERRITORY_PLAYER_MASK) as u8)
    }

    /// Owning player id at a world position (0 = neutral).
    pub fn owner(&self, pos: Vec2) -> Result<u8, GridError> {
        let cell = self.info.world_to_grid(pos)?;
        self.owner_at(self.info.index(cell))
    }
}
