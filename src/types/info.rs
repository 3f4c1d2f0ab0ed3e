//! Grid metadata.

use glam::{IVec2, UVec2, Vec2};

use crate::types::GridError;

/// Dimensions and world scale of a grid.
///
/// `cell_size` is the width of one cell in world units; a world position
/// maps to a cell by floor division.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfo {
    pub width: u32,
    pub height: u32,
    pub cell_size: f32,
}

impl Default for GridInfo {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            cell_size: 4.0,
        }
    }
}

impl GridInfo {
    pub fn square(width: u32, cell_size: f32) -> Self {
        Self {
            width,
            height: width,
            cell_size,
        }
    }

    /// Number of cells in the backing array.
    #[inline]
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Flattened row-major index of a cell. The cell must be in bounds.
    #[inline]
    pub fn index(&self, cell: UVec2) -> usize {
        (cell.y as usize) * (self.width as usize) + (cell.x as usize)
    }

    /// Map a world position to the cell containing it.
    ///
    /// Fails with [`GridError::OutOfBounds`] for positions outside the
    /// mapped area, including negative coordinates.
    pub fn world_to_grid(&self, pos: Vec2) -> Result<UVec2, GridError> {
        let cell = IVec2::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        );
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height {
            return Err(GridError::OutOfBounds(format!(
                "world position ({}, {}) maps to cell ({}, {}) outside {}x{} grid",
                pos.x, pos.y, cell.x, cell.y, self.width, self.height
            )));
        }
        Ok(UVec2::new(cell.x as u32, cell.y as u32))
    }
}
