use glam::{UVec2, Vec2};

use crate::types::{GridError, GridInfo, DEFAULT_MAX_VALUE};

/// Dense 2D influence map with clamped 16-bit cells.
///
/// Values are stored row-major (`index = x + y * width`). Every mutation
/// through the influence operators saturates into `[0, max_value]`;
/// the map itself only provides accessors and the ceiling setting.
///
/// Maps are short-lived: built once per planning pass, mutated by a single
/// owner, then discarded. Nothing here persists across game turns unless
/// the caller retains the instance.
#[derive(Debug, Clone)]
pub struct InfluenceMap {
    info: GridInfo,
    max_value: u16,
    data: Vec<u16>,
}

impl InfluenceMap {
    /// Create a fresh all-zero map.
    pub fn new(info: GridInfo) -> Self {
        Self {
            max_value: DEFAULT_MAX_VALUE,
            data: vec![0; info.len()],
            info,
        }
    }

    /// Wrap a caller-produced buffer, taking ownership without copying.
    ///
    /// Used by builders that hand a freshly populated buffer over to the
    /// map; [`into_data`](Self::into_data) returns the same allocation.
    pub fn from_data(info: GridInfo, data: Vec<u16>) -> Result<Self, GridError> {
        if data.len() != info.len() {
            return Err(GridError::ShapeMismatch(format!(
                "buffer length {} does not match {}x{} grid",
                data.len(),
                info.width,
                info.height
            )));
        }
        Ok(Self {
            info,
            max_value: DEFAULT_MAX_VALUE,
            data,
        })
    }

    /// Create an independently owned deep copy of a source buffer.
    pub fn from_copied(info: GridInfo, data: &[u16]) -> Result<Self, GridError> {
        Self::from_data(info, data.to_vec())
    }

    pub fn info(&self) -> &GridInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clamp ceiling applied by subsequent operator calls.
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Change the clamp ceiling for subsequent operators. Does not
    /// retroactively clamp values already stored.
    pub fn set_max_value(&mut self, max_value: u16) {
        self.max_value = max_value;
    }

    /// Value at cell `(x, y)`, with bounds checking.
    pub fn get(&self, x: u32, y: u32) -> Result<u16, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.data[self.info.index(UVec2::new(x, y))])
    }

    /// Overwrite cell `(x, y)`, with bounds checking. No clamping.
    pub fn set(&mut self, x: u32, y: u32, value: u16) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        let idx = self.info.index(UVec2::new(x, y));
        self.data[idx] = value;
        Ok(())
    }

    /// Value at the cell containing a world position.
    pub fn point_value(&self, pos: Vec2) -> Result<u16, GridError> {
        let cell = self.info.world_to_grid(pos)?;
        self.get(cell.x, cell.y)
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    /// Hand the backing buffer back to the caller.
    pub fn into_data(self) -> Vec<u16> {
        self.data
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<(), GridError> {
        if x >= self.info.width || y >= self.info.height {
            return Err(GridError::OutOfBounds(format!(
                "cell ({}, {}) out of bounds for {}x{} grid",
                x, y, self.info.width, self.info.height
            )));
        }
        Ok(())
    }
}
