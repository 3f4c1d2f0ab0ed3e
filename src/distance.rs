//! Separable Manhattan distance transform for [`InfluenceMap`].
//!
//! Given a grid seeded with 0s at obstacles/sources and `max_value`
//! elsewhere, four monotonic 1D relaxation sweeps produce a dense field
//! where each cell holds `min(max_value, seed_value + manhattan_distance)`
//! over all seeds. O(width * height), in place, no queue — the relaxation
//! is separable because the bound loosens by exactly one unit per step.

use crate::grid::InfluenceMap;

/// Relax one cell against the running bound, then loosen the bound by one.
///
/// Sweeps only ever lower cell values, so repeated application converges.
#[inline]
fn relax(cell: &mut u16, min: &mut u32) {
    let g = u32::from(*cell);
    if g > *min {
        *cell = *min as u16;
    } else if g < *min {
        *min = g;
    }
    *min += 1;
}

impl InfluenceMap {
    /// Make every cell at least one greater than each of its four-connected
    /// neighbours, saturating at `max_value`.
    ///
    /// Seed the grid with 0s and `max_value`s first and each cell ends up
    /// holding its Manhattan distance to the nearest 0.
    pub fn expand_influences(&mut self) {
        let w = self.width() as usize;
        let h = self.height() as usize;
        if w == 0 || h == 0 {
            return;
        }
        let max_value = u32::from(self.max_value());
        let grid = self.data_mut();

        for y in 0..h {
            let row = &mut grid[y * w..(y + 1) * w];
            let mut min = max_value;
            for cell in row.iter_mut() {
                relax(cell, &mut min);
            }
            // The return sweep skips the last column: the forward sweep
            // just left it, so its value already bounds the carry-over.
            for cell in row.iter_mut().rev().skip(1) {
                relax(cell, &mut min);
            }
        }

        for x in 0..w {
            let mut min = max_value;
            for y in 0..h {
                relax(&mut grid[x + y * w], &mut min);
            }
            for y in (0..h.saturating_sub(1)).rev() {
                relax(&mut grid[x + y * w], &mut min);
            }
        }
    }
}
