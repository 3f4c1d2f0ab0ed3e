//! Influence operators for [`InfluenceMap`].
//!
//! Each operator stamps a circular footprint of radius `max_dist` (in cells)
//! centered on `(cx, cy)`, with a magnitude governed by a [`Falloff`] curve.
//! The affected region is the bounding box `[cx-d, cx+d) x [cy-d, cy+d)`
//! clipped to the grid, restricted to cells with squared distance < `d²`.
//! Written values saturate into `[0, max_value]` — never wrap.

use std::str::FromStr;

use crate::grid::InfluenceMap;
use crate::types::GridError;

/// Magnitude curve for influence stamps.
///
/// The per-unit coefficient is resolved once per operator call, so the
/// curve costs one branch per affected cell and a `sqrt` only for
/// [`Falloff::Linear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Falloff {
    /// `strength / max_dist * (max_dist - r)`: full strength at the
    /// center, zero at the rim.
    Linear,
    /// `strength / max_dist² * (max_dist² - r²)`: flatter near the
    /// center, steeper toward the rim.
    Quadratic,
    /// `strength` everywhere inside the footprint.
    Constant,
}

impl Falloff {
    #[inline]
    fn coefficient(self, strength: f32, max_dist: f32) -> f32 {
        match self {
            Falloff::Linear => strength / max_dist,
            Falloff::Quadratic => strength / (max_dist * max_dist),
            Falloff::Constant => strength,
        }
    }

    #[inline]
    fn magnitude(self, coeff: f32, r2: f32, max_dist: f32) -> f32 {
        match self {
            Falloff::Linear => coeff * (max_dist - r2.sqrt()),
            Falloff::Quadratic => coeff * (max_dist * max_dist - r2),
            Falloff::Constant => coeff,
        }
    }
}

impl FromStr for Falloff {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Falloff::Linear),
            "quadratic" => Ok(Falloff::Quadratic),
            "constant" => Ok(Falloff::Constant),
            other => Err(GridError::UnknownFalloff(other.to_string())),
        }
    }
}

/// Clipped footprint bounding box: `[x0, x1) x [y0, y1)` in cell indices.
fn clip_bbox(map: &InfluenceMap, cx: i32, cy: i32, max_dist: f32) -> (i32, i32, i32, i32) {
    let reach = max_dist.ceil() as i32;
    let x0 = (cx - reach).max(0);
    let y0 = (cy - reach).max(0);
    let x1 = (cx + reach).min(map.width() as i32);
    let y1 = (cy + reach).min(map.height() as i32);
    (x0, y0, x1, y1)
}

impl InfluenceMap {
    /// Add a decaying influence around `(cx, cy)`.
    ///
    /// `strength` may be negative to carve a cost hole; each written cell
    /// saturates into `[0, max_value]`. The center may lie outside the
    /// grid — only the clipped footprint is touched.
    pub fn add_influence(&mut self, cx: i32, cy: i32, max_dist: f32, strength: f32, falloff: Falloff) {
        let d2 = max_dist * max_dist;
        let coeff = falloff.coefficient(strength, max_dist);
        let (x0, y0, x1, y1) = clip_bbox(self, cx, cy, max_dist);
        let width = self.width() as usize;
        let max_value = self.max_value() as f32;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                let r2 = dx * dx + dy * dy;
                if r2 >= d2 {
                    continue;
                }
                let quant = falloff.magnitude(coeff, r2, max_dist);
                let idx = x as usize + y as usize * width;
                let sum = f32::from(self.data()[idx]) + quant;
                self.data_mut()[idx] = if sum < 0.0 {
                    0
                } else if sum > max_value {
                    max_value as u16
                } else {
                    sum as u16
                };
            }
        }
    }

    /// [`add_influence`](Self::add_influence) with the historical defaults:
    /// strength equal to the radius, linear falloff.
    pub fn add_influence_simple(&mut self, cx: i32, cy: i32, max_dist: f32) {
        self.add_influence(cx, cy, max_dist, max_dist, Falloff::Linear);
    }

    /// Multiply cells around `(cx, cy)` by the falloff magnitude,
    /// saturating into `[0, max_value]`.
    pub fn multiply_influence(
        &mut self,
        cx: i32,
        cy: i32,
        max_dist: f32,
        strength: f32,
        falloff: Falloff,
    ) {
        let d2 = max_dist * max_dist;
        let coeff = falloff.coefficient(strength, max_dist);
        let (x0, y0, x1, y1) = clip_bbox(self, cx, cy, max_dist);
        let width = self.width() as usize;
        let max_value = self.max_value() as f32;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                let r2 = dx * dx + dy * dy;
                if r2 >= d2 {
                    continue;
                }
                let quant = falloff.magnitude(coeff, r2, max_dist);
                let idx = x as usize + y as usize * width;
                let product = f32::from(self.data()[idx]) * quant;
                self.data_mut()[idx] = if product < 0.0 {
                    0
                } else if product > max_value {
                    max_value as u16
                } else {
                    product as u16
                };
            }
        }
    }

    /// [`multiply_influence`](Self::multiply_influence) with the historical
    /// defaults: strength equal to the radius, constant falloff.
    pub fn multiply_influence_simple(&mut self, cx: i32, cy: i32, max_dist: f32) {
        self.multiply_influence(cx, cy, max_dist, max_dist, Falloff::Constant);
    }

    /// Overwrite every cell inside the circular footprint with `value`.
    /// No falloff, no clamping; idempotent.
    pub fn set_influence(&mut self, cx: i32, cy: i32, max_dist: f32, value: u16) {
        let d2 = max_dist * max_dist;
        let (x0, y0, x1, y1) = clip_bbox(self, cx, cy, max_dist);
        let width = self.width() as usize;

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                if dx * dx + dy * dy < d2 {
                    self.data_mut()[x as usize + y as usize * width] = value;
                }
            }
        }
    }

    /// Elementwise saturating add of another map into this one.
    ///
    /// Fails with [`GridError::ShapeMismatch`] if the maps differ in length.
    pub fn add(&mut self, other: &InfluenceMap) -> Result<(), GridError> {
        if self.len() != other.len() {
            return Err(GridError::ShapeMismatch(format!(
                "cannot add map of length {} to map of length {}",
                other.len(),
                self.len()
            )));
        }
        let max_value = self.max_value();
        for (cell, &rhs) in self.data_mut().iter_mut().zip(other.data()) {
            *cell = cell.saturating_add(rhs).min(max_value);
        }
        Ok(())
    }

    /// Scan for the highest-valued cell whose companion obstruction value
    /// strictly exceeds `threshold`.
    ///
    /// Ties resolve to the lowest index (row-major scan order). Returns
    /// `None` when no cell qualifies.
    pub fn find_best_tile(
        &self,
        obstruction: &InfluenceMap,
        threshold: u16,
    ) -> Result<Option<(usize, u16)>, GridError> {
        if self.len() != obstruction.len() {
            return Err(GridError::ShapeMismatch(format!(
                "obstruction map length {} does not match map length {}",
                obstruction.len(),
                self.len()
            )));
        }
        let mut best: Option<(usize, u16)> = None;
        for (i, (&value, &mask)) in self.data().iter().zip(obstruction.data()).enumerate() {
            if mask > threshold && best.map_or(true, |(_, bv)| value > bv) {
                best = Some((i, value));
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::GridInfo;

    fn map_4x4() -> InfluenceMap {
        let mut map = InfluenceMap::new(GridInfo {
            width: 4,
            height: 4,
            cell_size: 1.0,
        });
        map.set_max_value(255);
        map
    }

    #[test]
    fn falloff_parses_known_kinds() {
        assert_eq!("linear".parse::<Falloff>().unwrap(), Falloff::Linear);
        assert_eq!("quadratic".parse::<Falloff>().unwrap(), Falloff::Quadratic);
        assert_eq!("constant".parse::<Falloff>().unwrap(), Falloff::Constant);
    }

    #[test]
    fn falloff_rejects_unknown_kind() {
        assert!(matches!(
            "cubic".parse::<Falloff>(),
            Err(GridError::UnknownFalloff(_))
        ));
    }

    #[test]
    fn falloff_magnitude_decreases_with_distance() {
        for falloff in [Falloff::Linear, Falloff::Quadratic] {
            let coeff = falloff.coefficient(10.0, 5.0);
            let mut prev = f32::INFINITY;
            for r in 0..5 {
                let r2 = (r * r) as f32;
                let quant = falloff.magnitude(coeff, r2, 5.0);
                assert!(
                    quant < prev,
                    "{falloff:?} magnitude not decreasing at r = {r}"
                );
                prev = quant;
            }
        }
    }

    #[test]
    fn add_constant_influence_scenario() {
        // 4x4 grid, constant falloff radius 2 strength 10 at (1, 1):
        // every cell with squared distance < 4 becomes 10, others stay 0.
        let mut map = map_4x4();
        map.add_influence(1, 1, 2.0, 10.0, Falloff::Constant);

        for y in 0..4i32 {
            for x in 0..4i32 {
                let r2 = (x - 1) * (x - 1) + (y - 1) * (y - 1);
                let expected = if r2 < 4 { 10 } else { 0 };
                assert_eq!(
                    map.get(x as u32, y as u32).unwrap(),
                    expected,
                    "cell ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn footprint_never_touches_outside_circle() {
        let mut map = map_4x4();
        map.add_influence(2, 2, 2.0, 50.0, Falloff::Linear);
        // (0, 0) is at squared distance 8 >= 4 from the center.
        assert_eq!(map.get(0, 0).unwrap(), 0);
        assert_eq!(map.get(0, 4 - 1).unwrap(), 0);
    }

    #[test]
    fn off_grid_center_is_clipped() {
        let mut map = map_4x4();
        map.add_influence(-1, -1, 3.0, 10.0, Falloff::Constant);
        assert_eq!(map.get(0, 0).unwrap(), 10);
        assert_eq!(map.get(3, 3).unwrap(), 0);
    }

    #[test]
    fn negative_strength_saturates_at_zero() {
        let mut map = map_4x4();
        map.set(1, 1, 5).unwrap();
        map.add_influence(1, 1, 2.0, -255.0, Falloff::Constant);
        assert_eq!(map.get(1, 1).unwrap(), 0);
    }

    #[test]
    fn add_saturates_at_ceiling() {
        let mut map = map_4x4();
        map.add_influence(1, 1, 2.0, 200.0, Falloff::Constant);
        map.add_influence(1, 1, 2.0, 200.0, Falloff::Constant);
        assert_eq!(map.get(1, 1).unwrap(), 255);
    }

    #[test]
    fn multiply_scales_existing_values() {
        let mut map = map_4x4();
        map.set(1, 1, 10).unwrap();
        map.set(3, 3, 10).unwrap();
        map.multiply_influence(1, 1, 2.0, 3.0, Falloff::Constant);
        assert_eq!(map.get(1, 1).unwrap(), 30);
        // Outside the footprint: untouched.
        assert_eq!(map.get(3, 3).unwrap(), 10);
    }

    #[test]
    fn simple_variants_use_historical_defaults() {
        let mut simple = map_4x4();
        simple.add_influence_simple(1, 1, 2.0);
        let mut explicit = map_4x4();
        explicit.add_influence(1, 1, 2.0, 2.0, Falloff::Linear);
        assert_eq!(simple.data(), explicit.data());

        let mut simple = map_4x4();
        simple.set(1, 1, 10).unwrap();
        simple.multiply_influence_simple(1, 1, 2.0);
        let mut explicit = map_4x4();
        explicit.set(1, 1, 10).unwrap();
        explicit.multiply_influence(1, 1, 2.0, 2.0, Falloff::Constant);
        assert_eq!(simple.data(), explicit.data());
    }

    #[test]
    fn set_influence_is_idempotent() {
        let mut once = map_4x4();
        once.set_influence(1, 1, 2.0, 77);
        let mut twice = once.clone();
        twice.set_influence(1, 1, 2.0, 77);
        assert_eq!(once.data(), twice.data());
    }

    #[test]
    fn set_influence_ignores_ceiling() {
        let mut map = map_4x4();
        map.set_influence(1, 1, 1.0, 10_000);
        assert_eq!(map.get(1, 1).unwrap(), 10_000);
    }

    #[test]
    fn elementwise_add_clamps() {
        let info = GridInfo {
            width: 2,
            height: 1,
            cell_size: 1.0,
        };
        let mut lhs = InfluenceMap::from_data(info, vec![200, 10]).unwrap();
        lhs.set_max_value(255);
        let rhs = InfluenceMap::from_data(info, vec![100, 5]).unwrap();
        lhs.add(&rhs).unwrap();
        assert_eq!(lhs.data(), &[255, 15]);
    }

    #[test]
    fn elementwise_add_rejects_shape_mismatch() {
        let mut lhs = map_4x4();
        let rhs = InfluenceMap::new(GridInfo {
            width: 3,
            height: 3,
            cell_size: 1.0,
        });
        assert!(matches!(lhs.add(&rhs), Err(GridError::ShapeMismatch(_))));
    }

    #[test]
    fn find_best_tile_skips_obstructed_cells() {
        let info = GridInfo {
            width: 4,
            height: 1,
            cell_size: 1.0,
        };
        let map = InfluenceMap::from_data(info, vec![3, 7, 2, 9]).unwrap();
        let obstruction = InfluenceMap::from_data(info, vec![255, 255, 0, 255]).unwrap();
        // Index 2 holds 2 but is excluded by the obstruction grid anyway;
        // index 3 wins with value 9.
        assert_eq!(map.find_best_tile(&obstruction, 0).unwrap(), Some((3, 9)));
    }

    #[test]
    fn find_best_tile_breaks_ties_to_lowest_index() {
        let info = GridInfo {
            width: 4,
            height: 1,
            cell_size: 1.0,
        };
        let map = InfluenceMap::from_data(info, vec![1, 9, 9, 1]).unwrap();
        let open = InfluenceMap::from_data(info, vec![255; 4]).unwrap();
        assert_eq!(map.find_best_tile(&open, 0).unwrap(), Some((1, 9)));
    }

    #[test]
    fn find_best_tile_returns_none_when_fully_obstructed() {
        let map = map_4x4();
        let obstruction = map_4x4();
        assert_eq!(map.find_best_tile(&obstruction, 0).unwrap(), None);
    }

    #[test]
    fn find_best_tile_rejects_shape_mismatch() {
        let map = map_4x4();
        let obstruction = InfluenceMap::new(GridInfo {
            width: 2,
            height: 2,
            cell_size: 1.0,
        });
        assert!(matches!(
            map.find_best_tile(&obstruction, 0),
            Err(GridError::ShapeMismatch(_))
        ));
    }

    proptest! {
        /// Any sequence of stamps keeps every cell within [0, max_value].
        #[test]
        fn clamp_invariant_holds(
            ops in prop::collection::vec(
                (0i32..8, 0i32..8, 1u32..6, -300.0f32..300.0, 0usize..3),
                1..20,
            )
        ) {
            let mut map = InfluenceMap::new(GridInfo {
                width: 8,
                height: 8,
                cell_size: 1.0,
            });
            map.set_max_value(255);
            for (cx, cy, dist, strength, kind) in ops {
                let falloff = [Falloff::Linear, Falloff::Quadratic, Falloff::Constant][kind];
                match kind {
                    0 => map.add_influence(cx, cy, dist as f32, strength, falloff),
                    1 => map.multiply_influence(cx, cy, dist as f32, strength, falloff),
                    _ => map.add_influence(cx, cy, dist as f32, strength, falloff),
                }
            }
            prop_assert!(map.data().iter().all(|&v| v <= 255));
        }
    }
}
