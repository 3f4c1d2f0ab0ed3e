//! Obstruction-map builder: marks which cells are valid for construction.
//!
//! Two placement modes share the builder. Land placement is a per-cell
//! test (territory policy, accessibility, passability mask); shore
//! placement replaces it with a multi-ring neighbor scan, because a dock
//! must border open water while still standing on land. The modes share
//! only the output format: 255 for a placeable cell, 0 otherwise.

use serde::{Deserialize, Serialize};

use crate::grid::InfluenceMap;
use crate::influence::Falloff;
use crate::services::WorldServices;
use crate::types::{
    GridError, GridInfo, OBSTRUCTION_MAX, TERRITORY_PLAYER_MASK, TILE_BLOCKED, TILE_PASSABLE,
};

/// Minimum size of a water region for a shore direction to count.
const SHORE_MIN_REGION_SIZE: u32 = 500;

/// At least this many of the 8 compass directions must reach open water.
const SHORE_MIN_DIRECTIONS: u32 = 3;

/// Half-width of the terrain-analysis window scanned around a shore cell.
const SHORE_WINDOW_RADIUS: i32 = 3;

/// Terrain-analysis codes that disqualify a shore cell's surroundings.
const SHORE_BAD_TERRAIN: [u8; 3] = [0, 30, 40];

const COMPASS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Which placement test the builder runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Land,
    Shore,
}

/// Which territory ownerships a template may build on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryPolicy {
    pub allow_own: bool,
    pub allow_ally: bool,
    pub allow_neutral: bool,
    pub allow_enemy: bool,
}

impl Default for TerritoryPolicy {
    fn default() -> Self {
        Self {
            allow_own: true,
            allow_ally: true,
            allow_neutral: true,
            allow_enemy: false,
        }
    }
}

/// Keep-away constraint: suppress placement within `distance` world units
/// of own entities of the given build category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinDistance {
    pub distance: f32,
    pub category: String,
}

/// Placement rules for one building template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementTemplate {
    pub placement: Placement,
    pub territory: TerritoryPolicy,
    /// Passability classes whose set bits mark a cell as obstructed.
    pub obstruction_classes: Vec<String>,
    pub min_distance: Option<MinDistance>,
}

impl Default for PlacementTemplate {
    fn default() -> Self {
        Self {
            placement: Placement::Land,
            territory: TerritoryPolicy::default(),
            obstruction_classes: vec![
                "foundationObstruction".to_string(),
                "building-land".to_string(),
            ],
            min_distance: None,
        }
    }
}

/// Build an 8-bit-range obstruction map: 255 where the template may be
/// placed, 0 elsewhere.
///
/// Queries the collaborator services once per cell (shore mode: once per
/// ring sample); any service failure aborts the build.
pub fn build_obstruction_map(
    info: GridInfo,
    services: &WorldServices<'_>,
    template: &PlacementTemplate,
) -> Result<InfluenceMap, GridError> {
    let territory = services.territory.data()?;
    if territory.len() != info.len() {
        return Err(GridError::ShapeMismatch(format!(
            "territory grid length {} does not match {}x{} map",
            territory.len(),
            info.width,
            info.height
        )));
    }

    let tiles = match template.placement {
        Placement::Land => land_tiles(info, services, template, territory)?,
        Placement::Shore => shore_tiles(info, services, territory)?,
    };

    let mut map = InfluenceMap::from_data(info, tiles)?;
    map.set_max_value(OBSTRUCTION_MAX);

    if let Some(min_distance) = &template.min_distance {
        let radius = min_distance.distance / info.cell_size;
        for entity in services.entities.own_entities()? {
            if entity.build_category.as_deref() != Some(min_distance.category.as_str()) {
                continue;
            }
            let Some(pos) = entity.position else {
                continue;
            };
            let cx = (pos.x / info.cell_size).round() as i32;
            let cy = (pos.y / info.cell_size).round() as i32;
            map.add_influence(cx, cy, radius, -255.0, Falloff::Constant);
        }
    }

    Ok(map)
}

fn land_tiles(
    info: GridInfo,
    services: &WorldServices<'_>,
    template: &PlacementTemplate,
    territory: &[u16],
) -> Result<Vec<u16>, GridError> {
    let mut obstruction_mask = 0u16;
    for class in &template.obstruction_classes {
        obstruction_mask |= services.passability.class_mask(class)?;
    }
    let my_region = services.accessibility.my_region_id()?;
    let policy = &template.territory;

    let mut tiles = vec![TILE_BLOCKED; info.len()];
    for (i, tile) in tiles.iter_mut().enumerate() {
        let owner = (territory[i] & TERRITORY_PLAYER_MASK) as u8;
        let invalid_territory = (!policy.allow_own && owner == services.player_id)
            || (!policy.allow_ally
                && services.diplomacy.is_ally(owner)
                && owner != services.player_id)
            || (!policy.allow_neutral && owner == 0)
            || (!policy.allow_enemy && services.diplomacy.is_enemy(owner) && owner != 0);
        let accessible = services.accessibility.region_id(i)? == my_region;
        let obstructed = services.passability.passability_at(i)? & obstruction_mask != 0;

        if accessible && !invalid_territory && !obstructed {
            *tile = TILE_PASSABLE;
        }
    }
    Ok(tiles)
}

fn shore_tiles(
    info: GridInfo,
    services: &WorldServices<'_>,
    territory: &[u16],
) -> Result<Vec<u16>, GridError> {
    let width = info.width as i32;
    let height = info.height as i32;
    let default_mask = services.passability.class_mask("default")?;
    let shore_mask = services.passability.class_mask("building-shore")?;
    let my_region = services.accessibility.my_region_id()?;

    let mut tiles = vec![TILE_BLOCKED; info.len()];
    for y in 0..height {
        'cell: for x in 0..width {
            let i = (x + y * width) as usize;

            // A dock needs open water on several sides: walk each compass
            // direction out to four cells and require every sample to be
            // water ("default"-passable) in a region big enough to sail.
            let mut open_directions = 0u32;
            for (dx, dy) in COMPASS {
                if direction_is_open(info, services, x, y, dx, dy, default_mask)? {
                    open_directions += 1;
                }
            }
            if open_directions < SHORE_MIN_DIRECTIONS {
                continue;
            }

            // No hostile terrain-analysis codes anywhere nearby.
            for wy in -SHORE_WINDOW_RADIUS..=SHORE_WINDOW_RADIUS {
                for wx in -SHORE_WINDOW_RADIUS..=SHORE_WINDOW_RADIUS {
                    let nx = x + wx;
                    let ny = y + wy;
                    if nx < 0 || ny < 0 || nx >= width || ny >= height {
                        continue;
                    }
                    let code = services.terrain.terrain_code((nx + ny * width) as usize)?;
                    if SHORE_BAD_TERRAIN.contains(&code) {
                        continue 'cell;
                    }
                }
            }

            if services.accessibility.region_id(i)? != my_region {
                continue;
            }
            let owner = (territory[i] & TERRITORY_PLAYER_MASK) as u8;
            if owner != 0 && services.diplomacy.is_enemy(owner) {
                continue;
            }
            // The cell itself must be shoreline, not water or open ground.
            if services.passability.passability_at(i)? & (shore_mask | default_mask) != 0 {
                continue;
            }

            tiles[i] = TILE_PASSABLE;
        }
    }
    Ok(tiles)
}

/// Whether all four ring samples along one compass direction are sailable.
fn direction_is_open(
    info: GridInfo,
    services: &WorldServices<'_>,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    default_mask: u16,
) -> Result<bool, GridError> {
    let width = info.width as i32;
    let height = info.height as i32;
    for step in 1..=4 {
        let nx = x + dx * step;
        let ny = y + dy * step;
        if nx < 0 || ny < 0 || nx >= width || ny >= height {
            return Ok(false);
        }
        let index = (nx + ny * width) as usize;
        if services.passability.passability_at(index)? & default_mask == 0 {
            return Ok(false);
        }
        if services.accessibility.region_size(index)? <= SHORE_MIN_REGION_SIZE {
            return Ok(false);
        }
    }
    Ok(true)
}
