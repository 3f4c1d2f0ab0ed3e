/// Default clamp ceiling for a freshly constructed 16-bit map.
pub const DEFAULT_MAX_VALUE: u16 = u16::MAX;

/// Clamp ceiling used by 8-bit-range derived maps (obstruction maps).
pub const OBSTRUCTION_MAX: u16 = 255;

/// Obstruction-map value for a cell valid for placement.
pub const TILE_PASSABLE: u16 = 255;

/// Obstruction-map value for a blocked cell.
pub const TILE_BLOCKED: u16 = 0;

/// Low bits of a territory cell encoding the owning player id (0 = neutral).
/// Bits above the mask are terrain/boundary flags owned by the territory
/// service and carry no ownership meaning.
pub const TERRITORY_PLAYER_MASK: u16 = 0x3F;
