pub mod obstruction;
pub mod territory;

pub use obstruction::{
    build_obstruction_map, MinDistance, Placement, PlacementTemplate, TerritoryPolicy,
};
pub use territory::TerritoryMap;
