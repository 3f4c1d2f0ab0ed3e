pub mod builders;
pub mod distance;
pub mod grid;
pub mod influence;
pub mod services;
pub mod types;
pub mod visualization;

pub use builders::{build_obstruction_map, PlacementTemplate, TerritoryMap};
pub use grid::InfluenceMap;
pub use influence::Falloff;
pub use types::{GridError, GridInfo};
