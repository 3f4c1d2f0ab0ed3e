pub mod map;

pub use map::InfluenceMap;
