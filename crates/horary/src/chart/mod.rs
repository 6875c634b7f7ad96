pub mod general;
pub mod houses;
pub mod loader;
pub mod types;

pub use general::{planetary_time, PlanetaryTime};
pub use houses::{house_of, house_rulers, HouseKind};
pub use loader::{load_chart_from_json, ChartLoadError};
pub use types::{Chart, Element, Planet, PlanetPosition, Sign, ALL_PLANETS, ALL_SIGNS};
