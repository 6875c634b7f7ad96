//! Horary chart-state derivation.
//!
//! Takes a pre-computed planetary snapshot and derives aspects, solar
//! conditions, dignity strength, void-of-course status, the Moon's upcoming
//! aspects, a staged reasoning breakdown and wheel geometry.

pub mod aspects;
pub mod cache;
pub mod chart;
pub mod config;
pub mod engine;
pub mod layout;
pub mod moon;
pub mod reasoning;
pub mod solar;
pub mod store;
pub mod util;
pub mod western;

pub use cache::DerivationCache;
pub use chart::{load_chart_from_json, Chart, ChartLoadError, Planet, PlanetPosition, Sign};
pub use config::{ConfigError, HoraryConfig};
pub use engine::{DerivedChart, HoraryEngine};
pub use reasoning::{ReasoningInput, ReasoningItem, Stage};
