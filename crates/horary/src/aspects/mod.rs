pub mod calculator;
pub mod types;

pub use calculator::{add_days, AspectCalculator};
pub use types::{Aspect, AspectDetail, AspectType, OrbQuality};
