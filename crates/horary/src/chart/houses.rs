//! House placement and house rulers from supplied cusps.
//!
//! Cusps are never computed here; they arrive with the snapshot.

use crate::chart::types::{Planet, Sign};
use crate::util::normalize_360;
use serde::{Deserialize, Serialize};

/// Angular, succedent or cadent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseKind {
    Angular,
    Succedent,
    Cadent,
}

impl HouseKind {
    pub fn of(house: u8) -> Self {
        match (house.max(1) - 1) % 3 {
            0 => Self::Angular,
            1 => Self::Succedent,
            _ => Self::Cadent,
        }
    }
}

/// House (1-12) containing `lon`, given 12 cyclically ascending cusps.
///
/// A cusp belongs to the house it opens. Falls back to house 1 when the
/// cusps are degenerate (all equal).
pub fn house_of(lon: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_360(lon);
    for i in 0..12 {
        let current = normalize_360(cusps[i]);
        let next = normalize_360(cusps[(i + 1) % 12]);
        let inside = if current > next {
            lon >= current || lon < next
        } else {
            current <= lon && lon < next
        };
        if inside {
            return i as u8 + 1;
        }
    }
    1
}

/// Traditional ruler of each house, from the sign on its cusp.
pub fn house_rulers(cusps: &[f64; 12]) -> [Planet; 12] {
    cusps.map(|c| Sign::from_longitude(c).ruler())
}
