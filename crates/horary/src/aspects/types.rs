use crate::chart::types::Planet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The five Ptolemaic aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AspectType {
    #[serde(alias = "conjunction")]
    Conjunction,
    #[serde(alias = "sextile")]
    Sextile,
    #[serde(alias = "square")]
    Square,
    #[serde(alias = "trine")]
    Trine,
    #[serde(alias = "opposition")]
    Opposition,
}

impl AspectType {
    /// Ordered by angle; ties on orb resolve to the earlier entry.
    pub const ALL: [AspectType; 5] = [
        AspectType::Conjunction,
        AspectType::Sextile,
        AspectType::Square,
        AspectType::Trine,
        AspectType::Opposition,
    ];

    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Sextile => "Sextile",
            Self::Square => "Square",
            Self::Trine => "Trine",
            Self::Opposition => "Opposition",
        }
    }

    /// Lowercase identifier, as used in configuration files.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Conjunction => "☌",
            Self::Sextile => "⚹",
            Self::Square => "□",
            Self::Trine => "△",
            Self::Opposition => "☍",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }
}

/// A current aspect between two distinct planets.
///
/// Always stored with `planet1` before `planet2` in canonical planet order,
/// so the same pair compares equal regardless of argument order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aspect {
    pub planet1: Planet,
    pub planet2: Planet,
    #[serde(rename = "aspect")]
    pub aspect_type: AspectType,
    /// Degrees from exact, never negative.
    pub orb: f64,
    pub applying: bool,
}

impl Aspect {
    pub fn new(a: Planet, b: Planet, aspect_type: AspectType, orb: f64, applying: bool) -> Self {
        let (planet1, planet2) = if a <= b { (a, b) } else { (b, a) };
        Self {
            planet1,
            planet2,
            aspect_type,
            orb: orb.abs(),
            applying,
        }
    }

    pub fn involves(&self, planet: Planet) -> bool {
        self.planet1 == planet || self.planet2 == planet
    }

    /// The other body of the pair, if `planet` takes part.
    pub fn other(&self, planet: Planet) -> Option<Planet> {
        if self.planet1 == planet {
            Some(self.planet2)
        } else if self.planet2 == planet {
            Some(self.planet1)
        } else {
            None
        }
    }

    pub fn quality(&self) -> OrbQuality {
        OrbQuality::from_orb(self.orb)
    }
}

/// Tightness tier of an aspect's orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrbQuality {
    Exact,
    Close,
    Moderate,
    Wide,
}

impl OrbQuality {
    pub fn from_orb(orb: f64) -> Self {
        let orb = orb.abs();
        if orb <= 1.0 {
            Self::Exact
        } else if orb <= 3.0 {
            Self::Close
        } else if orb <= 6.0 {
            Self::Moderate
        } else {
            Self::Wide
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "Exact",
            Self::Close => "Close",
            Self::Moderate => "Moderate",
            Self::Wide => "Wide",
        }
    }
}

/// An aspect with its timing and quality for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectDetail {
    #[serde(flatten)]
    pub aspect: Aspect,
    pub quality: OrbQuality,
    pub degrees_to_exact: f64,
    /// Days until perfection; `None` when separating or speeds are unknown.
    pub days_to_exact: Option<f64>,
    pub exact_time: Option<DateTime<Utc>>,
}
