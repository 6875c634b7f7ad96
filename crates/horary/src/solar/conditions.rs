//! Solar proximity: cazimi, combustion, under the beams, free.

use crate::chart::types::{Chart, Planet, PlanetPosition};
use crate::config::SolarConfig;
use crate::util::angular_separation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarCondition {
    Cazimi,
    Combusted,
    UnderBeams,
    Free,
}

/// Display attributes for a solar condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionDisplay {
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

const SOLAR_DISPLAY: [ConditionDisplay; 4] = [
    ConditionDisplay {
        label: "Cazimi",
        description: "Heart of the Sun, greatly strengthened",
        icon: "crown",
        color: "#f5c542",
    },
    ConditionDisplay {
        label: "Combusted",
        description: "Burnt by the Sun, severely weakened",
        icon: "flame",
        color: "#e0533d",
    },
    ConditionDisplay {
        label: "Under the Beams",
        description: "Obscured by the Sun, moderately weakened",
        icon: "cloud-sun",
        color: "#e89b3c",
    },
    ConditionDisplay {
        label: "Free of Sun",
        description: "Not affected by the solar rays",
        icon: "sun",
        color: "#8a8f98",
    },
];

impl SolarCondition {
    pub const ALL: [SolarCondition; 4] = [
        SolarCondition::Cazimi,
        SolarCondition::Combusted,
        SolarCondition::UnderBeams,
        SolarCondition::Free,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Cazimi => 0,
            Self::Combusted => 1,
            Self::UnderBeams => 2,
            Self::Free => 3,
        }
    }

    pub const fn display(self) -> ConditionDisplay {
        SOLAR_DISPLAY[self.index()]
    }

    pub fn is_significant(self) -> bool {
        self != Self::Free
    }
}

/// A planet's relation to the Sun.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarAnalysis {
    pub planet: Planet,
    pub condition: SolarCondition,
    pub distance_from_sun: f64,
    pub exact_cazimi: bool,
    /// Passed through from the snapshot; only meaningful when combusted.
    pub traditional_exception: bool,
    pub dignity_effect: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SolarClassifier {
    config: SolarConfig,
}

impl SolarClassifier {
    pub fn new(config: SolarConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, planet: &PlanetPosition, sun: &PlanetPosition) -> SolarAnalysis {
        let cfg = &self.config;
        let distance = angular_separation(planet.longitude, sun.longitude);

        let (condition, exact_cazimi) = if distance <= cfg.cazimi_orb() {
            (SolarCondition::Cazimi, distance <= cfg.exact_cazimi_orb())
        } else if distance <= cfg.combustion_orb {
            (SolarCondition::Combusted, false)
        } else if distance <= cfg.under_beams_orb {
            (SolarCondition::UnderBeams, false)
        } else {
            (SolarCondition::Free, false)
        };

        let traditional_exception =
            condition == SolarCondition::Combusted && planet.traditional_exception;

        let dignity_effect = match condition {
            SolarCondition::Cazimi if exact_cazimi => cfg.exact_cazimi_effect,
            SolarCondition::Cazimi => cfg.cazimi_effect,
            SolarCondition::Combusted if traditional_exception => cfg.combustion_exception_effect,
            SolarCondition::Combusted => cfg.combustion_effect,
            SolarCondition::UnderBeams => cfg.under_beams_effect,
            SolarCondition::Free => 0,
        };

        SolarAnalysis {
            planet: planet.planet,
            condition,
            distance_from_sun: distance,
            exact_cazimi,
            traditional_exception,
            dignity_effect,
        }
    }

    /// Analysis for every non-Sun planet; empty when the Sun is missing.
    pub fn classify_chart(&self, chart: &Chart) -> Vec<SolarAnalysis> {
        let Some(sun) = chart.sun() else {
            log::warn!("snapshot has no Sun; solar conditions unavailable");
            return Vec::new();
        };
        chart
            .planets
            .values()
            .filter(|p| p.planet != Planet::Sun)
            .map(|p| self.classify(p, sun))
            .collect()
    }
}

/// One planet inside a solar-condition bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarEntry {
    pub planet: Planet,
    #[serde(default, alias = "distance")]
    pub distance_from_sun: f64,
    #[serde(default)]
    pub exact_cazimi: bool,
    #[serde(default)]
    pub traditional_exception: bool,
    #[serde(default)]
    pub dignity_effect: i32,
}

impl From<&SolarAnalysis> for SolarEntry {
    fn from(a: &SolarAnalysis) -> Self {
        Self {
            planet: a.planet,
            distance_from_sun: a.distance_from_sun,
            exact_cazimi: a.exact_cazimi,
            traditional_exception: a.traditional_exception,
            dignity_effect: a.dignity_effect,
        }
    }
}

/// Four disjoint buckets of non-Sun planets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SolarConditionSetInput")]
pub struct SolarConditionSet {
    pub cazimi_planets: Vec<SolarEntry>,
    pub combusted_planets: Vec<SolarEntry>,
    pub under_beams_planets: Vec<SolarEntry>,
    pub free_planets: Vec<SolarEntry>,
    /// Number of planets not free of the Sun.
    pub significant_conditions: usize,
}

impl SolarConditionSet {
    pub fn from_analyses(analyses: &[SolarAnalysis]) -> Self {
        let mut set = Self::default();
        for analysis in analyses {
            set.bucket_mut(analysis.condition).push(analysis.into());
        }
        set.significant_conditions = set.count_significant();
        set
    }

    pub fn bucket(&self, condition: SolarCondition) -> &[SolarEntry] {
        match condition {
            SolarCondition::Cazimi => &self.cazimi_planets,
            SolarCondition::Combusted => &self.combusted_planets,
            SolarCondition::UnderBeams => &self.under_beams_planets,
            SolarCondition::Free => &self.free_planets,
        }
    }

    fn bucket_mut(&mut self, condition: SolarCondition) -> &mut Vec<SolarEntry> {
        match condition {
            SolarCondition::Cazimi => &mut self.cazimi_planets,
            SolarCondition::Combusted => &mut self.combusted_planets,
            SolarCondition::UnderBeams => &mut self.under_beams_planets,
            SolarCondition::Free => &mut self.free_planets,
        }
    }

    pub fn condition_of(&self, planet: Planet) -> Option<SolarCondition> {
        SolarCondition::ALL
            .into_iter()
            .find(|c| self.bucket(*c).iter().any(|e| e.planet == planet))
    }

    fn count_significant(&self) -> usize {
        self.cazimi_planets.len() + self.combusted_planets.len() + self.under_beams_planets.len()
    }

    /// Summary line such as "Cazimi: Mercury; Combusted: Venus".
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            SolarCondition::Cazimi,
            SolarCondition::Combusted,
            SolarCondition::UnderBeams,
        ]
        .into_iter()
        .filter(|c| !self.bucket(*c).is_empty())
        .map(|c| {
            let names: Vec<&str> = self.bucket(c).iter().map(|e| e.planet.name()).collect();
            format!("{}: {}", c.display().label, names.join(", "))
        })
        .collect();
        if parts.is_empty() {
            "No significant solar conditions".to_string()
        } else {
            parts.join("; ")
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryInput {
    Name(Planet),
    Full(SolarEntry),
}

impl From<EntryInput> for SolarEntry {
    fn from(input: EntryInput) -> Self {
        match input {
            EntryInput::Full(entry) => entry,
            EntryInput::Name(planet) => SolarEntry {
                planet,
                distance_from_sun: 0.0,
                exact_cazimi: false,
                traditional_exception: false,
                dignity_effect: 0,
            },
        }
    }
}

#[derive(Deserialize)]
struct SolarConditionSetInput {
    #[serde(default, alias = "cazimi")]
    cazimi_planets: Vec<EntryInput>,
    #[serde(default, alias = "combusted")]
    combusted_planets: Vec<EntryInput>,
    #[serde(default, alias = "under_beams")]
    under_beams_planets: Vec<EntryInput>,
    #[serde(default, alias = "free")]
    free_planets: Vec<EntryInput>,
}

impl TryFrom<SolarConditionSetInput> for SolarConditionSet {
    type Error = String;

    fn try_from(input: SolarConditionSetInput) -> Result<Self, Self::Error> {
        let convert = |v: Vec<EntryInput>| v.into_iter().map(SolarEntry::from).collect::<Vec<_>>();
        let mut set = SolarConditionSet {
            cazimi_planets: convert(input.cazimi_planets),
            combusted_planets: convert(input.combusted_planets),
            under_beams_planets: convert(input.under_beams_planets),
            free_planets: convert(input.free_planets),
            significant_conditions: 0,
        };

        let mut seen = BTreeSet::new();
        for condition in SolarCondition::ALL {
            for entry in set.bucket(condition) {
                if entry.planet == Planet::Sun {
                    return Err("the Sun cannot have a solar condition".to_string());
                }
                if !seen.insert(entry.planet) {
                    return Err(format!(
                        "{} appears in more than one solar condition",
                        entry.planet.name()
                    ));
                }
            }
        }

        set.significant_conditions = set.count_significant();
        Ok(set)
    }
}
