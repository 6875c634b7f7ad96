//! Dignity scores: display category, strength, and scoring from placement.
//!
//! A supplied score is authoritative. Placement scoring is only used when the
//! snapshot carries none.

use crate::chart::houses::HouseKind;
use crate::chart::types::{Planet, PlanetPosition, Sign};
use crate::config::DignityWeights;
use crate::solar::conditions::SolarAnalysis;
use crate::western::rulers;
use serde::{Deserialize, Serialize};

/// Bounds of the score range mapped onto 0..=100.
const SCORE_MIN: f64 = -10.0;
const SCORE_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DignityCategory {
    Excellent,
    Strong,
    Good,
    Neutral,
    Weak,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Green,
    Blue,
    Gray,
    Amber,
    Red,
}

impl ColorTier {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#2e9e5b",
            Self::Blue => "#3b7dd8",
            Self::Gray => "#8a8f98",
            Self::Amber => "#e0a030",
            Self::Red => "#d64545",
        }
    }
}

/// Lower score bound, label and color for each category, best first.
const CATEGORY_TABLE: [(DignityCategory, i32, &str, ColorTier); 6] = [
    (DignityCategory::Excellent, 5, "Excellent", ColorTier::Green),
    (DignityCategory::Strong, 3, "Strong", ColorTier::Green),
    (DignityCategory::Good, 1, "Good", ColorTier::Blue),
    (DignityCategory::Neutral, -1, "Neutral", ColorTier::Gray),
    (DignityCategory::Weak, -3, "Weak", ColorTier::Amber),
    (DignityCategory::Poor, i32::MIN, "Poor", ColorTier::Red),
];

impl DignityCategory {
    pub fn from_score(score: i32) -> Self {
        CATEGORY_TABLE
            .iter()
            .find(|(_, min, _, _)| score >= *min)
            .map(|(category, _, _, _)| *category)
            .unwrap_or(DignityCategory::Poor)
    }

    fn row(self) -> &'static (DignityCategory, i32, &'static str, ColorTier) {
        &CATEGORY_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.row().2
    }

    pub fn color_tier(self) -> ColorTier {
        self.row().3
    }
}

/// Display scale for a score: linear map of [-10, 10] onto [0, 100], clamped.
pub fn strength_pct(score: i32) -> f64 {
    let pct = (score as f64 - SCORE_MIN) / (SCORE_MAX - SCORE_MIN) * 100.0;
    pct.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DignityAssessment {
    pub score: i32,
    pub category: DignityCategory,
    pub label: &'static str,
    pub color_tier: ColorTier,
    pub strength_pct: f64,
}

pub fn classify(score: i32) -> DignityAssessment {
    let category = DignityCategory::from_score(score);
    DignityAssessment {
        score,
        category,
        label: category.label(),
        color_tier: category.color_tier(),
        strength_pct: strength_pct(score),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Supplied,
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DignityType {
    Rulership,
    Detriment,
    Exaltation,
    Fall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetDignity {
    pub planet: Planet,
    pub sign: Sign,
    pub essential: Vec<DignityType>,
    pub source: ScoreSource,
    #[serde(flatten)]
    pub assessment: DignityAssessment,
}

/// Essential dignities and debilities of a planet in a sign.
pub fn essential_dignities(planet: Planet, sign: Sign) -> Vec<DignityType> {
    let mut result = Vec::new();
    if rulers::domiciles(planet).contains(&sign) {
        result.push(DignityType::Rulership);
    }
    if rulers::detriments(planet).contains(&sign) {
        result.push(DignityType::Detriment);
    }
    if rulers::exaltation(planet) == sign {
        result.push(DignityType::Exaltation);
    }
    if rulers::fall(planet) == sign {
        result.push(DignityType::Fall);
    }
    result
}

#[derive(Debug, Clone, Default)]
pub struct DignityScorer {
    weights: DignityWeights,
}

impl DignityScorer {
    pub fn new(weights: DignityWeights) -> Self {
        Self { weights }
    }

    /// Score from sign, house and solar condition.
    pub fn score_placement(
        &self,
        planet: Planet,
        sign: Sign,
        house: Option<u8>,
        solar: Option<&SolarAnalysis>,
    ) -> i32 {
        let w = &self.weights;
        let mut score = essential_dignities(planet, sign)
            .into_iter()
            .map(|d| match d {
                DignityType::Rulership => w.rulership,
                DignityType::Detriment => w.detriment,
                DignityType::Exaltation => w.exaltation,
                DignityType::Fall => w.fall,
            })
            .sum::<i32>();

        if let Some(house) = house {
            if rulers::joy(planet) == house {
                score += w.joy;
            }
            score += match HouseKind::of(house) {
                HouseKind::Angular => w.angular,
                HouseKind::Succedent => w.succedent,
                HouseKind::Cadent => w.cadent,
            };
        }

        if let Some(solar) = solar {
            score += solar.dignity_effect;
        }
        score
    }

    /// Assessment for one planet, preferring the supplied score.
    pub fn assess(&self, position: &PlanetPosition, solar: Option<&SolarAnalysis>) -> PlanetDignity {
        let sign = position.sign();
        let (score, source) = match position.dignity_score {
            Some(score) => (score, ScoreSource::Supplied),
            None => {
                let score = self.score_placement(position.planet, sign, position.house, solar);
                log::debug!("computed dignity {} for {}", score, position.planet.name());
                (score, ScoreSource::Computed)
            }
        };
        PlanetDignity {
            planet: position.planet,
            sign,
            essential: essential_dignities(position.planet, sign),
            source,
            assessment: classify(score),
        }
    }
}
