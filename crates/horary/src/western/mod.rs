//! Western traditional dignities.

pub mod dignities;
pub mod rulers;

pub use dignities::{
    classify, essential_dignities, strength_pct, ColorTier, DignityAssessment, DignityCategory,
    DignityScorer, DignityType, PlanetDignity, ScoreSource,
};
