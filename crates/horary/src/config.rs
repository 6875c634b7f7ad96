//! Engine configuration, loaded from TOML.
//!
//! Every section is optional in the file; omitted keys take the traditional
//! defaults below.

use crate::aspects::types::AspectType;
use crate::layout::geometry::RingRadii;
use crate::moon::void::VoidRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "HORARY_CONFIG";

/// Upper bound for any look-ahead in days (a century).
pub const MAX_HORIZON_DAYS: f64 = 36_500.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid TOML: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HoraryConfig {
    pub orbs: OrbConfig,
    pub solar: SolarConfig,
    pub moon: MoonConfig,
    pub timing: TimingConfig,
    pub dignity: DignityWeights,
    pub wheel: RingRadii,
}

/// Orb tolerances in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub conjunction: f64,
    pub sextile: f64,
    pub square: f64,
    pub trine: f64,
    pub opposition: f64,
    /// Added to the tolerance when the Sun takes part.
    pub sun_orb_bonus: f64,
    /// Added to the tolerance when the Moon takes part.
    pub moon_orb_bonus: f64,
    /// An aspect only applies if it perfects before either body changes sign.
    pub perfect_within_sign: bool,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            conjunction: 8.0,
            sextile: 8.0,
            square: 8.0,
            trine: 8.0,
            opposition: 8.0,
            sun_orb_bonus: 0.0,
            moon_orb_bonus: 0.0,
            perfect_within_sign: false,
        }
    }
}

impl OrbConfig {
    /// Base tolerance for an aspect type, before luminary bonuses.
    pub fn tolerance(&self, aspect: AspectType) -> f64 {
        match aspect {
            AspectType::Conjunction => self.conjunction,
            AspectType::Sextile => self.sextile,
            AspectType::Square => self.square,
            AspectType::Trine => self.trine,
            AspectType::Opposition => self.opposition,
        }
    }

    /// Same orb for every aspect type.
    pub fn uniform(orb: f64) -> Self {
        Self {
            conjunction: orb,
            sextile: orb,
            square: orb,
            trine: orb,
            opposition: orb,
            ..Self::default()
        }
    }
}

/// Solar-proximity thresholds and the dignity effects shown for each condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarConfig {
    pub cazimi_orb_arcmin: f64,
    pub exact_cazimi_orb_arcmin: f64,
    pub combustion_orb: f64,
    pub under_beams_orb: f64,
    pub cazimi_effect: i32,
    pub exact_cazimi_effect: i32,
    pub combustion_effect: i32,
    pub combustion_exception_effect: i32,
    pub under_beams_effect: i32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            cazimi_orb_arcmin: 17.0,
            exact_cazimi_orb_arcmin: 3.0,
            combustion_orb: 8.5,
            under_beams_orb: 15.0,
            cazimi_effect: 6,
            exact_cazimi_effect: 8,
            combustion_effect: -5,
            combustion_exception_effect: -2,
            under_beams_effect: -3,
        }
    }
}

impl SolarConfig {
    pub fn cazimi_orb(&self) -> f64 {
        self.cazimi_orb_arcmin / 60.0
    }

    pub fn exact_cazimi_orb(&self) -> f64 {
        self.exact_cazimi_orb_arcmin / 60.0
    }
}

/// Signs in which a void Moon is traditionally excused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoidExceptions {
    pub cancer: bool,
    pub sagittarius: bool,
    pub taurus: bool,
}

impl Default for VoidExceptions {
    fn default() -> Self {
        Self {
            cancer: true,
            sagittarius: true,
            taurus: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonConfig {
    pub void_rule: VoidRule,
    pub void_exceptions: VoidExceptions,
    /// Orb for the `by_orb` void rule.
    pub void_orb_deg: f64,
    /// Below this speed (deg/day) the Moon is treated as stationary.
    pub stationary_speed_threshold: f64,
    pub projection_horizon_days: f64,
    pub projection_max_results: usize,
    /// Also project aspects cast behind each planet (P - angle).
    pub project_waning_side: bool,
    /// Multiple of the aspect orb searched for the last separating aspect.
    pub last_aspect_orb_factor: f64,
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            void_rule: VoidRule::ApplyingAspects,
            void_exceptions: VoidExceptions::default(),
            void_orb_deg: 3.0,
            stationary_speed_threshold: 0.1,
            projection_horizon_days: 30.0,
            projection_max_results: 10,
            project_waning_side: false,
            last_aspect_orb_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Exact-aspect dates further out than this are not reported.
    pub max_future_days: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_future_days: 90.0,
        }
    }
}

/// Weights used when a dignity score has to be computed from placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DignityWeights {
    pub rulership: i32,
    pub exaltation: i32,
    pub detriment: i32,
    pub fall: i32,
    pub joy: i32,
    pub angular: i32,
    pub succedent: i32,
    pub cadent: i32,
}

impl Default for DignityWeights {
    fn default() -> Self {
        Self {
            rulership: 5,
            exaltation: 4,
            detriment: -5,
            fall: -4,
            joy: 2,
            angular: 2,
            succedent: 0,
            cadent: -2,
        }
    }
}

impl HoraryConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: HoraryConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded horary configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `$HORARY_CONFIG` when set, otherwise the built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for aspect in AspectType::ALL {
            let orb = self.orbs.tolerance(aspect);
            if !orb.is_finite() || orb < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "orbs.{} must be a non-negative number, got {}",
                    aspect.key(),
                    orb
                )));
            }
        }
        if self.orbs.sun_orb_bonus < 0.0 || self.orbs.moon_orb_bonus < 0.0 {
            return Err(ConfigError::Invalid(
                "luminary orb bonuses must not be negative".to_string(),
            ));
        }

        let s = &self.solar;
        if !(0.0 <= s.exact_cazimi_orb()
            && s.exact_cazimi_orb() <= s.cazimi_orb()
            && s.cazimi_orb() <= s.combustion_orb
            && s.combustion_orb <= s.under_beams_orb)
        {
            return Err(ConfigError::Invalid(
                "solar thresholds must satisfy exact_cazimi <= cazimi <= combustion <= under_beams"
                    .to_string(),
            ));
        }

        let m = &self.moon;
        if !(m.projection_horizon_days > 0.0 && m.projection_horizon_days <= MAX_HORIZON_DAYS) {
            return Err(ConfigError::Invalid(format!(
                "moon.projection_horizon_days must be in (0, {}], got {}",
                MAX_HORIZON_DAYS, m.projection_horizon_days
            )));
        }
        if m.void_orb_deg < 0.0 || m.stationary_speed_threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "moon orbs and thresholds must not be negative".to_string(),
            ));
        }
        if m.last_aspect_orb_factor < 1.0 {
            return Err(ConfigError::Invalid(
                "moon.last_aspect_orb_factor must be at least 1.0".to_string(),
            ));
        }
        let max_days = self.timing.max_future_days;
        if !(0.0..=MAX_HORIZON_DAYS).contains(&max_days) {
            return Err(ConfigError::Invalid(format!(
                "timing.max_future_days must be in [0, {}], got {}",
                MAX_HORIZON_DAYS, max_days
            )));
        }

        self.wheel.validate().map_err(ConfigError::Invalid)
    }
}
