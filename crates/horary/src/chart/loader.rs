use crate::aspects::types::{Aspect, AspectType};
use crate::chart::houses::house_of;
use crate::chart::types::{Chart, Planet, PlanetPosition};
use crate::solar::conditions::SolarConditionSet;
use crate::util::{forward_distance, normalize_360};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

const CUSP_TURN_TOLERANCE: f64 = 1e-6;

/// Errors that can occur when reading a chart snapshot
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartLoadError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),
}

/// Wire shape of a snapshot as sent by the chart-casting service.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub planets: BTreeMap<String, PlanetInput>,
    #[serde(default)]
    pub aspects: Option<Vec<AspectInput>>,
    #[serde(default)]
    pub ascendant: Option<f64>,
    #[serde(default)]
    pub houses: Option<Vec<f64>>,
    #[serde(default)]
    pub solar_conditions: Option<SolarConditionSet>,
    #[serde(default)]
    pub local_time: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanetInput {
    pub longitude: f64,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub house: Option<u8>,
    #[serde(default)]
    pub dignity_score: Option<i32>,
    #[serde(default)]
    pub traditional_exception: bool,
    // `sign` and `retrograde` are accepted but always re-derived
    #[serde(default)]
    pub sign: Option<String>,
    #[serde(default)]
    pub retrograde: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AspectInput {
    pub planet1: String,
    pub planet2: String,
    #[serde(alias = "aspect_type")]
    pub aspect: String,
    pub orb: f64,
    #[serde(default)]
    pub applying: bool,
}

/// Load a chart snapshot from a JSON string
pub fn load_chart_from_json(json: &str) -> Result<Chart, ChartLoadError> {
    let input: ChartInput =
        serde_json::from_str(json).map_err(|e| ChartLoadError::InvalidJson(e.to_string()))?;
    Chart::try_from(input)
}

impl TryFrom<ChartInput> for Chart {
    type Error = ChartLoadError;

    fn try_from(input: ChartInput) -> Result<Self, Self::Error> {
        let houses = match input.houses {
            Some(cusps) => Some(validate_houses(&cusps)?),
            None => None,
        };

        let ascendant = match (input.ascendant, houses) {
            (Some(asc), _) => finite("ascendant", asc).map(normalize_360)?,
            (None, Some(cusps)) => cusps[0],
            (None, None) => return Err(ChartLoadError::MissingField("ascendant".to_string())),
        };

        let mut planets = BTreeMap::new();
        for (name, raw) in input.planets {
            let Some(planet) = Planet::from_name(&name) else {
                log::warn!("ignoring non-traditional body '{}' in snapshot", name);
                continue;
            };
            planets.insert(planet, validate_planet(planet, raw, houses.as_ref())?);
        }

        let aspects = match input.aspects {
            Some(raw_aspects) => {
                let mut aspects = Vec::with_capacity(raw_aspects.len());
                for raw in raw_aspects {
                    if let Some(aspect) = convert_aspect(raw)? {
                        aspects.push(aspect);
                    }
                }
                Some(aspects)
            }
            None => None,
        };

        Ok(Chart {
            id: input.id.unwrap_or_else(Uuid::new_v4),
            planets,
            aspects,
            ascendant,
            houses,
            solar_conditions: input.solar_conditions,
            local_time: input.local_time,
        })
    }
}

fn finite(field: &str, value: f64) -> Result<f64, ChartLoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ChartLoadError::InvalidFieldValue(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

fn validate_houses(cusps: &[f64]) -> Result<[f64; 12], ChartLoadError> {
    let cusps: [f64; 12] = cusps.try_into().map_err(|_| {
        ChartLoadError::InvalidFieldValue(format!(
            "houses must contain exactly 12 cusps, got {}",
            cusps.len()
        ))
    })?;
    for (i, cusp) in cusps.iter().enumerate() {
        finite(&format!("houses[{}]", i), *cusp)?;
    }
    let cusps = cusps.map(normalize_360);

    // cyclically ascending cusps go round the zodiac exactly once
    let turn: f64 = (0..12)
        .map(|i| forward_distance(cusps[i], cusps[(i + 1) % 12]))
        .sum();
    if (turn - 360.0).abs() > CUSP_TURN_TOLERANCE {
        return Err(ChartLoadError::InvalidFieldValue(format!(
            "house cusps must ascend cyclically; their spans cover {} degrees",
            turn
        )));
    }
    Ok(cusps)
}

fn validate_planet(
    planet: Planet,
    raw: PlanetInput,
    houses: Option<&[f64; 12]>,
) -> Result<PlanetPosition, ChartLoadError> {
    let longitude = normalize_360(finite(&format!("{}.longitude", planet.name()), raw.longitude)?);
    let speed = match raw.speed {
        Some(s) => Some(finite(&format!("{}.speed", planet.name()), s)?),
        None => None,
    };
    let house = match raw.house {
        Some(h) if (1..=12).contains(&h) => Some(h),
        Some(h) => {
            return Err(ChartLoadError::InvalidFieldValue(format!(
                "{}.house must be in 1..=12, got {}",
                planet.name(),
                h
            )))
        }
        None => houses.map(|cusps| house_of(longitude, cusps)),
    };

    Ok(PlanetPosition {
        planet,
        longitude,
        speed,
        house,
        dignity_score: raw.dignity_score,
        traditional_exception: raw.traditional_exception,
    })
}

fn convert_aspect(raw: AspectInput) -> Result<Option<Aspect>, ChartLoadError> {
    let (Some(a), Some(b)) = (Planet::from_name(&raw.planet1), Planet::from_name(&raw.planet2))
    else {
        log::warn!(
            "skipping aspect {} {} {}: unknown body",
            raw.planet1,
            raw.aspect,
            raw.planet2
        );
        return Ok(None);
    };
    if a == b {
        log::warn!("skipping self-aspect of {}", a.name());
        return Ok(None);
    }
    let Some(aspect_type) = AspectType::from_name(&raw.aspect) else {
        log::warn!("skipping aspect with unknown type '{}'", raw.aspect);
        return Ok(None);
    };
    let orb = finite("aspect orb", raw.orb)?;
    if orb < 0.0 {
        return Err(ChartLoadError::InvalidFieldValue(format!(
            "aspect orb must not be negative, got {}",
            orb
        )));
    }
    Ok(Some(Aspect::new(a, b, aspect_type, orb, raw.applying)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
    {
      "planets": {
        "Sun": { "longitude": 67.5, "speed": 0.96 },
        "Moon": { "longitude": 145.2, "speed": 13.2, "house": 4, "dignity_score": -2 }
      },
      "ascendant": 12.0
    }
    "#;

    #[test]
    fn test_load_minimal_chart() {
        let chart = load_chart_from_json(MINIMAL).unwrap();
        assert_eq!(chart.planets.len(), 2);
        let moon = chart.moon().unwrap();
        assert_eq!(moon.house, Some(4));
        assert_eq!(moon.dignity_score, Some(-2));
        assert!(chart.houses.is_none());
    }

    #[test]
    fn test_outer_planets_are_ignored() {
        let json = r#"
        {
          "planets": {
            "Sun": { "longitude": 10.0, "speed": 1.0 },
            "Uranus": { "longitude": 40.0, "speed": 0.01 }
          },
          "ascendant": 0.0
        }
        "#;
        let chart = load_chart_from_json(json).unwrap();
        assert_eq!(chart.planets.len(), 1);
    }

    #[test]
    fn test_house_count_must_be_twelve() {
        let json = r#"
        {
          "planets": { "Sun": { "longitude": 10.0 } },
          "ascendant": 0.0,
          "houses": [0, 30, 60]
        }
        "#;
        match load_chart_from_json(json) {
            Err(ChartLoadError::InvalidFieldValue(msg)) => assert!(msg.contains("12")),
            other => panic!("expected InvalidFieldValue, got {:?}", other),
        }
    }

    #[test]
    fn test_houses_must_ascend_cyclically() {
        let json = r#"
        {
          "planets": { "Sun": { "longitude": 10.0 } },
          "ascendant": 0.0,
          "houses": [0, 60, 30, 90, 120, 150, 180, 210, 240, 270, 300, 330]
        }
        "#;
        match load_chart_from_json(json) {
            Err(ChartLoadError::InvalidFieldValue(msg)) => assert!(msg.contains("cyclically")),
            other => panic!("expected InvalidFieldValue, got {:?}", other),
        }

        let equal = r#"
        { "planets": {}, "ascendant": 0.0, "houses": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0] }
        "#;
        assert!(load_chart_from_json(equal).is_err());
    }

    #[test]
    fn test_ascendant_falls_back_to_first_cusp() {
        let json = r#"
        {
          "planets": { "Moon": { "longitude": 95.0, "speed": 12.5 } },
          "houses": [350, 20, 50, 80, 110, 140, 170, 200, 230, 260, 290, 320]
        }
        "#;
        let chart = load_chart_from_json(json).unwrap();
        assert!((chart.ascendant - 350.0).abs() < 1e-12);
        // 95 falls between cusp 4 (80) and cusp 5 (110)
        assert_eq!(chart.moon().unwrap().house, Some(4));
    }

    #[test]
    fn test_missing_ascendant_without_houses() {
        let json = r#"{ "planets": {} }"#;
        assert_eq!(
            load_chart_from_json(json).unwrap_err(),
            ChartLoadError::MissingField("ascendant".to_string())
        );
    }

    #[test]
    fn test_invalid_house_number() {
        let json = r#"
        {
          "planets": { "Mars": { "longitude": 10.0, "house": 13 } },
          "ascendant": 0.0
        }
        "#;
        assert!(matches!(
            load_chart_from_json(json),
            Err(ChartLoadError::InvalidFieldValue(_))
        ));
    }

    #[test]
    fn test_aspects_with_unknown_bodies_are_skipped() {
        let json = r#"
        {
          "planets": {
            "Moon": { "longitude": 100.0, "speed": 13.0 },
            "Venus": { "longitude": 220.0, "speed": 1.1 }
          },
          "ascendant": 0.0,
          "aspects": [
            { "planet1": "Moon", "planet2": "Venus", "aspect": "Trine", "orb": 0.0, "applying": true },
            { "planet1": "Moon", "planet2": "Pluto", "aspect": "Square", "orb": 1.0, "applying": true },
            { "planet1": "Moon", "planet2": "Venus", "aspect": "Quincunx", "orb": 1.0 }
          ]
        }
        "#;
        let chart = load_chart_from_json(json).unwrap();
        let aspects = chart.aspects.as_ref().unwrap();
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].aspect_type, AspectType::Trine);
    }

    #[test]
    fn test_negative_orb_rejected() {
        let json = r#"
        {
          "planets": {},
          "ascendant": 0.0,
          "aspects": [
            { "planet1": "Moon", "planet2": "Venus", "aspect": "Trine", "orb": -1.0 }
          ]
        }
        "#;
        assert!(load_chart_from_json(json).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            load_chart_from_json("{ not json"),
            Err(ChartLoadError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_serialized_chart_reloads() {
        let chart = load_chart_from_json(MINIMAL).unwrap();
        let json = serde_json::to_string(&chart).unwrap();
        let again: Chart = serde_json::from_str(&json).unwrap();
        assert_eq!(again.id, chart.id);
        assert_eq!(again.planets, chart.planets);
    }
}
