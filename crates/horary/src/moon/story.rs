//! The Moon's condition and its last and next aspects.

use crate::aspects::calculator::{orb_rate, AspectCalculator};
use crate::aspects::types::AspectType;
use crate::chart::types::{Chart, Planet, PlanetPosition, Sign};
use crate::util::{angular_separation, forward_distance, normalize_360};
use serde::Serialize;

const MANSION_NAMES: [&str; 28] = [
    "Al Sharatain",
    "Al Butain",
    "Al Thurayya",
    "Al Dabaran",
    "Al Hak'ah",
    "Al Han'ah",
    "Al Dhira",
    "Al Nathrah",
    "Al Tarf",
    "Al Jabhah",
    "Al Zubrah",
    "Al Sarfah",
    "Al Awwa",
    "Al Simak",
    "Al Ghafr",
    "Al Jubana",
    "Iklil",
    "Al Qalb",
    "Al Shaula",
    "Al Na'am",
    "Al Baldah",
    "Sa'd al Dhabih",
    "Sa'd Bula",
    "Sa'd al Su'ud",
    "Sa'd al Akhbiya",
    "Al Fargh al Mukdim",
    "Al Fargh al Thani",
    "Batn al Hut",
];

/// Human description of a time span until perfection.
pub fn timing_description(days: f64) -> String {
    if days < 0.5 {
        "Within hours".to_string()
    } else if days < 1.0 {
        "Within a day".to_string()
    } else if days < 7.0 {
        format!("Within {} days", days.trunc() as i64)
    } else if days < 30.0 {
        format!("Within {} weeks", (days / 7.0).trunc() as i64)
    } else if days < 365.0 {
        format!("Within {} months", (days / 30.0).trunc() as i64)
    } else {
        "More than a year".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Phase from the Moon's elongation ahead of the Sun, in degrees.
    pub fn from_elongation(elongation: f64) -> Self {
        let e = normalize_360(elongation);
        match e {
            e if e < 30.0 => Self::NewMoon,
            e if e < 60.0 => Self::WaxingCrescent,
            e if e < 120.0 => Self::FirstQuarter,
            e if e < 150.0 => Self::WaxingGibbous,
            e if e < 210.0 => Self::FullMoon,
            e if e < 240.0 => Self::WaningGibbous,
            e if e < 300.0 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedCategory {
    VerySlow,
    Slow,
    Average,
    Fast,
    VeryFast,
}

impl SpeedCategory {
    pub fn from_speed(speed: f64) -> Self {
        let speed = speed.abs();
        if speed < 11.0 {
            Self::VerySlow
        } else if speed < 12.0 {
            Self::Slow
        } else if speed < 14.0 {
            Self::Average
        } else if speed < 15.0 {
            Self::Fast
        } else {
            Self::VeryFast
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::VerySlow => "Very Slow",
            Self::Slow => "Slow",
            Self::Average => "Average",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunarMansion {
    pub number: u8,
    pub name: &'static str,
}

/// One of 28 equal mansions counted from 0 Aries.
pub fn lunar_mansion(longitude: f64) -> LunarMansion {
    let index = ((normalize_360(longitude) / (360.0 / 28.0)).floor() as usize).min(27);
    LunarMansion {
        number: index as u8 + 1,
        name: MANSION_NAMES[index],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LunarAspect {
    pub planet: Planet,
    pub aspect: AspectType,
    pub orb: f64,
    pub applying: bool,
    /// Days until perfection, or since it for a separating aspect.
    pub days: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonStory {
    pub sign: Sign,
    pub degree_in_sign: f64,
    pub speed: Option<f64>,
    pub speed_category: Option<SpeedCategory>,
    pub phase: Option<MoonPhase>,
    pub mansion: LunarMansion,
    pub last_aspect: Option<LunarAspect>,
    pub next_aspect: Option<LunarAspect>,
}

/// Builds the Moon story from positions.
#[derive(Debug, Clone)]
pub struct MoonStoryBuilder<'a> {
    calculator: &'a AspectCalculator,
    last_aspect_orb_factor: f64,
}

impl<'a> MoonStoryBuilder<'a> {
    pub fn new(calculator: &'a AspectCalculator, last_aspect_orb_factor: f64) -> Self {
        Self {
            calculator,
            last_aspect_orb_factor,
        }
    }

    pub fn build(&self, chart: &Chart) -> Option<MoonStory> {
        let moon = chart.moon()?;
        let others: Vec<&PlanetPosition> = chart
            .planets
            .values()
            .filter(|p| p.planet != Planet::Moon)
            .collect();

        Some(MoonStory {
            sign: moon.sign(),
            degree_in_sign: moon.degree_in_sign(),
            speed: moon.speed,
            speed_category: moon.speed.map(SpeedCategory::from_speed),
            phase: chart
                .sun()
                .map(|sun| MoonPhase::from_elongation(forward_distance(sun.longitude, moon.longitude))),
            mansion: lunar_mansion(moon.longitude),
            last_aspect: self.last_aspect(moon, &others),
            next_aspect: self.next_aspect(moon, &others),
        })
    }

    /// Most recently perfected aspect the Moon is separating from, within a
    /// widened orb.
    pub fn last_aspect(&self, moon: &PlanetPosition, others: &[&PlanetPosition]) -> Option<LunarAspect> {
        self.candidates(moon, others, self.last_aspect_orb_factor)
            .into_iter()
            .filter(|(_, _, _, rate)| *rate > 0.0)
            .map(|(planet, aspect, orb, rate)| {
                let days = orb / rate.abs();
                LunarAspect {
                    planet,
                    aspect,
                    orb,
                    applying: false,
                    days,
                    description: format!("{:.1} days ago", days),
                }
            })
            .min_by(|a, b| a.days.total_cmp(&b.days))
    }

    /// Soonest aspect the Moon is applying to within orb.
    pub fn next_aspect(&self, moon: &PlanetPosition, others: &[&PlanetPosition]) -> Option<LunarAspect> {
        self.candidates(moon, others, 1.0)
            .into_iter()
            .filter(|(_, _, _, rate)| *rate < 0.0)
            .map(|(planet, aspect, orb, rate)| {
                let days = orb / rate.abs();
                LunarAspect {
                    planet,
                    aspect,
                    orb,
                    applying: true,
                    days,
                    description: timing_description(days),
                }
            })
            .min_by(|a, b| a.days.total_cmp(&b.days))
    }

    /// (planet, aspect, orb, orb rate) for every aspect within `factor` times its orb.
    fn candidates(
        &self,
        moon: &PlanetPosition,
        others: &[&PlanetPosition],
        factor: f64,
    ) -> Vec<(Planet, AspectType, f64, f64)> {
        let mut found = Vec::new();
        for other in others {
            let separation = angular_separation(moon.longitude, other.longitude);
            for aspect in AspectType::ALL {
                let orb = (separation - aspect.angle()).abs();
                let limit = self.calculator.tolerance(aspect, Planet::Moon, other.planet) * factor;
                if orb > limit {
                    continue;
                }
                if let Some(rate) = orb_rate(moon, other, aspect) {
                    found.push((other.planet, aspect, orb, rate));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_description() {
        assert_eq!(timing_description(0.2), "Within hours");
        assert_eq!(timing_description(0.7), "Within a day");
        assert_eq!(timing_description(3.9), "Within 3 days");
        assert_eq!(timing_description(15.0), "Within 2 weeks");
        assert_eq!(timing_description(95.0), "Within 3 months");
        assert_eq!(timing_description(400.0), "More than a year");
    }

    #[test]
    fn test_phases() {
        assert_eq!(MoonPhase::from_elongation(5.0), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_elongation(90.0), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_elongation(180.0), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_elongation(270.0), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_elongation(350.0), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_elongation(-10.0), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_speed_categories() {
        assert_eq!(SpeedCategory::from_speed(10.9), SpeedCategory::VerySlow);
        assert_eq!(SpeedCategory::from_speed(11.0), SpeedCategory::Slow);
        assert_eq!(SpeedCategory::from_speed(13.2), SpeedCategory::Average);
        assert_eq!(SpeedCategory::from_speed(14.5), SpeedCategory::Fast);
        assert_eq!(SpeedCategory::from_speed(15.0), SpeedCategory::VeryFast);
    }

    #[test]
    fn test_mansions() {
        assert_eq!(lunar_mansion(0.0).number, 1);
        assert_eq!(lunar_mansion(0.0).name, "Al Sharatain");
        assert_eq!(lunar_mansion(13.0).number, 2);
        assert_eq!(lunar_mansion(359.9).number, 28);
        assert_eq!(lunar_mansion(359.9).name, "Batn al Hut");
    }

    fn chart() -> Chart {
        Chart::new(
            vec![
                PlanetPosition::new(Planet::Sun, 10.0, 1.0),
                // Moon separating from a sextile to Venus, applying to a square of Mars
                PlanetPosition::new(Planet::Moon, 72.0, 13.0),
                PlanetPosition::new(Planet::Venus, 10.5, 1.2),
                PlanetPosition::new(Planet::Mars, 345.0, 0.6),
            ],
            0.0,
        )
    }

    #[test]
    fn test_story() {
        let calc = AspectCalculator::default();
        let story = MoonStoryBuilder::new(&calc, 1.5).build(&chart()).unwrap();
        assert_eq!(story.sign, Sign::Gemini);
        assert_eq!(story.phase, Some(MoonPhase::FirstQuarter));
        assert_eq!(story.speed_category, Some(SpeedCategory::Average));

        let next = story.next_aspect.unwrap();
        assert_eq!(next.planet, Planet::Mars);
        assert_eq!(next.aspect, AspectType::Square);
        // separation 87, closing at 12.4 per day
        assert!((next.days - 3.0 / 12.4).abs() < 1e-9);
        assert_eq!(next.description, "Within hours");

        // Venus sextile perfected 1.5 / 11.8 days ago, more recently than the Sun's.
        let last = story.last_aspect.unwrap();
        assert_eq!(last.planet, Planet::Venus);
        assert_eq!(last.aspect, AspectType::Sextile);
        assert!((last.days - 1.5 / 11.8).abs() < 1e-9);
        assert_eq!(story.mansion.number, 6);
    }

    #[test]
    fn test_story_without_moon() {
        let calc = AspectCalculator::default();
        let chart = Chart::new(vec![PlanetPosition::new(Planet::Sun, 10.0, 1.0)], 0.0);
        assert!(MoonStoryBuilder::new(&calc, 1.5).build(&chart).is_none());
    }
}
