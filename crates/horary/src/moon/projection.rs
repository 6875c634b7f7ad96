//! Forward projection of the Moon's next aspects.
//!
//! The other planets are held fixed at their snapshot longitudes for the whole
//! horizon. This is a linear approximation, good enough for a month-long
//! display and not an ephemeris.

use crate::aspects::calculator::add_days;
use crate::aspects::types::AspectType;
use crate::chart::types::{Chart, Planet, PlanetPosition};
use crate::config::MoonConfig;
use crate::util::{forward_distance, normalize_360};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FutureAspectEvent {
    pub planet: Planet,
    pub aspect: AspectType,
    /// Longitude where the Moon perfects the aspect.
    pub target_longitude: f64,
    /// Days from now, always within (0, horizon].
    pub days: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FutureAspectProjector {
    pub horizon_days: f64,
    pub max_results: usize,
    /// Also project the aspect points behind each planet (P - angle).
    pub waning_side: bool,
}

impl Default for FutureAspectProjector {
    fn default() -> Self {
        Self::from_config(&MoonConfig::default())
    }
}

impl FutureAspectProjector {
    pub fn from_config(config: &MoonConfig) -> Self {
        Self {
            horizon_days: config.projection_horizon_days,
            max_results: config.projection_max_results,
            waning_side: config.project_waning_side,
        }
    }

    /// Upcoming Moon aspects, soonest first.
    ///
    /// Empty when the Moon's speed is missing or zero. A retrograde Moon is
    /// projected backwards along the zodiac.
    pub fn project<'a>(
        &self,
        moon: &PlanetPosition,
        others: impl IntoIterator<Item = &'a PlanetPosition>,
        now: DateTime<Utc>,
    ) -> Vec<FutureAspectEvent> {
        let speed = match moon.speed {
            Some(s) if s != 0.0 && s.is_finite() => s,
            _ => {
                log::debug!("moon speed unavailable; no projection");
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        for other in others {
            if other.planet == Planet::Moon {
                continue;
            }
            for aspect in AspectType::ALL {
                for target in self.targets(other.longitude, aspect) {
                    let distance = if speed > 0.0 {
                        forward_distance(moon.longitude, target)
                    } else {
                        forward_distance(target, moon.longitude)
                    };
                    let days = distance / speed.abs();
                    if days <= 0.0 || days > self.horizon_days {
                        continue;
                    }
                    if let Some(date) = add_days(now, days) {
                        events.push(FutureAspectEvent {
                            planet: other.planet,
                            aspect,
                            target_longitude: target,
                            days,
                            date,
                        });
                    }
                }
            }
        }

        events.sort_by(|a, b| a.days.total_cmp(&b.days));
        events.truncate(self.max_results);
        events
    }

    pub fn project_chart(&self, chart: &Chart, now: DateTime<Utc>) -> Vec<FutureAspectEvent> {
        match chart.moon() {
            Some(moon) => self.project(moon, chart.planets.values(), now),
            None => Vec::new(),
        }
    }

    fn targets(&self, longitude: f64, aspect: AspectType) -> Vec<f64> {
        let mut targets = vec![normalize_360(longitude + aspect.angle())];
        let two_sided = !matches!(aspect, AspectType::Conjunction | AspectType::Opposition);
        if self.waning_side && two_sided {
            targets.push(normalize_360(longitude - aspect.angle()));
        }
        targets
    }
}
