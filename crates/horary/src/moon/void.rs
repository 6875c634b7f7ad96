//! Void-of-course Moon.
//!
//! The default rule follows the supplied aspect list: the Moon is void when
//! none of its aspects is applying. The other rules look at positions.
//!
//! Distance to the next sign is always measured in the direction of
//! increasing longitude, also for a retrograde Moon, which would actually be
//! heading for the previous boundary. `VoidStatus::retrograde` marks that case.

use crate::aspects::types::{Aspect, AspectType};
use crate::chart::types::{Chart, Planet, PlanetPosition, Sign};
use crate::config::MoonConfig;
use crate::util::{angular_separation, degree_in_sign, normalize_360};
use serde::{Deserialize, Serialize};

pub const NO_APPLYING_REASON: &str = "no applying aspects before leaving sign";

const LILLY_SIGNS: [Sign; 4] = [Sign::Cancer, Sign::Taurus, Sign::Sagittarius, Sign::Pisces];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoidRule {
    /// Void when no current Moon aspect is applying.
    #[default]
    ApplyingAspects,
    /// Void when the Moon reaches no aspect point before the sign ends.
    BySign,
    /// Void when the Moon is not within the void orb of any aspect.
    ByOrb,
    /// `BySign`, excused in Cancer, Taurus, Sagittarius and Pisces.
    Lilly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoidStatus {
    pub is_void: bool,
    pub reason: String,
    pub rule: VoidRule,
    pub sign: Sign,
    pub degrees_to_next_sign: f64,
    /// `None` when the Moon's speed is missing, zero or retrograde.
    pub estimated_days: Option<f64>,
    /// Traditional excuse for a void Moon in this sign, if any. Never changes `is_void`.
    pub exception: Option<String>,
    pub retrograde: bool,
}

impl VoidStatus {
    /// `"0.36 days"`, or `"Unknown"` without a usable speed.
    pub fn estimated_time(&self) -> String {
        match self.estimated_days {
            Some(days) => format!("{:.2} days", days),
            None => "Unknown".to_string(),
        }
    }
}

/// Degrees left before the next sign boundary.
pub fn degrees_to_next_sign(longitude: f64) -> f64 {
    30.0 - degree_in_sign(longitude)
}

#[derive(Debug, Clone, Default)]
pub struct VoidDetector {
    config: MoonConfig,
}

impl VoidDetector {
    pub fn new(config: MoonConfig) -> Self {
        Self { config }
    }

    /// Void by the supplied aspects alone.
    pub fn is_void(&self, moon: &PlanetPosition, aspects: &[Aspect]) -> VoidStatus {
        let mut applying: Vec<&Aspect> = aspects
            .iter()
            .filter(|a| a.involves(Planet::Moon) && a.applying)
            .collect();
        applying.sort_by(|a, b| a.orb.total_cmp(&b.orb));

        let reason = match applying.first() {
            None => NO_APPLYING_REASON.to_string(),
            Some(a) => format!(
                "Moon applying to {} {}",
                a.aspect_type.key(),
                a.other(Planet::Moon).map_or("", |p| p.name())
            ),
        };

        self.status(moon, applying.is_empty(), reason, VoidRule::ApplyingAspects)
    }

    /// Void status under the configured rule; `None` without a Moon.
    pub fn evaluate(&self, chart: &Chart, aspects: &[Aspect]) -> Option<VoidStatus> {
        let Some(moon) = chart.moon() else {
            log::warn!("snapshot has no Moon; void of course unavailable");
            return None;
        };
        let others: Vec<&PlanetPosition> = chart
            .planets
            .values()
            .filter(|p| p.planet != Planet::Moon)
            .collect();

        let status = match self.config.void_rule {
            VoidRule::ApplyingAspects => self.is_void(moon, aspects),
            VoidRule::BySign => self.by_sign(moon, &others, VoidRule::BySign),
            VoidRule::ByOrb => self.by_orb(moon, &others),
            VoidRule::Lilly => self.by_sign(moon, &others, VoidRule::Lilly),
        };
        log::debug!("moon void ({:?}): {} - {}", status.rule, status.is_void, status.reason);
        Some(status)
    }

    fn by_sign(&self, moon: &PlanetPosition, others: &[&PlanetPosition], rule: VoidRule) -> VoidStatus {
        let sign = moon.sign();
        if let Some(speed) = moon.speed {
            if speed.abs() < self.config.stationary_speed_threshold {
                return self.status(
                    moon,
                    false,
                    "Moon stationary - cannot be void of course".to_string(),
                    rule,
                );
            }
        }

        let moon_deg = degree_in_sign(moon.longitude);
        let mut next: Option<(f64, Planet, AspectType, f64)> = None;
        for other in others {
            for aspect in AspectType::ALL {
                for target in aspect_points(other.longitude, aspect) {
                    if Sign::from_longitude(target) != sign {
                        continue;
                    }
                    let target_deg = degree_in_sign(target);
                    if target_deg <= moon_deg {
                        continue;
                    }
                    let ahead = target_deg - moon_deg;
                    if next.map_or(true, |(best, ..)| ahead < best) {
                        next = Some((ahead, other.planet, aspect, target_deg));
                    }
                }
            }
        }

        let (is_void, reason) = match next {
            None => (
                true,
                format!("Moon makes no more aspects before leaving {}", sign.name()),
            ),
            Some((_, planet, aspect, target_deg)) => (
                false,
                format!(
                    "Moon will {} {} at {:.1}° {}",
                    aspect.key(),
                    planet.name(),
                    target_deg,
                    sign.name()
                ),
            ),
        };
        self.status(moon, is_void, reason, rule)
    }

    fn by_orb(&self, moon: &PlanetPosition, others: &[&PlanetPosition]) -> VoidStatus {
        let orb = self.config.void_orb_deg;
        for other in others {
            let separation = angular_separation(moon.longitude, other.longitude);
            for aspect in AspectType::ALL {
                if (separation - aspect.angle()).abs() <= orb {
                    let reason = format!(
                        "Moon within {}° of {} to {}",
                        orb,
                        aspect.name(),
                        other.planet.name()
                    );
                    return self.status(moon, false, reason, VoidRule::ByOrb);
                }
            }
        }
        self.status(
            moon,
            true,
            format!("Moon not within {}° of any aspect", orb),
            VoidRule::ByOrb,
        )
    }

    fn status(&self, moon: &PlanetPosition, is_void: bool, reason: String, rule: VoidRule) -> VoidStatus {
        let degrees = degrees_to_next_sign(moon.longitude);
        let estimated_days = match moon.speed {
            Some(speed) if speed > 0.0 => Some(degrees / speed),
            _ => None,
        };
        VoidStatus {
            is_void,
            reason,
            rule,
            sign: moon.sign(),
            degrees_to_next_sign: degrees,
            estimated_days,
            exception: self.exception(moon.sign(), rule),
            retrograde: moon.retrograde(),
        }
    }

    fn exception(&self, sign: Sign, rule: VoidRule) -> Option<String> {
        if rule == VoidRule::Lilly {
            return LILLY_SIGNS
                .contains(&sign)
                .then(|| format!("Lilly exception: {}", sign.name()));
        }
        let ex = &self.config.void_exceptions;
        match sign {
            Sign::Cancer if ex.cancer => Some("in own sign - Cancer".to_string()),
            Sign::Sagittarius if ex.sagittarius => Some("in joy - Sagittarius".to_string()),
            Sign::Taurus if ex.taurus => Some("in exaltation - Taurus".to_string()),
            _ => None,
        }
    }
}

/// Longitudes where the Moon would perfect `aspect` with a body at `longitude`.
fn aspect_points(longitude: f64, aspect: AspectType) -> Vec<f64> {
    let ahead = normalize_360(longitude + aspect.angle());
    let behind = normalize_360(longitude - aspect.angle());
    if (ahead - behind).abs() < 1e-9 {
        vec![ahead]
    } else {
        vec![ahead, behind]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moon(lon: f64, speed: f64) -> PlanetPosition {
        PlanetPosition::new(Planet::Moon, lon, speed)
    }

    #[test]
    fn test_void_without_aspects() {
        let status = VoidDetector::default().is_void(&moon(145.2, 13.2), &[]);
        assert!(status.is_void);
        assert_eq!(status.reason, NO_APPLYING_REASON);
        assert!((status.degrees_to_next_sign - 4.8).abs() < 1e-9);
        let days = status.estimated_days.unwrap();
        assert!((days - 4.8 / 13.2).abs() < 1e-9);
        assert_eq!(status.estimated_time(), "0.36 days");
    }

    #[test]
    fn test_separating_aspects_do_not_count() {
        let aspects = [Aspect::new(Planet::Moon, Planet::Mars, AspectType::Square, 2.0, false)];
        assert!(VoidDetector::default().is_void(&moon(145.2, 13.2), &aspects).is_void);
    }

    #[test]
    fn test_other_planets_aspects_do_not_count() {
        let aspects = [Aspect::new(Planet::Venus, Planet::Mars, AspectType::Trine, 1.0, true)];
        assert!(VoidDetector::default().is_void(&moon(145.2, 13.2), &aspects).is_void);
    }

    #[test]
    fn test_applying_aspect_prevents_void() {
        let aspects = [
            Aspect::new(Planet::Moon, Planet::Saturn, AspectType::Trine, 4.0, true),
            Aspect::new(Planet::Jupiter, Planet::Moon, AspectType::Sextile, 1.0, true),
        ];
        let status = VoidDetector::default().is_void(&moon(145.2, 13.2), &aspects);
        assert!(!status.is_void);
        assert_eq!(status.reason, "Moon applying to sextile Jupiter");
    }

    #[test]
    fn test_zero_speed_has_unknown_time() {
        let status = VoidDetector::default().is_void(&moon(145.2, 0.0), &[]);
        assert!(status.estimated_days.is_none());
        assert_eq!(status.estimated_time(), "Unknown");
    }

    #[test]
    fn test_retrograde_moon_still_measures_forward() {
        // Open question: a retrograde Moon heads for the previous boundary,
        // but the distance reported is to the next one.
        let status = VoidDetector::default().is_void(&moon(145.2, -0.5), &[]);
        assert!(status.retrograde);
        assert!((status.degrees_to_next_sign - 4.8).abs() < 1e-9);
        assert!(status.estimated_days.is_none());
    }

    #[test]
    fn test_exception_is_annotation_only() {
        // 100 is in Cancer
        let status = VoidDetector::default().is_void(&moon(100.0, 13.0), &[]);
        assert!(status.is_void);
        assert_eq!(status.exception.as_deref(), Some("in own sign - Cancer"));
    }

    fn config(rule: VoidRule) -> MoonConfig {
        MoonConfig {
            void_rule: rule,
            ..MoonConfig::default()
        }
    }

    #[test]
    fn test_by_sign_finds_aspect_ahead() {
        // Moon 10 Leo, Mars 15 Aries: trine point at 15 Leo is ahead.
        let chart = Chart::new(vec![moon(130.0, 13.0), PlanetPosition::new(Planet::Mars, 15.0, 0.5)], 0.0);
        let status = VoidDetector::new(config(VoidRule::BySign)).evaluate(&chart, &[]).unwrap();
        assert!(!status.is_void);
        assert_eq!(status.reason, "Moon will trine Mars at 15.0° Leo");
    }

    #[test]
    fn test_by_sign_void_when_points_behind() {
        // Moon 25 Leo, Mars 15 Aries: trine at 15 Leo already passed.
        let chart = Chart::new(vec![moon(145.0, 13.0), PlanetPosition::new(Planet::Mars, 15.0, 0.5)], 0.0);
        let status = VoidDetector::new(config(VoidRule::BySign)).evaluate(&chart, &[]).unwrap();
        assert!(status.is_void);
    }

    #[test]
    fn test_by_sign_uses_waning_side() {
        // Mars at 190: P-60 = 130 is 10 Leo, ahead of the Moon at 5 Leo.
        let chart = Chart::new(vec![moon(125.0, 13.0), PlanetPosition::new(Planet::Mars, 190.0, 0.5)], 0.0);
        let status = VoidDetector::new(config(VoidRule::BySign)).evaluate(&chart, &[]).unwrap();
        assert!(!status.is_void);
        assert!(status.reason.contains("sextile Mars"));
    }

    #[test]
    fn test_by_sign_stationary_never_void() {
        let chart = Chart::new(vec![moon(145.0, 0.01)], 0.0);
        let status = VoidDetector::new(config(VoidRule::BySign)).evaluate(&chart, &[]).unwrap();
        assert!(!status.is_void);
    }

    #[test]
    fn test_by_orb() {
        let detector = VoidDetector::new(config(VoidRule::ByOrb));
        let near = Chart::new(vec![moon(100.0, 13.0), PlanetPosition::new(Planet::Venus, 42.0, 1.0)], 0.0);
        assert!(!detector.evaluate(&near, &[]).unwrap().is_void);
        let far = Chart::new(vec![moon(100.0, 13.0), PlanetPosition::new(Planet::Venus, 30.0, 1.0)], 0.0);
        assert!(detector.evaluate(&far, &[]).unwrap().is_void);
    }

    #[test]
    fn test_lilly_exception_signs() {
        // Moon late in Pisces with nothing ahead
        let chart = Chart::new(vec![moon(355.0, 13.0)], 0.0);
        let status = VoidDetector::new(config(VoidRule::Lilly)).evaluate(&chart, &[]).unwrap();
        assert!(status.is_void);
        assert_eq!(status.exception.as_deref(), Some("Lilly exception: Pisces"));
    }

    #[test]
    fn test_missing_moon_unavailable() {
        let chart = Chart::new(vec![PlanetPosition::new(Planet::Sun, 10.0, 1.0)], 0.0);
        assert!(VoidDetector::default().evaluate(&chart, &[]).is_none());
    }
}
