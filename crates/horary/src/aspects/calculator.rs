use crate::aspects::types::{Aspect, AspectDetail, AspectType, OrbQuality};
use crate::chart::types::{Chart, Planet, PlanetPosition, Sign};
use crate::config::{OrbConfig, TimingConfig};
use crate::util::{angular_separation, normalize_to_pm180};
use chrono::{DateTime, Duration, Utc};

/// Slack for inclusive comparisons against configured orbs.
const ORB_EPSILON: f64 = 1e-9;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Aspect calculator
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    orbs: OrbConfig,
}

impl AspectCalculator {
    pub fn new(orbs: OrbConfig) -> Self {
        Self { orbs }
    }

    pub fn orbs(&self) -> &OrbConfig {
        &self.orbs
    }

    /// Allowed orb for an aspect between `a` and `b`, including luminary bonuses.
    pub fn tolerance(&self, aspect: AspectType, a: Planet, b: Planet) -> f64 {
        let mut orb = self.orbs.tolerance(aspect);
        if a == Planet::Sun || b == Planet::Sun {
            orb += self.orbs.sun_orb_bonus;
        }
        if a == Planet::Moon || b == Planet::Moon {
            orb += self.orbs.moon_orb_bonus;
        }
        orb
    }

    /// Current aspect between two planets, or `None` when no angle is within orb.
    ///
    /// Symmetric in its arguments. When two angles qualify the smaller orb wins,
    /// and on an exact tie the lower angle.
    pub fn compute_aspect(&self, a: &PlanetPosition, b: &PlanetPosition) -> Option<Aspect> {
        if a.planet == b.planet {
            return None;
        }

        let separation = angular_separation(a.longitude, b.longitude);

        let mut best: Option<(AspectType, f64)> = None;
        for aspect in AspectType::ALL {
            let orb = (separation - aspect.angle()).abs();
            if orb > self.tolerance(aspect, a.planet, b.planet) + ORB_EPSILON {
                continue;
            }
            match best {
                Some((_, best_orb)) if best_orb <= orb => {}
                _ => best = Some((aspect, orb)),
            }
        }

        let (aspect_type, orb) = best?;
        let mut applying = is_applying(a, b, aspect_type);
        if applying && self.orbs.perfect_within_sign {
            applying = perfects_within_sign(a, b, orb);
        }

        Some(Aspect::new(a.planet, b.planet, aspect_type, orb, applying))
    }

    /// Every aspect among the snapshot's planets, in canonical pair order.
    pub fn compute_all(&self, chart: &Chart) -> Vec<Aspect> {
        let positions: Vec<&PlanetPosition> = chart.planets.values().collect();
        let mut aspects = Vec::new();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                if let Some(aspect) = self.compute_aspect(positions[i], positions[j]) {
                    aspects.push(aspect);
                }
            }
        }
        aspects
    }

    /// Aspects in force for the snapshot.
    ///
    /// A supplied list, even an empty one, takes precedence; entries naming a
    /// planet absent from the snapshot are dropped. Without a supplied list
    /// the aspects are computed.
    pub fn current_aspects(&self, chart: &Chart) -> Vec<Aspect> {
        let Some(supplied) = &chart.aspects else {
            return self.compute_all(chart);
        };
        supplied
            .iter()
            .filter(|a| {
                let known = chart.planets.contains_key(&a.planet1)
                    && chart.planets.contains_key(&a.planet2);
                if !known {
                    log::debug!(
                        "dropping supplied aspect {} {} {}: body not in snapshot",
                        a.planet1.name(),
                        a.aspect_type.name(),
                        a.planet2.name()
                    );
                }
                known
            })
            .copied()
            .collect()
    }

    /// Attach quality and timing to an aspect.
    ///
    /// Timing needs both speeds from the snapshot; the exact date is reported
    /// only when `now` is given and perfection is within `timing.max_future_days`.
    pub fn augment(
        &self,
        aspect: &Aspect,
        chart: &Chart,
        now: Option<DateTime<Utc>>,
        timing: &TimingConfig,
    ) -> AspectDetail {
        let days_to_exact = if aspect.applying {
            relative_speed(chart.planet(aspect.planet1), chart.planet(aspect.planet2))
                .filter(|rel| rel.abs() > f64::EPSILON)
                .map(|rel| aspect.orb / rel.abs())
        } else {
            None
        };

        let exact_time = match (now, days_to_exact) {
            (Some(now), Some(days)) if days <= timing.max_future_days => add_days(now, days),
            _ => None,
        };

        AspectDetail {
            aspect: *aspect,
            quality: OrbQuality::from_orb(aspect.orb),
            degrees_to_exact: aspect.orb,
            days_to_exact,
            exact_time,
        }
    }
}

/// `now` plus a fractional number of days; `None` past the representable range.
pub fn add_days(now: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    let millis = days * SECONDS_PER_DAY * 1000.0;
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    now.checked_add_signed(Duration::milliseconds(millis.round() as i64))
}

fn relative_speed(a: Option<&PlanetPosition>, b: Option<&PlanetPosition>) -> Option<f64> {
    Some(a?.speed? - b?.speed?)
}

/// Rate of change of the orb in degrees per day; negative while applying.
///
/// The separation changes at `sign(d) * (speed_a - speed_b)` where `d` is the
/// signed difference in (-180, 180]. `None` when a speed is missing, the
/// speeds are equal, or the aspect is already exact.
pub(crate) fn orb_rate(a: &PlanetPosition, b: &PlanetPosition, aspect: AspectType) -> Option<f64> {
    let rel = relative_speed(Some(a), Some(b))?;
    if rel == 0.0 {
        return None;
    }

    let signed = normalize_to_pm180(a.longitude - b.longitude);
    let separation = signed.abs();
    let offset = separation - aspect.angle();
    if offset.abs() <= ORB_EPSILON {
        return None;
    }

    let separation_rate = if signed.abs() <= ORB_EPSILON || separation >= 180.0 - ORB_EPSILON {
        // At 0 or 180 the separation can only grow or only shrink.
        if separation < 90.0 {
            rel.abs()
        } else {
            -rel.abs()
        }
    } else {
        signed.signum() * rel
    };

    Some(offset.signum() * separation_rate)
}

/// Missing or equal speeds, and an aspect already exact, count as separating.
fn is_applying(a: &PlanetPosition, b: &PlanetPosition, aspect: AspectType) -> bool {
    orb_rate(a, b, aspect).map_or(false, |rate| rate < 0.0)
}

/// Neither body leaves its sign before the aspect perfects.
fn perfects_within_sign(a: &PlanetPosition, b: &PlanetPosition, orb: f64) -> bool {
    let Some(rel) = relative_speed(Some(a), Some(b)) else {
        return false;
    };
    if rel == 0.0 {
        return false;
    }
    let days = orb / rel.abs();
    let stays = |p: &PlanetPosition| {
        let speed = p.speed.unwrap_or(0.0);
        Sign::from_longitude(p.longitude + speed * days) == p.sign()
    };
    stays(a) && stays(b)
}
