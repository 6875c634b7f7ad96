//! Polar layout of the chart wheel.
//!
//! Screen coordinates, y pointing down. A longitude maps to the angle
//! `longitude - 90`, so 0 Aries sits at the top and the zodiac runs clockwise.
//! Radii are fractions of the wheel radius.

use crate::aspects::types::{Aspect, AspectType};
use crate::chart::types::{Chart, Planet, Sign, ALL_SIGNS};
use crate::util::normalize_360;
use serde::{Deserialize, Serialize};

/// Planets closer than this (degrees) are staggered inward.
const MARKER_CLEARANCE_DEG: f64 = 6.0;
const MARKER_LEVELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub inner: f64,
    pub outer: f64,
}

impl Band {
    pub const fn new(inner: f64, outer: f64) -> Self {
        Self { inner, outer }
    }

    pub fn middle(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }
}

/// Radii of the wheel layers, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingRadii {
    pub ticks: Band,
    pub signs: Band,
    pub houses: Band,
    pub planets: Band,
    pub hub: f64,
}

impl Default for RingRadii {
    fn default() -> Self {
        Self {
            ticks: Band::new(0.92, 1.0),
            signs: Band::new(0.78, 0.92),
            houses: Band::new(0.66, 0.78),
            planets: Band::new(0.36, 0.66),
            hub: 0.30,
        }
    }
}

impl RingRadii {
    /// Every band non-empty, inside the wheel, and clear of its neighbours.
    pub fn validate(&self) -> Result<(), String> {
        let bands = [
            ("ticks", self.ticks),
            ("signs", self.signs),
            ("houses", self.houses),
            ("planets", self.planets),
        ];
        for (name, band) in &bands {
            if !(band.inner >= 0.0 && band.inner < band.outer && band.outer <= 1.0) {
                return Err(format!(
                    "wheel.{} must satisfy 0 <= inner < outer <= 1, got {} .. {}",
                    name, band.inner, band.outer
                ));
            }
        }
        for pair in bands.windows(2) {
            let (outer_name, outer) = pair[0];
            let (inner_name, inner) = pair[1];
            if inner.outer > outer.inner {
                return Err(format!("wheel.{} overlaps wheel.{}", inner_name, outer_name));
            }
        }
        if self.hub < 0.0 || self.hub > self.planets.inner {
            return Err("wheel.hub must lie inside the planet ring".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Wheel angle in degrees for a longitude.
pub fn longitude_to_angle(longitude: f64) -> f64 {
    normalize_360(longitude) - 90.0
}

pub fn polar_point(cx: f64, cy: f64, radius: f64, longitude: f64) -> Point {
    let rad = longitude_to_angle(longitude).to_radians();
    Point {
        x: cx + radius * rad.cos(),
        y: cy + radius * rad.sin(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignSegment {
    pub sign: Sign,
    pub glyph: &'static str,
    pub start_lon: f64,
    pub end_lon: f64,
    pub label: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickKind {
    Minor,
    Medium,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeTick {
    pub longitude: f64,
    pub kind: TickKind,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseSector {
    pub house: u8,
    pub start_lon: f64,
    /// May exceed 360 when the sector crosses 0 Aries.
    pub end_lon: f64,
    pub cusp_from: Point,
    pub cusp_to: Point,
    pub label: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetMarker {
    pub planet: Planet,
    pub glyph: &'static str,
    pub longitude: f64,
    pub retrograde: bool,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectLine {
    pub planet1: Planet,
    pub planet2: Planet,
    pub aspect: AspectType,
    pub applying: bool,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
    pub signs: Vec<SignSegment>,
    pub ticks: Vec<DegreeTick>,
    /// Empty when the snapshot has no houses.
    pub houses: Vec<HouseSector>,
    pub planets: Vec<PlanetMarker>,
    pub aspects: Vec<AspectLine>,
    pub ascendant: Point,
}

/// Lays out a chart on a wheel of the given radius.
#[derive(Debug, Clone, Default)]
pub struct WheelLayout {
    radii: RingRadii,
}

impl WheelLayout {
    pub fn new(radii: RingRadii) -> Self {
        Self { radii }
    }

    pub fn build(&self, chart: &Chart, aspects: &[Aspect], cx: f64, cy: f64, radius: f64) -> WheelGeometry {
        let planets = self.planet_markers(chart, cx, cy, radius);
        let hub = self.radii.hub * radius;
        let aspect_lines = aspects
            .iter()
            .filter_map(|a| {
                let p1 = chart.planet(a.planet1)?;
                let p2 = chart.planet(a.planet2)?;
                Some(AspectLine {
                    planet1: a.planet1,
                    planet2: a.planet2,
                    aspect: a.aspect_type,
                    applying: a.applying,
                    from: polar_point(cx, cy, hub, p1.longitude),
                    to: polar_point(cx, cy, hub, p2.longitude),
                })
            })
            .collect();

        WheelGeometry {
            center: Point { x: cx, y: cy },
            radius,
            signs: self.sign_segments(cx, cy, radius),
            ticks: self.degree_ticks(cx, cy, radius),
            houses: chart
                .houses
                .map(|cusps| self.house_sectors(&cusps, cx, cy, radius))
                .unwrap_or_default(),
            planets,
            aspects: aspect_lines,
            ascendant: polar_point(cx, cy, self.radii.signs.inner * radius, chart.ascendant),
        }
    }

    pub fn sign_segments(&self, cx: f64, cy: f64, radius: f64) -> Vec<SignSegment> {
        let label_r = self.radii.signs.middle() * radius;
        ALL_SIGNS
            .iter()
            .map(|sign| {
                let start = sign.start_degree();
                SignSegment {
                    sign: *sign,
                    glyph: sign.glyph(),
                    start_lon: start,
                    end_lon: start + 30.0,
                    label: polar_point(cx, cy, label_r, start + 15.0),
                }
            })
            .collect()
    }

    /// One tick per degree; longer every 5 and 10 degrees.
    pub fn degree_ticks(&self, cx: f64, cy: f64, radius: f64) -> Vec<DegreeTick> {
        let band = self.radii.ticks;
        let depth = band.outer - band.inner;
        (0..360)
            .map(|deg| {
                let kind = if deg % 10 == 0 {
                    TickKind::Major
                } else if deg % 5 == 0 {
                    TickKind::Medium
                } else {
                    TickKind::Minor
                };
                let length = match kind {
                    TickKind::Major => depth,
                    TickKind::Medium => depth * 0.6,
                    TickKind::Minor => depth * 0.3,
                };
                let lon = deg as f64;
                DegreeTick {
                    longitude: lon,
                    kind,
                    from: polar_point(cx, cy, band.outer * radius, lon),
                    to: polar_point(cx, cy, (band.outer - length) * radius, lon),
                }
            })
            .collect()
    }

    /// Consecutive spans between cusps. A cusp smaller than its predecessor
    /// is lifted by 360 so every span runs forward.
    pub fn house_sectors(&self, cusps: &[f64; 12], cx: f64, cy: f64, radius: f64) -> Vec<HouseSector> {
        let band = self.radii.houses;
        (0..12)
            .map(|i| {
                let start = cusps[i];
                let mut end = cusps[(i + 1) % 12];
                if end < start {
                    end += 360.0;
                }
                HouseSector {
                    house: i as u8 + 1,
                    start_lon: start,
                    end_lon: end,
                    cusp_from: polar_point(cx, cy, self.radii.signs.inner * radius, start),
                    cusp_to: polar_point(cx, cy, self.radii.hub * radius, start),
                    label: polar_point(cx, cy, band.middle() * radius, (start + end) / 2.0),
                }
            })
            .collect()
    }

    /// Markers in the planet band, stepped inward when bodies crowd together.
    pub fn planet_markers(&self, chart: &Chart, cx: f64, cy: f64, radius: f64) -> Vec<PlanetMarker> {
        let band = self.radii.planets;
        let step = (band.outer - band.inner) / (MARKER_LEVELS as f64 + 1.0);

        let mut positions: Vec<_> = chart.planets.values().collect();
        positions.sort_by(|a, b| a.longitude.total_cmp(&b.longitude));

        let mut markers = Vec::with_capacity(positions.len());
        let mut previous: Option<(f64, usize)> = None;
        for pos in positions {
            let level = match previous {
                Some((lon, level)) if pos.longitude - lon < MARKER_CLEARANCE_DEG => {
                    (level + 1) % MARKER_LEVELS
                }
                _ => 0,
            };
            previous = Some((pos.longitude, level));
            let r = (band.outer - step * (level as f64 + 1.0)) * radius;
            markers.push(PlanetMarker {
                planet: pos.planet,
                glyph: pos.planet.glyph(),
                longitude: pos.longitude,
                retrograde: pos.retrograde(),
                point: polar_point(cx, cy, r, pos.longitude),
            });
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::PlanetPosition;

    const EPS: f64 = 1e-9;

    fn close(p: Point, x: f64, y: f64) -> bool {
        (p.x - x).abs() < EPS && (p.y - y).abs() < EPS
    }

    #[test]
    fn test_aries_at_top() {
        assert!(close(polar_point(0.0, 0.0, 1.0, 0.0), 0.0, -1.0));
    }

    #[test]
    fn test_zodiac_runs_clockwise() {
        // 90 degrees of longitude is a quarter turn clockwise on screen: the right.
        assert!(close(polar_point(0.0, 0.0, 1.0, 90.0), 1.0, 0.0));
        assert!(close(polar_point(0.0, 0.0, 1.0, 180.0), 0.0, 1.0));
        assert!(close(polar_point(10.0, 10.0, 2.0, 270.0), 8.0, 10.0));
    }

    #[test]
    fn test_default_radii_valid() {
        assert!(RingRadii::default().validate().is_ok());
    }

    #[test]
    fn test_overlapping_radii_rejected() {
        let radii = RingRadii {
            houses: Band::new(0.6, 0.85),
            ..RingRadii::default()
        };
        assert!(radii.validate().is_err());
    }

    #[test]
    fn test_hub_outside_planets_rejected() {
        let radii = RingRadii {
            hub: 0.5,
            ..RingRadii::default()
        };
        assert!(radii.validate().is_err());
    }

    #[test]
    fn test_sign_segments() {
        let segments = WheelLayout::default().sign_segments(0.0, 0.0, 100.0);
        assert_eq!(segments.len(), 12);
        assert_eq!(segments[11].sign, Sign::Pisces);
        assert_eq!(segments[11].end_lon, 360.0);
    }

    #[test]
    fn test_ticks() {
        let ticks = WheelLayout::default().degree_ticks(0.0, 0.0, 100.0);
        assert_eq!(ticks.len(), 360);
        assert_eq!(ticks.iter().filter(|t| t.kind == TickKind::Major).count(), 36);
        assert_eq!(ticks.iter().filter(|t| t.kind == TickKind::Medium).count(), 36);
    }

    #[test]
    fn test_house_sectors_wrap() {
        let cusps = [350.0, 20.0, 50.0, 80.0, 110.0, 140.0, 170.0, 200.0, 230.0, 260.0, 290.0, 320.0];
        let sectors = WheelLayout::default().house_sectors(&cusps, 0.0, 0.0, 100.0);
        assert_eq!(sectors.len(), 12);
        assert_eq!(sectors[0].start_lon, 350.0);
        assert_eq!(sectors[0].end_lon, 380.0);
        assert_eq!(sectors[11].end_lon, 350.0);
        for s in &sectors {
            assert!(s.end_lon > s.start_lon);
        }
    }

    #[test]
    fn test_crowded_planets_staggered() {
        let chart = Chart::new(
            vec![
                PlanetPosition::new(Planet::Sun, 100.0, 1.0),
                PlanetPosition::new(Planet::Mercury, 102.0, 1.5),
                PlanetPosition::new(Planet::Mars, 200.0, 0.5),
            ],
            0.0,
        );
        let markers = WheelLayout::default().planet_markers(&chart, 0.0, 0.0, 100.0);
        let dist = |m: &PlanetMarker| (m.point.x.powi(2) + m.point.y.powi(2)).sqrt();
        assert!(dist(&markers[0]) > dist(&markers[1]));
        assert!((dist(&markers[0]) - dist(&markers[2])).abs() < EPS);
        let band = RingRadii::default().planets;
        for m in &markers {
            let r = dist(m) / 100.0;
            assert!(r > band.inner && r < band.outer);
        }
    }

    #[test]
    fn test_build_without_houses() {
        let chart = Chart::new(vec![PlanetPosition::new(Planet::Moon, 10.0, 13.0)], 15.0);
        let wheel = WheelLayout::default().build(&chart, &[], 250.0, 250.0, 200.0);
        assert!(wheel.houses.is_empty());
        assert_eq!(wheel.planets.len(), 1);
    }
}
