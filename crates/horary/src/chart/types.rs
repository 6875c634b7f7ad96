//! Chart snapshot types: planets, signs and the immutable input snapshot.

use crate::aspects::types::Aspect;
use crate::solar::conditions::SolarConditionSet;
use crate::util::{degree_in_sign, normalize_360};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The seven traditional planets used in horary work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Planet {
    #[serde(alias = "sun", alias = "SUN")]
    Sun,
    #[serde(alias = "moon", alias = "MOON")]
    Moon,
    #[serde(alias = "mercury", alias = "MERCURY")]
    Mercury,
    #[serde(alias = "venus", alias = "VENUS")]
    Venus,
    #[serde(alias = "mars", alias = "MARS")]
    Mars,
    #[serde(alias = "jupiter", alias = "JUPITER")]
    Jupiter,
    #[serde(alias = "saturn", alias = "SATURN")]
    Saturn,
}

/// All planets in canonical order.
pub const ALL_PLANETS: [Planet; 7] = [
    Planet::Sun,
    Planet::Moon,
    Planet::Mercury,
    Planet::Venus,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
];

/// Chaldean order, slowest to fastest. Drives planetary hours.
pub const CHALDEAN_ORDER: [Planet; 7] = [
    Planet::Saturn,
    Planet::Jupiter,
    Planet::Mars,
    Planet::Sun,
    Planet::Venus,
    Planet::Mercury,
    Planet::Moon,
];

impl Planet {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "☉",
            Self::Moon => "☽",
            Self::Mercury => "☿",
            Self::Venus => "♀",
            Self::Mars => "♂",
            Self::Jupiter => "♃",
            Self::Saturn => "♄",
        }
    }

    /// 0-based index into `ALL_PLANETS`.
    pub const fn index(self) -> u8 {
        match self {
            Self::Sun => 0,
            Self::Moon => 1,
            Self::Mercury => 2,
            Self::Venus => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
        }
    }

    /// Parse a planet name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        ALL_PLANETS
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

/// Element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// The 12 signs of the tropical zodiac starting from Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All 12 signs in zodiacal order (0 = Aries, 11 = Pisces).
pub const ALL_SIGNS: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Aries => "♈",
            Self::Taurus => "♉",
            Self::Gemini => "♊",
            Self::Cancer => "♋",
            Self::Leo => "♌",
            Self::Virgo => "♍",
            Self::Libra => "♎",
            Self::Scorpio => "♏",
            Self::Sagittarius => "♐",
            Self::Capricorn => "♑",
            Self::Aquarius => "♒",
            Self::Pisces => "♓",
        }
    }

    /// 0-based index (Aries=0 .. Pisces=11).
    pub const fn index(self) -> u8 {
        match self {
            Self::Aries => 0,
            Self::Taurus => 1,
            Self::Gemini => 2,
            Self::Cancer => 3,
            Self::Leo => 4,
            Self::Virgo => 5,
            Self::Libra => 6,
            Self::Scorpio => 7,
            Self::Sagittarius => 8,
            Self::Capricorn => 9,
            Self::Aquarius => 10,
            Self::Pisces => 11,
        }
    }

    /// Ecliptic longitude where the sign begins.
    pub fn start_degree(self) -> f64 {
        self.index() as f64 * 30.0
    }

    /// Traditional (pre-modern) ruler.
    pub const fn ruler(self) -> Planet {
        match self {
            Self::Aries | Self::Scorpio => Planet::Mars,
            Self::Taurus | Self::Libra => Planet::Venus,
            Self::Gemini | Self::Virgo => Planet::Mercury,
            Self::Cancer => Planet::Moon,
            Self::Leo => Planet::Sun,
            Self::Sagittarius | Self::Pisces => Planet::Jupiter,
            Self::Capricorn | Self::Aquarius => Planet::Saturn,
        }
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Aries | Self::Leo | Self::Sagittarius => Element::Fire,
            Self::Taurus | Self::Virgo | Self::Capricorn => Element::Earth,
            Self::Gemini | Self::Libra | Self::Aquarius => Element::Air,
            Self::Cancer | Self::Scorpio | Self::Pisces => Element::Water,
        }
    }

    /// Sign containing an ecliptic longitude: `floor(lon / 30)`.
    pub fn from_longitude(lon: f64) -> Self {
        let idx = (normalize_360(lon) / 30.0).floor() as usize;
        ALL_SIGNS[idx.min(11)]
    }
}

/// One planet's state in the snapshot. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetPosition {
    pub planet: Planet,
    /// Ecliptic longitude in [0, 360).
    pub longitude: f64,
    /// Degrees per day; negative is retrograde. `None` when the caster omitted it.
    pub speed: Option<f64>,
    /// House 1-12, when houses were cast.
    pub house: Option<u8>,
    pub dignity_score: Option<i32>,
    /// Visibility exception to combustion, computed upstream.
    pub traditional_exception: bool,
}

impl PlanetPosition {
    pub fn new(planet: Planet, longitude: f64, speed: f64) -> Self {
        Self {
            planet,
            longitude: normalize_360(longitude),
            speed: Some(speed),
            house: None,
            dignity_score: None,
            traditional_exception: false,
        }
    }

    pub fn with_house(mut self, house: u8) -> Self {
        self.house = Some(house);
        self
    }

    pub fn with_dignity(mut self, score: i32) -> Self {
        self.dignity_score = Some(score);
        self
    }

    pub fn with_exception(mut self, exception: bool) -> Self {
        self.traditional_exception = exception;
        self
    }

    pub fn sign(&self) -> Sign {
        Sign::from_longitude(self.longitude)
    }

    pub fn degree_in_sign(&self) -> f64 {
        degree_in_sign(self.longitude)
    }

    pub fn retrograde(&self) -> bool {
        self.speed.map_or(false, |s| s < 0.0)
    }
}

/// Read-only snapshot produced by an external chart-casting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "crate::chart::loader::ChartInput")]
pub struct Chart {
    /// Snapshot identity, used for memoisation and history records.
    pub id: Uuid,
    pub planets: BTreeMap<Planet, PlanetPosition>,
    /// Aspects supplied with the snapshot. `None` when the caster sent no list;
    /// an empty list means the caster found no aspects.
    pub aspects: Option<Vec<Aspect>>,
    pub ascendant: f64,
    /// House cusps 1..12, cyclically ascending.
    pub houses: Option<[f64; 12]>,
    pub solar_conditions: Option<SolarConditionSet>,
    /// Local civil time of the question, for planetary day and hour.
    pub local_time: Option<NaiveDateTime>,
}

impl Chart {
    pub fn new(planets: impl IntoIterator<Item = PlanetPosition>, ascendant: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            planets: planets.into_iter().map(|p| (p.planet, p)).collect(),
            aspects: None,
            ascendant: normalize_360(ascendant),
            houses: None,
            solar_conditions: None,
            local_time: None,
        }
    }

    pub fn with_houses(mut self, cusps: [f64; 12]) -> Self {
        self.houses = Some(cusps.map(normalize_360));
        self
    }

    pub fn with_aspects(mut self, aspects: Vec<Aspect>) -> Self {
        self.aspects = Some(aspects);
        self
    }

    pub fn with_local_time(mut self, local_time: NaiveDateTime) -> Self {
        self.local_time = Some(local_time);
        self
    }

    pub fn planet(&self, planet: Planet) -> Option<&PlanetPosition> {
        self.planets.get(&planet)
    }

    pub fn moon(&self) -> Option<&PlanetPosition> {
        self.planet(Planet::Moon)
    }

    pub fn sun(&self) -> Option<&PlanetPosition> {
        self.planet(Planet::Sun)
    }
}
