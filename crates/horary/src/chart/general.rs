//! Planetary day and hour rulers for the moment of the question.
//!
//! Hours are counted as clock hours from local midnight, not as unequal
//! sunrise-based hours; sunrise is not part of the snapshot.

use crate::chart::types::{Planet, CHALDEAN_ORDER};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanetaryTime {
    pub day_ruler: Planet,
    pub hour_ruler: Planet,
}

pub fn day_ruler(weekday: Weekday) -> Planet {
    match weekday {
        Weekday::Mon => Planet::Moon,
        Weekday::Tue => Planet::Mars,
        Weekday::Wed => Planet::Mercury,
        Weekday::Thu => Planet::Jupiter,
        Weekday::Fri => Planet::Venus,
        Weekday::Sat => Planet::Saturn,
        Weekday::Sun => Planet::Sun,
    }
}

pub fn planetary_time(local: NaiveDateTime) -> PlanetaryTime {
    let day = day_ruler(local.weekday());
    let start = CHALDEAN_ORDER
        .iter()
        .position(|p| *p == day)
        .unwrap_or(0);
    let hour = CHALDEAN_ORDER[(start + local.hour() as usize) % 7];
    PlanetaryTime {
        day_ruler: day,
        hour_ruler: hour,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_first_hour_is_day_ruler() {
        // 2024-01-06 was a Saturday
        let t = planetary_time(at(2024, 1, 6, 0));
        assert_eq!(t.day_ruler, Planet::Saturn);
        assert_eq!(t.hour_ruler, Planet::Saturn);
    }

    #[test]
    fn test_hours_follow_chaldean_order() {
        // Sunday: Sun, Venus, Mercury, Moon, Saturn...
        let t = planetary_time(at(2024, 1, 7, 3));
        assert_eq!(t.day_ruler, Planet::Sun);
        assert_eq!(t.hour_ruler, Planet::Moon);
    }

    #[test]
    fn test_hour_wraps_after_seven() {
        let t = planetary_time(at(2024, 1, 8, 7));
        assert_eq!(t.day_ruler, Planet::Moon);
        assert_eq!(t.hour_ruler, Planet::Moon);
    }
}
