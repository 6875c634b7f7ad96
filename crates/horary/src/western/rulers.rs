//! Traditional essential dignity tables.

use crate::chart::types::{Planet, Sign};

/// Signs the planet rules.
pub const fn domiciles(planet: Planet) -> &'static [Sign] {
    match planet {
        Planet::Sun => &[Sign::Leo],
        Planet::Moon => &[Sign::Cancer],
        Planet::Mercury => &[Sign::Gemini, Sign::Virgo],
        Planet::Venus => &[Sign::Taurus, Sign::Libra],
        Planet::Mars => &[Sign::Aries, Sign::Scorpio],
        Planet::Jupiter => &[Sign::Sagittarius, Sign::Pisces],
        Planet::Saturn => &[Sign::Capricorn, Sign::Aquarius],
    }
}

/// Signs opposite the planet's domiciles.
pub const fn detriments(planet: Planet) -> &'static [Sign] {
    match planet {
        Planet::Sun => &[Sign::Aquarius],
        Planet::Moon => &[Sign::Capricorn],
        Planet::Mercury => &[Sign::Sagittarius, Sign::Pisces],
        Planet::Venus => &[Sign::Scorpio, Sign::Aries],
        Planet::Mars => &[Sign::Libra, Sign::Taurus],
        Planet::Jupiter => &[Sign::Gemini, Sign::Virgo],
        Planet::Saturn => &[Sign::Cancer, Sign::Leo],
    }
}

pub const fn exaltation(planet: Planet) -> Sign {
    match planet {
        Planet::Sun => Sign::Aries,
        Planet::Moon => Sign::Taurus,
        Planet::Mercury => Sign::Virgo,
        Planet::Venus => Sign::Pisces,
        Planet::Mars => Sign::Capricorn,
        Planet::Jupiter => Sign::Cancer,
        Planet::Saturn => Sign::Libra,
    }
}

pub const fn fall(planet: Planet) -> Sign {
    match planet {
        Planet::Sun => Sign::Libra,
        Planet::Moon => Sign::Scorpio,
        Planet::Mercury => Sign::Pisces,
        Planet::Venus => Sign::Virgo,
        Planet::Mars => Sign::Cancer,
        Planet::Jupiter => Sign::Capricorn,
        Planet::Saturn => Sign::Aries,
    }
}

/// House in which the planet rejoices.
pub const fn joy(planet: Planet) -> u8 {
    match planet {
        Planet::Mercury => 1,
        Planet::Moon => 3,
        Planet::Venus => 5,
        Planet::Mars => 6,
        Planet::Sun => 9,
        Planet::Jupiter => 11,
        Planet::Saturn => 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::{ALL_PLANETS, ALL_SIGNS};

    fn opposite(sign: Sign) -> Sign {
        ALL_SIGNS[(sign.index() as usize + 6) % 12]
    }

    #[test]
    fn test_domiciles_match_sign_rulers() {
        for sign in ALL_SIGNS {
            assert!(domiciles(sign.ruler()).contains(&sign));
        }
    }

    #[test]
    fn test_detriment_opposes_domicile() {
        for planet in ALL_PLANETS {
            for sign in domiciles(planet) {
                assert!(detriments(planet).contains(&opposite(*sign)));
            }
        }
    }

    #[test]
    fn test_fall_opposes_exaltation() {
        for planet in ALL_PLANETS {
            assert_eq!(fall(planet), opposite(exaltation(planet)));
        }
    }
}
