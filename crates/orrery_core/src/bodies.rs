//! NAIF body names and codes.

/// Built-in name table. The first name listed for a code is its canonical name.
const BODY_NAMES: &[(&str, i32)] = &[
    ("SOLAR SYSTEM BARYCENTER", 0),
    ("SSB", 0),
    ("SOLAR_SYSTEM_BARYCENTER", 0),
    ("MERCURY BARYCENTER", 1),
    ("VENUS BARYCENTER", 2),
    ("EARTH BARYCENTER", 3),
    ("EMB", 3),
    ("EARTH MOON BARYCENTER", 3),
    ("EARTH-MOON BARYCENTER", 3),
    ("MARS BARYCENTER", 4),
    ("JUPITER BARYCENTER", 5),
    ("SATURN BARYCENTER", 6),
    ("URANUS BARYCENTER", 7),
    ("NEPTUNE BARYCENTER", 8),
    ("PLUTO BARYCENTER", 9),
    ("SUN", 10),
    ("MERCURY", 199),
    ("VENUS", 299),
    ("MOON", 301),
    ("EARTH", 399),
    ("MARS", 499),
    ("JUPITER", 599),
    ("SATURN", 699),
    ("URANUS", 799),
    ("NEPTUNE", 899),
    ("PLUTO", 999),
];

/// Resolve a body name or integer code string.
///
/// Names are case-insensitive; runs of whitespace count as one space.
pub fn body_code(name: &str) -> Option<i32> {
    let trimmed = name.trim();
    if let Ok(code) = trimmed.parse::<i32>() {
        return Some(code);
    }
    let normalized = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    BODY_NAMES
        .iter()
        .find(|(n, _)| *n == normalized)
        .map(|&(_, code)| code)
}

/// Canonical name of a body code, if it is in the built-in table.
pub fn body_name(code: i32) -> Option<&'static str> {
    BODY_NAMES
        .iter()
        .find(|&&(_, c)| c == code)
        .map(|&(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve() {
        assert_eq!(body_code("EARTH"), Some(399));
        assert_eq!(body_code("moon"), Some(301));
        assert_eq!(body_code("Solar  System\tBarycenter"), Some(0));
        assert_eq!(body_code(" ssb "), Some(0));
        assert_eq!(body_code("Earth-Moon Barycenter"), Some(3));
        assert_eq!(body_code("VULCAN"), None);
    }

    #[test]
    fn integer_strings() {
        assert_eq!(body_code("399"), Some(399));
        assert_eq!(body_code(" -82 "), Some(-82));
    }

    #[test]
    fn canonical_names() {
        assert_eq!(body_name(0), Some("SOLAR SYSTEM BARYCENTER"));
        assert_eq!(body_name(3), Some("EARTH BARYCENTER"));
        assert_eq!(body_name(301), Some("MOON"));
        assert_eq!(body_name(-82), None);
    }

    #[test]
    fn every_name_roundtrips_to_its_code() {
        for &(name, code) in BODY_NAMES {
            assert_eq!(body_code(name), Some(code), "{name}");
        }
    }
}
