//! WMO weather interpretation codes.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Icon and description for one weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeEntry {
    pub icon: &'static str,
    pub description: &'static str,
}

/// Returned for any code missing from the table
pub const FALLBACK: WeatherCodeEntry = WeatherCodeEntry {
    icon: "🌡️",
    description: "Unknown",
};

const fn entry(icon: &'static str, description: &'static str) -> WeatherCodeEntry {
    WeatherCodeEntry { icon, description }
}

// Sorted by code for binary search.
static WEATHER_CODES: [(i32, WeatherCodeEntry); 28] = [
    (0, entry("☀️", "Clear sky")),
    (1, entry("🌤️", "Mainly clear")),
    (2, entry("⛅", "Partly cloudy")),
    (3, entry("☁️", "Overcast")),
    (45, entry("🌫️", "Fog")),
    (48, entry("🌫️", "Depositing rime fog")),
    (51, entry("🌦️", "Light drizzle")),
    (53, entry("🌦️", "Moderate drizzle")),
    (55, entry("🌧️", "Dense drizzle")),
    (56, entry("🌨️", "Light freezing drizzle")),
    (57, entry("🌨️", "Dense freezing drizzle")),
    (61, entry("🌧️", "Slight rain")),
    (63, entry("🌧️", "Moderate rain")),
    (65, entry("🌧️", "Heavy rain")),
    (66, entry("🌨️", "Light freezing rain")),
    (67, entry("🌨️", "Heavy freezing rain")),
    (71, entry("🌨️", "Slight snow")),
    (73, entry("🌨️", "Moderate snow")),
    (75, entry("❄️", "Heavy snow")),
    (77, entry("🌨️", "Snow grains")),
    (80, entry("🌦️", "Slight rain showers")),
    (81, entry("🌧️", "Moderate rain showers")),
    (82, entry("⛈️", "Violent rain showers")),
    (85, entry("🌨️", "Slight snow showers")),
    (86, entry("❄️", "Heavy snow showers")),
    (95, entry("⛈️", "Thunderstorm")),
    (96, entry("⛈️", "Thunderstorm with slight hail")),
    (99, entry("⛈️", "Thunderstorm with heavy hail")),
];

/// Translate a weather code. Unknown codes map to [`FALLBACK`].
pub fn translate(code: i32) -> WeatherCodeEntry {
    WEATHER_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .map(|idx| WEATHER_CODES[idx].1)
        .unwrap_or(FALLBACK)
}

/// Whether the code has its own table entry
pub fn is_known(code: i32) -> bool {
    WEATHER_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        assert!(WEATHER_CODES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_clear_sky() {
        assert_eq!(translate(0).icon, "☀️");
        assert_eq!(translate(0).description, "Clear sky");
    }

    #[test]
    fn test_partly_cloudy() {
        assert_eq!(translate(2).icon, "⛅");
        assert_eq!(translate(2).description, "Partly cloudy");
    }

    #[test]
    fn test_fog() {
        assert_eq!(translate(45).icon, "🌫️");
        assert_eq!(translate(48).description, "Depositing rime fog");
    }

    #[test]
    fn test_thunderstorm() {
        assert_eq!(translate(95).icon, "⛈️");
        assert_eq!(translate(99).description, "Thunderstorm with heavy hail");
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        for code in [-1, 4, 44, 100, 999, i32::MIN, i32::MAX] {
            assert!(!is_known(code));
            assert_eq!(translate(code), FALLBACK);
        }
        assert_eq!(FALLBACK.icon, "🌡️");
        assert_eq!(FALLBACK.description, "Unknown");
    }

    #[test]
    fn test_known_codes_are_stable() {
        for (code, expected) in WEATHER_CODES.iter() {
            assert!(is_known(*code));
            assert_eq!(translate(*code), *expected);
            assert_eq!(translate(*code), translate(*code));
        }
    }
}
