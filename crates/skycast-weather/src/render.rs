//! Presentation: turns a forecast bundle into the four dashboard panels.
//!
//! Panels are kept as plain text view models. Markup is produced on demand by
//! the `*_html` methods, which escape every interpolated value.

use std::fmt::Write as _;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::codes::translate;
use crate::types::{ForecastBundle, HourlyPoint};

/// Maximum number of entries in the hourly strip
pub const HOURLY_WINDOW: usize = 24;
/// Number of entries in the daily strip
pub const DAILY_WINDOW: usize = 7;

/// Hour formatting convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClockStyle {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockStyle {
    fn full_timestamp(self) -> &'static str {
        match self {
            Self::TwelveHour => "%A, %B %-d, %Y at %-I:%M %p",
            Self::TwentyFourHour => "%A, %-d %B %Y at %H:%M",
        }
    }

    fn hour_only(self) -> &'static str {
        match self {
            Self::TwelveHour => "%-I %p",
            Self::TwentyFourHour => "%H:00",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPanel {
    pub city: String,
    pub date: String,
    pub icon: &'static str,
    pub description: &'static str,
    /// Rounded °C
    pub temperature: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailsPanel {
    pub feels_like: i64,
    pub humidity: i64,
    pub cloud_cover: i64,
    /// km/h, source precision
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub label: String,
    pub icon: &'static str,
    pub temperature: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub label: String,
    pub icon: &'static str,
    pub description: &'static str,
    pub high: i64,
    pub low: i64,
}

/// Content of the four dashboard panels
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPanels {
    pub current: CurrentPanel,
    pub details: DetailsPanel,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

/// Round half up, so 18.5 -> 19 and -0.4 -> 0.
pub fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Index of the entry for the current hour. Matches on the hour-truncated
/// timestamp, falling back to the hour of day for series that start at midnight.
pub fn current_hour_index(hourly: &[HourlyPoint], now: NaiveDateTime) -> usize {
    let hour_start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    hourly
        .iter()
        .position(|p| p.time == hour_start)
        .unwrap_or(now.hour() as usize)
}

/// Build the panels. `now` is wall-clock time at the location.
pub fn render(
    bundle: &ForecastBundle,
    display_name: &str,
    now: NaiveDateTime,
    style: ClockStyle,
) -> RenderedPanels {
    let current = &bundle.current;
    let condition = translate(current.weather_code);

    let start = current_hour_index(&bundle.hourly, now);
    let hourly = bundle
        .hourly
        .iter()
        .skip(start)
        .take(HOURLY_WINDOW)
        .enumerate()
        .map(|(i, point)| HourlyEntry {
            label: if i == 0 {
                "Now".to_string()
            } else {
                point.time.format(style.hour_only()).to_string()
            },
            icon: translate(point.weather_code).icon,
            temperature: round_temperature(point.temperature),
        })
        .collect();

    let daily = bundle
        .daily
        .iter()
        .take(DAILY_WINDOW)
        .enumerate()
        .map(|(i, day)| {
            let entry = translate(day.weather_code);
            DailyEntry {
                label: if i == 0 {
                    "Today".to_string()
                } else {
                    day.date.format("%a").to_string()
                },
                icon: entry.icon,
                description: entry.description,
                high: round_temperature(day.temperature_max),
                low: round_temperature(day.temperature_min),
            }
        })
        .collect();

    RenderedPanels {
        current: CurrentPanel {
            city: display_name.to_string(),
            date: now.format(style.full_timestamp()).to_string(),
            icon: condition.icon,
            description: condition.description,
            temperature: round_temperature(current.temperature),
        },
        details: DetailsPanel {
            feels_like: round_temperature(current.apparent_temperature),
            humidity: current.humidity,
            cloud_cover: current.cloud_cover,
            wind_speed: current.wind_speed,
        },
        hourly,
        daily,
    }
}

/// Escape text for insertion into HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl RenderedPanels {
    pub fn current_html(&self) -> String {
        let c = &self.current;
        format!(
            "<div class=\"current-main\">\
             <h2 class=\"city-name\">{}</h2>\
             <p class=\"current-date\">{}</p>\
             <div class=\"current-weather\">\
             <span class=\"weather-icon\">{}</span>\
             <span class=\"temperature\">{}°C</span>\
             </div>\
             <p class=\"weather-description\">{}</p>\
             </div>",
            escape_html(&c.city),
            escape_html(&c.date),
            escape_html(c.icon),
            c.temperature,
            escape_html(c.description),
        )
    }

    pub fn details_html(&self) -> String {
        let d = &self.details;
        let items = [
            ("Feels Like", format!("{}°C", d.feels_like)),
            ("Humidity", format!("{}%", d.humidity)),
            ("Wind Speed", format!("{} km/h", d.wind_speed)),
            ("Cloud Cover", format!("{}%", d.cloud_cover)),
        ];

        let mut html = String::from("<div class=\"weather-details\">");
        for (label, value) in items {
            let _ = write!(
                html,
                "<div class=\"detail-item\"><span class=\"detail-label\">{}</span>\
                 <span class=\"detail-value\">{}</span></div>",
                escape_html(label),
                escape_html(&value),
            );
        }
        html.push_str("</div>");
        html
    }

    pub fn hourly_html(&self) -> String {
        let mut html = String::from("<div class=\"hourly-forecast\">");
        for entry in &self.hourly {
            let _ = write!(
                html,
                "<div class=\"hourly-item\"><span class=\"hourly-time\">{}</span>\
                 <span class=\"hourly-icon\">{}</span>\
                 <span class=\"hourly-temp\">{}°</span></div>",
                escape_html(&entry.label),
                escape_html(entry.icon),
                entry.temperature,
            );
        }
        html.push_str("</div>");
        html
    }

    pub fn daily_html(&self) -> String {
        let mut html = String::from("<div class=\"daily-forecast\">");
        for entry in &self.daily {
            let _ = write!(
                html,
                "<div class=\"daily-item\"><span class=\"daily-day\">{}</span>\
                 <span class=\"daily-icon\">{}</span>\
                 <span class=\"daily-desc\">{}</span>\
                 <span class=\"daily-temps\"><span class=\"high\">{}°</span>\
                 <span class=\"low\">{}°</span></span></div>",
                escape_html(&entry.label),
                escape_html(entry.icon),
                escape_html(entry.description),
                entry.high,
                entry.low,
            );
        }
        html.push_str("</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrentConditions, DailyPoint};
    use chrono::{Duration, NaiveDate};

    fn at(date: &str, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn bundle(hours: usize, days: usize) -> ForecastBundle {
        let midnight = at("2026-03-02", 0, 0);
        ForecastBundle {
            current: CurrentConditions {
                temperature: 18.4,
                apparent_temperature: 17.5,
                humidity: 62,
                cloud_cover: 40,
                wind_speed: 11.2,
                weather_code: 2,
            },
            hourly: (0..hours)
                .map(|h| HourlyPoint {
                    time: midnight + Duration::hours(h as i64),
                    weather_code: if h % 2 == 0 { 0 } else { 3 },
                    temperature: 10.0 + h as f64 / 10.0,
                })
                .collect(),
            daily: (0..days)
                .map(|d| DailyPoint {
                    date: midnight.date() + Duration::days(d as i64),
                    weather_code: 61,
                    temperature_max: 20.6,
                    temperature_min: 8.4,
                })
                .collect(),
            utc_offset_seconds: 3600,
        }
    }

    #[test]
    fn test_round_temperature() {
        assert_eq!(round_temperature(18.4), 18);
        assert_eq!(round_temperature(18.5), 19);
        assert_eq!(round_temperature(-0.4), 0);
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(-2.6), -3);
    }

    #[test]
    fn test_current_panel() {
        let panels = render(&bundle(48, 7), "Paris, France", at("2026-03-02", 14, 5), ClockStyle::TwelveHour);

        assert_eq!(panels.current.city, "Paris, France");
        assert_eq!(panels.current.temperature, 18);
        assert_eq!(panels.current.icon, "⛅");
        assert_eq!(panels.current.description, "Partly cloudy");
        assert_eq!(panels.current.date, "Monday, March 2, 2026 at 2:05 PM");
        assert_eq!(panels.details.feels_like, 18);
        assert_eq!(panels.details.humidity, 62);
        assert_eq!(panels.details.cloud_cover, 40);
    }

    #[test]
    fn test_current_panel_24h() {
        let panels = render(&bundle(48, 7), "Paris", at("2026-03-02", 14, 5), ClockStyle::TwentyFourHour);
        assert_eq!(panels.current.date, "Monday, 2 March 2026 at 14:05");
        assert_eq!(panels.hourly[1].label, "15:00");
    }

    #[test]
    fn test_hourly_window_starts_at_current_hour() {
        let panels = render(&bundle(48, 7), "x", at("2026-03-02", 14, 59), ClockStyle::TwelveHour);

        assert_eq!(panels.hourly.len(), HOURLY_WINDOW);
        assert_eq!(panels.hourly[0].label, "Now");
        assert_eq!(panels.hourly[1].label, "3 PM");
        assert_eq!(panels.hourly[10].label, "12 AM");
        // 10.0 + 14 / 10
        assert_eq!(panels.hourly[0].temperature, 11);
        assert_eq!(panels.hourly[0].icon, "☀️");
        assert_eq!(panels.hourly[1].icon, "☁️");
    }

    #[test]
    fn test_hourly_window_length_is_min_of_remaining() {
        for (len, hour) in [(48usize, 0u32), (48, 23), (30, 10), (24, 20), (10, 5), (5, 9)] {
            let panels = render(&bundle(len, 7), "x", at("2026-03-02", hour, 0), ClockStyle::TwelveHour);
            let expected = HOURLY_WINDOW.min(len.saturating_sub(hour as usize));
            assert_eq!(panels.hourly.len(), expected, "len={len} hour={hour}");
            for (i, entry) in panels.hourly.iter().enumerate() {
                assert_eq!(entry.label == "Now", i == 0);
            }
        }
    }

    #[test]
    fn test_current_hour_index_falls_back_to_hour_of_day() {
        let series = bundle(48, 7).hourly;
        assert_eq!(current_hour_index(&series, at("2026-03-03", 2, 30)), 26);
        // Date outside the series
        assert_eq!(current_hour_index(&series, at("2027-01-01", 7, 0)), 7);
    }

    #[test]
    fn test_daily_panel() {
        let panels = render(&bundle(24, 7), "x", at("2026-03-02", 9, 0), ClockStyle::TwelveHour);

        assert_eq!(panels.daily.len(), DAILY_WINDOW);
        assert_eq!(panels.daily[0].label, "Today");
        assert_eq!(panels.daily[1].label, "Tue");
        assert_eq!(panels.daily[6].label, "Sun");
        assert_eq!(panels.daily[0].high, 21);
        assert_eq!(panels.daily[0].low, 8);
        assert_eq!(panels.daily[0].description, "Slight rain");
    }

    #[test]
    fn test_daily_panel_truncates_to_seven() {
        let panels = render(&bundle(24, 16), "x", at("2026-03-02", 9, 0), ClockStyle::TwelveHour);
        assert_eq!(panels.daily.len(), DAILY_WINDOW);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert(\"x\") & 'y'</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("São Paulo, Brazil"), "São Paulo, Brazil");
    }

    #[test]
    fn test_markup_escapes_city_name() {
        let panels = render(
            &bundle(24, 7),
            "<script>alert(1)</script>",
            at("2026-03-02", 9, 0),
            ClockStyle::TwelveHour,
        );
        let html = panels.current_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<span class=\"temperature\">18°C</span>"));
    }

    #[test]
    fn test_details_markup() {
        let panels = render(&bundle(24, 7), "x", at("2026-03-02", 9, 0), ClockStyle::TwelveHour);
        let html = panels.details_html();
        assert!(html.contains("11.2 km/h"));
        assert!(html.contains("62%"));
        assert!(html.contains("40%"));
    }

    #[test]
    fn test_strip_markup_counts() {
        let panels = render(&bundle(48, 7), "x", at("2026-03-02", 9, 0), ClockStyle::TwelveHour);
        assert_eq!(panels.hourly_html().matches("class=\"hourly-item\"").count(), 24);
        assert_eq!(panels.daily_html().matches("class=\"daily-item\"").count(), 7);
    }
}
