//! Display values derived from a [`WeatherResult`]. Pure and stateless.

use chrono::{DateTime, Utc};

use crate::model::WeatherResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    ClearDay,
    ClearNight,
    Thunderstorm,
    Snow,
    Mist,
    Cloud,
    Rain,
    None,
}

impl Icon {
    pub fn asset_path(&self) -> &'static str {
        match self {
            Icon::ClearDay => "/icons/sunny.png",
            Icon::ClearNight => "/icons/clear-night.png",
            Icon::Thunderstorm => "/icons/thunderstorm.png",
            Icon::Snow => "/icons/snow.png",
            Icon::Mist => "/icons/mist.png",
            Icon::Cloud => "/icons/cloud.png",
            Icon::Rain => "/icons/rain.png",
            Icon::None => "",
        }
    }

    /// Terminal rendition of the icon.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::ClearDay => "☀",
            Icon::ClearNight => "☾",
            Icon::Thunderstorm => "⛈",
            Icon::Snow => "❄",
            Icon::Mist => "≋",
            Icon::Cloud => "☁",
            Icon::Rain => "☂",
            Icon::None => " ",
        }
    }
}

struct IconRule {
    matches: fn(i64) -> bool,
    day: Icon,
    night: Icon,
}

// First match wins; order matters.
const ICON_RULES: &[IconRule] = &[
    IconRule { matches: |id| id == 800, day: Icon::ClearDay, night: Icon::ClearNight },
    IconRule { matches: |id| (200..=232).contains(&id), day: Icon::Thunderstorm, night: Icon::Thunderstorm },
    IconRule { matches: |id| (600..=622).contains(&id), day: Icon::Snow, night: Icon::Snow },
    IconRule { matches: |id| (701..=781).contains(&id), day: Icon::Mist, night: Icon::Mist },
    IconRule { matches: |id| (801..=804).contains(&id), day: Icon::Cloud, night: Icon::Cloud },
    IconRule {
        matches: |id| (500..=531).contains(&id) || (300..=321).contains(&id),
        day: Icon::Rain,
        night: Icon::Rain,
    },
];

/// Daytime is the half-open interval `[sunrise, sunset)`, in epoch seconds.
pub fn is_daytime(now: i64, sunrise: i64, sunset: i64) -> bool {
    now >= sunrise && now < sunset
}

pub fn select_icon(condition_id: i64, daytime: bool) -> Icon {
    ICON_RULES
        .iter()
        .find(|rule| (rule.matches)(condition_id))
        .map(|rule| if daytime { rule.day } else { rule.night })
        .unwrap_or(Icon::None)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub icon: Icon,
    pub is_daytime: bool,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: u8,
    pub description: String,
    pub location: String,
}

/// `now` is the render time, not the fetch time.
pub fn present(result: &WeatherResult, now: DateTime<Utc>) -> DisplayModel {
    let daytime = is_daytime(now.timestamp(), result.sunrise, result.sunset);

    DisplayModel {
        icon: select_icon(result.condition_id, daytime),
        is_daytime: daytime,
        temperature: result.temperature_c.floor() as i64,
        feels_like: result.feels_like_c.floor() as i64,
        humidity: result.humidity_pct,
        description: result.description.clone(),
        location: format!("{}, {}", result.name, result.country),
    }
}

pub fn present_now(result: &WeatherResult) -> DisplayModel {
    present(result, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUNRISE: i64 = 1_718_250_000;
    const SUNSET: i64 = 1_718_308_800;

    fn result(id: i64, temp: f64, feels_like: f64) -> WeatherResult {
        WeatherResult {
            name: "Paris".into(),
            country: "FR".into(),
            condition_id: id,
            description: "whatever".into(),
            temperature_c: temp,
            feels_like_c: feels_like,
            humidity_pct: 64,
            sunrise: SUNRISE,
            sunset: SUNSET,
        }
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).expect("valid timestamp")
    }

    #[test]
    fn clear_sky_depends_on_daytime() {
        assert_eq!(select_icon(800, true), Icon::ClearDay);
        assert_eq!(select_icon(800, false), Icon::ClearNight);
    }

    #[test]
    fn condition_groups_map_to_icons() {
        assert_eq!(select_icon(210, true), Icon::Thunderstorm);
        assert_eq!(select_icon(600, false), Icon::Snow);
        assert_eq!(select_icon(520, true), Icon::Rain);
        assert_eq!(select_icon(311, false), Icon::Rain);
        assert_eq!(select_icon(741, true), Icon::Mist);
    }

    #[test]
    fn clouds_ignore_daytime() {
        for id in 801..=804 {
            assert_eq!(select_icon(id, true), Icon::Cloud);
            assert_eq!(select_icon(id, false), Icon::Cloud);
        }
    }

    #[test]
    fn unmapped_codes_have_no_icon() {
        for id in [999, 0, 199, 233, 400, 532, 623, 700, 782, 805] {
            assert_eq!(select_icon(id, true), Icon::None, "id {id}");
        }
        assert_eq!(Icon::None.asset_path(), "");
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(select_icon(200, true), Icon::Thunderstorm);
        assert_eq!(select_icon(232, true), Icon::Thunderstorm);
        assert_eq!(select_icon(622, true), Icon::Snow);
        assert_eq!(select_icon(701, true), Icon::Mist);
        assert_eq!(select_icon(781, true), Icon::Mist);
        assert_eq!(select_icon(500, true), Icon::Rain);
        assert_eq!(select_icon(531, true), Icon::Rain);
        assert_eq!(select_icon(300, true), Icon::Rain);
        assert_eq!(select_icon(321, true), Icon::Rain);
    }

    #[test]
    fn daytime_is_half_open() {
        assert!(is_daytime(SUNRISE, SUNRISE, SUNSET));
        assert!(is_daytime(SUNSET - 1, SUNRISE, SUNSET));
        assert!(!is_daytime(SUNSET, SUNRISE, SUNSET));
        assert!(!is_daytime(SUNRISE - 1, SUNRISE, SUNSET));
    }

    #[test]
    fn temperatures_are_floored() {
        let model = present(&result(800, 21.9, -0.3), at(SUNRISE + 60));
        assert_eq!(model.temperature, 21);
        assert_eq!(model.feels_like, -1);
        assert_eq!(model.humidity, 64);
    }

    #[test]
    fn present_uses_render_time_for_icon() {
        let r = result(800, 10.0, 10.0);

        let noon = present(&r, at(SUNRISE + 3600));
        assert!(noon.is_daytime);
        assert_eq!(noon.icon, Icon::ClearDay);

        let night = present(&r, at(SUNSET + 3600));
        assert!(!night.is_daytime);
        assert_eq!(night.icon, Icon::ClearNight);
        assert_eq!(night.icon.asset_path(), "/icons/clear-night.png");
    }

    #[test]
    fn location_joins_name_and_country() {
        let model = present(&result(500, 5.0, 3.0), at(SUNRISE));
        assert_eq!(model.location, "Paris, FR");
        assert_eq!(model.description, "whatever");
    }
}
