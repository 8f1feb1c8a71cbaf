use chrono::{DateTime, Local};
use weathernow_core::{DisplayModel, StatusLine, StatusStyle, WeatherResult};

const MISSING: &str = "--";

fn local_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn weather(model: &DisplayModel, result: &WeatherResult) -> String {
    [
        format!("  {}  {}°C", model.icon.glyph(), model.temperature),
        format!("  {}", model.description),
        format!("  @ {}", model.location),
        String::new(),
        format!("  Feels like  {}°C", model.feels_like),
        format!("  Humidity    {}%", model.humidity),
        format!("  Sunrise     {}", local_time(result.sunrise)),
        format!("  Sunset      {}", local_time(result.sunset)),
    ]
    .join("\n")
}

pub fn status(line: &StatusLine) -> String {
    match line.style {
        StatusStyle::Pending => format!("… {}", line.text),
        StatusStyle::Error => format!("✗ {}", line.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use weathernow_core::present;

    #[test]
    fn weather_block_shows_floored_values() {
        let result = WeatherResult {
            name: "Paris".into(),
            country: "FR".into(),
            condition_id: 803,
            description: "broken clouds".into(),
            temperature_c: 21.9,
            feels_like_c: -0.3,
            humidity_pct: 52,
            sunrise: 0,
            sunset: 1,
        };

        let text = weather(&present(&result, Utc::now()), &result);
        assert!(text.contains("☁  21°C"));
        assert!(text.contains("broken clouds"));
        assert!(text.contains("Paris, FR"));
        assert!(text.contains("Feels like  -1°C"));
        assert!(text.contains("Humidity    52%"));
    }

    #[test]
    fn status_styles_are_distinguishable() {
        let pending = StatusLine { text: "wait".into(), style: StatusStyle::Pending };
        let error = StatusLine { text: "nope".into(), style: StatusStyle::Error };
        assert_eq!(status(&pending), "… wait");
        assert_eq!(status(&error), "✗ nope");
    }

    #[test]
    fn out_of_range_timestamp_renders_placeholder() {
        assert_eq!(local_time(i64::MAX), MISSING);
    }
}
