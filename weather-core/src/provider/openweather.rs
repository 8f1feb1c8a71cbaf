use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::model::{LookupInput, WeatherResult};

use super::{FetchError, ProviderReply, WeatherProvider};

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            http: Client::new(),
        }
    }

    fn query_params(&self, input: &LookupInput) -> Vec<(&'static str, String)> {
        let mut params = match input {
            LookupInput::Name(name) => vec![("q", name.clone())],
            LookupInput::Coordinates(c) => {
                vec![("lat", c.latitude.to_string()), ("lon", c.longitude.to_string())]
            }
        };
        params.push(("units", "metric".to_string()));
        params.push(("appid", self.api_key.clone()));
        params
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_result(self) -> Result<WeatherResult, FetchError> {
        let primary = self
            .weather
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("weather conditions"))?;

        Ok(WeatherResult {
            name: self.name,
            country: self.sys.country,
            condition_id: primary.id,
            description: primary.description,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity_pct: self.main.humidity,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
        })
    }
}

/// Classify a response body by its embedded `cod`.
///
/// The HTTP status is not consulted: the provider sends JSON error bodies
/// alongside 4xx statuses, and only the payload decides the outcome. `cod`
/// must be the number 200 to count as success; anything else, including the
/// string `"404"` the provider uses for unknown cities, is a not-found reply.
pub fn interpret_body(body: &str) -> Result<ProviderReply, FetchError> {
    let raw: Value = serde_json::from_str(body)?;

    if raw.get("cod").and_then(Value::as_i64) == Some(200) {
        let parsed: OwCurrentResponse = serde_json::from_value(raw)?;
        return Ok(ProviderReply::Found(parsed.into_result()?));
    }

    let code = match raw.get("cod") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let message = raw.get("message").and_then(Value::as_str).map(str::to_owned);

    Ok(ProviderReply::NotFound { code, message })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, input: &LookupInput) -> Result<ProviderReply, FetchError> {
        debug!(lookup = %input.label(), "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(input))
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "received provider response");

        interpret_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;

    const PARIS: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [
            {"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"},
            {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}
        ],
        "main": {"temp": 21.9, "feels_like": 21.4, "temp_min": 20.1, "temp_max": 23.0,
                 "pressure": 1015, "humidity": 52},
        "sys": {"type": 2, "id": 2041230, "country": "FR",
                "sunrise": 1718250000, "sunset": 1718308800},
        "timezone": 7200,
        "name": "Paris",
        "cod": 200
    }"#;

    #[test]
    fn success_payload_is_normalized_from_primary_condition() {
        let reply = interpret_body(PARIS).expect("valid payload");
        let ProviderReply::Found(result) = reply else {
            panic!("expected Found, got {reply:?}");
        };

        assert_eq!(result.name, "Paris");
        assert_eq!(result.country, "FR");
        assert_eq!(result.condition_id, 803);
        assert_eq!(result.description, "broken clouds");
        assert_eq!(result.temperature_c, 21.9);
        assert_eq!(result.feels_like_c, 21.4);
        assert_eq!(result.humidity_pct, 52);
        assert_eq!(result.sunrise, 1718250000);
        assert_eq!(result.sunset, 1718308800);
    }

    #[test]
    fn string_cod_is_not_found() {
        let reply = interpret_body(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(
            reply,
            ProviderReply::NotFound {
                code: "404".into(),
                message: Some("city not found".into())
            }
        );
    }

    #[test]
    fn numeric_error_cod_is_not_found() {
        let reply = interpret_body(r#"{"cod":401,"message":"Invalid API key."}"#).unwrap();
        assert!(matches!(reply, ProviderReply::NotFound { ref code, .. } if code == "401"));
    }

    #[test]
    fn string_200_is_not_treated_as_success() {
        let reply = interpret_body(r#"{"cod":"200"}"#).unwrap();
        assert!(matches!(reply, ProviderReply::NotFound { .. }));
    }

    #[test]
    fn missing_cod_is_not_found() {
        let reply = interpret_body("{}").unwrap();
        assert_eq!(reply, ProviderReply::NotFound { code: String::new(), message: None });
    }

    #[test]
    fn non_json_body_is_parse_error() {
        let err = interpret_body("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn success_without_main_is_parse_error() {
        let err = interpret_body(r#"{"cod":200,"name":"X","weather":[],"sys":{}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn success_without_conditions_is_missing_field() {
        let body = r#"{
            "cod": 200, "name": "Nowhere", "weather": [],
            "main": {"temp": 1.0, "feels_like": 0.0, "humidity": 10},
            "sys": {"country": "XX", "sunrise": 1, "sunset": 2}
        }"#;
        let err = interpret_body(body).unwrap_err();
        assert!(matches!(err, FetchError::MissingField(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let provider = OpenWeatherProvider::with_endpoint("KEY", "http://127.0.0.1:1/");
        let err = provider.fetch(&LookupInput::Name("Paris".into())).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn name_query_carries_metric_units_and_key() {
        let provider = OpenWeatherProvider::new("SECRET");
        let params = provider.query_params(&LookupInput::Name("Paris".into()));
        assert_eq!(
            params,
            vec![
                ("q", "Paris".to_string()),
                ("units", "metric".to_string()),
                ("appid", "SECRET".to_string()),
            ]
        );
    }

    #[test]
    fn coordinate_query_uses_lat_lon() {
        let provider = OpenWeatherProvider::new("");
        let params =
            provider.query_params(&LookupInput::Coordinates(Coordinates::new(59.91, 10.75)));
        assert_eq!(params[0], ("lat", "59.91".to_string()));
        assert_eq!(params[1], ("lon", "10.75".to_string()));
        assert!(params.contains(&("appid", String::new())));
    }
}
