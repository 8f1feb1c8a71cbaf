use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// What a single lookup is keyed by.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupInput {
    Name(String),
    Coordinates(Coordinates),
}

impl LookupInput {
    /// Human-readable form used in status messages.
    pub fn label(&self) -> String {
        match self {
            LookupInput::Name(name) => name.clone(),
            LookupInput::Coordinates(coords) => coords.to_string(),
        }
    }
}

/// Normalized snapshot of a successful provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    pub country: String,
    pub condition_id: i64,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    /// Epoch seconds.
    pub sunrise: i64,
    /// Epoch seconds.
    pub sunset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No result held, nothing in flight.
    Input,
    /// No result held, a lookup is in flight.
    Loading,
    /// A result is held.
    Showing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Pending,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub style: StatusStyle,
}

/// Mutable record of the lookup lifecycle, owned by the controller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupState {
    pub query: String,
    pub loading: bool,
    pub status_message: String,
    pub result: Option<WeatherResult>,
}

impl LookupState {
    pub fn mode(&self) -> Mode {
        match (&self.result, self.loading) {
            (Some(_), _) => Mode::Showing,
            (None, true) => Mode::Loading,
            (None, false) => Mode::Input,
        }
    }

    /// The status line is only shown in input mode, and only when there is
    /// something to say.
    pub fn status(&self) -> Option<StatusLine> {
        if self.result.is_some() || self.status_message.is_empty() {
            return None;
        }

        let style = if self.loading { StatusStyle::Pending } else { StatusStyle::Error };
        Some(StatusLine { text: self.status_message.clone(), style })
    }
}
