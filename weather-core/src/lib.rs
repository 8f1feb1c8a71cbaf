//! Core library for the `weathernow` client.
//!
//! This crate defines:
//! - The lookup controller and the state it owns
//! - The weather provider client and its response classification
//! - Device geolocation capabilities
//! - Derivation of display values from a successful result
//! - Configuration & credentials handling
//!
//! It is used by the `weathernow` binary, but has no terminal dependencies of
//! its own.

pub mod config;
pub mod controller;
pub mod geolocation;
pub mod model;
pub mod presenter;
pub mod provider;

pub use config::{Config, GeolocationConfig};
pub use controller::{ControllerError, WeatherQueryController};
pub use geolocation::{GeolocationError, Geolocator};
pub use model::{Coordinates, LookupInput, LookupState, Mode, StatusLine, StatusStyle, WeatherResult};
pub use presenter::{DisplayModel, Icon, present, present_now};
pub use provider::{FetchError, ProviderReply, WeatherProvider};
