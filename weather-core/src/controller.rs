//! Lookup lifecycle: one shared state record, two ways to start a lookup.
//!
//! Every dispatched lookup takes a sequence number. When a response arrives
//! for a lookup that is no longer the latest one issued, it is dropped, so
//! overlapping lookups always settle on the one the user asked for last.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    geolocation::{GeolocationError, Geolocator, geolocator_from_config},
    model::{LookupInput, LookupState},
    provider::{FetchError, ProviderReply, WeatherProvider, provider_from_config},
};

pub const PENDING_MESSAGE: &str = "Getting weather details...";
pub const API_ERROR_MESSAGE: &str = "Something went wrong, API Error";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Your device does not support geolocation")]
    GeolocationUnsupported,
}

#[derive(Debug, Default)]
struct Inner {
    state: LookupState,
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

#[derive(Debug)]
pub struct WeatherQueryController {
    provider: Box<dyn WeatherProvider>,
    geolocator: Option<Box<dyn Geolocator>>,
    inner: Mutex<Inner>,
}

impl WeatherQueryController {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        geolocator: Option<Box<dyn Geolocator>>,
    ) -> Self {
        Self { provider, geolocator, inner: Mutex::new(Inner::default()) }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(provider_from_config(config), geolocator_from_config(config))
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> LookupState {
        self.lock().state.clone()
    }

    pub fn set_query(&self, text: &str) {
        self.lock().state.query = text.to_string();
    }

    /// Look up weather by place name. Empty names are ignored.
    pub async fn submit_by_name(&self, name: &str) {
        if name.trim().is_empty() {
            debug!("ignoring empty place name");
            return;
        }

        self.set_query(name);
        self.lookup(LookupInput::Name(name.to_string())).await;
    }

    /// Look up weather at the device position.
    ///
    /// A missing capability is returned as an error and leaves the state
    /// untouched. A failed position request is reported through the status
    /// message instead. The lookup is sequenced when requested, so a position
    /// that arrives after a newer lookup was issued is dropped.
    pub async fn submit_by_location(&self) -> Result<(), ControllerError> {
        let Some(geolocator) = &self.geolocator else {
            warn!("location lookup requested but no geolocation capability is available");
            return Err(ControllerError::GeolocationUnsupported);
        };

        let ticket = self.begin();

        match geolocator.current_position().await {
            Ok(position) => self.fetch_for(ticket, LookupInput::Coordinates(position)).await,
            Err(err) => self.settle_position_error(ticket, err),
        }

        Ok(())
    }

    /// Drop the shown result and return to input mode. The typed query stays.
    pub fn reset(&self) {
        self.lock().state.result = None;
    }

    async fn lookup(&self, input: LookupInput) {
        let ticket = self.begin();
        self.fetch_for(ticket, input).await;
    }

    async fn fetch_for(&self, ticket: Ticket, input: LookupInput) {
        if !self.is_latest(ticket) {
            debug!(seq = ticket.0, "lookup superseded before dispatch");
            return;
        }
        debug!(seq = ticket.0, lookup = %input.label(), "dispatching lookup");

        let outcome = self.provider.fetch(&input).await;
        self.settle(ticket, &input, outcome);
    }

    fn begin(&self) -> Ticket {
        let mut inner = self.lock();
        inner.latest += 1;
        inner.state.loading = true;
        inner.state.status_message = PENDING_MESSAGE.to_string();
        Ticket(inner.latest)
    }

    fn is_latest(&self, ticket: Ticket) -> bool {
        self.lock().latest == ticket.0
    }

    fn settle_position_error(&self, ticket: Ticket, err: GeolocationError) {
        let mut inner = self.lock();

        if ticket.0 != inner.latest {
            debug!(seq = ticket.0, latest = inner.latest, "discarding stale position error");
            return;
        }

        warn!(error = %err, "failed to get device position");
        inner.state.loading = false;
        inner.state.status_message = err.to_string();
    }

    fn settle(&self, ticket: Ticket, input: &LookupInput, outcome: Result<ProviderReply, FetchError>) {
        let mut inner = self.lock();

        if ticket.0 != inner.latest {
            debug!(seq = ticket.0, latest = inner.latest, "discarding stale lookup response");
            return;
        }

        let state = &mut inner.state;
        state.loading = false;

        match outcome {
            Ok(ProviderReply::Found(result)) => {
                info!(place = %result.name, country = %result.country, "weather updated");
                state.result = Some(result);
                state.status_message.clear();
            }
            Ok(ProviderReply::NotFound { code, message }) => {
                warn!(%code, reason = ?message, lookup = %input.label(), "provider rejected lookup");
                let label = match input {
                    LookupInput::Name(name) => name.clone(),
                    LookupInput::Coordinates(_) if !state.query.is_empty() => state.query.clone(),
                    LookupInput::Coordinates(coords) => coords.to_string(),
                };
                state.status_message = format!("{label} isn't a valid city name");
            }
            Err(err) => {
                warn!(error = %err, "weather lookup failed");
                state.status_message = API_ERROR_MESSAGE.to_string();
            }
        }
    }
}
