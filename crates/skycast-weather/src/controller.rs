//! View state controller: drives resolve -> fetch -> render and owns the
//! single visible panel plus the persisted last city.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::geocode::Geocoder;
use crate::location::LocationProvider;
use crate::provider::ForecastSource;
use crate::render::{render, ClockStyle, RenderedPanels};
use crate::storage::{KeyValueStore, LAST_CITY_KEY};
use crate::types::{ForecastBundle, Location, WeatherError};

/// Which panel is presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading,
    Error(String),
    Content,
}

/// The four mutually exclusive panels of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Placeholder,
    Loading,
    Error,
    Content,
}

impl Panel {
    pub const ALL: [Panel; 4] = [Panel::Placeholder, Panel::Loading, Panel::Error, Panel::Content];
}

impl ViewState {
    pub fn visible_panel(&self) -> Panel {
        match self {
            Self::Idle => Panel::Placeholder,
            Self::Loading => Panel::Loading,
            Self::Error(_) => Panel::Error,
            Self::Content => Panel::Content,
        }
    }
}

/// UI side of the controller. Called on every transition.
pub trait PanelView: Send {
    /// `panels` is `Some` only in [`ViewState::Content`].
    fn show(&mut self, state: &ViewState, panels: Option<&RenderedPanels>);
}

/// Wall clock used for the current timestamp and hour window
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

/// Handle for one search. Completing a ticket from a superseded search is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    generation: u64,
    request: Option<SearchRequest>,
}

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of a successful resolve + fetch
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub location: Location,
    pub bundle: ForecastBundle,
}

pub struct WeatherController {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastSource>,
    store: Box<dyn KeyValueStore>,
    view: Box<dyn PanelView>,
    clock: Arc<dyn Clock>,
    clock_style: ClockStyle,
    state: ViewState,
    panels: Option<RenderedPanels>,
    generation: u64,
}

impl WeatherController {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecasts: Arc<dyn ForecastSource>,
        store: Box<dyn KeyValueStore>,
        view: Box<dyn PanelView>,
    ) -> Self {
        Self {
            geocoder,
            forecasts,
            store,
            view,
            clock: Arc::new(SystemClock),
            clock_style: ClockStyle::default(),
            state: ViewState::Idle,
            panels: None,
            generation: 0,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_clock_style(mut self, style: ClockStyle) -> Self {
        self.clock_style = style;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Panels of the last successful search, present only in Content
    pub fn panels(&self) -> Option<&RenderedPanels> {
        self.panels.as_ref()
    }

    pub fn last_city(&self) -> Option<String> {
        self.store
            .get(LAST_CITY_KEY)
            .filter(|city| !city.trim().is_empty())
    }

    /// Present the initial placeholder, then search the persisted city if any.
    pub async fn start(&mut self) {
        self.transition(ViewState::Idle, None);

        if let Some(city) = self.last_city() {
            tracing::info!("Resuming last searched city: {}", city);
            self.submit_city(&city).await;
        }
    }

    /// Search by city name. Blank input is ignored.
    pub async fn submit_city(&mut self, text: &str) {
        let city = text.trim();
        if city.is_empty() {
            tracing::debug!("Ignoring blank city submission");
            return;
        }

        let request = SearchRequest::City(city.to_string());
        let ticket = self.begin(Some(request.clone()));
        let outcome = self.execute(&request).await;
        self.complete(ticket, outcome);
    }

    /// Search by the device position reported by `provider`
    pub async fn request_geolocation(&mut self, provider: &dyn LocationProvider) {
        let ticket = self.begin(None);

        let outcome = match provider.current_position().await {
            Ok((latitude, longitude)) => {
                self.execute(&SearchRequest::Coordinates {
                    latitude,
                    longitude,
                })
                .await
            }
            Err(e) => Err(WeatherError::Location(e)),
        };

        self.complete(ticket, outcome);
    }

    /// Enter Loading for a new search and supersede any search in flight.
    /// `request` is `None` while the device position is still being acquired.
    pub fn begin(&mut self, request: Option<SearchRequest>) -> SearchTicket {
        self.generation += 1;
        tracing::info!(generation = self.generation, ?request, "Search started");
        self.transition(ViewState::Loading, None);

        SearchTicket {
            generation: self.generation,
            request,
        }
    }

    /// Resolve the location and fetch its forecast. Touches no controller state.
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchOutcome, WeatherError> {
        let location = match request {
            SearchRequest::City(city) => self.geocoder.resolve_by_name(city).await?,
            SearchRequest::Coordinates {
                latitude,
                longitude,
            } => {
                self.geocoder
                    .resolve_by_coordinates(*latitude, *longitude)
                    .await?
            }
        };

        let bundle = self
            .forecasts
            .fetch_forecast(location.latitude, location.longitude)
            .await?;

        Ok(SearchOutcome { location, bundle })
    }

    /// Apply the outcome of a search. Returns false if the ticket was superseded.
    pub fn complete(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<SearchOutcome, WeatherError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Dropping superseded search result"
            );
            return false;
        }

        match outcome {
            Ok(outcome) => {
                let now = self.location_now(&outcome.bundle);
                let panels = render(
                    &outcome.bundle,
                    &outcome.location.display_name,
                    now,
                    self.clock_style,
                );

                if let Some(SearchRequest::City(city)) = &ticket.request {
                    if let Err(e) = self.store.set(LAST_CITY_KEY, city) {
                        tracing::warn!("Failed to persist last city: {}", e);
                    }
                }

                tracing::info!("Weather data fetched for {}", outcome.location.display_name);
                self.transition(ViewState::Content, Some(panels));
            }
            Err(e) => {
                tracing::error!("Failed to fetch weather: {}", e);
                self.transition(ViewState::Error(e.user_message().to_string()), None);
            }
        }

        true
    }

    fn location_now(&self, bundle: &ForecastBundle) -> NaiveDateTime {
        let offset = Duration::seconds(i64::from(bundle.utc_offset_seconds));
        (self.clock.now() + offset).naive_utc()
    }

    fn transition(&mut self, state: ViewState, panels: Option<RenderedPanels>) {
        tracing::debug!(from = ?self.state, to = ?state, "View transition");
        self.state = state;
        self.panels = panels;
        self.view.show(&self.state, self.panels.as_ref());
    }
}
