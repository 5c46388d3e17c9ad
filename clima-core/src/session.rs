//! Search controller shared by the three dashboard views.
//!
//! Every search takes a fresh generation number. A search whose generation
//! is no longer the latest when its responses arrive is reported as
//! [`SearchOutcome::Superseded`] and leaves no trace in the store.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use crate::{
    assemble::{self, AirQualityView, CurrentView, HistoricalView},
    classify::{self, Background, Theme},
    config::Config,
    error::{ClimaError, Feed},
    geocoder,
    model::{CurrentConditions, Location},
    provider::OpenMeteoApi,
    store::{self, KeyValueStore},
};

#[derive(Debug)]
pub enum SearchOutcome<V> {
    Ready(V),
    Failed(ClimaError),
    /// A newer search was issued while this one was in flight.
    Superseded,
}

impl<V> SearchOutcome<V> {
    pub fn ready(self) -> Option<V> {
        match self {
            SearchOutcome::Ready(view) => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard<A, S> {
    api: A,
    store: S,
    default_city: String,
    hourly_rows: usize,
    generation: AtomicU64,
}

impl<A: OpenMeteoApi, S: KeyValueStore> Dashboard<A, S> {
    pub fn new(api: A, store: S, config: &Config) -> Self {
        Self {
            api,
            store,
            default_city: config.default_city().to_string(),
            hourly_rows: config.hourly_rows,
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn issue(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, error = %err, "Failed to persist dashboard state");
        }
    }

    /// Last searched city, or the configured default.
    pub fn last_city(&self) -> String {
        self.store
            .get(store::LAST_CITY)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.default_city.clone())
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(store::THEME)
            .map(|t| Theme::parse(&t))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.persist(store::THEME, theme.as_str());
    }

    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    /// Background for the secondary views, from the conditions the weather
    /// view last saw. `None` until all three values have been recorded.
    pub fn stored_background(&self) -> Option<Background> {
        let code: i32 = self.store.get(store::LAST_WEATHER_CODE)?.parse().ok()?;
        let wind: f64 = self.store.get(store::LAST_WIND_SPEED)?.parse().ok()?;
        let _is_day: u8 = self.store.get(store::LAST_IS_DAY)?.parse().ok()?;
        Some(classify::background_from_last_conditions(code, wind, self.theme()))
    }

    /// Overwrites all three keys so they always describe one search; a
    /// missing field is stored empty and fails the parse in
    /// `stored_background`.
    fn remember_conditions(&self, conditions: &CurrentConditions) {
        let code = conditions.weather_code.map(|c| c.to_string()).unwrap_or_default();
        let wind = conditions.wind_speed_kmh.map(|w| w.to_string()).unwrap_or_default();
        let is_day = match conditions.is_day {
            Some(true) => "1",
            Some(false) => "0",
            None => "",
        };
        self.persist(store::LAST_WEATHER_CODE, &code);
        self.persist(store::LAST_WIND_SPEED, &wind);
        self.persist(store::LAST_IS_DAY, is_day);
    }

    /// Shared front half of every search: new generation, remember the city, geocode.
    async fn locate(&self, city: &str) -> (u64, Result<Location, ClimaError>) {
        let generation = self.issue();
        let trimmed = city.trim();
        if !trimmed.is_empty() {
            self.persist(store::LAST_CITY, trimmed);
        }
        debug!(generation, city = trimmed, "Search issued");

        (generation, geocoder::resolve(&self.api, trimmed).await)
    }

    fn settle<V>(&self, generation: u64, result: Result<V, ClimaError>) -> SearchOutcome<V> {
        if !self.is_current(generation) {
            debug!(generation, "Discarding superseded search");
            return SearchOutcome::Superseded;
        }
        match result {
            Ok(view) => SearchOutcome::Ready(view),
            Err(err) => {
                warn!(generation, error = %err, "Search failed");
                SearchOutcome::Failed(err)
            }
        }
    }

    pub async fn search_weather(&self, city: &str, now: DateTime<Utc>) -> SearchOutcome<CurrentView> {
        let (generation, located) = self.locate(city).await;
        let location = match located {
            Ok(location) => location,
            Err(err) => return self.settle(generation, Err(err)),
        };

        let result = match self.api.forecast(&location).await {
            Ok(response) => {
                assemble::assemble_current_view(&response, &location, now, self.hourly_rows)
            }
            Err(err) => Err(ClimaError::network(Feed::Weather, &err)),
        };

        let outcome = self.settle(generation, result);
        if let SearchOutcome::Ready(view) = &outcome {
            self.remember_conditions(&view.conditions);
        }
        outcome
    }

    pub async fn search_air_quality(
        &self,
        city: &str,
        now: DateTime<Utc>,
    ) -> SearchOutcome<AirQualityView> {
        let (generation, located) = self.locate(city).await;
        let location = match located {
            Ok(location) => location,
            Err(err) => return self.settle(generation, Err(err)),
        };

        let result = match self.api.air_quality(&location).await {
            Ok(response) => assemble::assemble_air_quality_view(&response, &location, now),
            Err(err) => Err(ClimaError::network(Feed::AirQuality, &err)),
        };

        self.settle(generation, result)
    }

    /// Weather on `date` (yesterday when `None`). Dates after yesterday are
    /// rejected before anything is fetched.
    pub async fn search_history(
        &self,
        city: &str,
        date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> SearchOutcome<HistoricalView> {
        let yesterday = latest_archive_date(now);
        let date = date.unwrap_or(yesterday);
        if date > yesterday {
            return SearchOutcome::Failed(ClimaError::invalid_input(format!(
                "A data deve ser no máximo {}.",
                yesterday.format("%Y-%m-%d")
            )));
        }

        let (generation, located) = self.locate(city).await;
        let location = match located {
            Ok(location) => location,
            Err(err) => return self.settle(generation, Err(err)),
        };

        let result = match self.api.archive(&location, date).await {
            Ok(response) => assemble::assemble_historical_view(&response, &location, date),
            Err(err) => Err(ClimaError::network(Feed::Historical, &err)),
        };

        self.settle(generation, result)
    }
}

/// The archive only covers days that are already over.
pub fn latest_archive_date(now: DateTime<Utc>) -> NaiveDate {
    (now - Duration::days(1)).date_naive()
}
