//! Core library for the `clima` weather dashboard.
//!
//! This crate defines:
//! - Geocoding and the Open-Meteo fetchers
//! - Time-series indexing and the classification tables
//! - View models for the weather, air-quality and historical views
//! - Configuration and the persisted dashboard state
//!
//! It is used by `clima-cli`, but any other renderer can drive [`Dashboard`].

pub mod assemble;
pub mod classify;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod locale;
pub mod model;
pub mod provider;
pub mod response;
pub mod session;
pub mod store;
pub mod timeseries;

#[cfg(test)]
mod testing;

pub use assemble::{AirQualityView, CurrentView, HistoricalView};
pub use classify::{Background, IconKey, Theme};
pub use config::Config;
pub use error::{ClimaError, DataGap, Feed};
pub use model::{AirQualitySample, ClassificationResult, CurrentConditions, Location};
pub use provider::{OpenMeteoApi, OpenMeteoClient};
pub use session::{Dashboard, SearchOutcome};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use timeseries::TimeSeries;
