use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    model::Location,
    response::{AirQualityResponse, ArchiveResponse, ForecastResponse, GeocodingResponse},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

/// Raw access to the Open-Meteo services. Implementations only fetch and
/// decode; interpreting the payloads is the assembler's job.
#[async_trait]
pub trait OpenMeteoApi: Send + Sync + Debug {
    async fn geocode(&self, name: &str) -> anyhow::Result<GeocodingResponse>;

    async fn forecast(&self, location: &Location) -> anyhow::Result<ForecastResponse>;

    async fn air_quality(&self, location: &Location) -> anyhow::Result<AirQualityResponse>;

    async fn archive(&self, location: &Location, date: NaiveDate)
    -> anyhow::Result<ArchiveResponse>;
}
