use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    config::{Config, Endpoints},
    model::Location,
    response::{AirQualityResponse, ArchiveResponse, ForecastResponse, GeocodingResponse},
};

use super::OpenMeteoApi;

const CURRENT_VARS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,weather_code,surface_pressure,wind_speed_10m";
const HOURLY_VARS: &str = "temperature_2m,weather_code,is_day";
const DAILY_VARS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset,precipitation_probability_max,wind_speed_10m_max";
const AIR_QUALITY_VARS: &str = "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,ozone,european_aqi";
const ARCHIVE_DAILY_VARS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,wind_speed_10m_max";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    endpoints: Endpoints,
    language: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(endpoints: Endpoints, language: String) -> Self {
        Self {
            endpoints,
            language,
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.endpoints.clone(), config.language.clone())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(what, url, ?query, "Open-Meteo request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to Open-Meteo ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }
}

type Query = Vec<(&'static str, String)>;

fn coordinates(location: &Location) -> [(&'static str, String); 2] {
    [
        ("latitude", location.latitude.to_string()),
        ("longitude", location.longitude.to_string()),
    ]
}

fn geocode_query(name: &str, language: &str) -> Query {
    vec![
        ("name", name.to_string()),
        ("count", "1".to_string()),
        ("language", language.to_string()),
        ("format", "json".to_string()),
    ]
}

fn forecast_query(location: &Location) -> Query {
    let mut query = coordinates(location).to_vec();
    query.extend([
        ("current", CURRENT_VARS.to_string()),
        ("hourly", HOURLY_VARS.to_string()),
        ("daily", DAILY_VARS.to_string()),
        ("wind_speed_unit", "kmh".to_string()),
        ("timezone", "auto".to_string()),
    ]);
    query
}

fn air_quality_query(location: &Location) -> Query {
    let mut query = coordinates(location).to_vec();
    query.extend([
        ("hourly", AIR_QUALITY_VARS.to_string()),
        ("timezone", "auto".to_string()),
    ]);
    query
}

/// A single archived day: start and end are the same date.
fn archive_query(location: &Location, date: NaiveDate) -> Query {
    let day = date.format("%Y-%m-%d").to_string();
    let mut query = coordinates(location).to_vec();
    query.extend([
        ("start_date", day.clone()),
        ("end_date", day),
        ("daily", ARCHIVE_DAILY_VARS.to_string()),
        ("hourly", "temperature_2m".to_string()),
        ("wind_speed_unit", "kmh".to_string()),
        ("timezone", "auto".to_string()),
    ]);
    query
}

#[async_trait]
impl OpenMeteoApi for OpenMeteoClient {
    async fn geocode(&self, name: &str) -> Result<GeocodingResponse> {
        let query = geocode_query(name, &self.language);
        self.get_json("geocoding", &self.endpoints.geocoding, &query)
            .await
    }

    async fn forecast(&self, location: &Location) -> Result<ForecastResponse> {
        self.get_json("forecast", &self.endpoints.forecast, &forecast_query(location))
            .await
    }

    async fn air_quality(&self, location: &Location) -> Result<AirQualityResponse> {
        let query = air_quality_query(location);
        self.get_json("air quality", &self.endpoints.air_quality, &query)
            .await
    }

    async fn archive(&self, location: &Location, date: NaiveDate) -> Result<ArchiveResponse> {
        let query = archive_query(location, date);
        self.get_json("archive", &self.endpoints.archive, &query)
            .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
