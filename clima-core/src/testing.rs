//! In-memory [`OpenMeteoApi`] for unit tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::Notify;

use crate::{
    model::Location,
    provider::OpenMeteoApi,
    response::{
        AirQualityResponse, ArchiveResponse, ForecastResponse, GeocodingResponse, GeocodingResult,
    },
};

#[derive(Debug, Default)]
pub struct FakeApi {
    cities: HashMap<String, GeocodingResult>,
    geocoder_fails: bool,
    fetches_fail: bool,
    forecast: Option<Value>,
    air_quality: Option<Value>,
    archive: Option<Value>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl FakeApi {
    pub fn with_city(mut self, name: &str, latitude: f64, longitude: f64, admin1: Option<&str>) -> Self {
        self.cities.insert(
            name.to_string(),
            GeocodingResult {
                name: name.to_string(),
                latitude,
                longitude,
                admin1: admin1.map(str::to_string),
            },
        );
        self
    }

    pub fn failing_geocoder(mut self) -> Self {
        self.geocoder_fails = true;
        self
    }

    pub fn failing_fetches(mut self) -> Self {
        self.fetches_fail = true;
        self
    }

    pub fn with_forecast(mut self, body: Value) -> Self {
        self.forecast = Some(body);
        self
    }

    pub fn with_air_quality(mut self, body: Value) -> Self {
        self.air_quality = Some(body);
        self
    }

    pub fn with_archive(mut self, body: Value) -> Self {
        self.archive = Some(body);
        self
    }

    /// Hold every fetch for `city` until the returned handle is notified.
    pub fn gate(&mut self, city: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.insert(city.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(endpoint).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record(&self, endpoint: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(endpoint).or_default() += 1;
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        location: &Location,
        body: &Option<Value>,
    ) -> Result<T> {
        self.record(endpoint);

        if let Some(gate) = self.gates.get(&location.display_name) {
            gate.notified().await;
        }

        if self.fetches_fail {
            return Err(anyhow!("connection refused"));
        }

        let body = body
            .clone()
            .ok_or_else(|| anyhow!("no {endpoint} fixture"))?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl OpenMeteoApi for FakeApi {
    async fn geocode(&self, name: &str) -> Result<GeocodingResponse> {
        self.record("geocode");

        if self.geocoder_fails {
            return Err(anyhow!("dns error"));
        }

        Ok(GeocodingResponse {
            results: self.cities.get(name).map(|hit| vec![hit.clone()]),
        })
    }

    async fn forecast(&self, location: &Location) -> Result<ForecastResponse> {
        self.fetch("forecast", location, &self.forecast).await
    }

    async fn air_quality(&self, location: &Location) -> Result<AirQualityResponse> {
        self.fetch("air_quality", location, &self.air_quality).await
    }

    async fn archive(&self, location: &Location, _date: NaiveDate) -> Result<ArchiveResponse> {
        self.fetch("archive", location, &self.archive).await
    }
}
