use serde::{Deserialize, Serialize};

/// A geocoded place. Produced once per search and shared by every fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    /// First-level administrative area (state), empty when the geocoder has none.
    pub region: String,
}

impl Location {
    /// `"Name, Region"`, as shown in every card header.
    pub fn label(&self) -> String {
        format!("{}, {}", self.display_name, self.region)
    }
}

/// Canonical current conditions. `None` marks a field the response did not carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: Option<f64>,
    pub apparent_temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub weather_code: Option<i32>,
    pub is_day: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualitySample {
    pub european_aqi: i64,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub ozone: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub carbon_monoxide: Option<f64>,
}

/// Output of a classification table: a short label plus a longer detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub detail: String,
}
