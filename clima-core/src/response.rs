//! Open-Meteo JSON payloads, as decoded straight off the wire.
//!
//! Arrays are `Option<Vec<Option<_>>>` throughout: the API omits variables it
//! was not asked for and emits `null` for missing samples.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub admin1: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current: Option<CurrentBlock>,
    /// Legacy shape of the current conditions.
    pub current_weather: Option<CurrentBlock>,
    pub hourly: Option<HourlyBlock>,
    pub daily: Option<DailyBlock>,
}

/// Union of the modern `current` and legacy `current_weather` field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentBlock {
    pub time: Option<String>,

    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub is_day: Option<u8>,
    pub weather_code: Option<i32>,
    pub surface_pressure: Option<f64>,
    pub wind_speed_10m: Option<f64>,

    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub weathercode: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
    pub weather_code: Option<Vec<Option<i32>>>,
    pub is_day: Option<Vec<Option<u8>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    pub weather_code: Option<Vec<Option<i32>>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub sunrise: Option<Vec<Option<String>>>,
    pub sunset: Option<Vec<Option<String>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityResponse {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub hourly: Option<AirQualityHourly>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirQualityHourly {
    #[serde(default)]
    pub time: Vec<String>,
    pub european_aqi: Option<Vec<Option<f64>>>,
    pub pm2_5: Option<Vec<Option<f64>>>,
    pub pm10: Option<Vec<Option<f64>>>,
    pub ozone: Option<Vec<Option<f64>>>,
    pub nitrogen_dioxide: Option<Vec<Option<f64>>>,
    pub carbon_monoxide: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveResponse {
    pub daily: Option<DailyBlock>,
    pub hourly: Option<HourlyBlock>,
}

/// Sample `index` of an optional column, flattening both absence levels.
pub(crate) fn sample<T: Copy>(column: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    column.as_ref().and_then(|c| c.get(index).copied().flatten())
}
