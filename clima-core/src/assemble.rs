//! Presentation assembler: picks the right slice of each response, runs it
//! through the classification tables and returns a view model for the
//! renderer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::{
    classify::{
        self, AqiLevel, Background, IconKey, Pollutant, PollutantLevel, UNKNOWN_CONDITION,
    },
    error::{ClimaError, DataGap, Feed},
    locale,
    model::{AirQualitySample, ClassificationResult, CurrentConditions, Location},
    response::{
        AirQualityResponse, ArchiveResponse, CurrentBlock, DailyBlock, ForecastResponse,
        HourlyBlock, sample,
    },
    timeseries::{SeriesError, TimeSeries, local_now, parse_timestamp},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRow {
    pub time: NaiveDateTime,
    pub hour_label: String,
    pub temperature_c: Option<f64>,
    pub icon: IconKey,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub weekday: String,
    pub icon: IconKey,
    pub description: String,
    pub min_c: Option<f64>,
    pub max_c: Option<f64>,
    pub precipitation_probability_pct: Option<f64>,
    pub wind_max_kmh: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub location: Location,
    pub title: String,
    pub date_label: String,
    pub conditions: CurrentConditions,
    pub description: String,
    pub icon: IconKey,
    pub background: Background,
    pub hourly: Vec<HourlyRow>,
    pub daily: Vec<DailyRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    pub pollutant: Pollutant,
    pub value: Option<f64>,
    pub level: Option<PollutantLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityView {
    pub location: Location,
    pub title: String,
    pub observed_at: NaiveDateTime,
    pub sample: AirQualitySample,
    pub level: AqiLevel,
    pub classification: ClassificationResult,
    /// Gauge needle angle in degrees.
    pub needle_rotation: f64,
    pub pollutants: Vec<PollutantReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: NaiveDateTime,
    pub label: String,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalView {
    pub location: Location,
    pub title: String,
    pub date: NaiveDate,
    pub date_label: String,
    pub weather_code: Option<i32>,
    pub description: String,
    pub icon: IconKey,
    pub max_c: Option<f64>,
    pub min_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_max_kmh: Option<f64>,
    /// Hourly temperatures of the day, for the line chart.
    pub chart: Vec<ChartPoint>,
}

fn malformed(feed: Feed, err: SeriesError) -> ClimaError {
    ClimaError::NetworkFailure {
        feed,
        message: err.to_string(),
    }
}

fn describe(code: Option<i32>) -> String {
    code.map_or(UNKNOWN_CONDITION, classify::describe_weather_code)
        .to_string()
}

fn icon(code: Option<i32>, is_day: bool) -> IconKey {
    code.map_or(IconKey::Unknown, |c| classify::icon_for(c, is_day))
}

/// A column, or a column of unknowns when the API left it out.
fn column_or_unknown<T: Copy>(column: &Option<Vec<Option<T>>>, len: usize) -> Vec<Option<T>> {
    column.clone().unwrap_or_else(|| vec![None; len])
}

/// Fold the modern and legacy current blocks into one record.
///
/// `current` is consulted before `current_weather`, and inside a block the
/// modern field name before the legacy one. Fields found nowhere stay `None`.
pub fn normalize_current(response: &ForecastResponse) -> Result<CurrentConditions, ClimaError> {
    let blocks: Vec<&CurrentBlock> = [&response.current, &response.current_weather]
        .into_iter()
        .flatten()
        .collect();

    if blocks.is_empty() {
        return Err(ClimaError::DataUnavailable(DataGap::CurrentConditions));
    }

    fn pick<T>(blocks: &[&CurrentBlock], field: impl Fn(&CurrentBlock) -> Option<T>) -> Option<T> {
        blocks.iter().find_map(|b| field(*b))
    }

    let temperature_c = pick(&blocks, |b| b.temperature_2m.or(b.temperature));

    Ok(CurrentConditions {
        temperature_c,
        apparent_temperature_c: pick(&blocks, |b| b.apparent_temperature).or(temperature_c),
        humidity_pct: pick(&blocks, |b| b.relative_humidity_2m),
        pressure_hpa: pick(&blocks, |b| b.surface_pressure),
        wind_speed_kmh: pick(&blocks, |b| b.wind_speed_10m.or(b.windspeed)),
        weather_code: pick(&blocks, |b| b.weather_code.or(b.weathercode)),
        is_day: pick(&blocks, |b| b.is_day).map(|d| d != 0),
    })
}

fn hourly_rows(
    hourly: &HourlyBlock,
    now: NaiveDateTime,
    max_rows: usize,
) -> Result<Vec<HourlyRow>, ClimaError> {
    let temperatures = column_or_unknown(&hourly.temperature_2m, hourly.time.len());
    let series = TimeSeries::parse(&hourly.time, temperatures)
        .map_err(|e| malformed(Feed::Weather, e))?;

    let Some(start) = series.index_strictly_after(now) else {
        return Ok(Vec::new());
    };

    let rows = series
        .iter()
        .enumerate()
        .skip(start)
        .take(max_rows)
        .map(|(i, (time, temperature))| {
            let is_day = sample(&hourly.is_day, i).is_none_or(|d| d != 0);
            HourlyRow {
                time,
                hour_label: locale::clock(time),
                temperature_c: *temperature,
                icon: icon(sample(&hourly.weather_code, i), is_day),
            }
        })
        .collect();

    Ok(rows)
}

fn clock_at(column: &Option<Vec<Option<String>>>, index: usize) -> Option<String> {
    column
        .as_ref()
        .and_then(|c| c.get(index))
        .and_then(|s| s.as_deref())
        .and_then(parse_timestamp)
        .map(locale::clock)
}

fn daily_rows(daily: &DailyBlock) -> Result<Vec<DailyRow>, ClimaError> {
    let codes = column_or_unknown(&daily.weather_code, daily.time.len());
    let series =
        TimeSeries::parse(&daily.time, codes).map_err(|e| malformed(Feed::Weather, e))?;

    let rows = series
        .forecast_day_indices()
        .filter_map(|i| {
            let date = series.timestamp(i)?.date();
            let code = series.value(i).copied().flatten();
            Some(DailyRow {
                date,
                weekday: locale::weekday_heading(date),
                icon: icon(code, true),
                description: describe(code),
                min_c: sample(&daily.temperature_2m_min, i),
                max_c: sample(&daily.temperature_2m_max, i),
                precipitation_probability_pct: sample(&daily.precipitation_probability_max, i),
                wind_max_kmh: sample(&daily.wind_speed_10m_max, i),
                sunrise: clock_at(&daily.sunrise, i),
                sunset: clock_at(&daily.sunset, i),
            })
        })
        .collect();

    Ok(rows)
}

pub fn assemble_current_view(
    response: &ForecastResponse,
    location: &Location,
    now: DateTime<Utc>,
    max_hourly_rows: usize,
) -> Result<CurrentView, ClimaError> {
    let conditions = normalize_current(response)?;
    let local = local_now(now, response.utc_offset_seconds);
    let is_day = conditions.is_day.unwrap_or(true);

    let hourly = match &response.hourly {
        Some(block) => hourly_rows(block, local, max_hourly_rows)?,
        None => Vec::new(),
    };
    let daily = match &response.daily {
        Some(block) => daily_rows(block)?,
        None => Vec::new(),
    };

    let background = conditions
        .weather_code
        .map_or(Background::Plain, |c| classify::background_for_conditions(c, is_day));

    Ok(CurrentView {
        location: location.clone(),
        title: location.label(),
        date_label: locale::long_date(local.date()),
        description: describe(conditions.weather_code),
        icon: icon(conditions.weather_code, is_day),
        background,
        conditions,
        hourly,
        daily,
    })
}

pub fn assemble_air_quality_view(
    response: &AirQualityResponse,
    location: &Location,
    now: DateTime<Utc>,
) -> Result<AirQualityView, ClimaError> {
    let unavailable = ClimaError::DataUnavailable(DataGap::CurrentHour);
    let Some(hourly) = &response.hourly else {
        return Err(unavailable);
    };

    let aqi_column = column_or_unknown(&hourly.european_aqi, hourly.time.len());
    let series = TimeSeries::parse(&hourly.time, aqi_column)
        .map_err(|e| malformed(Feed::AirQuality, e))?;

    let local = local_now(now, response.utc_offset_seconds);
    let Some(index) = series.index_for_current_hour(local) else {
        return Err(unavailable);
    };
    let Some(raw_aqi) = series.value(index).copied().flatten() else {
        return Err(unavailable);
    };
    let observed_at = series.timestamp(index).unwrap_or(local);

    let reading = AirQualitySample {
        european_aqi: raw_aqi.round() as i64,
        pm2_5: sample(&hourly.pm2_5, index),
        pm10: sample(&hourly.pm10, index),
        ozone: sample(&hourly.ozone, index),
        nitrogen_dioxide: sample(&hourly.nitrogen_dioxide, index),
        carbon_monoxide: sample(&hourly.carbon_monoxide, index),
    };

    let pollutants = Pollutant::ALL
        .into_iter()
        .map(|pollutant| {
            let value = match pollutant {
                Pollutant::Pm2_5 => reading.pm2_5,
                Pollutant::Pm10 => reading.pm10,
                Pollutant::Ozone => reading.ozone,
                Pollutant::NitrogenDioxide => reading.nitrogen_dioxide,
            };
            PollutantReading {
                pollutant,
                value,
                level: value.map(|v| classify::classify_pollutant(v, &pollutant.thresholds())),
            }
        })
        .collect();

    Ok(AirQualityView {
        location: location.clone(),
        title: location.label(),
        observed_at,
        level: AqiLevel::from_aqi(reading.european_aqi),
        classification: classify::classify_aqi(reading.european_aqi),
        needle_rotation: classify::needle_rotation(reading.european_aqi),
        sample: reading,
        pollutants,
    })
}

pub fn assemble_historical_view(
    response: &ArchiveResponse,
    location: &Location,
    date: NaiveDate,
) -> Result<HistoricalView, ClimaError> {
    let unavailable = ClimaError::DataUnavailable(DataGap::HistoricalDate);
    let Some(daily) = response.daily.as_ref().filter(|d| !d.time.is_empty()) else {
        return Err(unavailable);
    };

    let codes = column_or_unknown(&daily.weather_code, daily.time.len());
    let series =
        TimeSeries::parse(&daily.time, codes).map_err(|e| malformed(Feed::Historical, e))?;
    let code = series.value(0).copied().flatten();

    let chart = match &response.hourly {
        Some(hourly) => {
            let temperatures = column_or_unknown(&hourly.temperature_2m, hourly.time.len());
            TimeSeries::parse(&hourly.time, temperatures)
                .map_err(|e| malformed(Feed::Historical, e))?
                .iter()
                .filter_map(|(time, t)| {
                    t.map(|temperature_c| ChartPoint {
                        time,
                        label: locale::clock(time),
                        temperature_c,
                    })
                })
                .collect()
        }
        None => Vec::new(),
    };

    Ok(HistoricalView {
        location: location.clone(),
        title: location.label(),
        date,
        date_label: locale::full_date(date),
        weather_code: code,
        description: describe(code),
        icon: icon(code, true),
        max_c: sample(&daily.temperature_2m_max, 0),
        min_c: sample(&daily.temperature_2m_min, 0),
        precipitation_mm: sample(&daily.precipitation_sum, 0),
        wind_max_kmh: sample(&daily.wind_speed_10m_max, 0),
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Band;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn location() -> Location {
        Location {
            latitude: -22.12,
            longitude: -51.39,
            display_name: "Presidente Prudente".into(),
            region: "São Paulo".into(),
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, 0).unwrap()
    }

    fn forecast(body: Value) -> ForecastResponse {
        serde_json::from_value(body).expect("fixture decodes")
    }

    #[test]
    fn legacy_shape_normalizes() {
        let response = forecast(json!({
            "current_weather": { "temperature": 22, "windspeed": 10, "weathercode": 3 }
        }));

        let current = normalize_current(&response).expect("normalized");

        assert_eq!(current.temperature_c, Some(22.0));
        assert_eq!(current.wind_speed_kmh, Some(10.0));
        assert_eq!(current.weather_code, Some(3));
        assert_eq!(current.apparent_temperature_c, Some(22.0));
        assert_eq!(current.humidity_pct, None);
        assert_eq!(current.pressure_hpa, None);
    }

    #[test]
    fn modern_names_win_over_legacy() {
        let response = forecast(json!({
            "current": {
                "temperature_2m": 18.4, "apparent_temperature": 17.0, "relative_humidity_2m": 81,
                "surface_pressure": 1013.2, "wind_speed_10m": 7.5, "weather_code": 61, "is_day": 0
            },
            "current_weather": { "temperature": 30, "windspeed": 40, "weathercode": 0 }
        }));

        let current = normalize_current(&response).expect("normalized");

        assert_eq!(current.temperature_c, Some(18.4));
        assert_eq!(current.apparent_temperature_c, Some(17.0));
        assert_eq!(current.wind_speed_kmh, Some(7.5));
        assert_eq!(current.weather_code, Some(61));
        assert_eq!(current.is_day, Some(false));
    }

    #[test]
    fn sparse_modern_block_borrows_from_legacy() {
        let response = forecast(json!({
            "current": { "relative_humidity_2m": 50 },
            "current_weather": { "temperature": 25, "windspeed": 12, "weathercode": 2 }
        }));

        let current = normalize_current(&response).expect("normalized");
        assert_eq!(current.humidity_pct, Some(50.0));
        assert_eq!(current.temperature_c, Some(25.0));
        assert_eq!(current.weather_code, Some(2));
    }

    #[test]
    fn missing_current_block_is_data_unavailable() {
        let err = normalize_current(&forecast(json!({}))).unwrap_err();
        assert!(matches!(err, ClimaError::DataUnavailable(DataGap::CurrentConditions)));
    }

    #[test]
    fn current_view_rows() {
        let response = forecast(json!({
            "utc_offset_seconds": -10800,
            "current": { "temperature_2m": 24.0, "weather_code": 0, "is_day": 1 },
            "hourly": {
                "time": ["2024-05-01T09:00", "2024-05-01T10:00", "2024-05-01T11:00", "2024-05-01T12:00"],
                "temperature_2m": [20.0, 21.0, 22.5, null],
                "weather_code": [0, 2, 2, 61],
                "is_day": [1, 1, 0, 1]
            },
            "daily": {
                "time": ["2024-05-01", "2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05", "2024-05-06"],
                "weather_code": [0, 1, 2, 3, 61, 77],
                "temperature_2m_max": [30, 31, 32, 33, 34, 35],
                "temperature_2m_min": [10, 11, 12, 13, 14, 15],
                "sunrise": ["2024-05-01T06:40", "2024-05-02T06:41", null, null, null, null],
                "sunset": ["2024-05-01T17:50", "2024-05-02T17:49", null, null, null, null],
                "precipitation_probability_max": [0, 10, 20, 30, 40, 50],
                "wind_speed_10m_max": [5.5, 6.5, 7.5, 8.5, 9.5, 10.5]
            }
        }));

        // 13:00 UTC is 10:00 local.
        let view = assemble_current_view(&response, &location(), at(13, 0), 2).expect("view");

        assert_eq!(view.title, "Presidente Prudente, São Paulo");
        assert_eq!(view.date_label, "quarta-feira, 1 de maio");
        assert_eq!(view.description, "Céu limpo");
        assert_eq!(view.icon, IconKey::Sun);
        assert_eq!(view.background, Background::Sunny);

        let hours: Vec<_> = view.hourly.iter().map(|r| r.hour_label.as_str()).collect();
        assert_eq!(hours, ["11:00", "12:00"]);
        assert_eq!(view.hourly[0].icon, IconKey::CloudMoon);
        assert_eq!(view.hourly[1].temperature_c, None);

        let days: Vec<_> = view.daily.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(days, ["2024-05-02", "2024-05-03", "2024-05-04", "2024-05-05", "2024-05-06"]);
        assert_eq!(view.daily[0].weekday, "Quinta-feira");
        assert_eq!(view.daily[0].sunrise.as_deref(), Some("06:41"));
        assert_eq!(view.daily[1].sunrise, None);
        assert_eq!(view.daily[4].description, UNKNOWN_CONDITION);
        assert_eq!(view.daily[4].icon, IconKey::Unknown);
    }

    #[test]
    fn exhausted_hourly_series_renders_no_rows() {
        let response = forecast(json!({
            "current": { "temperature_2m": 24.0, "weather_code": 3 },
            "hourly": {
                "time": ["2024-05-01T10:00", "2024-05-01T11:00"],
                "temperature_2m": [20.0, 21.0],
                "weather_code": [3, 3]
            }
        }));

        let view = assemble_current_view(&response, &location(), at(11, 0), 12).expect("view");
        assert!(view.hourly.is_empty());
        assert!(view.daily.is_empty());
    }

    #[test]
    fn mismatched_columns_are_a_fetch_failure() {
        let response = forecast(json!({
            "current": { "temperature_2m": 24.0 },
            "hourly": { "time": ["2024-05-01T10:00"], "temperature_2m": [20.0, 21.0] }
        }));

        let err = assemble_current_view(&response, &location(), at(9, 0), 12).unwrap_err();
        assert!(matches!(err, ClimaError::NetworkFailure { feed: Feed::Weather, .. }));
    }

    fn air_quality(body: Value) -> AirQualityResponse {
        serde_json::from_value(body).expect("fixture decodes")
    }

    #[test]
    fn air_quality_picks_current_hour() {
        let response = air_quality(json!({
            "hourly": {
                "time": ["2024-05-01T12:00", "2024-05-01T13:00", "2024-05-01T14:00"],
                "european_aqi": [10.0, 44.6, 90.0],
                "pm2_5": [1.0, 30.0, 2.0],
                "pm10": [1.0, 15.0, 2.0],
                "ozone": [1.0, 250.0, 2.0],
                "nitrogen_dioxide": [1.0, null, 2.0],
                "carbon_monoxide": [100.0, 180.5, 90.0]
            }
        }));

        let view = assemble_air_quality_view(&response, &location(), at(13, 42)).expect("view");

        assert_eq!(view.sample.european_aqi, 45);
        assert_eq!(view.classification.label, "Moderado");
        assert_eq!(view.level, AqiLevel::Moderate);
        assert!((view.needle_rotation - (-9.0)).abs() < 1e-9);
        assert_eq!(view.sample.carbon_monoxide, Some(180.5));

        let pm25 = &view.pollutants[0];
        assert_eq!(pm25.pollutant, Pollutant::Pm2_5);
        let level = pm25.level.expect("classified");
        assert_eq!(level.band, Band::Poor);
        assert!((level.fill - 0.48).abs() < 1e-9);

        assert_eq!(view.pollutants[2].level.map(|l| l.band), Some(Band::VeryPoor));
        assert_eq!(view.pollutants[3].value, None);
        assert_eq!(view.pollutants[3].level, None);
    }

    #[test]
    fn air_quality_without_current_bucket_is_unavailable() {
        let response = air_quality(json!({
            "hourly": { "time": ["2024-05-01T10:00"], "european_aqi": [10.0] }
        }));

        let err = assemble_air_quality_view(&response, &location(), at(13, 0)).unwrap_err();
        assert!(matches!(err, ClimaError::DataUnavailable(DataGap::CurrentHour)));

        let empty = air_quality(json!({ "hourly": { "time": [] } }));
        let err = assemble_air_quality_view(&empty, &location(), at(13, 0)).unwrap_err();
        assert_eq!(err.user_message(), "Dados indisponíveis para a hora atual.");
    }

    #[test]
    fn air_quality_honours_utc_offset() {
        let response = air_quality(json!({
            "utc_offset_seconds": -10800,
            "hourly": { "time": ["2024-05-01T10:00", "2024-05-01T13:00"], "european_aqi": [15.0, 85.0] }
        }));

        let view = assemble_air_quality_view(&response, &location(), at(13, 5)).expect("view");
        assert_eq!(view.sample.european_aqi, 15);
    }

    #[test]
    fn historical_view_with_chart() {
        let response: ArchiveResponse = serde_json::from_value(json!({
            "daily": {
                "time": ["2024-03-10"],
                "weather_code": [63],
                "temperature_2m_max": [29.4],
                "temperature_2m_min": [19.1],
                "precipitation_sum": [12.3],
                "wind_speed_10m_max": [14.0]
            },
            "hourly": {
                "time": ["2024-03-10T00:00", "2024-03-10T01:00", "2024-03-10T02:00"],
                "temperature_2m": [20.0, null, 19.5]
            }
        }))
        .expect("fixture decodes");

        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let view = assemble_historical_view(&response, &location(), date).expect("view");

        assert_eq!(view.date_label, "10 de março de 2024");
        assert_eq!(view.description, "Chuva moderada");
        assert_eq!(view.icon, IconKey::Rain);
        assert_eq!(view.precipitation_mm, Some(12.3));
        assert_eq!(view.chart.len(), 2);
        assert_eq!(view.chart[1].label, "02:00");
    }

    #[test]
    fn historical_without_rows_is_unavailable() {
        let response: ArchiveResponse =
            serde_json::from_value(json!({ "daily": { "time": [] } })).expect("fixture decodes");
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let err = assemble_historical_view(&response, &location(), date).unwrap_err();
        assert!(matches!(err, ClimaError::DataUnavailable(DataGap::HistoricalDate)));
    }
}
