//! Lookup tables turning coded or continuous readings into categorical UI state.
//!
//! Every function here is total: unknown codes and out-of-range readings map
//! to a defined fallback, never to an error.

use serde::{Deserialize, Serialize};

use crate::model::ClassificationResult;

pub const UNKNOWN_CONDITION: &str = "Condição desconhecida";

const RAIN_CODES: &[i32] = &[51, 53, 55, 61, 63, 65, 80, 81, 82, 95, 96, 99];

/// Wind speed (km/h) above which the stored-conditions background turns windy.
const WINDY_KMH: f64 = 15.0;

/// WMO weather code to its Portuguese description.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Céu limpo",
        1 => "Principalmente limpo",
        2 => "Parcialmente nublado",
        3 => "Nublado",
        45 => "Nevoeiro",
        48 => "Nevoeiro com geada",
        51 => "Garoa leve",
        53 => "Garoa moderada",
        55 => "Garoa densa",
        61 => "Chuva leve",
        63 => "Chuva moderada",
        65 => "Chuva forte",
        80 => "Pancadas de chuva leves",
        81 => "Pancadas de chuva moderadas",
        82 => "Pancadas de chuva violentas",
        95 => "Trovoada",
        96 => "Trovoada com granizo leve",
        99 => "Trovoada com granizo forte",
        _ => UNKNOWN_CONDITION,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconKey {
    Sun,
    Moon,
    CloudSun,
    CloudMoon,
    Cloud,
    Fog,
    Rain,
    Storm,
    Unknown,
}

impl IconKey {
    /// Icon font class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKey::Sun => "bi-sun-fill",
            IconKey::Moon => "bi-moon-stars-fill",
            IconKey::CloudSun => "bi-cloud-sun-fill",
            IconKey::CloudMoon => "bi-cloud-moon-fill",
            IconKey::Cloud => "bi-cloud-fill",
            IconKey::Fog => "bi-cloud-fog2-fill",
            IconKey::Rain => "bi-cloud-rain-heavy-fill",
            IconKey::Storm => "bi-cloud-lightning-rain-fill",
            IconKey::Unknown => "bi-question-circle-fill",
        }
    }
}

impl std::fmt::Display for IconKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only clear and partly-cloudy skies have a night variant.
pub fn icon_for(code: i32, is_day: bool) -> IconKey {
    match code {
        0 | 1 if is_day => IconKey::Sun,
        0 | 1 => IconKey::Moon,
        2 if is_day => IconKey::CloudSun,
        2 => IconKey::CloudMoon,
        3 => IconKey::Cloud,
        45 | 48 => IconKey::Fog,
        51 | 53 | 55 | 61 | 63 | 65 | 80 | 81 | 82 => IconKey::Rain,
        95 | 96 | 99 => IconKey::Storm,
        _ => IconKey::Unknown,
    }
}

/// European AQI severity, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiLevel {
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=20 => AqiLevel::Good,
            21..=40 => AqiLevel::Fair,
            41..=60 => AqiLevel::Moderate,
            61..=80 => AqiLevel::Poor,
            _ => AqiLevel::VeryPoor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Bom",
            AqiLevel::Fair => "Razoável",
            AqiLevel::Moderate => "Moderado",
            AqiLevel::Poor => "Ruim",
            AqiLevel::VeryPoor => "Muito Ruim",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            AqiLevel::Good => {
                "A qualidade do ar está ótima. Aproveite para praticar atividades ao ar livre!"
            }
            AqiLevel::Fair => {
                "A qualidade do ar é aceitável. Pessoas muito sensíveis podem sentir algum desconforto."
            }
            AqiLevel::Moderate => {
                "Pessoas de grupos sensíveis (crianças, idosos, grávidas) devem reduzir atividades ao ar livre."
            }
            AqiLevel::Poor => {
                "Evite esforço físico prolongado ao ar livre. População em geral pode sentir efeitos na saúde."
            }
            AqiLevel::VeryPoor => {
                "Alerta de saúde: evite qualquer atividade ao ar livre. Mantenha janelas e portas fechadas."
            }
        }
    }
}

pub fn classify_aqi(aqi: i64) -> ClassificationResult {
    let level = AqiLevel::from_aqi(aqi);
    ClassificationResult {
        label: level.label().to_string(),
        detail: level.recommendation().to_string(),
    }
}

/// Gauge needle angle in degrees: AQI 0 points at -90, AQI 100 and above at +90.
pub fn needle_rotation(aqi: i64) -> f64 {
    let capped = aqi.clamp(0, 100) as f64;
    capped / 100.0 * 180.0 - 90.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl Band {
    const ALL: [Band; 5] = [Band::Good, Band::Fair, Band::Moderate, Band::Poor, Band::VeryPoor];

    pub fn css_class(&self) -> &'static str {
        match self {
            Band::Good => "bg-good",
            Band::Fair => "bg-fair",
            Band::Moderate => "bg-moderate",
            Band::Poor => "bg-poor",
            Band::VeryPoor => "bg-very-poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantLevel {
    pub band: Band,
    /// Progress bar fill in `[0, 1]`.
    pub fill: f64,
}

/// Band is the number of breakpoints `value` strictly exceeds; the bar is
/// full at 125% of the last breakpoint.
pub fn classify_pollutant(value: f64, thresholds: &[f64; 4]) -> PollutantLevel {
    let exceeded = thresholds.iter().filter(|&&t| value > t).count();
    let max = thresholds[3] * 1.25;
    let fill = if value.is_nan() || max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    };

    PollutantLevel {
        band: Band::ALL[exceeded],
        fill,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    Ozone,
    NitrogenDioxide,
}

impl Pollutant {
    pub const ALL: [Pollutant; 4] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::Ozone,
        Pollutant::NitrogenDioxide,
    ];

    pub fn thresholds(&self) -> [f64; 4] {
        match self {
            Pollutant::Pm2_5 => [10.0, 20.0, 25.0, 50.0],
            Pollutant::Pm10 => [20.0, 40.0, 50.0, 100.0],
            Pollutant::Ozone => [60.0, 120.0, 180.0, 240.0],
            Pollutant::NitrogenDioxide => [40.0, 100.0, 200.0, 400.0],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::Ozone => "O₃",
            Pollutant::NitrogenDioxide => "NO₂",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as the light theme.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// The toggle button shows the theme you would switch to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "bi-moon-fill",
            Theme::Dark => "bi-sun-fill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Rain,
    Sunny,
    Stars,
    Windy,
    Plain,
}

impl Background {
    pub fn css_class(&self) -> &'static str {
        match self {
            Background::Rain => "rain",
            Background::Sunny => "sunny",
            Background::Stars => "stars",
            Background::Windy => "windy",
            Background::Plain => "",
        }
    }
}

/// Background of the weather view, keyed off the live conditions.
pub fn background_for_conditions(code: i32, is_day: bool) -> Background {
    match code {
        c if RAIN_CODES.contains(&c) => Background::Rain,
        0 | 1 if is_day => Background::Sunny,
        0 | 1 => Background::Stars,
        _ => Background::Plain,
    }
}

/// Background of the secondary views, keyed off the last conditions seen by
/// the weather view and the active theme.
pub fn background_from_last_conditions(code: i32, wind_kmh: f64, theme: Theme) -> Background {
    let sky_visible = (0..=3).contains(&code);
    if RAIN_CODES.contains(&code) {
        Background::Rain
    } else if sky_visible && theme == Theme::Light {
        Background::Sunny
    } else if sky_visible {
        Background::Stars
    } else if wind_kmh > WINDY_KMH {
        Background::Windy
    } else {
        Background::Plain
    }
}
