//! Plain-text rendering of the dashboard views.

use std::fmt::Write;

use clima_core::{
    AirQualityView, Background, CurrentView, HistoricalView, Theme, assemble::ChartPoint,
};

const BAR_WIDTH: usize = 20;
const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Rounds half away from zero to `decimals` places; `-0` prints as `0`.
fn number(value: Option<f64>, decimals: usize, unit: &str) -> String {
    match value {
        Some(v) => {
            let scale = 10f64.powi(decimals as i32);
            let rounded = (v * scale).round() / scale + 0.0;
            format!("{rounded:.decimals$}{unit}")
        }
        None => format!("-{unit}"),
    }
}

fn bar(fill: f64) -> String {
    let filled = (fill.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn background_line(out: &mut String, background: Option<Background>) {
    if let Some(bg) = background.filter(|bg| *bg != Background::Plain) {
        let _ = writeln!(out, "Fundo: {}", bg.css_class());
    }
}

/// Scale the series onto the spark glyphs; a flat series sits mid-height.
fn sparkline(points: &[ChartPoint]) -> String {
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.temperature_c), hi.max(p.temperature_c))
    });
    let top = SPARK.len() - 1;

    points
        .iter()
        .map(|p| {
            if hi > lo {
                let step = (p.temperature_c - lo) / (hi - lo) * top as f64;
                SPARK[(step.round() as usize).min(top)]
            } else {
                SPARK[top / 2]
            }
        })
        .collect()
}

pub fn current(view: &CurrentView) -> String {
    let c = &view.conditions;
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.date_label);
    background_line(&mut out, Some(view.background));
    let _ = writeln!(
        out,
        "{} {} ({})",
        number(c.temperature_c, 0, "°C"),
        view.description,
        view.icon
    );
    let _ = writeln!(out, "Sensação: {}", number(c.apparent_temperature_c, 0, "°C"));
    let _ = writeln!(out, "Umidade: {}", number(c.humidity_pct, 0, "%"));
    let _ = writeln!(out, "Vento: {}", number(c.wind_speed_kmh, 1, " km/h"));
    let _ = writeln!(out, "Pressão: {}", number(c.pressure_hpa, 0, " hPa"));

    if !view.hourly.is_empty() {
        let _ = writeln!(out, "\nPróximas horas");
        for row in &view.hourly {
            let _ = writeln!(
                out,
                "  {}  {:>6}  {}",
                row.hour_label,
                number(row.temperature_c, 0, "°C"),
                row.icon
            );
        }
    }

    if !view.daily.is_empty() {
        let _ = writeln!(out, "\nPróximos dias");
        for day in &view.daily {
            let _ = writeln!(
                out,
                "  {:<14} {} / {}  {}",
                day.weekday,
                number(day.max_c, 0, "°C"),
                number(day.min_c, 0, "°C"),
                day.description
            );
            let _ = writeln!(
                out,
                "    Chuva: {}  Vento: {}  Nascer do Sol: {}  Pôr do Sol: {}",
                number(day.precipitation_probability_pct, 0, "%"),
                number(day.wind_max_kmh, 1, " km/h"),
                day.sunrise.as_deref().unwrap_or("-"),
                day.sunset.as_deref().unwrap_or("-")
            );
        }
    }

    out.trim_end().to_string()
}

pub fn air_quality(view: &AirQualityView, background: Option<Background>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.observed_at.format("%d/%m/%Y %H:%M"));
    background_line(&mut out, background);
    let _ = writeln!(
        out,
        "IQA europeu: {} ({})",
        view.sample.european_aqi, view.classification.label
    );
    let _ = writeln!(out, "Ponteiro: {:.0}°", view.needle_rotation);
    let _ = writeln!(out, "{}", view.classification.detail);
    let _ = writeln!(out);

    for reading in &view.pollutants {
        let value = number(reading.value, 2, " µg/m³");
        match reading.level {
            Some(level) => {
                let _ = writeln!(
                    out,
                    "  {:<6} {:>12}  {} {}",
                    reading.pollutant.label(),
                    value,
                    bar(level.fill),
                    level.band.css_class()
                );
            }
            None => {
                let _ = writeln!(out, "  {:<6} {:>12}", reading.pollutant.label(), value);
            }
        }
    }
    let _ = writeln!(
        out,
        "  {:<6} {:>12}",
        "CO",
        number(view.sample.carbon_monoxide, 2, " µg/m³")
    );

    out.trim_end().to_string()
}

pub fn history(view: &HistoricalView, background: Option<Background>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", view.date_label);
    background_line(&mut out, background);
    let _ = writeln!(out, "{} ({})", view.description, view.icon);
    let _ = writeln!(out, "Máxima: {}", number(view.max_c, 0, "°C"));
    let _ = writeln!(out, "Mínima: {}", number(view.min_c, 0, "°C"));
    let _ = writeln!(out, "Precipitação: {}", number(view.precipitation_mm, 1, " mm"));
    let _ = writeln!(out, "Vento Máx.: {}", number(view.wind_max_kmh, 1, " km/h"));

    if let (Some(first), Some(last)) = (view.chart.first(), view.chart.last()) {
        let _ = writeln!(out, "\nTemperatura ao longo do dia");
        let _ = writeln!(out, "  {}", sparkline(&view.chart));
        let _ = writeln!(out, "  {} .. {}", first.label, last.label);
    }

    out.trim_end().to_string()
}

pub fn theme(theme: Theme) -> String {
    format!("Tema: {} ({})", theme.as_str(), theme.toggle_icon())
}
