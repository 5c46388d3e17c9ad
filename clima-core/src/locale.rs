//! Fixed pt-BR strings for dates and times.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// `"Quinta-feira"`: weekday heading of a daily forecast row.
pub fn weekday_heading(date: NaiveDate) -> String {
    let name = weekday_name(date.weekday());
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"quarta-feira, 15 de outubro"`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} de {}",
        weekday_name(date.weekday()),
        date.day(),
        month_name(date)
    )
}

/// `"14 de outubro de 2026"`
pub fn full_date(date: NaiveDate) -> String {
    format!("{} de {} de {}", date.day(), month_name(date), date.year())
}

/// `"07:05"`
pub fn clock(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}
