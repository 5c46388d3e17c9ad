use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use tracing_subscriber::EnvFilter;

use clima_core::{Config, Dashboard, FileStore, OpenMeteoClient, SearchOutcome, session};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default city and the number of hourly rows.
    Configure,

    /// Current conditions, the next hours and the next five days.
    Weather {
        /// City name; defaults to the last searched city.
        city: Option<String>,
    },

    /// European air quality index and pollutant levels for the current hour.
    Air {
        /// City name; defaults to the last searched city.
        city: Option<String>,
    },

    /// Weather on a past day.
    History {
        /// City name; defaults to the last searched city.
        city: Option<String>,

        /// Day to look up (YYYY-MM-DD); defaults to yesterday.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Show or switch the light/dark theme.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    /// Print the active theme.
    Show,
    /// Switch between light and dark.
    Toggle,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{raw}' is not a date in YYYY-MM-DD form"))
}

fn init_tracing(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_deref().unwrap_or("warn")))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_outcome<V>(outcome: SearchOutcome<V>, render: impl FnOnce(&V) -> String) {
    match outcome {
        SearchOutcome::Ready(view) => println!("{}", render(&view)),
        SearchOutcome::Failed(err) => println!("{}", err.user_message()),
        SearchOutcome::Superseded => {}
    }
}

fn open_dashboard(config: &Config) -> anyhow::Result<Dashboard<OpenMeteoClient, FileStore>> {
    let store = FileStore::open_default().context("Failed to open dashboard state")?;
    Ok(Dashboard::new(OpenMeteoClient::from_config(config), store, config))
}

fn city_or_last(arg: Option<String>, dashboard: &Dashboard<OpenMeteoClient, FileStore>) -> String {
    arg.unwrap_or_else(|| dashboard.last_city())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        init_tracing(self.verbose, &config);
        tracing::debug!(hourly_rows = config.hourly_rows, language = %config.language, "configuration loaded");
        let now = Utc::now();

        match self.command {
            Command::Configure => configure(config)?,
            Command::Weather { city } => {
                let dashboard = open_dashboard(&config)?;
                let city = city_or_last(city, &dashboard);
                let outcome = dashboard.search_weather(&city, now).await;
                print_outcome(outcome, render::current);
            }
            Command::Air { city } => {
                let dashboard = open_dashboard(&config)?;
                let city = city_or_last(city, &dashboard);
                let outcome = dashboard.search_air_quality(&city, now).await;
                let background = dashboard.stored_background();
                print_outcome(outcome, |view| render::air_quality(view, background));
            }
            Command::History { city, date } => {
                let dashboard = open_dashboard(&config)?;
                let city = city_or_last(city, &dashboard);
                let outcome = dashboard.search_history(&city, date, now).await;
                let background = dashboard.stored_background();
                print_outcome(outcome, |view| render::history(view, background));
            }
            Command::Theme { action } => {
                let dashboard = open_dashboard(&config)?;
                let theme = match action.unwrap_or(ThemeAction::Show) {
                    ThemeAction::Show => dashboard.theme(),
                    ThemeAction::Toggle => dashboard.toggle_theme(),
                };
                println!("{}", render::theme(theme));
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()?;
    config.set_default_city(&city);

    let rows = CustomType::<usize>::new("Hourly forecast rows:")
        .with_default(config.hourly_rows)
        .with_error_message("Please type a whole number")
        .prompt()?;
    config.hourly_rows = rows.max(1);

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    println!(
        "Archive lookups go up to {}.",
        session::latest_archive_date(Utc::now())
    );

    Ok(())
}
