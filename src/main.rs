//! `skycast` command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use skycast_core::{App, AppError, ClockFormat, Config};
use skycast_ui::{CompositeView, HtmlPageView, TerminalView};
use skycast_weather::{
    ClockStyle, ConfiguredLocation, FileStore, GeocodingClient, ViewState, WeatherController,
    WeatherProvider,
};

#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard for a city or your location")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Write the HTML dashboard here instead of the configured path
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Only print to the terminal
    #[arg(long, global = true, conflicts_with = "out")]
    no_html: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the weather for a city
    Search {
        /// City name, e.g. "Paris"
        city: String,
    },

    /// Show the weather for the device location
    Locate {
        /// Latitude in degrees; overrides the configured location
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in degrees; overrides the configured location
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
}

fn clock_style(format: ClockFormat) -> ClockStyle {
    match format {
        ClockFormat::TwelveHour => ClockStyle::TwelveHour,
        ClockFormat::TwentyFourHour => ClockStyle::TwentyFourHour,
    }
}

fn build_controller(cli: &Cli, config: &Config) -> Result<WeatherController> {
    let geocoder = GeocodingClient::new(
        config.weather.geocoding_url.as_str(),
        config.weather.reverse_geocoding_url.as_str(),
    )?;
    let provider = WeatherProvider::new(config.weather.forecast_url.as_str())?;
    let store = FileStore::open(config.state_path());

    let mut view = CompositeView::new().with(Box::new(TerminalView::new(std::io::stdout())));
    if !cli.no_html {
        let path = cli.out.clone().unwrap_or_else(|| config.output_path());
        tracing::info!("Writing dashboard to {}", path.display());
        view = view.with(Box::new(HtmlPageView::new(path)));
    }

    Ok(WeatherController::new(
        Arc::new(geocoder),
        Arc::new(provider),
        Box::new(store),
        Box::new(view),
    )
    .with_clock_style(clock_style(config.weather.clock)))
}

async fn run(cli: Cli, app: &App) -> Result<ViewState> {
    let config = app.config();
    let mut controller = build_controller(&cli, config)?;

    match cli.command {
        None => controller.start().await,
        Some(Command::Search { city }) => controller.submit_city(&city).await,
        Some(Command::Locate { lat, lon }) => {
            let provider = match (lat, lon) {
                (Some(_), Some(_)) => ConfiguredLocation::new(lat, lon),
                _ => ConfiguredLocation::new(config.location.latitude, config.location.longitude),
            };
            controller.request_geolocation(&provider).await;
        }
    }

    Ok(controller.state().clone())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    skycast_core::init();

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(cli, &app).await;
    app.shutdown();

    match outcome {
        Ok(ViewState::Error(_)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let e = AppError::from(e);
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
