use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use weatherapp_core::{App, TemperatureUnit};
use weatherapp_ui::{DisplayState, SearchCoordinator};
use weatherapp_weather::{ProviderSettings, WeatherData, WeatherProvider};

/// Look up the weather for a city. Without a city, repeats the last search.
#[derive(Debug, Parser)]
#[command(name = "weatherapp", version)]
struct Cli {
    /// City to search for
    city: Option<String>,

    /// Override the configured temperature unit
    #[arg(long, value_enum)]
    unit: Option<UnitArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    Auto,
    Celsius,
    Fahrenheit,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Auto => TemperatureUnit::Auto,
            UnitArg::Celsius => TemperatureUnit::Celsius,
            UnitArg::Fahrenheit => TemperatureUnit::Fahrenheit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    weatherapp_core::init()?;

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    let mut settings = ProviderSettings::from_config(&app.config().weather, &app.config().retry);
    if let Some(unit) = cli.unit {
        settings.unit = unit.into();
    }
    let provider = WeatherProvider::new(settings)?;

    let coordinator = Arc::new(SearchCoordinator::new(
        Arc::new(provider),
        app.open_preferences(),
    ));

    let city = match cli.city {
        Some(city) => city,
        None => {
            let last = coordinator.last_searched_city();
            if last.is_empty() {
                println!("No previous search. Run `weatherapp <CITY>`.");
                app.shutdown();
                return Ok(());
            }
            println!("Last searched city: {}", last);
            last
        }
    };

    coordinator.search(city).await?;
    render(coordinator.display_state().as_ref());

    app.shutdown();
    Ok(())
}

fn render(state: Option<&DisplayState>) {
    match state {
        None => println!("No weather data."),
        Some(DisplayState::Loading) => println!("Loading..."),
        Some(DisplayState::Failed { message }) => println!("{}", message),
        Some(DisplayState::Loaded { data }) => render_weather(data),
    }
}

fn render_weather(data: &WeatherData) {
    let unit = &data.temperature_symbol;
    let current = &data.current;

    println!("{}", data.location.display_name());
    println!(
        "  {:.1}{} (feels like {:.1}{}), {}",
        current.temperature,
        unit,
        current.feels_like,
        unit,
        current.condition.description()
    );
    println!(
        "  Humidity {}%, wind {:.1} km/h",
        current.humidity, current.wind_speed
    );

    if let Some(today) = data.today() {
        println!(
            "  Sunrise {} / sunset {}",
            today.sunrise.format("%H:%M"),
            today.sunset.format("%H:%M")
        );
    }

    for day in &data.forecast {
        println!(
            "  {}  {:>6.1}{} / {:>6.1}{}  {:>3}%  {}",
            day.date.format("%a %d"),
            day.high,
            unit,
            day.low,
            unit,
            day.precipitation_chance,
            day.condition.description()
        );
    }
}
