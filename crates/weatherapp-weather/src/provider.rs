//! Open-Meteo weather provider.
//!
//! Resolves a city name through the geocoder, then fetches current
//! conditions and a daily forecast for the match.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use weatherapp_core::{RetrySettings, TemperatureUnit, WeatherConfig};

use crate::geocode::geocode_city;
use crate::repository::WeatherRepository;
use crate::result::NetworkResult;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{
    CurrentWeather, DayForecast, Location, WeatherCondition, WeatherData, WeatherError,
};

const USER_AGENT: &str = "WeatherApp/0.1.0";
const CURRENT_FIELDS: &str =
    "temperature_2m,apparent_temperature,relative_humidity_2m,wind_speed_10m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
precipitation_probability_max,sunrise,sunset";
/// Open-Meteo timestamps are local ISO 8601 without seconds
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Endpoints and request policy for [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub timeout: Duration,
    pub unit: TemperatureUnit,
    pub forecast_days: u8,
    pub retry: RetryConfig,
}

impl ProviderSettings {
    pub fn from_config(weather: &WeatherConfig, retry: &RetrySettings) -> Self {
        Self {
            geocoding_url: weather.geocoding_url.clone(),
            forecast_url: weather.forecast_url.clone(),
            timeout: Duration::from_secs(weather.request_timeout_secs),
            unit: weather.temperature_unit,
            forecast_days: weather.forecast_days,
            retry: RetryConfig::from(retry),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self::from_config(&WeatherConfig::default(), &RetrySettings::default())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_units: Option<CurrentUnits>,
    current: CurrentBlock,
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentUnits {
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<f64>>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    settings: ProviderSettings,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            settings,
        })
    }

    /// Geocode `city` and fetch its weather.
    pub async fn fetch_city(&self, city: &str) -> Result<WeatherData, WeatherError> {
        let location = geocode_city(
            &self.client,
            &self.settings.geocoding_url,
            &self.settings.retry,
            city,
        )
        .await?;
        self.fetch(location).await
    }

    /// Fetch current conditions and the daily forecast for a resolved location.
    pub async fn fetch(&self, location: Location) -> Result<WeatherData, WeatherError> {
        let mut query: Vec<(&str, String)> = vec![
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", self.settings.forecast_days.to_string()),
        ];
        if let Some(unit) = unit_param(self.settings.unit) {
            query.push(("temperature_unit", unit.to_string()));
        }

        let response = with_retry(&self.settings.retry, || {
            self.client
                .get(&self.settings.forecast_url)
                .query(&query)
                .send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
                endpoint: "forecast",
            });
        }

        let body: ForecastResponse = response.json().await?;
        let data = build_weather_data(location, body)?;
        tracing::debug!(
            "Fetched weather for {}: {} ({} forecast days)",
            data.location.display_name(),
            data.current.condition.description(),
            data.forecast.len()
        );
        Ok(data)
    }
}

#[async_trait]
impl WeatherRepository for WeatherProvider {
    async fn fetch_weather(&self, city_name: &str) -> NetworkResult<WeatherData> {
        match self.fetch_city(city_name).await {
            Ok(data) => NetworkResult::success(data),
            Err(e) => {
                tracing::error!("Failed to fetch weather for {:?}: {}", city_name, e);
                NetworkResult::error(e.result_message())
            }
        }
    }
}

/// `temperature_unit` query value; `Auto` leaves the API default (Celsius).
fn unit_param(unit: TemperatureUnit) -> Option<&'static str> {
    match unit {
        TemperatureUnit::Auto => None,
        TemperatureUnit::Celsius => Some("celsius"),
        TemperatureUnit::Fahrenheit => Some("fahrenheit"),
    }
}

fn parse_time(value: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(value, API_TIME_FORMAT)
        .map_err(|e| WeatherError::Parse(format!("bad timestamp {:?}: {}", value, e)))
}

fn build_weather_data(
    location: Location,
    body: ForecastResponse,
) -> Result<WeatherData, WeatherError> {
    let current = CurrentWeather {
        temperature: body.current.temperature_2m,
        feels_like: body.current.apparent_temperature,
        humidity: body.current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
        wind_speed: body.current.wind_speed_10m,
        condition: WeatherCondition::from_wmo_code(body.current.weather_code),
        observed_at: parse_time(&body.current.time)?,
    };

    let forecast = match body.daily {
        Some(daily) => build_forecast(daily)?,
        None => Vec::new(),
    };

    let temperature_symbol = body
        .current_units
        .and_then(|u| u.temperature_2m)
        .unwrap_or_else(|| "°C".to_string());

    Ok(WeatherData {
        location,
        current,
        forecast,
        temperature_symbol,
        fetched_at: Utc::now(),
    })
}

fn build_forecast(daily: DailyBlock) -> Result<Vec<DayForecast>, WeatherError> {
    let mut days = Vec::with_capacity(daily.time.len());

    for (i, date) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| WeatherError::Parse(format!("bad date {:?}: {}", date, e)))?;

        // Days with missing temperatures are dropped rather than zero-filled
        let (Some(high), Some(low)) = (
            daily.temperature_2m_max.get(i).copied().flatten(),
            daily.temperature_2m_min.get(i).copied().flatten(),
        ) else {
            continue;
        };
        let (Some(sunrise), Some(sunset)) = (daily.sunrise.get(i), daily.sunset.get(i)) else {
            continue;
        };

        days.push(DayForecast {
            date,
            high,
            low,
            condition: WeatherCondition::from_wmo_code(
                daily.weather_code.get(i).copied().flatten().unwrap_or(0),
            ),
            precipitation_chance: daily
                .precipitation_probability_max
                .get(i)
                .copied()
                .flatten()
                .map(|p| p.round().clamp(0.0, 100.0) as u8)
                .unwrap_or(0),
            sunrise: parse_time(sunrise)?.time(),
            sunset: parse_time(sunset)?.time(),
        });
    }

    Ok(days)
}
