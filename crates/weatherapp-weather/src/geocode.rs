//! Forward geocoding: resolve a city name to coordinates.
//! Uses the Open-Meteo geocoding search API - free, no API key required.

use reqwest::Client;
use serde::Deserialize;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{Location, WeatherError};

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    timezone: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            name: result.name,
            region: result.admin1,
            country: result.country,
            latitude: result.latitude,
            longitude: result.longitude,
            timezone: result.timezone,
        }
    }
}

/// Resolve `city` to its best match.
///
/// A blank query or an empty result set is `WeatherError::CityNotFound`.
pub async fn geocode_city(
    client: &Client,
    search_url: &str,
    retry: &RetryConfig,
    city: &str,
) -> Result<Location, WeatherError> {
    let query = city.trim();
    if query.is_empty() {
        return Err(WeatherError::CityNotFound(city.to_string()));
    }

    let response = with_retry(retry, || {
        client
            .get(search_url)
            .query(&[
                ("name", query),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
    })
    .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("Geocoding returned status {}", status);
        return Err(WeatherError::Http {
            status: status.as_u16(),
            endpoint: "geocoding",
        });
    }

    let body: GeocodingResponse = response.json().await?;

    let location = body
        .results
        .and_then(|results| results.into_iter().next())
        .map(Location::from)
        .ok_or_else(|| WeatherError::CityNotFound(query.to_string()))?;

    tracing::info!(
        "Geocoded {:?} to {} ({}, {})",
        query,
        location.display_name(),
        location.latitude,
        location.longitude
    );
    Ok(location)
}
