use async_trait::async_trait;

use crate::result::NetworkResult;
use crate::types::WeatherData;

/// Source of weather data for a city name.
///
/// Implementations never fail: every outcome is folded into the returned
/// [`NetworkResult`].
#[async_trait]
pub trait WeatherRepository: Send + Sync {
    async fn fetch_weather(&self, city_name: &str) -> NetworkResult<WeatherData>;
}
