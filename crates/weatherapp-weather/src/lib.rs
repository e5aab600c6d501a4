//! Weather data for WeatherApp
//!
//! Resolves city names and fetches current conditions and forecasts from
//! Open-Meteo, reporting outcomes as a tagged [`NetworkResult`].

pub mod geocode;
pub mod provider;
pub mod repository;
pub mod result;
pub mod retry;
pub mod types;

pub use provider::{ProviderSettings, WeatherProvider};
pub use repository::WeatherRepository;
pub use result::NetworkResult;
pub use retry::RetryConfig;
pub use types::*;
