//! Weather search screen state for WeatherApp.

pub mod display;
pub mod search;

#[cfg(test)]
mod test_support;

pub use display::{DisplayState, CITY_NOT_FOUND_MESSAGE, GENERIC_ERROR_MESSAGE};
pub use search::{SearchCoordinator, SearchEvent, LAST_SEARCHED_CITY_KEY};
