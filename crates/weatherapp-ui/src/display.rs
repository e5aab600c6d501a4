//! What the weather screen renders.

use weatherapp_weather::{NetworkResult, WeatherData, NOT_FOUND_CODE};

/// Shown when the repository could not resolve the city.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City Not Found";
/// Shown for every other failure.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!!!";

/// Display state of the weather screen. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    Loading,
    Loaded { data: WeatherData },
    Failed { message: String },
}

impl DisplayState {
    /// Project a repository result onto the screen.
    ///
    /// Returns `None` for a success without payload: the screen keeps
    /// whatever it was showing.
    pub fn project(result: NetworkResult<WeatherData>) -> Option<Self> {
        match result {
            NetworkResult::Loading => Some(DisplayState::Loading),
            NetworkResult::Success { data } => data.map(|data| DisplayState::Loaded { data }),
            NetworkResult::Error { message } => Some(DisplayState::Failed {
                message: user_message(&message).to_string(),
            }),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    pub fn data(&self) -> Option<&WeatherData> {
        match self {
            DisplayState::Loaded { data } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DisplayState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// Collapse a repository error message into one of the two user messages.
pub fn user_message(repository_message: &str) -> &'static str {
    if repository_message == NOT_FOUND_CODE {
        CITY_NOT_FOUND_MESSAGE
    } else {
        GENERIC_ERROR_MESSAGE
    }
}
