//! Tagged outcome of a repository fetch.

/// Result of a weather fetch as seen by the screen.
///
/// Errors are carried as plain messages; a not-found city is reported as
/// [`NOT_FOUND_CODE`](crate::types::NOT_FOUND_CODE).
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResult<T> {
    Loading,
    Success { data: Option<T> },
    Error { message: String },
}

impl<T> NetworkResult<T> {
    pub fn success(data: T) -> Self {
        NetworkResult::Success { data: Some(data) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        NetworkResult::Error {
            message: message.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, NetworkResult::Loading)
    }

    /// Payload of a successful fetch, if one was delivered
    pub fn data(&self) -> Option<&T> {
        match self {
            NetworkResult::Success { data } => data.as_ref(),
            _ => None,
        }
    }

    /// Error message, if the fetch failed
    pub fn message(&self) -> Option<&str> {
        match self {
            NetworkResult::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for NetworkResult<T>
where
    E: Into<crate::types::WeatherError>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => NetworkResult::success(data),
            Err(e) => NetworkResult::error(e.into().result_message()),
        }
    }
}
