//! Search screen coordinator.
//!
//! Forwards a city name to the weather repository, projects the result into
//! a [`DisplayState`], and remembers the last searched city in the
//! preference store. Both observed fields can be read as snapshots or
//! followed through [`SearchCoordinator::subscribe`].

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use weatherapp_core::KeyValueStore;
use weatherapp_weather::{NetworkResult, WeatherData, WeatherRepository};

use crate::display::DisplayState;

/// Preference key holding the last searched city.
pub const LAST_SEARCHED_CITY_KEY: &str = "last_searched_city";

const EVENT_CAPACITY: usize = 64;

/// Change notifications for the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    LastSearchedCityChanged(String),
    DisplayStateChanged(DisplayState),
}

pub struct SearchCoordinator {
    repository: Arc<dyn WeatherRepository>,
    preferences: Arc<dyn KeyValueStore>,
    display_state: RwLock<Option<DisplayState>>,
    last_searched_city: RwLock<String>,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchCoordinator {
    /// Create a coordinator and restore the last searched city.
    ///
    /// Never fails: a missing, empty or unreadable stored value leaves the
    /// last searched city empty.
    pub fn new(
        repository: Arc<dyn WeatherRepository>,
        preferences: Arc<dyn KeyValueStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let coordinator = Self {
            repository,
            preferences,
            display_state: RwLock::new(None),
            last_searched_city: RwLock::new(String::new()),
            events,
        };
        coordinator.load_last_searched_city();
        coordinator
    }

    /// Current display state; `None` until the first result is projected.
    pub fn display_state(&self) -> Option<DisplayState> {
        self.display_state.read().clone()
    }

    pub fn last_searched_city(&self) -> String {
        self.last_searched_city.read().clone()
    }

    /// Follow changes to either observed field.
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Start a search for `city_name`.
    ///
    /// The last searched city is updated and persisted before this returns;
    /// the fetch and projection run on a spawned task whose handle is
    /// returned. Overlapping searches are not cancelled: whichever fetch
    /// resolves last sets the final display state.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn search(self: &Arc<Self>, city_name: impl Into<String>) -> JoinHandle<()> {
        let city_name = city_name.into();
        tracing::info!("Searching weather for {:?}", city_name);

        self.set_last_searched_city(&city_name);
        self.save_last_searched_city(&city_name);

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let result = coordinator.repository.fetch_weather(&city_name).await;
            coordinator.apply_result(&city_name, result);
        })
    }

    fn apply_result(&self, city_name: &str, result: NetworkResult<WeatherData>) {
        let Some(state) = DisplayState::project(result) else {
            tracing::debug!(
                "Fetch for {:?} succeeded without data, display state unchanged",
                city_name
            );
            return;
        };

        if let DisplayState::Failed { message } = &state {
            tracing::info!("Search for {:?} failed: {}", city_name, message);
        }

        // Notify under the write lock so event order matches store order
        let mut current = self.display_state.write();
        *current = Some(state.clone());
        let _ = self.events.send(SearchEvent::DisplayStateChanged(state));
    }

    fn set_last_searched_city(&self, city_name: &str) {
        let mut current = self.last_searched_city.write();
        *current = city_name.to_string();
        let _ = self
            .events
            .send(SearchEvent::LastSearchedCityChanged(city_name.to_string()));
    }

    fn save_last_searched_city(&self, city_name: &str) {
        if let Err(e) = self.preferences.set(LAST_SEARCHED_CITY_KEY, city_name) {
            tracing::warn!("Failed to save last searched city: {}", e);
        }
    }

    fn load_last_searched_city(&self) {
        match self.preferences.get(LAST_SEARCHED_CITY_KEY) {
            Ok(Some(city)) if !city.is_empty() => {
                tracing::debug!("Restored last searched city {:?}", city);
                *self.last_searched_city.write() = city;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Failed to load last searched city: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use weatherapp_core::{MemoryPreferences, StorageError};

    use crate::display::{CITY_NOT_FOUND_MESSAGE, GENERIC_ERROR_MESSAGE};
    use crate::test_support::sample_weather;

    /// Returns a fixed result per city; unknown cities are not found.
    #[derive(Default)]
    struct ScriptedRepository {
        results: Mutex<HashMap<String, NetworkResult<WeatherData>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRepository {
        fn with(city: &str, result: NetworkResult<WeatherData>) -> Arc<Self> {
            let repo = Self::default();
            repo.results.lock().insert(city.to_string(), result);
            Arc::new(repo)
        }
    }

    #[async_trait]
    impl WeatherRepository for ScriptedRepository {
        async fn fetch_weather(&self, city_name: &str) -> NetworkResult<WeatherData> {
            self.calls.lock().push(city_name.to_string());
            self.results
                .lock()
                .get(city_name)
                .cloned()
                .unwrap_or_else(|| NetworkResult::error("404"))
        }
    }

    /// Store whose reads and writes always fail.
    struct BrokenPreferences;

    impl KeyValueStore for BrokenPreferences {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("read-only filesystem".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    fn coordinator(
        repo: Arc<ScriptedRepository>,
        prefs: Arc<dyn KeyValueStore>,
    ) -> Arc<SearchCoordinator> {
        Arc::new(SearchCoordinator::new(repo, prefs))
    }

    #[test]
    fn test_restores_stored_city() {
        let prefs = Arc::new(MemoryPreferences::with_entries([(
            LAST_SEARCHED_CITY_KEY,
            "Paris",
        )]));
        let c = coordinator(Arc::default(), prefs);
        assert_eq!(c.last_searched_city(), "Paris");
        assert_eq!(c.display_state(), None);
    }

    #[test]
    fn test_nothing_stored_is_empty() {
        let c = coordinator(Arc::default(), Arc::new(MemoryPreferences::new()));
        assert_eq!(c.last_searched_city(), "");
    }

    #[test]
    fn test_stored_empty_string_is_ignored() {
        let prefs = Arc::new(MemoryPreferences::with_entries([(LAST_SEARCHED_CITY_KEY, "")]));
        let c = coordinator(Arc::default(), prefs);
        assert_eq!(c.last_searched_city(), "");
    }

    #[test]
    fn test_unreadable_store_does_not_fail_construction() {
        let c = coordinator(Arc::default(), Arc::new(BrokenPreferences));
        assert_eq!(c.last_searched_city(), "");
    }

    #[tokio::test]
    async fn test_success_loads_payload() {
        let payload = sample_weather("Paris");
        let repo = ScriptedRepository::with("Paris", NetworkResult::success(payload.clone()));
        let c = coordinator(repo.clone(), Arc::new(MemoryPreferences::new()));

        c.search("Paris").await.unwrap();

        assert_eq!(c.display_state(), Some(DisplayState::Loaded { data: payload }));
        assert_eq!(repo.calls.lock().as_slice(), ["Paris".to_string()]);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_city_not_found() {
        let repo = ScriptedRepository::with("Atlantis", NetworkResult::error("404"));
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));

        c.search("Atlantis").await.unwrap();

        assert_eq!(
            c.display_state(),
            Some(DisplayState::Failed {
                message: CITY_NOT_FOUND_MESSAGE.to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_other_errors_map_to_generic_message() {
        let repo = ScriptedRepository::with("X", NetworkResult::error("timeout"));
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));

        c.search("X").await.unwrap();

        assert_eq!(
            c.display_state(),
            Some(DisplayState::Failed {
                message: GENERIC_ERROR_MESSAGE.to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_loading_result_maps_to_loading() {
        let repo = ScriptedRepository::with("Slowtown", NetworkResult::Loading);
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));

        c.search("Slowtown").await.unwrap();

        assert_eq!(c.display_state(), Some(DisplayState::Loading));
    }

    #[tokio::test]
    async fn test_success_without_data_keeps_previous_state() {
        let repo = ScriptedRepository::with("Atlantis", NetworkResult::error("404"));
        repo.results
            .lock()
            .insert("X".to_string(), NetworkResult::Success { data: None });
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));

        // From the initial absent state
        c.search("X").await.unwrap();
        assert_eq!(c.display_state(), None);

        // And from an established state
        c.search("Atlantis").await.unwrap();
        let before = c.display_state();
        c.search("X").await.unwrap();
        assert_eq!(c.display_state(), before);
        assert_eq!(c.last_searched_city(), "X");
    }

    #[tokio::test]
    async fn test_search_persists_city() {
        let prefs = Arc::new(MemoryPreferences::new());
        let c = coordinator(Arc::default(), prefs.clone());

        c.search("Lisbon").await.unwrap();

        assert_eq!(
            prefs.get(LAST_SEARCHED_CITY_KEY).unwrap().as_deref(),
            Some("Lisbon")
        );
        let next = coordinator(Arc::default(), prefs);
        assert_eq!(next.last_searched_city(), "Lisbon");
    }

    #[tokio::test]
    async fn test_failed_write_does_not_abort_search() {
        let payload = sample_weather("Oslo");
        let repo = ScriptedRepository::with("Oslo", NetworkResult::success(payload.clone()));
        let c = coordinator(repo, Arc::new(BrokenPreferences));

        c.search("Oslo").await.unwrap();

        assert_eq!(c.last_searched_city(), "Oslo");
        assert_eq!(c.display_state(), Some(DisplayState::Loaded { data: payload }));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes_in_order() {
        let repo = ScriptedRepository::with("Atlantis", NetworkResult::error("404"));
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));
        let mut events = c.subscribe();

        c.search("Atlantis").await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            SearchEvent::LastSearchedCityChanged("Atlantis".to_string())
        );
        assert_eq!(
            events.recv().await.unwrap(),
            SearchEvent::DisplayStateChanged(DisplayState::Failed {
                message: CITY_NOT_FOUND_MESSAGE.to_string()
            })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_last_event_matches_stored_state_under_overlap() {
        let repo = Arc::new(ScriptedRepository::default());
        let cities: Vec<String> = (0..20).map(|i| format!("City{i}")).collect();
        for city in &cities {
            repo.results
                .lock()
                .insert(city.clone(), NetworkResult::success(sample_weather(city)));
        }
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));
        let mut events = c.subscribe();

        let handles: Vec<_> = cities.iter().map(|city| c.search(city.as_str())).collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let mut last_display = None;
        let mut last_city = None;
        while let Ok(event) = events.try_recv() {
            match event {
                SearchEvent::DisplayStateChanged(state) => last_display = Some(state),
                SearchEvent::LastSearchedCityChanged(city) => last_city = Some(city),
            }
        }
        assert_eq!(last_display, c.display_state());
        assert_eq!(last_city, Some(c.last_searched_city()));
    }

    #[tokio::test]
    async fn test_quirk_emits_no_display_event() {
        let repo = ScriptedRepository::with("X", NetworkResult::Success { data: None });
        let c = coordinator(repo, Arc::new(MemoryPreferences::new()));
        let mut events = c.subscribe();

        c.search("X").await.unwrap();

        assert!(matches!(
            events.try_recv(),
            Ok(SearchEvent::LastSearchedCityChanged(_))
        ));
        assert!(events.try_recv().is_err());
    }
}
