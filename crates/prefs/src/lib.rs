use std::collections::BTreeMap;

use serde::Serialize;

/// Key of the flag recording that the home button has been clicked once.
pub const VISITED_KEY: &str = "hasVisitedBefore";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for PrefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefError::StorageUnavailable => write!(f, "browser storage unavailable"),
            PrefError::Io(msg) => write!(f, "preference storage error: {msg}"),
        }
    }
}

impl std::error::Error for PrefError {}

/// String key/value preferences.
pub trait PrefStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefError>;
}

#[derive(Debug, Default)]
pub struct InMemoryPrefStore {
    values: BTreeMap<String, String>,
}

impl InMemoryPrefStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for InMemoryPrefStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefError> {
        self.values.remove(key);
        Ok(())
    }
}

impl<S: PrefStore + ?Sized> PrefStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, PrefError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefError> {
        (**self).remove(key)
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{PrefError, PrefStore};

    /// `window.localStorage`, looked up on every access.
    #[derive(Debug)]
    pub struct LocalStoragePrefStore {
        _private: (),
    }

    impl LocalStoragePrefStore {
        pub fn new() -> Result<Self, PrefError> {
            // Fail early so callers can fall back to memory.
            window_local_storage()?;
            Ok(Self { _private: () })
        }
    }

    impl PrefStore for LocalStoragePrefStore {
        fn get(&self, key: &str) -> Result<Option<String>, PrefError> {
            window_local_storage()?
                .get_item(key)
                .map_err(|e| PrefError::Io(format!("get_item({key}) failed: {:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PrefError> {
            window_local_storage()?
                .set_item(key, value)
                .map_err(|e| PrefError::Io(format!("set_item({key}) failed: {:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<(), PrefError> {
            window_local_storage()?
                .remove_item(key)
                .map_err(|e| PrefError::Io(format!("remove_item({key}) failed: {:?}", e)))
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, PrefError> {
        let win = web_sys::window().ok_or(PrefError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| PrefError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(PrefError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePrefStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePrefStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePrefStore {
    pub fn new() -> Result<Self, PrefError> {
        Err(PrefError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PrefStore for LocalStoragePrefStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PrefError> {
        Err(PrefError::StorageUnavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PrefError> {
        Err(PrefError::StorageUnavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), PrefError> {
        Err(PrefError::StorageUnavailable)
    }
}

/// Browser storage when available, memory otherwise.
pub fn default_store() -> Box<dyn PrefStore> {
    match LocalStoragePrefStore::new() {
        Ok(store) => Box::new(store),
        Err(_) => Box::new(InMemoryPrefStore::new()),
    }
}

/// Render state of the home button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeButtonState {
    pub class_name: String,
    pub tooltip_visible: bool,
}

/// Home button that opens the info dialog and hints at itself until first used.
#[derive(Debug)]
pub struct HomeButton<S> {
    store: S,
    visited: bool,
}

impl<S: PrefStore> HomeButton<S> {
    /// Reads the visited flag. A storage error counts as a first visit.
    pub fn load(store: S) -> Self {
        let visited = matches!(store.get(VISITED_KEY), Ok(Some(v)) if v == "true");
        Self { store, visited }
    }

    pub fn is_first_visit(&self) -> bool {
        !self.visited
    }

    /// Records the click and persists the visited flag.
    ///
    /// The in-memory state changes even if persisting fails; the error is returned
    /// so the caller can log it.
    pub fn click(&mut self) -> Result<(), PrefError> {
        if self.visited {
            return Ok(());
        }
        self.visited = true;
        self.store.set(VISITED_KEY, "true")
    }

    pub fn tooltip_visible(&self) -> bool {
        !self.visited
    }

    pub fn class_name(&self, dialog_open: bool) -> String {
        let phase = if !self.visited {
            "initial"
        } else if dialog_open {
            "after-click-open"
        } else {
            "after-click-closed"
        };
        format!("animated-home-button {phase}")
    }

    pub fn state(&self, dialog_open: bool) -> HomeButtonState {
        HomeButtonState {
            class_name: self.class_name(dialog_open),
            tooltip_visible: self.tooltip_visible(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_visit_shows_hint_until_clicked() {
        let mut button = HomeButton::load(InMemoryPrefStore::new());
        assert!(button.is_first_visit());
        assert!(button.tooltip_visible());
        assert_eq!(button.class_name(false), "animated-home-button initial");

        button.click().expect("click");
        assert!(!button.tooltip_visible());
        assert_eq!(button.class_name(true), "animated-home-button after-click-open");
        assert_eq!(
            button.class_name(false),
            "animated-home-button after-click-closed"
        );
        assert_eq!(
            button.store().get(VISITED_KEY).expect("get"),
            Some("true".to_string())
        );
    }

    #[test]
    fn returning_visitor_skips_the_hint() {
        let mut store = InMemoryPrefStore::new();
        store.set(VISITED_KEY, "true").expect("set");
        let button = HomeButton::load(store);
        assert!(!button.is_first_visit());
        assert_eq!(
            button.state(false),
            HomeButtonState {
                class_name: "animated-home-button after-click-closed".into(),
                tooltip_visible: false,
            }
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn unavailable_storage_counts_as_first_visit() {
        let mut button = HomeButton::load(LocalStoragePrefStore);
        assert!(button.is_first_visit());
        assert_eq!(button.click(), Err(PrefError::StorageUnavailable));
        // Still hidden for this session.
        assert!(!button.tooltip_visible());
    }

    #[test]
    fn default_store_falls_back_to_memory_off_browser() {
        let mut store = default_store();
        store.set("k", "v").expect("set");
        assert_eq!(store.get("k").expect("get"), Some("v".to_string()));
        store.remove("k").expect("remove");
        assert_eq!(store.get("k").expect("get"), None);
    }
}
