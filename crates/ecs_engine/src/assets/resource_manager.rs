//! Resource Manager - keyed resource slots with a loading state machine
//!
//! Every key moves through a small state machine:
//!
//! ```text
//!  request()          set(Mutable)          set(Final)
//! ──────────► Loading ────────────► Mutable ──────────► Final
//!                │
//!                └──── set_not_found() ───► NotFound
//! ```
//!
//! `request` asks the installed [`ResourceLoader`] for a key at most once
//! while that key is loading or loaded. Loaders answer synchronously or
//! later through [`ResourceManager::set`] / [`ResourceManager::set_not_found`].
//! A loader error drops the slot again, so the next request retries. A
//! `Final` slot can be neither replaced nor marked missing.
//! Consumers in the render path only ever see `Final` data via
//! [`ResourceManager::resolved`].

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Hashed resource name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(pub u64);

impl ResourceKey {
    /// Key for a resource name
    pub fn from_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl From<&str> for ResourceKey {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Loading state of one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// Requested, loader has not answered yet
    Loading,
    /// Loaded, may still be replaced
    Mutable,
    /// Loaded and fixed; safe to hand to the renderer
    Final,
    /// Loader could not find the resource
    NotFound,
}

/// Data policy for [`ResourceManager::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    /// Data may be replaced later
    Mutable,
    /// Data is fixed from now on
    Final,
}

/// Resource Manager errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// Loader reported the resource missing
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource exists but is not in `Final` state
    #[error("Resource {name} is not resolved (state: {state:?})")]
    NotResolved {
        /// Resource name
        name: String,
        /// Current state, `None` if never requested
        state: Option<ResourceState>,
    },

    /// No loader installed to satisfy a request
    #[error("No loader installed for resource: {0}")]
    NoLoader(String),

    /// A `Final` resource cannot be replaced
    #[error("Resource {0} is final and cannot be replaced")]
    AlreadyFinal(String),

    /// Loader failed for a reason other than absence
    #[error("Loader failed for {name}: {reason}")]
    LoaderFailed {
        /// Resource name
        name: String,
        /// Failure description
        reason: String,
    },
}

/// Answer from a loader
#[derive(Debug)]
pub enum LoadOutcome<T> {
    /// Data is available now
    Loaded(T, DataState),
    /// Resource does not exist
    NotFound,
    /// Data will be delivered later through `set`/`set_not_found`
    Pending,
}

/// Source of resource data.
///
/// The context `C` is whatever the loader needs to build data, for example a
/// graphics backend that compiles meshes.
pub trait ResourceLoader<T, C: ?Sized> {
    /// Start loading `name`
    fn load(&mut self, name: &str, context: &mut C) -> Result<LoadOutcome<T>, ResourceError>;
}

struct Slot<T> {
    name: String,
    state: ResourceState,
    data: Option<T>,
}

/// Keyed resource slots with request/loaded/not-found bookkeeping
pub struct ResourceManager<T, C: ?Sized> {
    slots: HashMap<ResourceKey, Slot<T>>,
    loader: Option<Box<dyn ResourceLoader<T, C>>>,
    requested_count: usize,
    loaded_count: usize,
    not_found_count: usize,
}

impl<T, C: ?Sized> Default for ResourceManager<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: ?Sized> ResourceManager<T, C> {
    /// Create a manager without a loader
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            loader: None,
            requested_count: 0,
            loaded_count: 0,
            not_found_count: 0,
        }
    }

    /// Create a manager with `loader` installed
    pub fn with_loader(loader: impl ResourceLoader<T, C> + 'static) -> Self {
        let mut manager = Self::new();
        manager.set_loader(loader);
        manager
    }

    /// Install or replace the loader
    pub fn set_loader(&mut self, loader: impl ResourceLoader<T, C> + 'static) {
        self.loader = Some(Box::new(loader));
    }

    /// Request `name` from the loader unless it is already loading or loaded.
    ///
    /// Returns the state after the request. Keys that previously ended in
    /// `NotFound` are requested again.
    pub fn request(&mut self, name: &str, context: &mut C) -> Result<ResourceState, ResourceError> {
        let key = ResourceKey::from_name(name);
        if let Some(state) = self.state(key) {
            if state != ResourceState::NotFound {
                return Ok(state);
            }
        }

        let loader = self
            .loader
            .as_mut()
            .ok_or_else(|| ResourceError::NoLoader(name.to_string()))?;

        self.requested_count += 1;
        self.slots.insert(
            key,
            Slot {
                name: name.to_string(),
                state: ResourceState::Loading,
                data: None,
            },
        );
        log::debug!("Requested resource '{name}' ({key})");

        let outcome = match loader.load(name, context) {
            Ok(outcome) => outcome,
            Err(e) => {
                // A failed load leaves no slot behind so the next request retries
                self.slots.remove(&key);
                log::warn!("Loading resource '{name}' failed: {e}");
                return Err(e);
            }
        };

        match outcome {
            LoadOutcome::Loaded(data, policy) => self.set(name, data, policy)?,
            LoadOutcome::NotFound => self.set_not_found(name)?,
            LoadOutcome::Pending => {}
        }

        Ok(self.state(key).unwrap_or(ResourceState::Loading))
    }

    /// Store data for `name`
    pub fn set(&mut self, name: &str, data: T, policy: DataState) -> Result<(), ResourceError> {
        let key = ResourceKey::from_name(name);
        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            name: name.to_string(),
            state: ResourceState::Loading,
            data: None,
        });

        if slot.state == ResourceState::Final {
            return Err(ResourceError::AlreadyFinal(name.to_string()));
        }

        slot.data = Some(data);
        slot.state = match policy {
            DataState::Mutable => ResourceState::Mutable,
            DataState::Final => ResourceState::Final,
        };
        self.loaded_count += 1;
        log::debug!("Loaded resource '{}' as {:?}", slot.name, slot.state);
        Ok(())
    }

    /// Mark `name` as missing
    pub fn set_not_found(&mut self, name: &str) -> Result<(), ResourceError> {
        let key = ResourceKey::from_name(name);
        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            name: name.to_string(),
            state: ResourceState::Loading,
            data: None,
        });

        if slot.state == ResourceState::Final {
            return Err(ResourceError::AlreadyFinal(name.to_string()));
        }

        slot.state = ResourceState::NotFound;
        slot.data = None;
        self.not_found_count += 1;
        log::warn!("Resource '{name}' not found");
        Ok(())
    }

    /// State of `key`, `None` if never requested or set
    pub fn state(&self, key: impl Into<ResourceKey>) -> Option<ResourceState> {
        self.slots.get(&key.into()).map(|slot| slot.state)
    }

    /// Data of `name` only when it is `Final`
    pub fn resolved(&self, name: &str) -> Result<&T, ResourceError> {
        let slot = self.slots.get(&ResourceKey::from_name(name));
        match slot {
            Some(Slot {
                state: ResourceState::Final,
                data: Some(data),
                ..
            }) => Ok(data),
            Some(Slot {
                state: ResourceState::NotFound,
                ..
            }) => Err(ResourceError::NotFound(name.to_string())),
            other => Err(ResourceError::NotResolved {
                name: name.to_string(),
                state: other.map(|slot| slot.state),
            }),
        }
    }

    /// Data of `name` in `Mutable` or `Final` state
    pub fn get(&self, name: &str) -> Option<&T> {
        self.slots
            .get(&ResourceKey::from_name(name))
            .and_then(|slot| slot.data.as_ref())
    }

    /// Request `name` and return its `Final` data
    pub fn load_resolved(&mut self, name: &str, context: &mut C) -> Result<&T, ResourceError> {
        self.request(name, context)?;
        self.resolved(name)
    }

    /// Drop the slot for `name`, returning its data
    pub fn evict(&mut self, name: &str) -> Option<T> {
        self.slots
            .remove(&ResourceKey::from_name(name))
            .and_then(|slot| slot.data)
    }

    /// Number of loader invocations
    pub const fn requested_count(&self) -> usize {
        self.requested_count
    }

    /// Number of successful `set` calls
    pub const fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Number of `set_not_found` calls
    pub const fn not_found_count(&self) -> usize {
        self.not_found_count
    }

    /// Number of slots in any state
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot exists
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader over a fixed table; `"later"` is delivered asynchronously
    struct TableLoader;

    impl ResourceLoader<u32, Vec<String>> for TableLoader {
        fn load(&mut self, name: &str, calls: &mut Vec<String>) -> Result<LoadOutcome<u32>, ResourceError> {
            calls.push(name.to_string());
            Ok(match name {
                "one" => LoadOutcome::Loaded(1, DataState::Final),
                "draft" => LoadOutcome::Loaded(2, DataState::Mutable),
                "later" => LoadOutcome::Pending,
                "broken" => {
                    return Err(ResourceError::LoaderFailed {
                        name: name.to_string(),
                        reason: "corrupt".to_string(),
                    })
                }
                _ => LoadOutcome::NotFound,
            })
        }
    }

    #[test]
    fn test_request_loads_once() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);

        assert_eq!(manager.request("one", &mut calls), Ok(ResourceState::Final));
        assert_eq!(manager.request("one", &mut calls), Ok(ResourceState::Final));
        assert_eq!(calls, vec!["one"]);
        assert_eq!(manager.resolved("one"), Ok(&1));
        assert_eq!((manager.requested_count(), manager.loaded_count(), manager.not_found_count()), (1, 1, 0));
    }

    #[test]
    fn test_mutable_is_not_resolved() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        assert_eq!(manager.request("draft", &mut calls), Ok(ResourceState::Mutable));
        assert_eq!(manager.get("draft"), Some(&2));
        assert_eq!(
            manager.resolved("draft"),
            Err(ResourceError::NotResolved {
                name: "draft".to_string(),
                state: Some(ResourceState::Mutable)
            })
        );

        manager.set("draft", 3, DataState::Final).unwrap();
        assert_eq!(manager.resolved("draft"), Ok(&3));
        assert_eq!(
            manager.set("draft", 4, DataState::Final),
            Err(ResourceError::AlreadyFinal("draft".to_string()))
        );
    }

    #[test]
    fn test_pending_then_delivered() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        assert_eq!(manager.request("later", &mut calls), Ok(ResourceState::Loading));
        assert_eq!(manager.request("later", &mut calls), Ok(ResourceState::Loading));
        assert_eq!(calls.len(), 1);

        manager.set("later", 9, DataState::Final).unwrap();
        assert_eq!(manager.state("later"), Some(ResourceState::Final));
        assert_eq!(manager.resolved("later"), Ok(&9));
    }

    #[test]
    fn test_not_found_counts_and_retries() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        assert_eq!(manager.request("missing", &mut calls), Ok(ResourceState::NotFound));
        assert_eq!(manager.resolved("missing"), Err(ResourceError::NotFound("missing".to_string())));

        manager.request("missing", &mut calls).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(manager.not_found_count(), 2);
        assert_eq!(manager.requested_count(), 2);
    }

    #[test]
    fn test_loader_failure_and_missing_loader() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        assert!(matches!(
            manager.request("broken", &mut calls),
            Err(ResourceError::LoaderFailed { .. })
        ));
        assert_eq!(manager.state("broken"), None);

        let mut bare: ResourceManager<u32, Vec<String>> = ResourceManager::new();
        assert_eq!(
            bare.request("one", &mut calls),
            Err(ResourceError::NoLoader("one".to_string()))
        );
        assert_eq!(
            bare.resolved("one"),
            Err(ResourceError::NotResolved {
                name: "one".to_string(),
                state: None
            })
        );
    }

    /// Fails the first `failures` loads, then delivers `7` as final
    struct FlakyLoader {
        failures: u32,
    }

    impl ResourceLoader<u32, Vec<String>> for FlakyLoader {
        fn load(&mut self, name: &str, calls: &mut Vec<String>) -> Result<LoadOutcome<u32>, ResourceError> {
            calls.push(name.to_string());
            if self.failures > 0 {
                self.failures -= 1;
                return Err(ResourceError::LoaderFailed {
                    name: name.to_string(),
                    reason: "device busy".to_string(),
                });
            }
            Ok(LoadOutcome::Loaded(7, DataState::Final))
        }
    }

    #[test]
    fn test_retry_after_failed_load_resolves() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(FlakyLoader { failures: 1 });

        assert!(manager.request("mesh", &mut calls).is_err());
        assert_eq!(manager.state("mesh"), None);

        assert_eq!(manager.request("mesh", &mut calls), Ok(ResourceState::Final));
        assert_eq!(manager.resolved("mesh"), Ok(&7));
        assert_eq!(calls.len(), 2);
        assert_eq!(manager.requested_count(), 2);
        assert_eq!(manager.loaded_count(), 1);
    }

    #[test]
    fn test_final_cannot_become_not_found() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        manager.request("one", &mut calls).unwrap();

        assert_eq!(manager.set_not_found("one"), Err(ResourceError::AlreadyFinal("one".to_string())));
        assert_eq!(manager.state("one"), Some(ResourceState::Final));
        assert_eq!(manager.resolved("one"), Ok(&1));
        assert_eq!(manager.not_found_count(), 0);

        manager.set_not_found("other").unwrap();
        assert_eq!(manager.state("other"), Some(ResourceState::NotFound));
    }

    #[test]
    fn test_evict() {
        let mut calls = Vec::new();
        let mut manager = ResourceManager::with_loader(TableLoader);
        manager.request("one", &mut calls).unwrap();
        assert_eq!(manager.evict("one"), Some(1));
        assert!(manager.is_empty());
        assert_eq!(manager.state("one"), None);
    }
}
