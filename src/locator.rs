//! Store locator - maps logical store names to database files.
//!
//! The registry is fixed at construction. File existence is checked on every
//! call because the external application may create, delete or swap the
//! database between requests.

use crate::error::{ChatStoreError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Immutable mapping of logical store name -> database path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRegistry {
    stores: BTreeMap<String, PathBuf>,
}

impl StoreRegistry {
    pub fn new(stores: BTreeMap<String, PathBuf>) -> Self {
        Self { stores }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.stores.get(name).map(PathBuf::as_path)
    }

    /// Entries ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.stores.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, PathBuf> {
        &self.stores
    }
}

impl<K, V> FromIterator<(K, V)> for StoreRegistry
where
    K: Into<String>,
    V: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Resolves store names and verifies the backing file exists.
#[derive(Debug, Clone)]
pub struct StoreLocator {
    registry: StoreRegistry,
}

impl StoreLocator {
    pub fn new(registry: StoreRegistry) -> Self {
        Self { registry }
    }

    /// Registered stores. No filesystem check.
    pub fn stores(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Path registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Path> {
        self.registry
            .get(name)
            .ok_or_else(|| ChatStoreError::UnknownStore {
                name: name.to_string(),
            })
    }

    /// Resolve `name` and check the file is present right now.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let path = self.resolve(name)?;
        ensure_available(path)?;
        Ok(path.to_path_buf())
    }
}

/// Fail with `StoreMissing` unless `path` exists at call time.
pub fn ensure_available(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ChatStoreError::StoreMissing {
            path: path.to_path_buf(),
        })
    }
}
