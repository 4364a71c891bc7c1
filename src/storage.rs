use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::catalog::SkillCatalog;
use crate::goals::GoalTracker;

pub const SKILLS_KEY: &str = "skills";
pub const GOALS_KEY: &str = "goals";
pub const STORE_FILE: &str = "store.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value store the catalog and goals are persisted in.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// File-backed store. The whole map is rewritten on each `set` through a
/// temporary file and an atomic rename.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STORE_FILE);
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "store opened");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("tmp");
        let mut f = File::create(&temp)?;
        let content = serde_json::to_string_pretty(&self.entries)?;
        f.write_all(content.as_bytes())?;
        f.sync_all()?;
        fs::rename(temp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StorageError> {
    store
        .get(key)
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

fn save<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    store.set(key, serde_json::to_string(value)?)
}

/// Reads the catalog, falling back to the default skill set when nothing has
/// been stored yet.
pub fn load_catalog(store: &dyn KeyValueStore) -> Result<SkillCatalog, StorageError> {
    Ok(load(store, SKILLS_KEY)?.unwrap_or_else(SkillCatalog::with_defaults))
}

pub fn save_catalog(store: &mut dyn KeyValueStore, catalog: &SkillCatalog) -> Result<(), StorageError> {
    save(store, SKILLS_KEY, catalog)
}

pub fn load_goals(store: &dyn KeyValueStore) -> Result<GoalTracker, StorageError> {
    Ok(load(store, GOALS_KEY)?.unwrap_or_default())
}

pub fn save_goals(store: &mut dyn KeyValueStore, goals: &GoalTracker) -> Result<(), StorageError> {
    save(store, GOALS_KEY, goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogAction, CatalogChange};

    #[test]
    fn missing_catalog_falls_back_to_defaults() {
        let store = MemoryStore::default();
        let catalog = load_catalog(&store).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn file_store_round_trips_catalog_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::open(dir.path()).unwrap();
        let mut catalog = load_catalog(&store).unwrap();

        let skill = &catalog.skills()[1];
        let action = CatalogAction::ToggleModule {
            skill_id: skill.id.clone(),
            module_id: skill.learning_modules[0].id.clone(),
        };
        assert!(matches!(catalog.apply(action), Ok(CatalogChange::Toggled(_))));
        save_catalog(&mut store, &catalog).unwrap();

        let reopened = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(load_catalog(&reopened).unwrap(), catalog);
        assert!(!reopened.path().with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_entry_surfaces_json_error() {
        let mut store = MemoryStore::default();
        store.set(SKILLS_KEY, "{not json".to_string()).unwrap();
        assert!(matches!(load_catalog(&store), Err(StorageError::Json(_))));
    }

    #[test]
    fn goals_default_to_empty() {
        let store = MemoryStore::default();
        assert!(load_goals(&store).unwrap().goals().is_empty());
    }
}
