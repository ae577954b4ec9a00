use crate::distribution::DistributionConfig;
use crate::group::Group;
use crate::validation::{
    ValidationError, validate_group_count, validate_people_count, validate_total_people,
};
use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key of the one configuration slot.
pub const STORAGE_KEY: &str = "splitBillData";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid value: {0}")]
    Validation(#[from] ValidationError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Nothing usable is saved; the caller should send the user to the setup wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no split configuration saved; run the setup wizard first")]
pub struct ConfigurationMissing;

/// String key-value storage with no transactional guarantees.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PersistenceResult<()>;
    fn remove(&self, key: &str) -> PersistenceResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        (**self).remove(key)
    }
}

/// Process-local store, handy for tests and one-off sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> PersistenceResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PersistenceError::InvalidData("memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Opens the store for `path`: SQLite for `.sqlite`/`.db` files, a JSON
/// object file otherwise.
pub fn open_store<P: AsRef<Path>>(path: P) -> PersistenceResult<Box<dyn KeyValueStore>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let store: Box<dyn KeyValueStore> = match extension.as_deref() {
        #[cfg(feature = "sqlite")]
        Some("sqlite") | Some("db") => Box::new(sqlite::SqliteStore::new(path)?),
        #[cfg(not(feature = "sqlite"))]
        Some("sqlite") | Some("db") => {
            return Err(PersistenceError::InvalidData(format!(
                "{} needs the sqlite feature",
                path.display()
            )));
        }
        _ => Box::new(file::JsonFileStore::new(path)),
    };
    debug!(path = %path.display(), "opened key-value store");
    Ok(store)
}

/// The persisted record, field-for-field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    floors: i64,
    total_people: i64,
    #[serde(deserialize_with = "lenient_counts")]
    floor_people: BTreeMap<String, i64>,
    /// Legacy: holds the assigned head count, never read back.
    #[serde(default)]
    total_amount: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

/// Counts may be stored as numbers or as numeric strings (`"floor1": "2"`).
fn lenient_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let count = match &value {
                Value::Number(number) => number.as_i64(),
                Value::String(text) => text.trim().parse::<i64>().ok(),
                _ => None,
            };
            match count {
                Some(count) => Ok((key, count)),
                None => Err(<D::Error as de::Error>::custom(format!(
                    "people count for '{key}' is not a whole number: {value}"
                ))),
            }
        })
        .collect()
}

/// The timestamp is informational; an unparseable one reads as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        _ => None,
    })
}

impl StoredConfig {
    fn from_config(config: &DistributionConfig) -> Self {
        Self {
            floors: config.group_count() as i64,
            total_people: i64::from(config.total_people()),
            floor_people: config
                .groups()
                .iter()
                .map(|g| (g.storage_key(), i64::from(g.people_count)))
                .collect(),
            total_amount: config.assigned_people() as f64,
            created_at: Some(config.created_at().unwrap_or_else(Utc::now)),
        }
    }

    fn into_config(self) -> PersistenceResult<DistributionConfig> {
        let floors = validate_group_count(self.floors)?;
        let total_people = validate_total_people(self.total_people)?;

        let mut groups = Vec::with_capacity(self.floor_people.len());
        for (key, people) in self.floor_people {
            let id = Group::id_from_storage_key(&key).ok_or_else(|| {
                PersistenceError::InvalidData(format!("unexpected floor key '{key}'"))
            })?;
            groups.push(Group::new(id, validate_people_count(id, people)?));
        }
        groups.sort_by_key(|g| g.id);

        let ids_match = groups.len() == floors as usize
            && groups.iter().zip(1..=floors).all(|(g, id)| g.id == id);
        if !ids_match {
            return Err(PersistenceError::InvalidData(format!(
                "floorPeople must hold exactly floor1..floor{floors}"
            )));
        }

        Ok(DistributionConfig::from_parts(
            total_people,
            groups,
            self.created_at,
        ))
    }
}

pub fn encode_config(config: &DistributionConfig) -> PersistenceResult<String> {
    Ok(serde_json::to_string(&StoredConfig::from_config(config))?)
}

pub fn decode_config(raw: &str) -> PersistenceResult<DistributionConfig> {
    let stored: StoredConfig = serde_json::from_str(raw)?;
    stored.into_config()
}

/// The single saved configuration. Every save overwrites it.
pub struct ConfigSlot<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ConfigSlot<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&self, config: &DistributionConfig) -> PersistenceResult<()> {
        let raw = encode_config(config)?;
        self.store.set(&self.key, &raw)?;
        info!(
            key = %self.key,
            floors = config.group_count(),
            total_people = config.total_people(),
            "saved split configuration"
        );
        Ok(())
    }

    /// The saved configuration, or `None` when there is none. A record that
    /// cannot be read or decoded is logged and treated as absent.
    pub fn load(&self) -> Option<DistributionConfig> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no split configuration saved");
                return None;
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not read split configuration");
                return None;
            }
        };
        match decode_config(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring malformed split configuration");
                None
            }
        }
    }

    pub fn require(&self) -> Result<DistributionConfig, ConfigurationMissing> {
        self.load().ok_or(ConfigurationMissing)
    }

    pub fn clear(&self) -> PersistenceResult<()> {
        self.store.remove(&self.key)?;
        info!(key = %self.key, "cleared split configuration");
        Ok(())
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{JsonFileStore, export_report_to_csv, write_report_csv};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
