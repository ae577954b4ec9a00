#![cfg(feature = "sqlite")]

use floor_split::{
    ConfigSlot, DistributionConfig, KeyValueStore, STORAGE_KEY, SqliteStore, open_store,
};
use tempfile::TempDir;

#[test]
fn sqlite_store_round_trip_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("split.sqlite");

    let config = DistributionConfig::from_counts(7, &[3, 2, 2]).unwrap();
    {
        let slot = ConfigSlot::new(SqliteStore::new(&path).unwrap());
        slot.save(&config).unwrap();
    }

    let slot = ConfigSlot::new(SqliteStore::new(&path).unwrap());
    let loaded = slot.require().unwrap();
    assert_eq!(loaded.groups(), config.groups());
    assert_eq!(loaded.total_people(), 7);
}

#[test]
fn sqlite_store_get_set_remove() {
    let store = SqliteStore::in_memory().unwrap();
    assert_eq!(store.get("missing").unwrap(), None);

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn sqlite_malformed_record_loads_as_missing() {
    let store = SqliteStore::in_memory().unwrap();
    store.set(STORAGE_KEY, "{\"floors\":").unwrap();
    let slot = ConfigSlot::new(store);
    assert!(slot.load().is_none());
}

#[test]
fn open_store_picks_sqlite_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("split.db");
    let slot = ConfigSlot::new(open_store(&path).unwrap());
    slot.save(&DistributionConfig::default()).unwrap();
    let reopened = SqliteStore::new(&path).unwrap();
    assert!(reopened.get(STORAGE_KEY).unwrap().is_some());
}
