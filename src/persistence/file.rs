use super::{KeyValueStore, PersistenceError, PersistenceResult};
use crate::split::{SplitReport, SplitResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key-value store backed by one JSON object file. The file is created on
/// first write; a missing file reads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_contents(&self) -> PersistenceResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn read_entries(&self) -> PersistenceResult<Map<String, Value>> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Map::new());
        };
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(PersistenceError::InvalidData(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Entries to modify before a write. Unreadable contents are discarded so
    /// the next write replaces them; the flag reports that they were.
    fn entries_for_update(&self) -> PersistenceResult<(Map<String, Value>, bool)> {
        let Some(contents) = self.read_contents()? else {
            return Ok((Map::new(), false));
        };
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => Ok((entries, false)),
            Ok(_) => {
                warn!(path = %self.path.display(), "store file is not a JSON object, replacing it");
                Ok((Map::new(), true))
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "store file is corrupt, replacing it");
                Ok((Map::new(), true))
            }
        }
    }

    /// Writes next to the target and renames over it, so a torn write never
    /// leaves a half-written store behind.
    fn write_entries(&self, entries: &Map<String, Value>) -> PersistenceResult<()> {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        let staging = self.path.with_file_name(file_name);

        let mut file = File::create(&staging)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        let entries = self.read_entries()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            // hand-edited files may nest the record instead of storing it as a string
            Some(other) => Ok(Some(other.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let (mut entries, _) = self.entries_for_update()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        let (mut entries, repaired) = self.entries_for_update()?;
        if entries.remove(key).is_some() || repaired {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct SplitCsvRecord {
    floor: u32,
    label: String,
    people: u32,
    original_amount: String,
    rounded_amount: String,
    difference: String,
    percentage: String,
    amount_per_person: String,
}

impl From<&SplitResult> for SplitCsvRecord {
    fn from(result: &SplitResult) -> Self {
        Self {
            floor: result.group_id,
            label: result.label.clone(),
            people: result.people_count,
            original_amount: format_money(result.raw_amount),
            rounded_amount: format_money(result.rounded_amount),
            difference: format_money(result.difference()),
            percentage: format!("{:.2}", result.percentage_of_total),
            amount_per_person: format_money(result.amount_per_person),
        }
    }
}

/// Writes one CSV row per floor, in creation order.
pub fn write_report_csv<W: Write>(report: &SplitReport, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for result in &report.results {
        writer.serialize(SplitCsvRecord::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_report_to_csv<P: AsRef<Path>>(report: &SplitReport, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    write_report_csv(report, file)
}

fn format_money(value: f64) -> String {
    format!("{value:.2}")
}
