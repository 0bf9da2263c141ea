use crate::domain::Activity;
use crate::error::{Error, Result};
use chrono::{Duration, Local};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::files::{atomic_write, read_file};

/// Durable record store boundary
///
/// The engine treats the backend as an opaque, predicate-queryable record set
/// with an all-at-once commit. Physical format and migrations are the
/// backend's business.
pub trait RecordStore {
    /// Replace the committed record set with `records` in one durable write
    fn commit(&mut self, records: &[Activity]) -> Result<()>;

    /// Remove a single record permanently. Removing an absent id is a no-op.
    fn delete(&mut self, id: Uuid) -> Result<()>;

    /// Return all committed records matching `predicate`
    fn query(&self, predicate: &dyn Fn(&Activity) -> bool) -> Result<Vec<Activity>>;
}

/// File-backed store: the full record set as pretty JSON, written atomically
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open a store at `path`, verifying the existing content parses.
    /// A missing file is an empty store; unreadable content is a startup
    /// failure rather than a per-operation surprise.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.read_all()?;
        Ok(store)
    }

    /// Open the store at the default data directory location
    pub fn at_default_location() -> Result<Self> {
        let path = super::files::activities_file()
            .map_err(|e| Error::Persistence(format!("{e:#}")))?;
        Self::open(path)
    }

    fn read_all(&self) -> Result<Vec<Activity>> {
        let content =
            read_file(&self.path).map_err(|e| Error::Persistence(format!("{e:#}")))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, records: &[Activity]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        atomic_write(&self.path, &json).map_err(|e| Error::Persistence(format!("{e:#}")))
    }
}

impl RecordStore for JsonFileStore {
    fn commit(&mut self, records: &[Activity]) -> Result<()> {
        self.write_all(records)
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let mut records = self.read_all()?;
        records.retain(|r| r.id != id);
        self.write_all(&records)
    }

    fn query(&self, predicate: &dyn Fn(&Activity) -> bool) -> Result<Vec<Activity>> {
        let records = self.read_all()?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }
}

/// In-memory store for tests and previews
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Activity>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a handful of activities spread over recent days,
    /// alternating completed/incomplete
    pub fn with_sample_data() -> Self {
        let samples = [
            "Review quarterly reports",
            "Call dentist for appointment",
            "Grocery shopping",
            "Exercise for 30 minutes",
            "Read chapter 5",
        ];

        let records = samples
            .iter()
            .enumerate()
            .map(|(i, description)| {
                let created_at = Local::now() - Duration::days(i as i64);
                Activity {
                    id: Uuid::new_v4(),
                    description: description.to_string(),
                    created_at,
                    completed_at: if i % 2 == 0 { Some(created_at) } else { None },
                    archived: false,
                }
            })
            .collect();

        Self { records }
    }
}

impl RecordStore for MemoryStore {
    fn commit(&mut self, records: &[Activity]) -> Result<()> {
        self.records = records.to_vec();
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        self.records.retain(|r| r.id != id);
        Ok(())
    }

    fn query(&self, predicate: &dyn Fn(&Activity) -> bool) -> Result<Vec<Activity>> {
        Ok(self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }
}
