use crate::domain::{normalize_description, Activity};
use crate::error::{Error, Result};
use crate::persistence::RecordStore;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Activity store and query engine
///
/// Holds the last committed record set in memory over a durable backend.
/// Every mutation builds a candidate set, commits it, and only then replaces
/// the cache, so a failed commit leaves observable state at the previous
/// committed value and a query issued after a successful mutation always
/// reflects it.
pub struct ActivityStore<S: RecordStore> {
    backend: S,
    records: Vec<Activity>,
}

impl<S: RecordStore> ActivityStore<S> {
    /// Open the store, loading the committed record set from the backend.
    /// Failing here means the store cannot be used at all; callers treat it
    /// as a fatal initialization error, not a per-operation one.
    pub fn open(backend: S) -> Result<Self> {
        let records = backend.query(&|_| true)?;
        debug!(count = records.len(), "activity store opened");
        Ok(Self { backend, records })
    }

    /// Create a new activity for today
    pub fn add(&mut self, description: &str) -> Result<Activity> {
        let description = Self::validate(description)?;
        let activity = Activity::new(description);

        let mut candidate = self.records.clone();
        candidate.push(activity.clone());
        self.backend.commit(&candidate)?;
        self.records = candidate;

        debug!(id = %activity.id, "added activity");
        Ok(activity)
    }

    /// Change an activity's description. Creation day and completion state
    /// are untouched.
    pub fn edit(&mut self, id: Uuid, new_description: &str) -> Result<Activity> {
        let description = Self::validate(new_description)?;
        let idx = self.position(id)?;

        let mut candidate = self.records.clone();
        candidate[idx].description = description;
        self.backend.commit(&candidate)?;
        self.records = candidate;

        Ok(self.records[idx].clone())
    }

    /// Flip completion state, keeping `completed_at` in lockstep
    pub fn toggle_completion(&mut self, id: Uuid) -> Result<Activity> {
        let idx = self.position(id)?;

        let mut candidate = self.records.clone();
        candidate[idx].toggle_completion();
        self.backend.commit(&candidate)?;
        self.records = candidate;

        Ok(self.records[idx].clone())
    }

    /// Permanently remove an activity
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        let idx = self.position(id)?;
        self.backend.delete(id)?;
        self.records.remove(idx);
        debug!(%id, "deleted activity");
        Ok(())
    }

    /// Archive every completed, non-archived activity created on `day` in one
    /// batch. Returns how many were archived; an empty set is a no-op.
    pub fn clear_completed(&mut self, day: NaiveDate) -> Result<usize> {
        let mut candidate = self.records.clone();
        let mut archived = 0;
        for record in &mut candidate {
            if record.created_day() == day && record.is_completed() && !record.archived {
                record.archive();
                archived += 1;
            }
        }

        if archived == 0 {
            return Ok(0);
        }

        self.backend.commit(&candidate)?;
        self.records = candidate;

        info!(%day, count = archived, "cleared completed activities");
        Ok(archived)
    }

    /// Today's active list: created on `day`, not archived, ascending by
    /// creation time. Completed-but-unarchived items stay in this list until
    /// explicitly cleared, even across a day rollover.
    pub fn query_today(&self, day: NaiveDate) -> Vec<Activity> {
        let mut todays: Vec<Activity> = self
            .records
            .iter()
            .filter(|r| r.created_day() == day && !r.archived)
            .cloned()
            .collect();
        todays.sort_by_key(|r| r.created_at);
        todays
    }

    /// All records (archived included) bucketed by creation day, most recent
    /// day first
    pub fn query_history(&self) -> Vec<(NaiveDate, Vec<Activity>)> {
        let mut buckets: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
        for record in &self.records {
            buckets
                .entry(record.created_day())
                .or_default()
                .push(record.clone());
        }
        buckets.into_iter().rev().collect()
    }

    pub fn get(&self, id: Uuid) -> Option<&Activity> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn validate(raw: &str) -> Result<String> {
        normalize_description(raw)
            .ok_or_else(|| Error::Validation("description is empty".to_string()))
    }
}
