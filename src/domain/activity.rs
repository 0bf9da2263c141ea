use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single logged activity
///
/// The creation timestamp alone decides which day the record belongs to;
/// completing or editing an activity never moves it between day buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique ID, assigned at creation and never changed
    pub id: Uuid,
    /// Short description of the activity (trimmed, never empty)
    pub description: String,
    /// When the activity was created; sole basis for day bucketing
    pub created_at: DateTime<Local>,
    /// When the activity was completed. `Some` exactly while completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    /// Cleared from the active list but retained for history
    #[serde(default)]
    pub archived: bool,
}

impl Activity {
    pub fn new(description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            created_at: Local::now(),
            completed_at: None,
            archived: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Flip completion state
    ///
    /// Sets `completed_at` to now on the incomplete→complete edge and clears
    /// it on the way back, so the timestamp and the state never disagree.
    pub fn toggle_completion(&mut self) {
        if self.completed_at.is_some() {
            self.completed_at = None;
        } else {
            self.completed_at = Some(Local::now());
        }
    }

    /// Mark as archived. One-way in normal flow; completion state is kept.
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Local calendar day this record is bucketed under
    pub fn created_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Trim a raw description, rejecting whitespace-only input
pub fn normalize_description(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
