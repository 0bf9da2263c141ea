use super::activity::Activity;
use chrono::{Datelike, NaiveDate};

/// One history bucket partitioned for display
///
/// Archived records land in `archived` regardless of completion; the other
/// two groups split the still-active records. Each group preserves the
/// bucket's original relative order.
#[derive(Debug, Clone, Default)]
pub struct DayDetail {
    pub incomplete: Vec<Activity>,
    pub completed: Vec<Activity>,
    pub archived: Vec<Activity>,
}

impl DayDetail {
    pub fn partition(activities: &[Activity]) -> Self {
        let mut detail = Self::default();
        for activity in activities {
            if activity.archived {
                detail.archived.push(activity.clone());
            } else if activity.is_completed() {
                detail.completed.push(activity.clone());
            } else {
                detail.incomplete.push(activity.clone());
            }
        }
        detail
    }
}

/// Per-day counts for a history list row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total: usize,
    pub completed: usize,
    pub archived: usize,
}

impl DaySummary {
    pub fn for_bucket(date: NaiveDate, activities: &[Activity]) -> Self {
        Self {
            date,
            total: activities.len(),
            completed: activities.iter().filter(|a| a.is_completed()).count(),
            archived: activities.iter().filter(|a| a.archived).count(),
        }
    }
}

/// Human label for a history day: "Today", "Yesterday", the weekday name
/// within the current week, or a formatted date
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.pred_opt() {
        "Yesterday".to_string()
    } else if date.iso_week() == today.iso_week() {
        date.format("%A").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}
