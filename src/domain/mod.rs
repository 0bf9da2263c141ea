pub mod activity;
pub mod views;

pub use activity::{normalize_description, Activity};
pub use views::{day_label, DayDetail, DaySummary};
