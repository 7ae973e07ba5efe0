use super::status::EntryStatus;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use serde::Serialize;

/// A volunteer work entry as stored in `work_entries`.
///
/// `version` is the optimistic-concurrency counter: every successful
/// mutation bumps it by exactly one, and every write is conditional on
/// the version the caller read.
#[derive(Debug, Clone, Serialize)]
pub struct WorkEntry {
    pub id: i64,
    pub entry_number: String, // immutable, e.g. "VH-2026-0042"
    pub owner_user_id: i64,
    pub creator_user_id: i64, // may differ from owner ("entered on behalf of")
    pub category: String,
    pub work_date: NaiveDate,
    pub time_from: Option<String>, // HH:MM
    pub time_to: Option<String>,   // HH:MM
    pub hours: f64,
    pub project: String,
    pub description: String,
    pub status: EntryStatus,
    pub reviewer_user_id: Option<i64>,
    pub reviewed_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub return_reason: Option<String>,
    pub is_corrected: bool,
    pub corrected_by_user_id: Option<i64>,
    pub corrected_at: Option<String>,
    pub correction_reason: Option<String>,
    pub original_hours: Option<f64>,
    pub submitted_at: Option<String>,
    pub version: i64,
    pub deleted_at: Option<String>,
    pub created_at: String,
}

impl WorkEntry {
    pub fn date_str(&self) -> String {
        self.work_date.format("%Y-%m-%d").to_string()
    }

    /// Baseline hours for audit comparison: the first-ever value once a
    /// correction has been applied, the current value otherwise.
    pub fn baseline_hours(&self) -> f64 {
        self.original_hours.unwrap_or(self.hours)
    }
}

/// Validate an hour amount: positive, at most 24, in 0.25 steps.
pub fn validate_hours(hours: f64) -> AppResult<()> {
    if !hours.is_finite() || hours <= 0.0 || hours > 24.0 {
        return Err(AppError::InvalidHours(format!(
            "{hours} (must be greater than 0 and at most 24)"
        )));
    }
    let quarters = hours * 4.0;
    if (quarters - quarters.round()).abs() > 1e-9 {
        return Err(AppError::InvalidHours(format!(
            "{hours} (must be a multiple of 0.25)"
        )));
    }
    Ok(())
}

/// Validate a free-text reason: required and not whitespace-only.
pub fn validate_reason(reason: &str, what: &str) -> AppResult<()> {
    if reason.trim().is_empty() {
        return Err(AppError::ValidationFailed(format!("{what} reason must not be blank")));
    }
    Ok(())
}
