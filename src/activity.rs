use crate::dates;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A scheduled unit of work, one row of the TASK table.
///
/// Durations and floats are in hours, exactly as exported. Dates are kept as
/// the exported strings; see [`crate::parse_xer_datetime`] to interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub task_id: String,
    #[serde(default)]
    pub task_code: String,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_type: String,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub duration_hr: f64,
    #[serde(default)]
    pub total_float_hr: f64,
    #[serde(default)]
    pub free_float_hr: f64,
    #[serde(default)]
    pub target_start_date: Option<String>,
    #[serde(default)]
    pub target_end_date: Option<String>,
    #[serde(default)]
    pub actual_start_date: Option<String>,
    #[serde(default)]
    pub actual_end_date: Option<String>,
    #[serde(default)]
    pub remain_duration_hr: f64,
    #[serde(default)]
    pub phys_complete_pct: f64,
    #[serde(default)]
    pub wbs_id: String,
    /// Owning project; empty when the export carries none.
    #[serde(default)]
    pub proj_id: String,
    #[serde(default)]
    pub cstr_type: Option<String>,
    #[serde(default)]
    pub cstr_date: Option<String>,
}

impl Activity {
    pub fn new(task_id: impl Into<String>, proj_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            task_code: String::new(),
            task_name: String::new(),
            task_type: String::new(),
            status_code: String::new(),
            duration_hr: 0.0,
            total_float_hr: 0.0,
            free_float_hr: 0.0,
            target_start_date: None,
            target_end_date: None,
            actual_start_date: None,
            actual_end_date: None,
            remain_duration_hr: 0.0,
            phys_complete_pct: 0.0,
            wbs_id: String::new(),
            proj_id: proj_id.into(),
            cstr_type: None,
            cstr_date: None,
        }
    }

    /// Zero or negative total float puts the activity on the critical path.
    pub fn is_critical(&self) -> bool {
        self.total_float_hr <= 0.0
    }

    pub fn is_complete(&self) -> bool {
        self.phys_complete_pct >= 100.0 || self.actual_end_date.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.actual_start_date.is_some()
    }

    pub fn is_in_progress(&self) -> bool {
        self.is_started() && !self.is_complete()
    }

    pub fn is_not_started(&self) -> bool {
        !self.is_started() && !self.is_complete()
    }

    pub fn target_start(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.target_start_date.as_deref())
    }

    pub fn target_end(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.target_end_date.as_deref())
    }

    pub fn actual_start(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.actual_start_date.as_deref())
    }

    pub fn actual_end(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.actual_end_date.as_deref())
    }
}
