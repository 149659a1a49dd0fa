use crate::{Activity, Relationship};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// One standard work shift.
pub const STANDARD_HOURS_PER_DAY: f64 = 8.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("hours_per_day must be a positive number (got {0})")]
    InvalidHoursPerDay(f64),
}

/// Settings for converting exported hours into working days.
///
/// Every calendar in the file is treated as an 8 hour day unless the caller
/// overrides it here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_hours_per_day")]
    hours_per_day: f64,
}

fn default_hours_per_day() -> f64 {
    STANDARD_HOURS_PER_DAY
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            hours_per_day: STANDARD_HOURS_PER_DAY,
        }
    }
}

impl AnalyticsConfig {
    pub fn with_hours_per_day(hours_per_day: f64) -> Result<Self, ConfigError> {
        Self { hours_per_day }.validated()
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validated()
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&input)
    }

    pub fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(ConfigError::InvalidHoursPerDay(self.hours_per_day));
        }
        Ok(self)
    }
}

/// Roll-up numbers for a selected set of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub total_activities: usize,
    pub critical_activities: usize,
    pub completed_activities: usize,
    pub in_progress_activities: usize,
    pub not_started_activities: usize,
    pub total_relationships: usize,
    pub logic_density: f64,
    pub avg_duration_days: f64,
    pub avg_total_float_days: f64,
}

impl ScheduleStatistics {
    pub fn to_cli_summary(&self) -> String {
        let parts = [
            format!("activities={}", self.total_activities),
            format!("critical={}", self.critical_activities),
            format!("complete={}", self.completed_activities),
            format!("in_progress={}", self.in_progress_activities),
            format!("not_started={}", self.not_started_activities),
            format!("relationships={}", self.total_relationships),
            format!("logic_density={:.2}", self.logic_density),
            format!("avg_duration_days={:.1}", self.avg_duration_days),
            format!("avg_total_float_days={:.1}", self.avg_total_float_days),
        ];
        parts.join(", ")
    }
}

/// Derived flags and statistics over borrowed activities and relationships.
#[derive(Debug, Clone)]
pub struct ScheduleAnalytics<'a> {
    activities: Vec<&'a Activity>,
    relationships: Vec<&'a Relationship>,
    config: AnalyticsConfig,
}

impl<'a> ScheduleAnalytics<'a> {
    pub fn new<A, R>(activities: A, relationships: R, config: AnalyticsConfig) -> Self
    where
        A: IntoIterator<Item = &'a Activity>,
        R: IntoIterator<Item = &'a Relationship>,
    {
        Self {
            activities: activities.into_iter().collect(),
            relationships: relationships.into_iter().collect(),
            config,
        }
    }

    pub fn config(&self) -> AnalyticsConfig {
        self.config
    }

    pub fn critical(&self) -> Vec<&'a Activity> {
        self.select(Activity::is_critical)
    }

    pub fn completed(&self) -> Vec<&'a Activity> {
        self.select(Activity::is_complete)
    }

    pub fn in_progress(&self) -> Vec<&'a Activity> {
        self.select(Activity::is_in_progress)
    }

    pub fn not_started(&self) -> Vec<&'a Activity> {
        self.select(Activity::is_not_started)
    }

    /// Relationship endpoints per activity; `0.0` when there are no activities.
    pub fn logic_density(&self) -> f64 {
        if self.activities.is_empty() {
            return 0.0;
        }
        (self.relationships.len() * 2) as f64 / self.activities.len() as f64
    }

    pub fn avg_duration_days(&self) -> f64 {
        self.average_days(|activity| activity.duration_hr)
    }

    pub fn avg_total_float_days(&self) -> f64 {
        self.average_days(|activity| activity.total_float_hr)
    }

    pub fn statistics(&self) -> ScheduleStatistics {
        ScheduleStatistics {
            total_activities: self.activities.len(),
            critical_activities: self.count(Activity::is_critical),
            completed_activities: self.count(Activity::is_complete),
            in_progress_activities: self.count(Activity::is_in_progress),
            not_started_activities: self.count(Activity::is_not_started),
            total_relationships: self.relationships.len(),
            logic_density: self.logic_density(),
            avg_duration_days: self.avg_duration_days(),
            avg_total_float_days: self.avg_total_float_days(),
        }
    }

    fn select(&self, predicate: fn(&Activity) -> bool) -> Vec<&'a Activity> {
        self.activities
            .iter()
            .copied()
            .filter(|activity| predicate(activity))
            .collect()
    }

    fn count(&self, predicate: fn(&Activity) -> bool) -> usize {
        self.activities
            .iter()
            .filter(|activity| predicate(activity))
            .count()
    }

    fn average_days<F>(&self, hours: F) -> f64
    where
        F: Fn(&Activity) -> f64,
    {
        if self.activities.is_empty() {
            return 0.0;
        }
        let total: f64 = self.activities.iter().map(|activity| hours(activity)).sum();
        let mean_hours = total / self.activities.len() as f64;
        round_one_decimal(mean_hours / self.config.hours_per_day)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationshipType;

    fn activity(id: &str, duration_hr: f64, total_float_hr: f64) -> Activity {
        let mut activity = Activity::new(id, "P1");
        activity.duration_hr = duration_hr;
        activity.total_float_hr = total_float_hr;
        activity
    }

    fn no_links() -> Vec<&'static Relationship> {
        Vec::new()
    }

    #[test]
    fn empty_selection_has_zero_statistics() {
        let analytics = ScheduleAnalytics::new(
            Vec::<&Activity>::new(),
            Vec::<&Relationship>::new(),
            AnalyticsConfig::default(),
        );
        let stats = analytics.statistics();
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.logic_density, 0.0);
        assert_eq!(stats.avg_duration_days, 0.0);
        assert_eq!(stats.avg_total_float_days, 0.0);
    }

    #[test]
    fn averages_are_in_working_days_rounded() {
        let a = activity("A", 40.0, 0.0);
        let b = activity("B", 13.0, 20.0);
        let analytics = ScheduleAnalytics::new([&a, &b], no_links(), AnalyticsConfig::default());
        // (40 + 13) / 2 / 8 = 3.3125
        assert_eq!(analytics.avg_duration_days(), 3.3);
        assert_eq!(analytics.avg_total_float_days(), 1.3);
    }

    #[test]
    fn hours_per_day_override_changes_days() {
        let a = activity("A", 40.0, 0.0);
        let config = AnalyticsConfig::with_hours_per_day(10.0).unwrap();
        let analytics = ScheduleAnalytics::new([&a], no_links(), config);
        assert_eq!(analytics.avg_duration_days(), 4.0);
    }

    #[test]
    fn invalid_hours_per_day_is_rejected() {
        assert!(AnalyticsConfig::with_hours_per_day(0.0).is_err());
        assert!(AnalyticsConfig::with_hours_per_day(f64::NAN).is_err());
        assert!(AnalyticsConfig::from_json_str(r#"{"hours_per_day": -1}"#).is_err());
    }

    #[test]
    fn config_json_defaults_to_standard_shift() {
        let config = AnalyticsConfig::from_json_str("{}").unwrap();
        assert_eq!(config.hours_per_day(), STANDARD_HOURS_PER_DAY);
    }

    #[test]
    fn completion_buckets_partition_activities() {
        let mut done = activity("D", 8.0, 8.0);
        done.actual_start_date = Some("2024-01-02 08:00".into());
        done.actual_end_date = Some("2024-01-02 17:00".into());
        let mut running = activity("R", 8.0, 8.0);
        running.actual_start_date = Some("2024-01-03 08:00".into());
        running.phys_complete_pct = 50.0;
        let waiting = activity("W", 8.0, 8.0);
        let rel = Relationship::new("D", "R", RelationshipType::FinishToStart);

        let analytics =
            ScheduleAnalytics::new([&done, &running, &waiting], [&rel], AnalyticsConfig::default());
        let stats = analytics.statistics();
        assert_eq!(stats.completed_activities, 1);
        assert_eq!(stats.in_progress_activities, 1);
        assert_eq!(stats.not_started_activities, 1);
        assert_eq!(stats.critical_activities, 0);
        assert!((stats.logic_density - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(analytics.in_progress()[0].task_id, "R");
    }
}
