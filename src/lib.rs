pub mod activity;
pub mod analytics;
pub mod dates;
pub mod graph;
pub mod metadata;
pub mod persistence;
pub mod relationship;
pub mod resource;
pub mod schedule;
pub mod schedule_validation;
pub mod xer;

pub use activity::Activity;
pub use analytics::{
    AnalyticsConfig, ConfigError, STANDARD_HOURS_PER_DAY, ScheduleAnalytics, ScheduleStatistics,
};
pub use dates::parse_xer_datetime;
pub use metadata::{ExportHeader, Project};
pub use persistence::{
    PersistenceError, PersistenceResult, load_schedule_from_json, save_activities_to_csv,
    save_schedule_to_json, schedule_from_json_str, schedule_to_json_string, write_activities_csv,
    write_schedule_json,
};
pub use relationship::{Relationship, RelationshipType};
pub use resource::ResourceAssignment;
pub use schedule::{Schedule, ScheduleView};
pub use schedule_validation::{ScheduleIssue, validate_schedule};
pub use xer::{XerError, XerResult, parse_bytes, parse_file, parse_files, parse_str};
