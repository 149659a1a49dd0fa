use super::{PersistenceError, PersistenceResult};
use crate::{
    Activity, ExportHeader, Project, Relationship, ResourceAssignment, Schedule, ScheduleView,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column order of the activity CSV: the activity fields as declared, then the
/// two derived flags.
pub const ACTIVITY_CSV_COLUMNS: [&str; 20] = [
    "task_id",
    "task_code",
    "task_name",
    "task_type",
    "status_code",
    "duration_hr",
    "total_float_hr",
    "free_float_hr",
    "target_start_date",
    "target_end_date",
    "actual_start_date",
    "actual_end_date",
    "remain_duration_hr",
    "phys_complete_pct",
    "wbs_id",
    "proj_id",
    "cstr_type",
    "cstr_date",
    "is_critical",
    "is_complete",
];

#[derive(Serialize, Deserialize)]
struct ActivityRecord {
    #[serde(flatten)]
    activity: Activity,
    // Derived on export; recomputed from the activity on load.
    #[serde(default)]
    is_critical: bool,
    #[serde(default)]
    is_complete: bool,
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            activity: activity.clone(),
            is_critical: activity.is_critical(),
            is_complete: activity.is_complete(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<ExportHeader>,
    #[serde(default)]
    project: Option<Project>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    activities: Vec<ActivityRecord>,
    #[serde(default)]
    relationships: Vec<Relationship>,
    #[serde(default)]
    resources: Vec<ResourceAssignment>,
}

impl ScheduleSnapshot {
    fn from_view(view: &ScheduleView<'_>) -> Self {
        Self {
            header: view.schedule().header().cloned(),
            project: view.header_project().cloned(),
            projects: view.projects().into_iter().cloned().collect(),
            activities: view
                .activities()
                .iter()
                .map(|activity| ActivityRecord::from(*activity))
                .collect(),
            relationships: view.relationships().iter().map(|rel| (*rel).clone()).collect(),
            resources: view
                .resources()
                .iter()
                .map(|assignment| (*assignment).clone())
                .collect(),
        }
    }

    fn into_schedule(self) -> PersistenceResult<Schedule> {
        let projects = if self.projects.is_empty() {
            self.project.into_iter().collect()
        } else {
            self.projects
        };
        let activities: Vec<Activity> = self
            .activities
            .into_iter()
            .map(|record| record.activity)
            .collect();

        for project in &projects {
            require_id("project", "proj_id", &project.proj_id)?;
        }
        for activity in &activities {
            require_id("activity", "task_id", &activity.task_id)?;
        }
        for rel in &self.relationships {
            require_id("relationship", "pred_task_id", &rel.pred_task_id)?;
            require_id("relationship", "task_id", &rel.task_id)?;
        }
        for assignment in &self.resources {
            require_id("resource", "task_id", &assignment.task_id)?;
            require_id("resource", "rsrc_id", &assignment.rsrc_id)?;
        }

        Ok(Schedule::from_entities(
            self.header,
            projects,
            activities,
            self.relationships,
            self.resources,
        ))
    }
}

fn require_id(entity: &str, field: &str, value: &str) -> PersistenceResult<()> {
    if value.trim().is_empty() {
        return Err(PersistenceError::InvalidData(format!(
            "{entity} with empty {field}"
        )));
    }
    Ok(())
}

pub fn write_schedule_json<W: Write>(view: &ScheduleView<'_>, writer: W) -> PersistenceResult<()> {
    serde_json::to_writer_pretty(writer, &ScheduleSnapshot::from_view(view))?;
    Ok(())
}

pub fn schedule_to_json_string(view: &ScheduleView<'_>) -> PersistenceResult<String> {
    Ok(serde_json::to_string_pretty(&ScheduleSnapshot::from_view(
        view,
    ))?)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    view: &ScheduleView<'_>,
    path: P,
) -> PersistenceResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_schedule_json(view, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn schedule_from_json_str(input: &str) -> PersistenceResult<Schedule> {
    let snapshot: ScheduleSnapshot = serde_json::from_str(input)?;
    snapshot.into_schedule()
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(std::io::BufReader::new(file))?;
    snapshot.into_schedule()
}

#[derive(Default, Serialize, Deserialize)]
struct ActivityCsvRecord {
    task_id: String,
    task_code: String,
    task_name: String,
    task_type: String,
    status_code: String,
    duration_hr: f64,
    total_float_hr: f64,
    free_float_hr: f64,
    target_start_date: String,
    target_end_date: String,
    actual_start_date: String,
    actual_end_date: String,
    remain_duration_hr: f64,
    phys_complete_pct: f64,
    wbs_id: String,
    proj_id: String,
    cstr_type: String,
    cstr_date: String,
    is_critical: bool,
    is_complete: bool,
}

impl From<&Activity> for ActivityCsvRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            task_id: activity.task_id.clone(),
            task_code: activity.task_code.clone(),
            task_name: activity.task_name.clone(),
            task_type: activity.task_type.clone(),
            status_code: activity.status_code.clone(),
            duration_hr: activity.duration_hr,
            total_float_hr: activity.total_float_hr,
            free_float_hr: activity.free_float_hr,
            target_start_date: activity.target_start_date.clone().unwrap_or_default(),
            target_end_date: activity.target_end_date.clone().unwrap_or_default(),
            actual_start_date: activity.actual_start_date.clone().unwrap_or_default(),
            actual_end_date: activity.actual_end_date.clone().unwrap_or_default(),
            remain_duration_hr: activity.remain_duration_hr,
            phys_complete_pct: activity.phys_complete_pct,
            wbs_id: activity.wbs_id.clone(),
            proj_id: activity.proj_id.clone(),
            cstr_type: activity.cstr_type.clone().unwrap_or_default(),
            cstr_date: activity.cstr_date.clone().unwrap_or_default(),
            is_critical: activity.is_critical(),
            is_complete: activity.is_complete(),
        }
    }
}

/// Writes one CSV row per activity. The header row is always written, even
/// for an empty selection.
pub fn write_activities_csv<'a, I, W>(activities: I, writer: W) -> PersistenceResult<()>
where
    I: IntoIterator<Item = &'a Activity>,
    W: Write,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(ACTIVITY_CSV_COLUMNS)?;
    for activity in activities {
        writer.serialize(ActivityCsvRecord::from(activity))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_activities_to_csv<'a, I, P>(activities: I, path: P) -> PersistenceResult<()>
where
    I: IntoIterator<Item = &'a Activity>,
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    write_activities_csv(activities, file)
}
