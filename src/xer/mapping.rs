//! Typed entities from raw tables.
//!
//! Every field is looked up by name in the table's own header, so exports with
//! missing or reordered columns still map. Data fields never fail: numbers fall
//! back to `0.0`, empty dates become `None`, codes are kept verbatim. Rows that
//! lack an identifier field are skipped, never given a made-up id.

use super::extract::{Extraction, RawTable};
use crate::{Activity, Project, Relationship, RelationshipType, ResourceAssignment};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const PROJECT_TABLE: &str = "PROJECT";
pub const TASK_TABLE: &str = "TASK";
pub const TASKPRED_TABLE: &str = "TASKPRED";
pub const TASKRSRC_TABLE: &str = "TASKRSRC";

/// Tables the mapper turns into entities. Any other table is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownTable {
    Project,
    Task,
    TaskPred,
    TaskRsrc,
}

impl KnownTable {
    pub const ALL: [KnownTable; 4] = [
        KnownTable::Project,
        KnownTable::Task,
        KnownTable::TaskPred,
        KnownTable::TaskRsrc,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            PROJECT_TABLE => Some(Self::Project),
            TASK_TABLE => Some(Self::Task),
            TASKPRED_TABLE => Some(Self::TaskPred),
            TASKRSRC_TABLE => Some(Self::TaskRsrc),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Project => PROJECT_TABLE,
            Self::Task => TASK_TABLE,
            Self::TaskPred => TASKPRED_TABLE,
            Self::TaskRsrc => TASKRSRC_TABLE,
        }
    }
}

/// Numeric cell; empty, unparsable or non-finite text is `0.0`.
pub fn coerce_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn coerce_hours(raw: &str) -> f64 {
    coerce_number(raw)
}

pub fn coerce_percent(raw: &str) -> f64 {
    coerce_number(raw)
}

pub fn coerce_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

pub fn coerce_code(raw: &str) -> String {
    raw.trim().to_string()
}

fn coerce_id(raw: &str) -> Option<String> {
    Some(raw.trim())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Name-keyed access to the rows of one table.
pub struct TableReader<'a> {
    table: &'a RawTable,
    index: HashMap<&'a str, usize>,
}

impl<'a> TableReader<'a> {
    pub fn new(table: &'a RawTable) -> Self {
        let mut index = HashMap::with_capacity(table.fields.len());
        for (idx, field) in table.fields.iter().enumerate() {
            index.entry(field.as_str()).or_insert(idx);
        }
        Self { table, index }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.table.rows.iter().map(move |cells| RowView {
            index: &self.index,
            cells,
        })
    }
}

pub struct RowView<'r> {
    index: &'r HashMap<&'r str, usize>,
    cells: &'r [String],
}

impl RowView<'_> {
    /// Raw cell text, `""` when the column is absent.
    pub fn text(&self, field: &str) -> &str {
        self.index
            .get(field)
            .and_then(|&idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn hours(&self, field: &str) -> f64 {
        coerce_hours(self.text(field))
    }

    pub fn percent(&self, field: &str) -> f64 {
        coerce_percent(self.text(field))
    }

    pub fn number(&self, field: &str) -> f64 {
        coerce_number(self.text(field))
    }

    pub fn date(&self, field: &str) -> Option<String> {
        coerce_date(self.text(field))
    }

    pub fn code(&self, field: &str) -> String {
        coerce_code(self.text(field))
    }

    pub fn id(&self, field: &str) -> Option<String> {
        coerce_id(self.text(field))
    }
}

pub fn map_projects(table: &RawTable) -> Vec<Project> {
    let reader = TableReader::new(table);
    reader
        .rows()
        .enumerate()
        .filter_map(|(row_idx, row)| {
            let Some(proj_id) = row.id("proj_id") else {
                warn!(table = PROJECT_TABLE, row = row_idx, "row without proj_id, skipping");
                return None;
            };
            Some(Project {
                proj_id,
                proj_short_name: row.code("proj_short_name"),
                proj_name: row.code("proj_name"),
                plan_start_date: row.date("plan_start_date"),
                plan_end_date: row.date("plan_end_date"),
                scd_end_date: row.date("scd_end_date"),
                last_recalc_date: row.date("last_recalc_date"),
                status_code: row.code("status_code"),
            })
        })
        .collect()
}

pub fn map_activities(table: &RawTable) -> Vec<Activity> {
    let reader = TableReader::new(table);
    reader
        .rows()
        .enumerate()
        .filter_map(|(row_idx, row)| {
            let Some(task_id) = row.id("task_id") else {
                warn!(table = TASK_TABLE, row = row_idx, "row without task_id, skipping");
                return None;
            };
            Some(Activity {
                task_id,
                task_code: row.code("task_code"),
                task_name: row.code("task_name"),
                task_type: row.code("task_type"),
                status_code: row.code("status_code"),
                duration_hr: row.hours("target_drtn_hr_cnt"),
                total_float_hr: row.hours("total_float_hr_cnt"),
                free_float_hr: row.hours("free_float_hr_cnt"),
                target_start_date: row.date("target_start_date"),
                target_end_date: row.date("target_end_date"),
                actual_start_date: row.date("act_start_date"),
                actual_end_date: row.date("act_end_date"),
                remain_duration_hr: row.hours("remain_drtn_hr_cnt"),
                phys_complete_pct: row.percent("phys_complete_pct"),
                wbs_id: row.code("wbs_id"),
                proj_id: row.code("proj_id"),
                cstr_type: row.date("cstr_type"),
                cstr_date: row.date("cstr_date"),
            })
        })
        .collect()
}

pub fn map_relationships(table: &RawTable) -> Vec<Relationship> {
    let reader = TableReader::new(table);
    reader
        .rows()
        .enumerate()
        .filter_map(|(row_idx, row)| {
            let (Some(pred_task_id), Some(task_id)) = (row.id("pred_task_id"), row.id("task_id"))
            else {
                warn!(
                    table = TASKPRED_TABLE,
                    row = row_idx,
                    "row without pred_task_id or task_id, skipping"
                );
                return None;
            };
            Some(Relationship {
                task_pred_id: row.id("task_pred_id"),
                pred_task_id,
                task_id,
                pred_type: RelationshipType::from_code(row.text("pred_type")),
                lag_hr: row.hours("lag_hr_cnt"),
                proj_id: row.id("proj_id"),
                pred_proj_id: row.id("pred_proj_id"),
            })
        })
        .collect()
}

pub fn map_resources(table: &RawTable) -> Vec<ResourceAssignment> {
    let reader = TableReader::new(table);
    reader
        .rows()
        .enumerate()
        .filter_map(|(row_idx, row)| {
            let (Some(task_id), Some(rsrc_id)) = (row.id("task_id"), row.id("rsrc_id")) else {
                warn!(
                    table = TASKRSRC_TABLE,
                    row = row_idx,
                    "row without task_id or rsrc_id, skipping"
                );
                return None;
            };
            Some(ResourceAssignment {
                taskrsrc_id: row.code("taskrsrc_id"),
                task_id,
                rsrc_id,
                proj_id: row.id("proj_id"),
                target_qty: row.number("target_qty"),
                remain_qty: row.number("remain_qty"),
                actual_qty: row.number("act_reg_qty") + row.number("act_ot_qty"),
            })
        })
        .collect()
}

/// Activities exported without an owning project belong to the file's only
/// project, when there is exactly one.
fn adopt_sole_project(entities: &mut MappedEntities) {
    let [project] = entities.projects.as_slice() else {
        return;
    };
    for activity in &mut entities.activities {
        if activity.proj_id.is_empty() {
            activity.proj_id = project.proj_id.clone();
        }
    }
}

/// Entities of every known table in one extraction.
#[derive(Debug, Clone, Default)]
pub struct MappedEntities {
    pub projects: Vec<Project>,
    pub activities: Vec<Activity>,
    pub relationships: Vec<Relationship>,
    pub resources: Vec<ResourceAssignment>,
}

pub fn map_entities(extraction: &Extraction) -> MappedEntities {
    let mut entities = MappedEntities::default();
    for name in extraction.table_names() {
        let Some(table) = extraction.table(name) else {
            continue;
        };
        match KnownTable::from_name(name) {
            Some(KnownTable::Project) => entities.projects = map_projects(table),
            Some(KnownTable::Task) => entities.activities = map_activities(table),
            Some(KnownTable::TaskPred) => entities.relationships = map_relationships(table),
            Some(KnownTable::TaskRsrc) => entities.resources = map_resources(table),
            None => debug!(table = name, rows = table.row_count(), "ignoring table"),
        }
    }
    adopt_sole_project(&mut entities);
    entities
}
