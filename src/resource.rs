use serde::{Deserialize, Serialize};

/// Represents an assignment of a resource (person, crew, equipment) to an activity,
/// one row of the TASKRSRC table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAssignment {
    #[serde(default)]
    pub taskrsrc_id: String,
    /// Activity the resource works on. May name an activity outside the parsed set.
    pub task_id: String,
    pub rsrc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj_id: Option<String>,
    /// Planned units for the assignment.
    #[serde(default)]
    pub target_qty: f64,
    #[serde(default)]
    pub remain_qty: f64,
    /// Regular plus overtime units already spent.
    #[serde(default)]
    pub actual_qty: f64,
}

impl ResourceAssignment {
    pub fn new(
        taskrsrc_id: impl Into<String>,
        task_id: impl Into<String>,
        rsrc_id: impl Into<String>,
    ) -> Self {
        Self {
            taskrsrc_id: taskrsrc_id.into(),
            task_id: task_id.into(),
            rsrc_id: rsrc_id.into(),
            proj_id: None,
            target_qty: 0.0,
            remain_qty: 0.0,
            actual_qty: 0.0,
        }
    }

    /// Actual plus remaining units.
    pub fn at_completion_qty(&self) -> f64 {
        self.actual_qty + self.remain_qty
    }
}
