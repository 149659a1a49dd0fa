use serde::{Deserialize, Serialize};
use std::fmt;

/// Logic type of a relationship. Codes outside the four standard ones are
/// carried verbatim in [`RelationshipType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipType {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
    Other(String),
}

impl RelationshipType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "PR_FS" => Self::FinishToStart,
            "PR_SS" => Self::StartToStart,
            "PR_FF" => Self::FinishToFinish,
            "PR_SF" => Self::StartToFinish,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::FinishToStart => "PR_FS",
            Self::StartToStart => "PR_SS",
            Self::FinishToFinish => "PR_FF",
            Self::StartToFinish => "PR_SF",
            Self::Other(code) => code,
        }
    }

    /// Short form used in reports, e.g. `FS`.
    pub fn abbreviation(&self) -> &str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for RelationshipType {
    fn from(value: String) -> Self {
        Self::from_code(&value)
    }
}

impl From<RelationshipType> for String {
    fn from(value: RelationshipType) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A logic link from `pred_task_id` to `task_id` (the successor).
///
/// Either end may name an activity that is not part of the parsed schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_pred_id: Option<String>,
    pub pred_task_id: String,
    pub task_id: String,
    #[serde(default)]
    pub pred_type: RelationshipType,
    #[serde(default)]
    pub lag_hr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pred_proj_id: Option<String>,
}

impl Relationship {
    pub fn new(
        pred_task_id: impl Into<String>,
        task_id: impl Into<String>,
        pred_type: RelationshipType,
    ) -> Self {
        Self {
            task_pred_id: None,
            pred_task_id: pred_task_id.into(),
            task_id: task_id.into(),
            pred_type,
            lag_hr: 0.0,
            proj_id: None,
            pred_proj_id: None,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.pred_task_id == self.task_id
    }
}
