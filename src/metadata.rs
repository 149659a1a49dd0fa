use crate::dates;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A project header row from the PROJECT table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub proj_id: String,
    #[serde(default)]
    pub proj_short_name: String,
    #[serde(default)]
    pub proj_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scd_end_date: Option<String>,
    /// Data date of the last schedule calculation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_recalc_date: Option<String>,
    #[serde(default)]
    pub status_code: String,
}

impl Project {
    pub fn new(proj_id: impl Into<String>) -> Self {
        Self {
            proj_id: proj_id.into(),
            proj_short_name: String::new(),
            proj_name: String::new(),
            plan_start_date: None,
            plan_end_date: None,
            scd_end_date: None,
            last_recalc_date: None,
            status_code: String::new(),
        }
    }

    /// Long name when present, otherwise the short name.
    pub fn display_name(&self) -> &str {
        if self.proj_name.trim().is_empty() {
            &self.proj_short_name
        } else {
            &self.proj_name
        }
    }

    pub fn planned_start(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.plan_start_date.as_deref())
    }

    pub fn planned_end(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.plan_end_date.as_deref())
    }

    pub fn data_date(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.last_recalc_date.as_deref())
    }
}

/// The `ERMHDR` line that opens an export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl ExportHeader {
    /// Builds the header from the cells following the `ERMHDR` token.
    pub fn from_cells<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cells = cells.into_iter().map(|cell| {
            let cell = cell.trim();
            (!cell.is_empty()).then(|| cell.to_string())
        });
        let mut next = || cells.next().flatten();
        Self {
            version: next(),
            export_date: next(),
            context: next(),
            user_login: next(),
            user_name: next(),
            database: next(),
            module: next(),
            currency: next(),
        }
    }

    pub fn exported_at(&self) -> Option<NaiveDateTime> {
        dates::parse_optional(self.export_date.as_deref())
    }
}
