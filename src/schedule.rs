use crate::analytics::{AnalyticsConfig, ScheduleAnalytics, ScheduleStatistics};
use crate::graph::schedule_dag::ScheduleDag;
use crate::metadata::{ExportHeader, Project};
use crate::xer::MappedEntities;
use crate::{Activity, Relationship, ResourceAssignment};
use std::collections::HashSet;

/// Everything parsed from one interchange file.
///
/// A schedule is built once per parse and never mutated afterwards. Views,
/// analytics and exporters only borrow it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    header: Option<ExportHeader>,
    projects: Vec<Project>,
    activities: Vec<Activity>,
    relationships: Vec<Relationship>,
    resources: Vec<ResourceAssignment>,
}

impl Schedule {
    pub(crate) fn from_parts(header: Option<ExportHeader>, entities: MappedEntities) -> Self {
        Self {
            header,
            projects: entities.projects,
            activities: entities.activities,
            relationships: entities.relationships,
            resources: entities.resources,
        }
    }

    pub fn from_entities(
        header: Option<ExportHeader>,
        projects: Vec<Project>,
        activities: Vec<Activity>,
        relationships: Vec<Relationship>,
        resources: Vec<ResourceAssignment>,
    ) -> Self {
        Self {
            header,
            projects,
            activities,
            relationships,
            resources,
        }
    }

    pub fn header(&self) -> Option<&ExportHeader> {
        self.header.as_ref()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn resources(&self) -> &[ResourceAssignment] {
        &self.resources
    }

    /// The named project, or the first one in the file when `proj_id` is `None`.
    pub fn project(&self, proj_id: Option<&str>) -> Option<&Project> {
        match proj_id {
            Some(id) => self.projects.iter().find(|project| project.proj_id == id),
            None => self.projects.first(),
        }
    }

    pub fn find_activity(&self, task_id: &str) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.task_id == task_id)
    }

    /// Relationships that end at `task_id`.
    pub fn predecessors_of(&self, task_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.task_id == task_id)
            .collect()
    }

    /// Relationships that start at `task_id`.
    pub fn successors_of(&self, task_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.pred_task_id == task_id)
            .collect()
    }

    /// Relationships with at least one end outside the parsed activities.
    pub fn unresolved_relationships(&self) -> Vec<&Relationship> {
        let known = self.activity_ids();
        self.relationships
            .iter()
            .filter(|rel| {
                !known.contains(rel.pred_task_id.as_str()) || !known.contains(rel.task_id.as_str())
            })
            .collect()
    }

    pub fn assignments_for(&self, task_id: &str) -> Vec<&ResourceAssignment> {
        self.resources
            .iter()
            .filter(|assignment| assignment.task_id == task_id)
            .collect()
    }

    pub(crate) fn activity_ids(&self) -> HashSet<&str> {
        self.activities
            .iter()
            .map(|activity| activity.task_id.as_str())
            .collect()
    }

    /// The whole file: every project's activities together.
    pub fn view(&self) -> ScheduleView<'_> {
        ScheduleView {
            schedule: self,
            project: None,
            activities: self.activities.iter().collect(),
            relationships: self.relationships.iter().collect(),
            resources: self.resources.iter().collect(),
        }
    }

    /// One project's slice of the file. `None` selects the first project; an
    /// id that matches nothing gives an empty view.
    pub fn project_view(&self, proj_id: Option<&str>) -> ScheduleView<'_> {
        let selected_id = match proj_id {
            Some(id) => Some(id),
            None => self.projects.first().map(|project| project.proj_id.as_str()),
        };
        let Some(selected_id) = selected_id else {
            return ScheduleView {
                schedule: self,
                project: None,
                activities: Vec::new(),
                relationships: Vec::new(),
                resources: Vec::new(),
            };
        };

        let activities: Vec<&Activity> = self
            .activities
            .iter()
            .filter(|activity| activity.proj_id == selected_id)
            .collect();
        let member_ids: HashSet<&str> = activities
            .iter()
            .map(|activity| activity.task_id.as_str())
            .collect();
        let relationships = self
            .relationships
            .iter()
            .filter(|rel| {
                member_ids.contains(rel.task_id.as_str())
                    || rel.proj_id.as_deref() == Some(selected_id)
            })
            .collect();
        let resources = self
            .resources
            .iter()
            .filter(|assignment| {
                member_ids.contains(assignment.task_id.as_str())
                    || assignment.proj_id.as_deref() == Some(selected_id)
            })
            .collect();

        ScheduleView {
            schedule: self,
            project: self.project(Some(selected_id)),
            activities,
            relationships,
            resources,
        }
    }

    /// Whole-file statistics with the standard 8 hour day.
    pub fn statistics(&self) -> ScheduleStatistics {
        self.view().statistics()
    }

    pub fn dag(&self) -> ScheduleDag {
        ScheduleDag::build(&self.activities, &self.relationships)
    }
}

/// A borrowed selection of a schedule: the whole file or a single project.
#[derive(Debug, Clone)]
pub struct ScheduleView<'a> {
    schedule: &'a Schedule,
    project: Option<&'a Project>,
    activities: Vec<&'a Activity>,
    relationships: Vec<&'a Relationship>,
    resources: Vec<&'a ResourceAssignment>,
}

impl<'a> ScheduleView<'a> {
    pub fn schedule(&self) -> &'a Schedule {
        self.schedule
    }

    /// The selected project, `None` for a whole-file view.
    pub fn project(&self) -> Option<&'a Project> {
        self.project
    }

    /// The project that heads an export of this view.
    pub fn header_project(&self) -> Option<&'a Project> {
        self.project.or_else(|| self.schedule.project(None))
    }

    /// Projects covered by this view.
    pub fn projects(&self) -> Vec<&'a Project> {
        match self.project {
            Some(project) => vec![project],
            None => self.schedule.projects.iter().collect(),
        }
    }

    pub fn activities(&self) -> &[&'a Activity] {
        &self.activities
    }

    pub fn relationships(&self) -> &[&'a Relationship] {
        &self.relationships
    }

    pub fn resources(&self) -> &[&'a ResourceAssignment] {
        &self.resources
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn analytics(&self, config: AnalyticsConfig) -> ScheduleAnalytics<'a> {
        ScheduleAnalytics::new(
            self.activities.iter().copied(),
            self.relationships.iter().copied(),
            config,
        )
    }

    pub fn statistics(&self) -> ScheduleStatistics {
        self.analytics(AnalyticsConfig::default()).statistics()
    }
}
