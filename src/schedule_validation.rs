use crate::Schedule;
use std::collections::HashSet;
use std::fmt;

/// A data-quality finding. Issues never stop a parse or an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    DuplicateTaskId { proj_id: String, task_id: String },
    UnknownProject { task_id: String, proj_id: String },
    DanglingPredecessor { pred_task_id: String, task_id: String },
    DanglingSuccessor { pred_task_id: String, task_id: String },
    SelfLoop { task_id: String },
    LogicLoop,
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleIssue::DuplicateTaskId { proj_id, task_id } => {
                write!(f, "duplicate task id {task_id} in project {proj_id}")
            }
            ScheduleIssue::UnknownProject { task_id, proj_id } => {
                write!(f, "task {task_id} belongs to unknown project {proj_id}")
            }
            ScheduleIssue::DanglingPredecessor {
                pred_task_id,
                task_id,
            } => write!(
                f,
                "relationship {pred_task_id} -> {task_id} references missing predecessor"
            ),
            ScheduleIssue::DanglingSuccessor {
                pred_task_id,
                task_id,
            } => write!(
                f,
                "relationship {pred_task_id} -> {task_id} references missing successor"
            ),
            ScheduleIssue::SelfLoop { task_id } => {
                write!(f, "task {task_id} is its own predecessor")
            }
            ScheduleIssue::LogicLoop => write!(f, "relationships form a loop"),
        }
    }
}

pub fn validate_schedule(schedule: &Schedule) -> Vec<ScheduleIssue> {
    let mut issues = Vec::new();

    let project_ids: HashSet<&str> = schedule
        .projects()
        .iter()
        .map(|project| project.proj_id.as_str())
        .collect();
    let mut seen = HashSet::with_capacity(schedule.activities().len());
    for activity in schedule.activities() {
        if !seen.insert((activity.proj_id.as_str(), activity.task_id.as_str())) {
            issues.push(ScheduleIssue::DuplicateTaskId {
                proj_id: activity.proj_id.clone(),
                task_id: activity.task_id.clone(),
            });
        }
        if !activity.proj_id.is_empty()
            && !project_ids.is_empty()
            && !project_ids.contains(activity.proj_id.as_str())
        {
            issues.push(ScheduleIssue::UnknownProject {
                task_id: activity.task_id.clone(),
                proj_id: activity.proj_id.clone(),
            });
        }
    }

    let known = schedule.activity_ids();
    for rel in schedule.relationships() {
        if rel.is_self_loop() {
            issues.push(ScheduleIssue::SelfLoop {
                task_id: rel.task_id.clone(),
            });
        }
        if !known.contains(rel.pred_task_id.as_str()) {
            issues.push(ScheduleIssue::DanglingPredecessor {
                pred_task_id: rel.pred_task_id.clone(),
                task_id: rel.task_id.clone(),
            });
        }
        if !known.contains(rel.task_id.as_str()) {
            issues.push(ScheduleIssue::DanglingSuccessor {
                pred_task_id: rel.pred_task_id.clone(),
                task_id: rel.task_id.clone(),
            });
        }
    }

    // self loops are already reported on their own
    let dag = schedule.dag();
    let has_self_loop = schedule.relationships().iter().any(|rel| rel.is_self_loop());
    if !has_self_loop && dag.has_cycle() {
        issues.push(ScheduleIssue::LogicLoop);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activity, Project, Relationship, RelationshipType};

    #[test]
    fn clean_schedule_has_no_issues() {
        let schedule = Schedule::from_entities(
            None,
            vec![Project::new("P1")],
            vec![Activity::new("T1", "P1"), Activity::new("T2", "P1")],
            vec![Relationship::new("T1", "T2", RelationshipType::FinishToStart)],
            Vec::new(),
        );
        assert!(validate_schedule(&schedule).is_empty());
    }

    #[test]
    fn findings_are_collected_not_raised() {
        let schedule = Schedule::from_entities(
            None,
            vec![Project::new("P1")],
            vec![
                Activity::new("T1", "P1"),
                Activity::new("T1", "P1"),
                Activity::new("T5", "P7"),
            ],
            vec![
                Relationship::new("T0", "T1", RelationshipType::FinishToStart),
                Relationship::new("T1", "T1", RelationshipType::FinishToFinish),
            ],
            Vec::new(),
        );
        let issues = validate_schedule(&schedule);
        assert!(issues.contains(&ScheduleIssue::DuplicateTaskId {
            proj_id: "P1".into(),
            task_id: "T1".into()
        }));
        assert!(issues.contains(&ScheduleIssue::UnknownProject {
            task_id: "T5".into(),
            proj_id: "P7".into()
        }));
        assert!(issues.contains(&ScheduleIssue::DanglingPredecessor {
            pred_task_id: "T0".into(),
            task_id: "T1".into()
        }));
        assert!(issues.contains(&ScheduleIssue::SelfLoop {
            task_id: "T1".into()
        }));
        assert!(!issues.contains(&ScheduleIssue::LogicLoop));
    }

    #[test]
    fn two_task_loop_is_reported() {
        let schedule = Schedule::from_entities(
            None,
            Vec::new(),
            vec![Activity::new("A", "P1"), Activity::new("B", "P1")],
            vec![
                Relationship::new("A", "B", RelationshipType::FinishToStart),
                Relationship::new("B", "A", RelationshipType::FinishToStart),
            ],
            Vec::new(),
        );
        assert_eq!(validate_schedule(&schedule), vec![ScheduleIssue::LogicLoop]);
    }
}
