use crate::{Activity, Relationship, RelationshipType};
use petgraph::Direction;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Logic carried by one edge of the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLink {
    pub pred_type: RelationshipType,
    pub lag_hr: f64,
}

/// Predecessor/successor graph over the parsed activities.
///
/// Parallel edges are kept. Relationships with an end outside the activity set
/// are not added as edges; they are listed in `unresolved` instead.
pub struct ScheduleDag {
    pub graph: DiGraph<String, EdgeLink>,
    pub id_to_index: HashMap<String, NodeIndex>,
    pub unresolved: Vec<(String, String)>,
}

impl ScheduleDag {
    pub fn build(activities: &[Activity], relationships: &[Relationship]) -> Self {
        let mut graph: DiGraph<String, EdgeLink> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut unresolved = Vec::new();

        // Add nodes first
        for activity in activities {
            if !id_to_index.contains_key(&activity.task_id) {
                let node_ix = graph.add_node(activity.task_id.clone());
                id_to_index.insert(activity.task_id.clone(), node_ix);
            }
        }

        // Add edges: pred -> task
        for rel in relationships {
            match (
                id_to_index.get(&rel.pred_task_id),
                id_to_index.get(&rel.task_id),
            ) {
                (Some(&u), Some(&v)) => {
                    graph.add_edge(
                        u,
                        v,
                        EdgeLink {
                            pred_type: rel.pred_type.clone(),
                            lag_hr: rel.lag_hr,
                        },
                    );
                }
                _ => unresolved.push((rel.pred_task_id.clone(), rel.task_id.clone())),
            }
        }

        Self {
            graph,
            id_to_index,
            unresolved,
        }
    }

    pub fn predecessor_ids(&self, task_id: &str) -> Vec<&str> {
        self.neighbor_ids(task_id, Direction::Incoming)
    }

    pub fn successor_ids(&self, task_id: &str) -> Vec<&str> {
        self.neighbor_ids(task_id, Direction::Outgoing)
    }

    /// Activities with no resolved predecessor.
    pub fn open_starts(&self) -> Vec<&str> {
        self.open_ends_in(Direction::Incoming)
    }

    /// Activities with no resolved successor.
    pub fn open_finishes(&self) -> Vec<&str> {
        self.open_ends_in(Direction::Outgoing)
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Activity ids in dependency order, or `None` when the logic loops.
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|ix| self.graph[ix].as_str()).collect())
    }

    fn neighbor_ids(&self, task_id: &str, direction: Direction) -> Vec<&str> {
        let Some(&ix) = self.id_to_index.get(task_id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(ix, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn open_ends_in(&self, direction: Direction) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&ix| self.graph.neighbors_directed(ix, direction).next().is_none())
            .map(|ix| self.graph[ix].as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activities(ids: &[&str]) -> Vec<Activity> {
        ids.iter().map(|id| Activity::new(*id, "P1")).collect()
    }

    fn fs(pred: &str, succ: &str) -> Relationship {
        Relationship::new(pred, succ, RelationshipType::FinishToStart)
    }

    #[test]
    fn schedule_dag_builds_edges_from_relationships() {
        // T1 -> {T2, T3}
        let dag = ScheduleDag::build(
            &activities(&["T1", "T2", "T3"]),
            &[fs("T1", "T2"), fs("T1", "T3")],
        );
        assert_eq!(dag.graph.node_count(), 3);
        assert_eq!(dag.graph.edge_count(), 2);
        assert_eq!(dag.successor_ids("T1"), vec!["T2", "T3"]);
        assert_eq!(dag.open_starts(), vec!["T1"]);
        assert_eq!(dag.open_finishes(), vec!["T2", "T3"]);
        assert_eq!(dag.topological_order().unwrap()[0], "T1");
    }

    #[test]
    fn dangling_edges_are_kept_aside() {
        let dag = ScheduleDag::build(&activities(&["T1"]), &[fs("T0", "T1")]);
        assert_eq!(dag.graph.edge_count(), 0);
        assert_eq!(dag.unresolved, vec![("T0".to_string(), "T1".to_string())]);
    }

    #[test]
    fn loops_are_detected() {
        let dag = ScheduleDag::build(&activities(&["A", "B"]), &[fs("A", "B"), fs("B", "A")]);
        assert!(dag.has_cycle());
        assert!(dag.topological_order().is_none());
    }
}
