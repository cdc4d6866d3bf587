use std::collections::{HashMap, HashSet};

use super::cycle;
use crate::error::ObraError;
use crate::models::{Task, TaskNode};

/// Task records keyed by id with parent pointers. The nested and flat views
/// are derived on demand.
#[derive(Debug, Clone, Default)]
pub struct TaskArena {
    records: HashMap<i64, Task>,
    children: HashMap<i64, Vec<i64>>,
    roots: Vec<i64>,
}

impl TaskArena {
    /// Build from the nested tree the project detail endpoint returns.
    /// Children are linked by nesting; `parent_id` is set to match.
    pub fn from_tree(nodes: Vec<TaskNode>) -> Self {
        let mut arena = Self::default();
        let mut stack: Vec<(Option<i64>, TaskNode)> =
            nodes.into_iter().rev().map(|n| (None, n)).collect();

        while let Some((parent, node)) = stack.pop() {
            let TaskNode { mut task, subtasks } = node;
            let id = task.id;
            if arena.records.contains_key(&id) {
                continue;
            }
            task.parent_id = parent;
            match parent {
                Some(p) => arena.children.entry(p).or_default().push(id),
                None => arena.roots.push(id),
            }
            arena.records.insert(id, task);
            for child in subtasks.into_iter().rev() {
                stack.push((Some(id), child));
            }
        }
        arena
    }

    /// Build from flat records linked by `parent_id`. Records whose parent
    /// is not in the set become roots. Input order is kept among siblings.
    pub fn from_records(tasks: Vec<Task>) -> Self {
        let ids: HashSet<i64> = tasks.iter().map(|t| t.id).collect();
        let mut arena = Self::default();
        for task in tasks {
            if arena.records.contains_key(&task.id) {
                continue;
            }
            match task.parent_id.filter(|p| ids.contains(p) && *p != task.id) {
                Some(p) => arena.children.entry(p).or_default().push(task.id),
                None => arena.roots.push(task.id),
            }
            arena.records.insert(task.id, task);
        }
        arena
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.records.get(&id)
    }

    pub fn require(&self, id: i64) -> Result<&Task, ObraError> {
        self.get(id).ok_or_else(|| ObraError::not_found("Task", id))
    }

    pub fn contains(&self, id: i64) -> bool {
        self.records.contains_key(&id)
    }

    /// Mutate one record in place. Parent links are not touched.
    pub fn update<F>(&mut self, id: i64, f: F) -> Result<&Task, ObraError>
    where
        F: FnOnce(&mut Task),
    {
        let task = self
            .records
            .get_mut(&id)
            .ok_or_else(|| ObraError::not_found("Task", id))?;
        f(task);
        Ok(task)
    }

    pub fn roots(&self) -> &[i64] {
        &self.roots
    }

    pub fn children_of(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: i64) -> bool {
        !self.children_of(id).is_empty()
    }

    pub fn parent_of(&self, id: i64) -> Option<i64> {
        self.records.get(&id).and_then(|t| t.parent_id)
    }

    /// Pre-order ids with their depth (roots at 0).
    pub fn flatten_with_depth(&self) -> Vec<(usize, &Task)> {
        let mut out = Vec::with_capacity(self.records.len());
        let mut stack: Vec<(usize, i64)> = self.roots.iter().rev().map(|&id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            let Some(task) = self.records.get(&id) else {
                continue;
            };
            out.push((depth, task));
            for &child in self.children_of(id).iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }

    /// Every task once, parents before their children.
    pub fn flatten(&self) -> Vec<&Task> {
        self.flatten_with_depth().into_iter().map(|(_, t)| t).collect()
    }

    /// Rebuild the nested view.
    pub fn to_tree(&self) -> Vec<TaskNode> {
        self.roots.iter().filter_map(|&id| self.node(id)).collect()
    }

    fn node(&self, id: i64) -> Option<TaskNode> {
        let task = self.records.get(&id)?.clone();
        let subtasks = self
            .children_of(id)
            .iter()
            .filter_map(|&c| self.node(c))
            .collect();
        Some(TaskNode { task, subtasks })
    }

    /// All ids below `id`, pre-order, excluding `id` itself.
    pub fn descendants(&self, id: i64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut stack: Vec<i64> = self.children_of(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev());
        }
        out
    }

    /// Reject moving `id` under itself or one of its descendants.
    pub fn check_reparent(&self, id: i64, new_parent: Option<i64>) -> Result<(), ObraError> {
        self.require(id)?;
        let Some(parent) = new_parent else {
            return Ok(());
        };
        self.require(parent)?;

        let nodes: Vec<i64> = self.records.keys().copied().collect();
        let edges: Vec<(i64, i64)> = self
            .records
            .values()
            .filter(|t| t.id != id)
            .filter_map(|t| t.parent_id.map(|p| (t.id, p)))
            .collect();
        cycle::would_create_cycle(&nodes, &edges, id, parent).map_err(|_| {
            ObraError::cycle_detected(format!(
                "Cannot move task {id} under task {parent}: it would become its own ancestor"
            ))
        })
    }
}

/// Pre-order flattening of a nested task tree with `subtasks` stripped.
pub fn flatten_tree(nodes: &[TaskNode]) -> Vec<Task> {
    let mut out = Vec::new();
    let mut stack: Vec<&TaskNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node.task.clone());
        stack.extend(node.subtasks.iter().rev());
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::{Priority, TaskStatus};

    pub(crate) fn task(id: i64, parent_id: Option<i64>) -> Task {
        Task {
            id,
            name: format!("Tarea {id}"),
            description: None,
            start_date: None,
            end_date: None,
            actual_start_date: None,
            actual_end_date: None,
            parent_id,
            priority: Priority::Medium,
            status: TaskStatus::Pending,
            progress: 0,
            responsible_user_id: None,
            responsible_user: None,
            dependencies: None,
        }
    }

    fn node(id: i64, subtasks: Vec<TaskNode>) -> TaskNode {
        TaskNode {
            task: task(id, None),
            subtasks,
        }
    }

    /// 1 ─┬─ 2 ─── 3
    ///    └─ 4
    /// 5
    fn sample() -> Vec<TaskNode> {
        vec![
            node(1, vec![node(2, vec![node(3, vec![])]), node(4, vec![])]),
            node(5, vec![]),
        ]
    }

    #[test]
    fn test_flatten_tree_is_preorder_and_complete() {
        let flat = flatten_tree(&sample());
        let ids: Vec<i64> = flat.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_arena_flatten_matches_free_function() {
        let arena = TaskArena::from_tree(sample());
        assert_eq!(arena.len(), 5);
        let ids: Vec<i64> = arena.flatten().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(arena.parent_of(3), Some(2));
        assert_eq!(arena.parent_of(1), None);

        let depths: Vec<usize> = arena.flatten_with_depth().iter().map(|(d, _)| *d).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_every_parent_precedes_its_children() {
        let arena = TaskArena::from_tree(sample());
        let order: Vec<i64> = arena.flatten().iter().map(|t| t.id).collect();
        for t in arena.flatten() {
            if let Some(p) = t.parent_id {
                let pi = order.iter().position(|&x| x == p).unwrap();
                let ci = order.iter().position(|&x| x == t.id).unwrap();
                assert!(pi < ci);
            }
        }
    }

    #[test]
    fn test_from_records_orphans_become_roots() {
        let arena = TaskArena::from_records(vec![task(1, None), task(2, Some(1)), task(3, Some(99))]);
        assert_eq!(arena.roots(), &[1, 3]);
        assert_eq!(arena.children_of(1), &[2]);
    }

    #[test]
    fn test_to_tree_roundtrips_structure() {
        let arena = TaskArena::from_tree(sample());
        let tree = arena.to_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].subtasks.len(), 2);
        assert_eq!(tree[0].subtasks[0].subtasks[0].task.id, 3);
    }

    #[test]
    fn test_update_by_id() {
        let mut arena = TaskArena::from_tree(sample());
        arena.update(3, |t| t.progress = 50).unwrap();
        assert_eq!(arena.get(3).unwrap().progress, 50);
        assert_eq!(arena.update(42, |_| {}).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_descendants() {
        let arena = TaskArena::from_tree(sample());
        assert_eq!(arena.descendants(1), vec![2, 3, 4]);
        assert!(arena.descendants(5).is_empty());
    }

    #[test]
    fn test_check_reparent_rejects_descendant() {
        let arena = TaskArena::from_tree(sample());
        let err = arena.check_reparent(1, Some(3)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CycleDetected);
        assert!(arena.check_reparent(1, Some(1)).is_err());
        assert!(arena.check_reparent(3, Some(5)).is_ok());
        assert!(arena.check_reparent(2, None).is_ok());
    }
}
