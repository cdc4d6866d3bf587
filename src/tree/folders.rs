use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

use crate::models::Folder;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub id: i64,
    pub name: String,
    pub children: Vec<FolderNode>,
}

/// Nest a project's flat folder list. Folders whose parent is not in the
/// list are dropped along with everything below them.
pub fn build_folder_tree(folders: &[Folder]) -> Vec<FolderNode> {
    let mut by_parent: HashMap<Option<i64>, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        by_parent.entry(folder.parent_id).or_default().push(folder);
    }

    let known: HashSet<i64> = folders.iter().map(|f| f.id).collect();
    for folder in folders {
        if let Some(parent) = folder.parent_id {
            if !known.contains(&parent) {
                warn!(folder = folder.id, parent, "dropping folder with missing parent");
            }
        }
    }

    let mut visiting = Vec::new();
    attach(None, &by_parent, &mut visiting)
}

fn attach(
    parent: Option<i64>,
    by_parent: &HashMap<Option<i64>, Vec<&Folder>>,
    visiting: &mut Vec<i64>,
) -> Vec<FolderNode> {
    let Some(children) = by_parent.get(&parent) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(children.len());
    for f in children {
        if visiting.contains(&f.id) {
            continue;
        }
        visiting.push(f.id);
        let node = FolderNode {
            id: f.id,
            name: f.name.clone(),
            children: attach(Some(f.id), by_parent, visiting),
        };
        visiting.pop();
        out.push(node);
    }
    out
}

/// Pre-order (depth, node) pairs for indented rendering.
pub fn walk(nodes: &[FolderNode]) -> Vec<(usize, &FolderNode)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &FolderNode)> = nodes.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.push((depth, node));
        stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: i64, name: &str, parent_id: Option<i64>) -> Folder {
        Folder {
            id,
            name: name.into(),
            parent_id,
        }
    }

    #[test]
    fn test_nests_by_parent() {
        let tree = build_folder_tree(&[
            folder(1, "Planos", None),
            folder(2, "Estructurales", Some(1)),
            folder(3, "Contratos", None),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children[0].name, "Estructurales");
        let names: Vec<&str> = walk(&tree).iter().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, vec!["Planos", "Estructurales", "Contratos"]);
    }

    #[test]
    fn test_orphans_are_dropped() {
        let tree = build_folder_tree(&[
            folder(1, "Planos", None),
            folder(5, "Huérfana", Some(40)),
            folder(6, "Nieta", Some(5)),
        ]);
        assert_eq!(walk(&tree).len(), 1);
    }

    #[test]
    fn test_self_parented_folder_terminates() {
        let tree = build_folder_tree(&[
            folder(1, "Planos", None),
            folder(2, "Bucle", Some(2)),
            folder(3, "Eléctricos", Some(1)),
            folder(4, "Detalles", Some(3)),
        ]);
        let names: Vec<&str> = walk(&tree).iter().map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(names, vec!["Planos", "Eléctricos", "Detalles"]);
        assert_eq!(walk(&tree)[2].0, 2);
    }
}
