//! Category-tree traversal.
//!
//! Category trees are user-created and their depth is unbounded, so the
//! traversal here is iterative with an explicit stack rather than
//! recursive. A seen-set guards against malformed data containing cycles;
//! the schema should never produce one, but a corrupt tree must not hang
//! the traversal.

use std::collections::{HashMap, HashSet};

use crate::models::Category;

/// Collect `root` and every transitive child id from `categories`.
///
/// Used for subtree deletion and for "category or any descendant" demo
/// filtering. Each node is visited exactly once; the root id is included
/// even when it has no row in `categories`.
#[must_use]
pub fn descendant_ids(root: &str, categories: &[Category]) -> HashSet<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent_id.as_deref() {
            children.entry(parent).or_default().push(category.id.as_str());
        }
    }

    let mut collected: HashSet<String> = HashSet::new();
    let mut stack: Vec<&str> = vec![root];
    while let Some(id) = stack.pop() {
        if !collected.insert(id.to_owned()) {
            continue;
        }
        if let Some(kids) = children.get(id) {
            stack.extend(kids.iter().copied());
        }
    }
    collected
}
