use crate::error::InferenceError;
use crate::store::{Registry, VarId};
use std::collections::VecDeque;

/// Returns a topological order using Kahn's Algorithm.
///
/// Every parent appears before each of its children. Ties are broken
/// deterministically: roots are seeded in registry insertion order and children
/// are released in edge insertion order.
pub fn sort(registry: &Registry) -> Result<Vec<VarId>, InferenceError> {
    let count = registry.count();
    let mut in_degree = vec![0usize; count];
    let mut queue = VecDeque::with_capacity(count);
    let mut order = Vec::with_capacity(count);

    // 1. Initialize In-Degrees O(N)
    for id in registry.variables() {
        in_degree[id.index()] = registry.get_parents(id).len();
        if in_degree[id.index()] == 0 {
            queue.push_back(id);
        }
    }

    // 2. Process Queue
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &child in registry.get_children(node) {
            let child_idx = child.index();
            in_degree[child_idx] -= 1;
            if in_degree[child_idx] == 0 {
                queue.push_back(child);
            }
        }
    }

    if order.len() != count {
        return Err(InferenceError::CyclicNetwork { ordered: order.len(), total: count });
    }

    Ok(order)
}
