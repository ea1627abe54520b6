//! Pure graph algorithms over the registry's adjacency snapshot.

use crate::error::{ModulithError, Result};
use std::collections::{HashMap, HashSet};

/// Depth-first cycle detection over the whole graph, lazy modules included.
/// A lazy module can still participate in a cycle that only surfaces once
/// something calls `get` on it.
pub(crate) fn detect_cycles(graph: &HashMap<String, Vec<String>>) -> Result<()> {
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();

    for name in graph.keys() {
        if !visited.contains(name.as_str()) {
            visit(name, graph, &mut visited, &mut stack)?;
        }
    }
    Ok(())
}

fn visit(
    name: &str,
    graph: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    stack: &mut HashSet<String>,
) -> Result<()> {
    if stack.contains(name) {
        return Err(ModulithError::CircularDependency {
            name: name.to_owned(),
        });
    }
    if !visited.insert(name.to_owned()) {
        return Ok(());
    }

    stack.insert(name.to_owned());
    for dep in graph.get(name).into_iter().flatten() {
        visit(dep, graph, visited, stack)?;
    }
    stack.remove(name);
    Ok(())
}

/// Depth-first post-order linearization: every dependency appears strictly
/// before its dependents.
///
/// With `include_lazy` unset (the `load_all` mode), traversals start only
/// from eager names. A lazy module still lands in the order when an eager
/// module depends on it; laziness only defers construction while nothing
/// eager needs it. Root names are sorted so the output is stable across
/// runs; relative order beyond the dependency constraint is unspecified.
pub(crate) fn topological_order(
    graph: &HashMap<String, Vec<String>>,
    lazy: &HashSet<String>,
    include_lazy: bool,
) -> Vec<String> {
    let mut roots: Vec<&String> = graph
        .keys()
        .filter(|name| include_lazy || !lazy.contains(name.as_str()))
        .collect();
    roots.sort();

    let mut visited = HashSet::new();
    let mut order = Vec::new();
    for root in roots {
        push_post_order(root, graph, &mut visited, &mut order);
    }
    order
}

fn push_post_order(
    name: &str,
    graph: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    order: &mut Vec<String>,
) {
    if !visited.insert(name.to_owned()) {
        return;
    }
    for dep in graph.get(name).into_iter().flatten() {
        push_post_order(dep, graph, visited, order);
    }
    order.push(name.to_owned());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        edges
            .iter()
            .map(|(name, deps)| {
                (
                    (*name).to_owned(),
                    deps.iter().map(|d| (*d).to_owned()).collect(),
                )
            })
            .collect()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn detects_self_dependency() {
        let g = graph(&[("a", &["a"])]);
        let err = detect_cycles(&g).unwrap_err();
        assert!(matches!(err, ModulithError::CircularDependency { name } if name == "a"));
    }

    #[test]
    fn detects_two_node_cycle() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert!(detect_cycles(&g).is_err());
    }

    #[test]
    fn detects_longer_cycle_behind_a_chain() {
        // d -> c -> b -> a -> c
        let g = graph(&[("a", &["c"]), ("b", &["a"]), ("c", &["b"]), ("d", &["c"])]);
        assert!(detect_cycles(&g).is_err());
    }

    #[test]
    fn accepts_dags() {
        let g = graph(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["b", "c"]),
        ]);
        detect_cycles(&g).unwrap();
    }

    #[test]
    fn chain_orders_dependencies_first() {
        let g = graph(&[("a", &[]), ("b", &["a"]), ("c", &["b"])]);
        let order = topological_order(&g, &HashSet::new(), false);
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn diamond_respects_every_edge() {
        let g = graph(&[
            ("top", &["left", "right"]),
            ("left", &["base"]),
            ("right", &["base"]),
            ("base", &[]),
        ]);
        let order = topological_order(&g, &HashSet::new(), false);

        assert_eq!(order.len(), 4);
        assert!(position(&order, "base") < position(&order, "left"));
        assert!(position(&order, "base") < position(&order, "right"));
        assert!(position(&order, "left") < position(&order, "top"));
        assert!(position(&order, "right") < position(&order, "top"));
    }

    #[test]
    fn lazy_modules_are_excluded_from_eager_order() {
        let g = graph(&[("eager", &[]), ("deferred", &[])]);
        let lazy = HashSet::from(["deferred".to_owned()]);

        let order = topological_order(&g, &lazy, false);
        assert_eq!(order, vec!["eager"]);

        let full = topological_order(&g, &lazy, true);
        assert_eq!(full.len(), 2);
    }

    #[test]
    fn lazy_dependency_of_eager_module_is_forced_into_order() {
        let g = graph(&[("eager", &["deferred"]), ("deferred", &[])]);
        let lazy = HashSet::from(["deferred".to_owned()]);

        let order = topological_order(&g, &lazy, false);
        assert_eq!(order, vec!["deferred", "eager"]);
    }
}
