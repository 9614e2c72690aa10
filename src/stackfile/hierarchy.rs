//! Parent-inheritance graph helpers shared by validation and coverage.
//!
//! Every walk here is iterative and keeps its bookkeeping local to a single
//! call.

use super::types::Technology;
use std::collections::{HashMap, HashSet};

/// Maps each technology id that declares a parent to that parent id.
pub fn parent_map(technologies: &[Technology]) -> HashMap<&str, &str> {
    technologies
        .iter()
        .filter_map(|tech| tech.parent.as_deref().map(|parent| (tech.id.as_str(), parent)))
        .collect()
}

/// Finds every distinct inheritance cycle.
///
/// Each cycle is returned in traversal order, starting at the first member
/// reached twice from the technology whose walk uncovered it. Walks that
/// reach the same member set from different starting points are reported
/// once.
pub fn find_cycles(technologies: &[Technology]) -> Vec<Vec<String>> {
    let parents = parent_map(technologies);
    let mut reported: HashSet<Vec<&str>> = HashSet::new();
    let mut cycles = Vec::new();

    for tech in technologies {
        if !parents.contains_key(tech.id.as_str()) {
            continue;
        }

        let mut chain: Vec<&str> = Vec::new();
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut current = Some(tech.id.as_str());

        while let Some(id) = current {
            if let Some(&start) = position.get(id) {
                let members = &chain[start..];
                let mut key = members.to_vec();
                key.sort_unstable();
                if reported.insert(key) {
                    cycles.push(members.iter().map(|m| m.to_string()).collect());
                }
                break;
            }
            position.insert(id, chain.len());
            chain.push(id);
            current = parents.get(id).copied();
        }
    }

    cycles
}

/// Computes each technology's distance from its root ancestor.
///
/// Roots have depth 0. A parent id with no technology of its own counts as a
/// root. If a cycle slipped through, the id reached twice is treated as
/// depth 0 so the walk still terminates.
pub fn depth_map(technologies: &[Technology]) -> HashMap<&str, usize> {
    let parents = parent_map(technologies);
    let mut depths: HashMap<&str, usize> = HashMap::new();

    for tech in technologies {
        let mut chain: Vec<&str> = Vec::new();
        let mut on_chain: HashSet<&str> = HashSet::new();
        let mut current = tech.id.as_str();

        let base = loop {
            if let Some(&depth) = depths.get(current) {
                break depth;
            }
            if !on_chain.insert(current) {
                break 0;
            }
            match parents.get(current) {
                Some(&parent) => {
                    chain.push(current);
                    current = parent;
                }
                None => {
                    depths.insert(current, 0);
                    break 0;
                }
            }
        };

        for (offset, &id) in chain.iter().rev().enumerate() {
            depths.insert(id, base + offset + 1);
        }
    }

    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tech(id: &str, parent: Option<&str>) -> Technology {
        let tech = Technology::new(id, vec![format!("**/*.{}", id)]);
        match parent {
            Some(parent) => tech.with_parent(parent),
            None => tech,
        }
    }

    #[test]
    fn test_parent_map_skips_roots() {
        let techs = vec![tech("ts", None), tech("ts-test", Some("ts"))];
        let parents = parent_map(&techs);
        assert_eq!(parents.len(), 1);
        assert_eq!(parents.get("ts-test"), Some(&"ts"));
    }

    #[test]
    fn test_no_cycles_in_forest() {
        let techs = vec![
            tech("ts", None),
            tech("ts-test", Some("ts")),
            tech("ts-e2e", Some("ts-test")),
            tech("md", None),
        ];
        assert!(find_cycles(&techs).is_empty());
    }

    #[test]
    fn test_two_node_cycle_reported_once() {
        let techs = vec![tech("A", Some("B")), tech("B", Some("A"))];
        let cycles = find_cycles(&techs);
        assert_eq!(cycles, vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn test_three_node_cycle_traversal_order() {
        let techs = vec![
            tech("A", Some("C")),
            tech("B", Some("A")),
            tech("C", Some("B")),
        ];
        let cycles = find_cycles(&techs);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["A", "C", "B"]);
    }

    #[test]
    fn test_tail_leading_into_cycle_excluded_from_members() {
        let techs = vec![
            tech("leaf", Some("A")),
            tech("A", Some("B")),
            tech("B", Some("A")),
        ];
        let cycles = find_cycles(&techs);
        assert_eq!(cycles, vec![vec!["A".to_string(), "B".to_string()]]);
    }

    #[test]
    fn test_disjoint_cycles_reported_separately() {
        let techs = vec![
            tech("A", Some("B")),
            tech("B", Some("A")),
            tech("X", Some("Y")),
            tech("Y", Some("Z")),
            tech("Z", Some("X")),
        ];
        assert_eq!(find_cycles(&techs).len(), 2);
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let techs = vec![tech("A", Some("A"))];
        assert_eq!(find_cycles(&techs), vec![vec!["A".to_string()]]);
    }

    #[test]
    fn test_depths_follow_ancestor_chain() {
        let techs = vec![
            tech("ts-e2e", Some("ts-test")),
            tech("ts-test", Some("ts")),
            tech("ts", None),
            tech("md", None),
        ];
        let depths = depth_map(&techs);
        assert_eq!(depths["ts"], 0);
        assert_eq!(depths["md"], 0);
        assert_eq!(depths["ts-test"], 1);
        assert_eq!(depths["ts-e2e"], 2);
    }

    #[test]
    fn test_depth_with_unlisted_parent() {
        let techs = vec![tech("child", Some("ghost"))];
        let depths = depth_map(&techs);
        assert_eq!(depths["child"], 1);
    }

    #[test]
    fn test_depth_terminates_on_cycle() {
        let techs = vec![tech("A", Some("B")), tech("B", Some("A"))];
        let depths = depth_map(&techs);
        assert_eq!(depths["B"], 1);
        assert_eq!(depths["A"], 2);
    }
}
