//! Fewest-hop path search over the route graph.
//!
//! Paths are simple: a location never repeats, which bounds the search
//! even though the graph has cycles. Among all simple paths the one with
//! the fewest edges wins; ties go to the path discovered first when
//! neighbours are visited in configured order.

use tracing::trace;

use super::{RouteEdge, RouteGraph};
use crate::domain::LocationName;

impl RouteGraph {
    /// Find the fewest-hop simple path from `origin` to `destination`.
    ///
    /// Returns an empty vector when no path exists or when origin and
    /// destination are the same location.
    pub fn enumerate_shortest(
        &self,
        origin: &LocationName,
        destination: &LocationName,
    ) -> Vec<RouteEdge> {
        let mut path = Vec::new();
        let mut best: Option<Vec<&LocationName>> = None;
        self.shortest_from(origin, destination, &mut path, &mut best);

        let edges = best.map(|nodes| to_edges(&nodes)).unwrap_or_default();
        trace!(
            origin = %origin,
            destination = %destination,
            hops = edges.len(),
            "Shortest path resolved"
        );
        edges
    }

    /// Depth-first search that only keeps the first strictly shortest path.
    ///
    /// A branch already as long as the best path can't produce a strictly
    /// shorter one, so it is cut. This yields the same answer as
    /// collecting every simple path and picking the first minimal one.
    fn shortest_from<'a>(
        &'a self,
        current: &'a LocationName,
        destination: &LocationName,
        path: &mut Vec<&'a LocationName>,
        best: &mut Option<Vec<&'a LocationName>>,
    ) {
        if path.contains(&current) {
            return;
        }
        if best.as_ref().is_some_and(|b| path.len() + 1 >= b.len()) {
            return;
        }

        path.push(current);
        if current == destination {
            *best = Some(path.clone());
        } else {
            for next in self.neighbours(current) {
                self.shortest_from(next, destination, path, best);
            }
        }
        path.pop();
    }

    /// Every simple path from `origin` to `destination`, in discovery order.
    pub fn simple_paths(
        &self,
        origin: &LocationName,
        destination: &LocationName,
    ) -> Vec<Vec<RouteEdge>> {
        let mut path = Vec::new();
        let mut found = Vec::new();
        self.collect_from(origin, destination, &mut path, &mut found);
        found.iter().map(|nodes| to_edges(nodes)).collect()
    }

    fn collect_from<'a>(
        &'a self,
        current: &'a LocationName,
        destination: &LocationName,
        path: &mut Vec<&'a LocationName>,
        found: &mut Vec<Vec<&'a LocationName>>,
    ) {
        if path.contains(&current) {
            return;
        }

        path.push(current);
        if current == destination {
            found.push(path.clone());
        } else {
            for next in self.neighbours(current) {
                self.collect_from(next, destination, path, found);
            }
        }
        path.pop();
    }
}

fn to_edges(nodes: &[&LocationName]) -> Vec<RouteEdge> {
    nodes
        .windows(2)
        .map(|pair| RouteEdge::new(pair[0].clone(), pair[1].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{RouteGraphBuilder, solar_system};

    fn name(s: &str) -> LocationName {
        LocationName::parse(s).unwrap()
    }

    fn hops(edges: &[RouteEdge]) -> Vec<String> {
        let mut names: Vec<String> = edges.iter().map(|e| e.from.to_string()).collect();
        if let Some(last) = edges.last() {
            names.push(last.to.to_string());
        }
        names
    }

    #[test]
    fn earth_to_neptune_goes_via_uranus() {
        let graph = solar_system();
        let path = graph.enumerate_shortest(&name("Earth"), &name("Neptune"));
        assert_eq!(hops(&path), vec!["Earth", "Uranus", "Neptune"]);
    }

    #[test]
    fn reduced_graph_scenario() {
        let graph = RouteGraphBuilder::new()
            .add("Earth", &["Jupiter", "Uranus"])
            .add("Uranus", &["Saturn", "Neptune"])
            .build();
        let path = graph.enumerate_shortest(&name("Earth"), &name("Neptune"));
        assert_eq!(path.len(), 2);
        assert_eq!(hops(&path), vec!["Earth", "Uranus", "Neptune"]);
    }

    #[test]
    fn direct_route_is_single_edge() {
        let graph = solar_system();
        let path = graph.enumerate_shortest(&name("Mercury"), &name("Venus"));
        assert_eq!(path, vec![RouteEdge::new(name("Mercury"), name("Venus"))]);
    }

    #[test]
    fn cycles_do_not_loop() {
        let graph = solar_system();
        let path = graph.enumerate_shortest(&name("Mars"), &name("Neptune"));
        assert_eq!(hops(&path), vec!["Mars", "Venus", "Earth", "Uranus", "Neptune"]);
    }

    #[test]
    fn no_path_is_empty() {
        let graph = RouteGraphBuilder::new()
            .add("Earth", &["Mars"])
            .add("Venus", &["Earth"])
            .build();
        assert!(graph.enumerate_shortest(&name("Earth"), &name("Venus")).is_empty());
        assert!(graph.simple_paths(&name("Earth"), &name("Venus")).is_empty());
    }

    #[test]
    fn unknown_origin_is_empty() {
        let graph = solar_system();
        assert!(graph.enumerate_shortest(&name("Pluto"), &name("Earth")).is_empty());
    }

    #[test]
    fn same_origin_and_destination_is_empty() {
        let graph = solar_system();
        assert!(graph.enumerate_shortest(&name("Earth"), &name("Earth")).is_empty());
    }

    #[test]
    fn tie_goes_to_first_configured_neighbour() {
        let graph = RouteGraphBuilder::new()
            .add("A", &["C", "B"])
            .add("B", &["D"])
            .add("C", &["D"])
            .build();
        let path = graph.enumerate_shortest(&name("A"), &name("D"));
        assert_eq!(hops(&path), vec!["A", "C", "D"]);
    }

    #[test]
    fn shorter_path_found_later_wins() {
        let graph = RouteGraphBuilder::new()
            .add("A", &["B", "D"])
            .add("B", &["C"])
            .add("C", &["D"])
            .build();
        let path = graph.enumerate_shortest(&name("A"), &name("D"));
        assert_eq!(hops(&path), vec!["A", "D"]);
        assert_eq!(graph.simple_paths(&name("A"), &name("D")).len(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const NODES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

    /// Strategy for a random graph over six nodes with arbitrary edge order.
    fn graph_strategy() -> impl Strategy<Value = RouteGraph> {
        prop::collection::vec((0usize..6, 0usize..6), 0..20).prop_map(|edges| {
            let mut graph = RouteGraph::new();
            for (from, to) in edges {
                if from != to {
                    graph.add_route(
                        LocationName::parse(NODES[from]).unwrap(),
                        LocationName::parse(NODES[to]).unwrap(),
                    );
                }
            }
            graph
        })
    }

    proptest! {
        #[test]
        fn shortest_is_first_minimal_simple_path(
            graph in graph_strategy(),
            origin in 0usize..6,
            destination in 0usize..6,
        ) {
            prop_assume!(origin != destination);
            let origin = LocationName::parse(NODES[origin]).unwrap();
            let destination = LocationName::parse(NODES[destination]).unwrap();

            let all = graph.simple_paths(&origin, &destination);
            let shortest = graph.enumerate_shortest(&origin, &destination);

            match all.iter().map(Vec::len).min() {
                None => prop_assert!(shortest.is_empty()),
                Some(min) => {
                    let expected = all.iter().find(|p| p.len() == min).unwrap();
                    prop_assert_eq!(&shortest, expected);
                }
            }
        }

        #[test]
        fn paths_are_simple_and_connected(
            graph in graph_strategy(),
            origin in 0usize..6,
            destination in 0usize..6,
        ) {
            prop_assume!(origin != destination);
            let origin = LocationName::parse(NODES[origin]).unwrap();
            let destination = LocationName::parse(NODES[destination]).unwrap();

            for path in graph.simple_paths(&origin, &destination) {
                prop_assert_eq!(&path[0].from, &origin);
                prop_assert_eq!(&path[path.len() - 1].to, &destination);
                for pair in path.windows(2) {
                    prop_assert_eq!(&pair[0].to, &pair[1].from);
                }
                let mut visited: Vec<_> = path.iter().map(|e| &e.from).collect();
                visited.push(&destination);
                let unique: std::collections::HashSet<_> = visited.iter().collect();
                prop_assert_eq!(unique.len(), visited.len());
            }
        }
    }
}
