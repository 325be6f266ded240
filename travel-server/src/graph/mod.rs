//! Directed routing graph between locations.
//!
//! The graph is configuration: which locations exist and which directed
//! hops connect them. Neighbour lists keep the order they were configured
//! in, which makes path search deterministic. The set of nodes doubles as
//! the registry of location names a query may use.

mod error;
mod paths;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::LocationName;

pub use error::GraphError;

/// A directed hop between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteEdge {
    pub from: LocationName,
    pub to: LocationName,
}

impl RouteEdge {
    /// Creates a new edge.
    pub fn new(from: LocationName, to: LocationName) -> Self {
        Self { from, to }
    }
}

/// Directed adjacency between locations.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    /// Known locations, in first-seen order.
    locations: Vec<LocationName>,

    /// Outgoing neighbours of each location, in configured order.
    adjacency: HashMap<LocationName, Vec<LocationName>>,
}

/// On-disk shape of a route graph.
#[derive(Debug, Deserialize)]
struct GraphFile {
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    from: String,
    to: Vec<String>,
}

impl RouteGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directed route. Repeated routes are ignored.
    pub fn add_route(&mut self, from: LocationName, to: LocationName) {
        self.register(&from);
        self.register(&to);
        let neighbours = self.adjacency.entry(from).or_default();
        if !neighbours.contains(&to) {
            neighbours.push(to);
        }
    }

    fn register(&mut self, location: &LocationName) {
        if !self.adjacency.contains_key(location) {
            self.adjacency.insert(location.clone(), Vec::new());
            self.locations.push(location.clone());
        }
    }

    /// Outgoing neighbours of a location, in configured order.
    pub fn neighbours(&self, location: &LocationName) -> &[LocationName] {
        self.adjacency
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the location is part of the graph.
    pub fn contains(&self, location: &LocationName) -> bool {
        self.adjacency.contains_key(location)
    }

    /// Look up a location by name, rejecting names the graph doesn't know.
    pub fn resolve(&self, name: &str) -> Option<LocationName> {
        let name = LocationName::parse(name).ok()?;
        self.contains(&name).then_some(name)
    }

    /// All known locations, in first-seen order.
    pub fn locations(&self) -> &[LocationName] {
        &self.locations
    }

    /// Number of directed routes.
    pub fn route_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Returns true if the graph has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Parse a graph from JSON of the form
    /// `{"routes": [{"from": "Earth", "to": ["Jupiter", "Uranus"]}]}`.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_str(json)?;
        let mut graph = Self::new();

        let parse = |name: &str| {
            LocationName::parse(name).map_err(|source| GraphError::InvalidLocation {
                name: name.to_string(),
                source,
            })
        };

        for entry in &file.routes {
            let from = parse(&entry.from)?;
            for to in &entry.to {
                graph.add_route(from.clone(), parse(to)?);
            }
        }

        if graph.route_count() == 0 {
            return Err(GraphError::Empty);
        }
        Ok(graph)
    }

    /// Load a graph from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Builder for creating route graphs.
///
/// Provides a fluent API for adding routes. Invalid names are skipped.
#[derive(Debug, Default)]
pub struct RouteGraphBuilder {
    inner: RouteGraph,
}

impl RouteGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add routes from one location to each destination, in order.
    pub fn add(mut self, from: &str, to: &[&str]) -> Self {
        if let Ok(from) = LocationName::parse(from) {
            for name in to {
                if let Ok(to) = LocationName::parse(name) {
                    self.inner.add_route(from.clone(), to);
                }
            }
        }
        self
    }

    /// Build the route graph.
    pub fn build(self) -> RouteGraph {
        self.inner
    }
}

/// The eight-planet network served by default.
pub fn solar_system() -> RouteGraph {
    RouteGraphBuilder::new()
        .add("Mercury", &["Venus"])
        .add("Venus", &["Earth", "Mercury"])
        .add("Earth", &["Jupiter", "Uranus"])
        .add("Mars", &["Venus"])
        .add("Jupiter", &["Mars", "Venus"])
        .add("Saturn", &["Earth", "Neptune"])
        .add("Uranus", &["Saturn", "Neptune"])
        .add("Neptune", &["Uranus", "Mercury"])
        .build()
}
