use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use super::{SchemaGraph, SchemaId};

/// Component-to-component references found in a resolved graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
  edges: IndexMap<String, IndexSet<String>>,
}

impl DependencyGraph {
  /// Walks each component's inline subtree and records the components it stops at.
  pub fn from_schema_graph(graph: &SchemaGraph) -> Self {
    let mut edges = IndexMap::new();

    for (name, id) in graph.components() {
      let mut deps = IndexSet::new();
      let mut visited = HashSet::new();
      let mut stack: Vec<SchemaId> = graph[id].children().into_iter().rev().collect();

      while let Some(next) = stack.pop() {
        if !visited.insert(next) {
          continue;
        }
        let model = &graph[next];
        if let Some(dep) = model.component_name() {
          deps.insert(dep.to_string());
          continue;
        }
        stack.extend(model.children().into_iter().rev());
      }

      edges.insert(name.to_string(), deps);
    }

    Self { edges }
  }

  pub fn dependencies_of(&self, component: &str) -> Option<&IndexSet<String>> {
    self.edges.get(component)
  }

  pub fn edges(&self) -> &IndexMap<String, IndexSet<String>> {
    &self.edges
  }

  pub fn cycles(&self) -> Vec<Vec<String>> {
    detect_cycles(&self.edges)
  }
}

/// Strongly connected components with more than one member, plus self-loops.
pub fn detect_cycles(dependencies: &IndexMap<String, IndexSet<String>>) -> Vec<Vec<String>> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for (node, deps) in dependencies {
    graph.add_node(node.as_str());
    for dep in deps {
      graph.add_edge(node.as_str(), dep.as_str(), ());
    }
  }

  let mut cycles = kosaraju_scc(&graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|scc| {
      let mut members = scc.into_iter().map(String::from).collect::<Vec<_>>();
      members.sort();
      members
    })
    .collect::<Vec<_>>();
  cycles.sort();
  cycles
}
