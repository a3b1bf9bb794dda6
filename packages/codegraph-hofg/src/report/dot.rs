//! Graphviz DOT export of the compacted HOFG

use crate::features::heap_flow::HeapFlowResult;
use crate::shared::models::ValueId;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

pub struct DotReporter;

impl DotReporter {
    /// Nodes are labelled `name (kind)`, edges with their guard conditions
    pub fn to_graph(result: &HeapFlowResult) -> DiGraph<String, String> {
        let mut graph: DiGraph<String, String> = DiGraph::new();
        let mut nodes: HashMap<ValueId, NodeIndex> = HashMap::new();

        for vertex in result.graph.vertices() {
            let label = format!("{} ({})", result.display(vertex.value), vertex.kind);
            nodes.insert(vertex.value, graph.add_node(label));
        }

        for edge in result.graph.edges() {
            let (Some(&tail), Some(&head)) =
                (nodes.get(&edge.tail.value), nodes.get(&edge.head.value))
            else {
                continue;
            };
            let label = edge
                .guards
                .iter()
                .map(|g| result.display(*g))
                .collect::<Vec<_>>()
                .join(" && ");
            graph.add_edge(tail, head, label);
        }

        graph
    }

    pub fn render(result: &HeapFlowResult) -> String {
        let graph = Self::to_graph(result);
        let has_guards = graph.edge_weights().any(|label| !label.is_empty());
        if has_guards {
            format!("{}", Dot::new(&graph))
        } else {
            format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
        }
    }
}
