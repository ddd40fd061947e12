//! Export adapter: renders the admissible-state graph (and, optionally, a
//! path overlay) into the flat node/edge records the visualisation
//! collaborator consumes.

use crate::model::Model;
use crate::path::PathOutcome;
use crate::state::State;
use crate::transitions::TransitionGraph;
use serde::Serialize;

/// A single exported node: a state's id and its rendered label.
#[derive(Debug, Clone, Serialize)]
pub struct ExportNode {
    /// The state's packed identity.
    pub id: u64,
    /// Multi-line `quantity_name magnitude/derivative` label.
    pub label: String,
}

/// A single exported edge.
#[derive(Debug, Clone, Serialize)]
pub struct ExportEdge {
    /// Source state id.
    pub from: u64,
    /// Target state id.
    pub to: u64,
    /// Whether this edge lies on the overlaid A* path.
    pub highlight: bool,
}

/// The full renderable graph: every admissible state as a node, every
/// transition as an edge.
#[derive(Debug, Clone, Serialize)]
pub struct ExportGraph {
    /// One node per admissible state.
    pub nodes: Vec<ExportNode>,
    /// One edge per transition.
    pub edges: Vec<ExportEdge>,
}

/// Render `graph` for visualisation. When `path` is `Some`, edges that lie
/// on the reconstructed path are marked `highlight: true`.
pub fn export_graph(model: &Model, graph: &TransitionGraph, path: Option<&PathOutcome>) -> ExportGraph {
    let predecessor = match path {
        Some(PathOutcome::Found(predecessor)) => Some(predecessor),
        _ => None,
    };

    let mut nodes: Vec<ExportNode> = graph
        .states
        .iter()
        .map(|(id, state)| ExportNode {
            id: id.0,
            label: label_for(model, state),
        })
        .collect();
    nodes.sort_by_key(|n| n.id);

    let mut edges: Vec<ExportEdge> = Vec::with_capacity(graph.edge_count());
    for (from, tos) in &graph.edges {
        for to in tos {
            let highlight = predecessor
                .map(|p| p.get(to) == Some(from))
                .unwrap_or(false);
            edges.push(ExportEdge {
                from: from.0,
                to: to.0,
                highlight,
            });
        }
    }
    edges.sort_by_key(|e| (e.from, e.to));

    ExportGraph { nodes, edges }
}

/// Render a state's label as one `quantity_name magnitude/derivative` line
/// per quantity, in the model's declared quantity order.
fn label_for(model: &Model, state: &State) -> String {
    let mut builder = String::new();
    for (quantity, (magnitude, derivative)) in model.quantities.iter().zip(state.values.iter()) {
        builder.push_str(&quantity.name);
        builder.push(' ');
        builder.push_str(&magnitude.to_string());
        builder.push('/');
        builder.push_str(&derivative.to_string());
        builder.push('\n');
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::enumerate_admissible_states;
    use crate::transitions::{generate_graph, DEFAULT_SUBSET_CAP};
    use crate::value::{Derivative, Landmark};

    #[test]
    fn label_enumerates_quantity_lines_in_declaration_order() {
        let model = Model::build(
            vec![],
            vec![],
            vec![
                ("inflow".into(), vec![Landmark::Null, Landmark::Pos], Derivative::ALL.to_vec(), true),
                ("volume".into(), vec![Landmark::Null, Landmark::Pos, Landmark::Max], Derivative::ALL.to_vec(), false),
            ],
            vec![],
        )
        .unwrap();
        let state = State::new(vec![(Landmark::Pos, Derivative::Up), (Landmark::Max, Derivative::Steady)]);
        let label = label_for(&model, &state);
        assert_eq!(label, "inflow POS/1\nvolume MAX/0\n");
    }

    #[test]
    fn export_without_path_marks_no_edges_as_highlighted() {
        let model = Model::build(
            vec![],
            vec![],
            vec![("volume".into(), vec![Landmark::Null, Landmark::Pos, Landmark::Max], Derivative::ALL.to_vec(), false)],
            vec![],
        )
        .unwrap();
        let states = enumerate_admissible_states(&model);
        let graph = generate_graph(&model, &states, DEFAULT_SUBSET_CAP);
        let exported = export_graph(&model, &graph, None);

        assert_eq!(exported.nodes.len(), graph.states.len());
        assert!(exported.edges.iter().all(|e| !e.highlight));
    }
}
