use serde::Serialize;

use crate::model::population::{PopId, PopulationTree};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: Option<u64>,
    pub consensus: Option<f64>,
    /// Filled in by the renderer.
    pub stroke: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SankeyGraph {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// Flattens the tree for a graph-layout engine. Node indices are pre-order
/// positions, the same numbering the population palette uses.
pub fn create_nodes_and_links(tree: &PopulationTree) -> SankeyGraph {
    let order = tree.preorder();
    let mut index_of = vec![0usize; tree.size()];
    for (idx, id) in order.iter().enumerate() {
        index_of[id.0] = idx;
    }

    let nodes = order
        .iter()
        .map(|&id| SankeyNode {
            name: tree.node(id).name().to_string(),
        })
        .collect();

    let mut links = Vec::with_capacity(tree.size().saturating_sub(1));
    push_links(tree, tree.root_id(), &index_of, &mut links);

    SankeyGraph { nodes, links }
}

fn push_links(tree: &PopulationTree, id: PopId, index_of: &[usize], links: &mut Vec<SankeyLink>) {
    for &child_id in tree.node(id).children() {
        let child = tree.node(child_id);
        links.push(SankeyLink {
            source: index_of[id.0],
            target: index_of[child_id.0],
            value: child.n(),
            consensus: child.consensus(),
            stroke: None,
        });
        push_links(tree, child_id, index_of, links);
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/graph.rs"]
mod tests;
