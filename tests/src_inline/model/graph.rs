use super::*;
use crate::pipeline::stage2_tree::build_tree;
use crate::test_support::{markers_row, root_row, sample_workbook, workbook};

#[test]
fn test_single_node_no_links() {
    let wb = workbook(vec![root_row("Root")], vec![markers_row("Root", &[])]);
    let graph = create_nodes_and_links(&build_tree(&wb).unwrap());
    assert_eq!(graph.nodes, vec![SankeyNode { name: "Root".into() }]);
    assert!(graph.links.is_empty());
}

#[test]
fn test_node_and_link_counts() {
    let tree = build_tree(&sample_workbook()).unwrap();
    let graph = create_nodes_and_links(&tree);
    assert_eq!(graph.nodes.len(), tree.size());
    assert_eq!(graph.links.len(), tree.size() - 1);
}

#[test]
fn test_links_in_preorder_with_child_values() {
    let tree = build_tree(&sample_workbook()).unwrap();
    let graph = create_nodes_and_links(&tree);
    let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Root", "A", "A1", "A2", "B"]);

    let pairs: Vec<(usize, usize)> = graph.links.iter().map(|l| (l.source, l.target)).collect();
    assert_eq!(pairs, vec![(0, 1), (1, 2), (1, 3), (0, 4)]);

    let a1 = &graph.links[1];
    assert_eq!(a1.value, Some(40));
    assert_eq!(a1.consensus, Some(0.8));
    assert!(a1.stroke.is_none());
}

#[test]
fn test_graph_serializes_stroke_null() {
    let tree = build_tree(&sample_workbook()).unwrap();
    let value = serde_json::to_value(create_nodes_and_links(&tree)).unwrap();
    assert_eq!(value["links"][0]["stroke"], serde_json::Value::Null);
    assert_eq!(value["links"][0]["value"], 60);
    assert_eq!(value["nodes"][4]["name"], "B");
}
