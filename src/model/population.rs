use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// Index of a population inside its tree. Indices follow pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PopId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneExpr {
    pub gene: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub(crate) name: String,
    pub(crate) n: Option<u64>,
    pub(crate) consensus: Option<f64>,
    pub(crate) genes: Vec<GeneExpr>,
    pub(crate) parent: Option<PopId>,
    pub(crate) children: Vec<PopId>,
}

impl Population {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n(&self) -> Option<u64> {
        self.n
    }

    pub fn consensus(&self) -> Option<f64> {
        self.consensus
    }

    /// Non-zero expression values, highest first.
    pub fn genes(&self) -> &[GeneExpr] {
        &self.genes
    }

    pub fn has_gene(&self, gene: &str) -> bool {
        self.genes.iter().any(|g| g.gene == gene)
    }

    pub fn expression(&self, gene: &str) -> Option<f64> {
        self.genes.iter().find(|g| g.gene == gene).map(|g| g.value)
    }

    pub fn parent(&self) -> Option<PopId> {
        self.parent
    }

    pub fn children(&self) -> &[PopId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena holding every population. Slot 0 is the root; the arena order is the
/// pre-order walk with siblings in `meta` row order.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationTree {
    nodes: Vec<Population>,
}

impl PopulationTree {
    pub(crate) fn from_nodes(nodes: Vec<Population>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    pub fn root_id(&self) -> PopId {
        PopId(0)
    }

    pub fn root(&self) -> &Population {
        &self.nodes[0]
    }

    pub fn node(&self, id: PopId) -> &Population {
        &self.nodes[id.0]
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Size of the subtree rooted at `id`, counted recursively.
    pub fn subtree_size(&self, id: PopId) -> usize {
        1 + self
            .node(id)
            .children
            .iter()
            .map(|&c| self.subtree_size(c))
            .sum::<usize>()
    }

    pub fn get(&self, name: &str) -> Option<&Population> {
        self.find(name).map(|id| self.node(id))
    }

    pub fn find(&self, name: &str) -> Option<PopId> {
        self.nodes.iter().position(|p| p.name == name).map(PopId)
    }

    pub fn children(&self, id: PopId) -> impl Iterator<Item = &Population> {
        self.node(id).children.iter().map(|&c| self.node(c))
    }

    pub fn parent_of(&self, id: PopId) -> Option<&Population> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PopId, &Population)> {
        self.nodes.iter().enumerate().map(|(i, p)| (PopId(i), p))
    }

    /// Pre-order ids, walked from the root rather than read off the arena.
    pub fn preorder(&self) -> Vec<PopId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect_preorder(self.root_id(), &mut out);
        out
    }

    fn collect_preorder(&self, id: PopId, out: &mut Vec<PopId>) {
        out.push(id);
        for &child in &self.node(id).children {
            self.collect_preorder(child, out);
        }
    }

    /// One `"<name> - <parent>"` line per population, pre-order.
    pub fn describe(&self) -> Vec<String> {
        self.preorder()
            .into_iter()
            .map(|id| {
                let pop = self.node(id);
                let parent = self.parent_of(id).map(|p| p.name()).unwrap_or("null");
                format!("{} - {}", pop.name, parent)
            })
            .collect()
    }

    fn serialize_node<S: Serializer>(&self, id: PopId, serializer: S) -> Result<S::Ok, S::Error> {
        NodeView { tree: self, id }.serialize(serializer)
    }
}

struct NodeView<'a> {
    tree: &'a PopulationTree,
    id: PopId,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let pop = self.tree.node(self.id);
        let children: Vec<NodeView<'_>> = pop
            .children
            .iter()
            .map(|&c| NodeView {
                tree: self.tree,
                id: c,
            })
            .collect();
        let mut s = serializer.serialize_struct("Population", 5)?;
        s.serialize_field("name", &pop.name)?;
        s.serialize_field("n", &pop.n)?;
        s.serialize_field("consensus", &pop.consensus)?;
        s.serialize_field("genes", &pop.genes)?;
        s.serialize_field("children", &children)?;
        s.end()
    }
}

/// Serializes as the nested tree starting at the root.
impl Serialize for PopulationTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize_node(self.root_id(), serializer)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/population.rs"]
mod tests;
