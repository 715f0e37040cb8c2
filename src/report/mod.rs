pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::issues::ValidationReport;
use crate::model::population::{PopId, PopulationTree};
use crate::pipeline::ImportOutput;

#[derive(Debug, Clone, Serialize)]
pub struct PopulationRow {
    pub index: usize,
    pub name: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub n: Option<u64>,
    pub consensus: Option<f64>,
    pub color: Option<String>,
    pub n_genes: usize,
    pub top_genes: Vec<String>,
    pub specific_genes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub root: String,
    pub n_populations: usize,
    pub n_links: usize,
    pub n_genes: usize,
    pub n_specific_genes: usize,
    pub max_depth: usize,
    pub validation: ValidationReport,
    pub populations: Vec<PopulationRow>,
}

pub const TOP_GENES: usize = 5;

pub fn depth_of(tree: &PopulationTree, id: PopId) -> usize {
    let mut depth = 0usize;
    let mut cur = tree.node(id).parent();
    while let Some(p) = cur {
        depth += 1;
        cur = tree.node(p).parent();
    }
    depth
}

pub fn build_summary(output: &ImportOutput) -> SummaryData {
    let tree = &output.tree;
    let mut populations = Vec::with_capacity(tree.size());
    for (index, id) in tree.preorder().into_iter().enumerate() {
        let pop = tree.node(id);
        let color = output.colors.population_color(pop.name()).map(str::to_string);
        let specific_genes = pop
            .genes()
            .iter()
            .filter(|g| output.colors.gene_owner(&g.gene) == Some(pop.name()))
            .map(|g| g.gene.clone())
            .collect();
        populations.push(PopulationRow {
            index,
            name: pop.name().to_string(),
            parent: tree.parent_of(id).map(|p| p.name().to_string()),
            depth: depth_of(tree, id),
            n: pop.n(),
            consensus: pop.consensus(),
            color,
            n_genes: pop.genes().len(),
            top_genes: pop
                .genes()
                .iter()
                .take(TOP_GENES)
                .map(|g| g.gene.clone())
                .collect(),
            specific_genes,
        });
    }

    SummaryData {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        root: tree.root().name().to_string(),
        n_populations: tree.size(),
        n_links: output.graph.links.len(),
        n_genes: output.colors.gene.len(),
        n_specific_genes: output.colors.colored_gene_count(),
        max_depth: populations.iter().map(|p| p.depth).max().unwrap_or(0),
        validation: output.validation.clone(),
        populations,
    }
}

pub fn format_opt_f64(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{:.6}", v),
        None => "NA".to_string(),
    }
}

pub fn format_opt_u64(v: Option<u64>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "NA".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
