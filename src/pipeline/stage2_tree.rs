use std::collections::HashSet;

use thiserror::Error;

use crate::input::{CONSENSUS_COLUMN, Record, SIZE_COLUMN, Workbook};
use crate::model::population::{GeneExpr, PopId, Population, PopulationTree};

/// Tree construction failures. Reaching these through a validated workbook
/// is a caller bug, not a user-facing input problem.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("missing sheets (need 'meta' and 'markers' sheets)")]
    MissingSheets,
    #[error("no root found")]
    NoRoot,
    #[error("population '{0}' nested deeper than the meta sheet allows; duplicate names or a cycle")]
    DepthExceeded(String),
}

struct TreeInput<'a> {
    meta: &'a [Record],
    markers: &'a [Record],
}

impl TreeInput<'_> {
    fn name_exists(&self, name: &str) -> bool {
        self.meta.iter().any(|r| r.name().as_deref() == Some(name))
    }

    /// First record whose parent does not name another population.
    fn find_root(&self) -> Option<&Record> {
        let mut roots = self.meta.iter().filter(|r| match r.parent() {
            None => true,
            Some(parent) => !self.name_exists(&parent),
        });
        let root = roots.next()?;
        let extra = roots.count();
        if extra > 0 {
            tracing::warn!(extra, "more than one root candidate; using the first");
        }
        Some(root)
    }

    fn gene_map(&self, name: &str) -> Vec<GeneExpr> {
        self.markers
            .iter()
            .find(|r| r.name().as_deref() == Some(name))
            .map(sorted_genes)
            .unwrap_or_default()
    }
}

/// Non-zero expression values, descending; ties ordered by gene name.
pub fn sorted_genes(record: &Record) -> Vec<GeneExpr> {
    let mut seen = HashSet::new();
    let mut genes: Vec<GeneExpr> = record
        .value_columns()
        .filter_map(|(gene, value)| {
            let value = value.as_f64()?;
            (value != 0.0 && seen.insert(gene)).then(|| GeneExpr {
                gene: gene.to_string(),
                value,
            })
        })
        .collect();
    genes.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.gene.cmp(&b.gene)));
    genes
}

/// `n` is a cell count; fractional values are rounded to the nearest integer.
fn population_size(record: &Record) -> Option<u64> {
    let v = record.number(SIZE_COLUMN)?;
    if v < 0.0 {
        return None;
    }
    let rounded = v.round();
    if rounded != v {
        let name = record.name().unwrap_or_default();
        tracing::debug!(
            population = %name,
            n = v,
            "fractional population size rounded to {rounded}"
        );
    }
    Some(rounded as u64)
}

/// Builds the population tree. Expects a workbook that passed validation;
/// only a missing root (or runaway nesting) is reported here.
pub fn build_tree(workbook: &Workbook) -> Result<PopulationTree, StructureError> {
    let (Some(meta), Some(markers)) = (workbook.meta(), workbook.markers()) else {
        return Err(StructureError::MissingSheets);
    };
    let input = TreeInput { meta, markers };

    let root = input.find_root().ok_or(StructureError::NoRoot)?;
    let root_name = root.name().ok_or(StructureError::NoRoot)?;

    let mut nodes = Vec::with_capacity(meta.len());
    nodes.push(Population {
        genes: input.gene_map(&root_name),
        name: root_name,
        n: population_size(root),
        consensus: root.number(CONSENSUS_COLUMN),
        parent: None,
        children: Vec::new(),
    });
    attach_children(&input, PopId(0), 1, &mut nodes)?;

    Ok(PopulationTree::from_nodes(nodes))
}

/// Appends every `meta` row whose parent is `parent_id`, depth first, so the
/// arena ends up in pre-order.
fn attach_children(
    input: &TreeInput<'_>,
    parent_id: PopId,
    depth: usize,
    nodes: &mut Vec<Population>,
) -> Result<(), StructureError> {
    let parent_name = nodes[parent_id.0].name.clone();
    for record in input.meta {
        if record.parent().as_deref() != Some(parent_name.as_str()) {
            continue;
        }
        let Some(name) = record.name() else {
            continue;
        };
        if depth > input.meta.len() {
            return Err(StructureError::DepthExceeded(name));
        }
        let id = PopId(nodes.len());
        nodes.push(Population {
            genes: input.gene_map(&name),
            name,
            n: population_size(record),
            consensus: record.number(CONSENSUS_COLUMN),
            parent: Some(parent_id),
            children: Vec::new(),
        });
        nodes[parent_id.0].children.push(id);
        attach_children(input, id, depth + 1, nodes)?;
    }
    Ok(())
}

pub fn run_stage2(workbook: &Workbook) -> Result<PopulationTree, StructureError> {
    let tree = build_tree(workbook)?;
    tracing::info!(
        "population tree built: root={}, populations={}",
        tree.root().name(),
        tree.size()
    );
    for line in tree.describe() {
        tracing::debug!("{line}");
    }
    Ok(tree)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_tree.rs"]
mod tests;
