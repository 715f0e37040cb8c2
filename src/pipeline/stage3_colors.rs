use std::collections::{BTreeMap, HashMap};

use crate::model::colors::{ColorMaps, DEFAULT_GENE_COLOR, palette};
use crate::model::population::{PopId, PopulationTree};

/// Number of populations under `id` (inclusive) that express `gene`.
pub fn count_gene(tree: &PopulationTree, id: PopId, gene: &str) -> usize {
    let mut count = 0usize;
    count_gene_into(tree, id, gene, &mut count);
    count
}

fn count_gene_into(tree: &PopulationTree, id: PopId, gene: &str, acc: &mut usize) {
    let pop = tree.node(id);
    if pop.has_gene(gene) {
        *acc += 1;
    }
    for &child in pop.children() {
        count_gene_into(tree, child, gene, acc);
    }
}

/// Occurrence count of every gene across the whole tree, one walk.
pub fn gene_occurrences(tree: &PopulationTree) -> HashMap<String, usize> {
    let mut acc = HashMap::new();
    occurrences_into(tree, tree.root_id(), &mut acc);
    acc
}

fn occurrences_into(tree: &PopulationTree, id: PopId, acc: &mut HashMap<String, usize>) {
    let pop = tree.node(id);
    for g in pop.genes() {
        *acc.entry(g.gene.clone()).or_insert(0) += 1;
    }
    for &child in pop.children() {
        occurrences_into(tree, child, acc);
    }
}

/// A gene is specific to `id` when every population expressing it sits in
/// the subtree rooted at `id`.
pub fn is_specific_gene(tree: &PopulationTree, gene: &str, id: PopId) -> bool {
    count_gene(tree, tree.root_id(), gene) == count_gene(tree, id, gene)
}

/// Palette entry `i` goes to the population at pre-order position `i`. The
/// root is a structural node and stays uncolored.
pub fn population_colors(tree: &PopulationTree) -> BTreeMap<String, String> {
    let colors = palette(tree.size());
    tree.preorder()
        .into_iter()
        .enumerate()
        .filter(|(_, id)| *id != tree.root_id())
        .map(|(idx, id)| (tree.node(id).name().to_string(), colors[idx].clone()))
        .collect()
}

/// Owner of every gene: the first non-root population, in pre-order, the gene
/// is specific to. The outermost qualifying population therefore wins; genes
/// with no owner map to `None`.
pub fn gene_owners(tree: &PopulationTree) -> BTreeMap<String, Option<PopId>> {
    let totals = gene_occurrences(tree);
    let mut owners: BTreeMap<String, Option<PopId>> =
        totals.keys().map(|g| (g.clone(), None)).collect();

    for id in tree.preorder() {
        if id == tree.root_id() {
            continue;
        }
        for g in tree.node(id).genes() {
            let Some(slot) = owners.get_mut(&g.gene) else {
                continue;
            };
            if slot.is_some() {
                continue;
            }
            if totals.get(&g.gene).copied() == Some(count_gene(tree, id, &g.gene)) {
                *slot = Some(id);
            }
        }
    }
    owners
}

/// Each gene takes its owner's color, or the default when it has none.
pub fn gene_colors(
    tree: &PopulationTree,
    owners: &BTreeMap<String, Option<PopId>>,
    population: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    owners
        .iter()
        .map(|(gene, owner)| {
            let color = (*owner)
                .and_then(|id| population.get(tree.node(id).name()))
                .cloned()
                .unwrap_or_else(|| DEFAULT_GENE_COLOR.to_string());
            (gene.clone(), color)
        })
        .collect()
}

pub fn assign_colors(tree: &PopulationTree) -> ColorMaps {
    let population = population_colors(tree);
    let owners = gene_owners(tree);
    let gene = gene_colors(tree, &owners, &population);
    let owner = owners
        .into_iter()
        .map(|(g, id)| (g, id.map(|id| tree.node(id).name().to_string())))
        .collect();
    ColorMaps {
        population,
        gene,
        owner,
    }
}

pub fn run_stage3(tree: &PopulationTree) -> ColorMaps {
    let maps = assign_colors(tree);
    tracing::info!(
        "colors assigned: populations={}, genes={}, specific genes={}",
        maps.population.len(),
        maps.gene.len(),
        maps.colored_gene_count()
    );
    maps
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_colors.rs"]
mod tests;
