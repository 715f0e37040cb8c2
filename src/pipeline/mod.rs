pub mod stage1_validate;
pub mod stage2_tree;
pub mod stage3_colors;
pub mod stage4_report;

use thiserror::Error;

use crate::input::Workbook;
use crate::model::colors::ColorMaps;
use crate::model::graph::{SankeyGraph, create_nodes_and_links};
use crate::model::issues::ValidationReport;
use crate::model::population::PopulationTree;

use stage1_validate::run_stage1;
use stage2_tree::{StructureError, run_stage2};
use stage3_colors::run_stage3;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Invalid(ValidationReport),
    #[error("structure error: {0}")]
    Structure(#[from] StructureError),
}

/// Everything one import hands to the layout/render side.
#[derive(Debug, Clone)]
pub struct ImportOutput {
    pub validation: ValidationReport,
    pub tree: PopulationTree,
    pub colors: ColorMaps,
    pub graph: SankeyGraph,
}

/// validate -> build tree -> assign colors -> flatten. Nothing past
/// validation runs on an invalid workbook.
pub fn run_import(workbook: &Workbook) -> Result<ImportOutput, ImportError> {
    let validation = run_stage1(workbook);
    if !validation.valid {
        return Err(ImportError::Invalid(validation));
    }
    let tree = run_stage2(workbook)?;
    let colors = run_stage3(&tree);
    let graph = create_nodes_and_links(&tree);
    tracing::debug!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        "sankey graph flattened"
    );
    Ok(ImportOutput {
        validation,
        tree,
        colors,
        graph,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
