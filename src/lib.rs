//! Validation, population-tree building and color assignment for hierarchical
//! single-cell population diagrams.
//!
//! The pipeline turns two tabular sheets (`meta`, `markers`) into a validated
//! [`model::population::PopulationTree`], deterministic population/gene color
//! maps and a flattened node/link list ready for a Sankey layout engine.

pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

#[cfg(test)]
#[path = "../tests/src_inline/support.rs"]
pub(crate) mod test_support;

pub use input::{CellValue, Record, Workbook};
pub use model::colors::{ColorMaps, DEFAULT_GENE_COLOR};
pub use model::graph::{SankeyGraph, create_nodes_and_links};
pub use model::issues::{ValidationIssue, ValidationReport};
pub use model::population::{PopId, Population, PopulationTree};
pub use pipeline::stage1_validate::validate;
pub use pipeline::stage2_tree::{StructureError, build_tree};
pub use pipeline::stage3_colors::assign_colors;
pub use pipeline::{ImportError, ImportOutput, run_import};
