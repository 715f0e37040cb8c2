use serde::Serialize;

use crate::model::issues::ValidationReport;
use crate::report::SummaryData;

pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

pub fn render_validation_json(report: &ValidationReport) -> serde_json::Result<String> {
    to_pretty_json(report)
}

/// Compact summary without per-population rows.
pub fn render_summary_json(data: &SummaryData) -> serde_json::Result<String> {
    let value = serde_json::json!({
        "tool": data.tool_name,
        "version": data.tool_version,
        "root": data.root,
        "populations": data.n_populations,
        "links": data.n_links,
        "genes": {
            "total": data.n_genes,
            "specific": data.n_specific_genes,
        },
        "max_depth": data.max_depth,
        "valid": data.validation.valid,
    });
    to_pretty_json(&value)
}
