use crate::model::issues::ValidationReport;
use crate::report::{PopulationRow, SummaryData, format_opt_f64, format_opt_u64};

pub fn render_validation_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    if report.valid {
        out.push_str("Validation: OK\n");
        return out;
    }
    out.push_str(&format!(
        "Validation: FAILED ({} issue(s))\n",
        report.issues.len()
    ));
    for issue in &report.issues {
        out.push_str(&format!("  [{}] {}\n", issue.code(), issue.message()));
    }
    out
}

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Population Hierarchy Report\n");
    out.push_str("===========================\n\n");

    out.push_str(&format!("Tool: {} {}\n", data.tool_name, data.tool_version));
    out.push_str(&render_validation_text(&data.validation));
    out.push('\n');

    out.push_str("1. Structure\n");
    out.push_str(&format!("Root: {}\n", data.root));
    out.push_str(&format!("Populations: {}\n", data.n_populations));
    out.push_str(&format!("Links: {}\n", data.n_links));
    out.push_str(&format!("Max depth: {}\n\n", data.max_depth));

    out.push_str("2. Hierarchy\n");
    for row in &data.populations {
        out.push_str(&hierarchy_line(row));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("3. Genes\n");
    out.push_str(&format!("Genes: {}\n", data.n_genes));
    out.push_str(&format!(
        "Population-specific genes: {}\n",
        data.n_specific_genes
    ));
    for row in data.populations.iter().filter(|r| !r.specific_genes.is_empty()) {
        out.push_str(&format!(
            "  {}: {}\n",
            row.name,
            row.specific_genes.join(", ")
        ));
    }

    out
}

fn hierarchy_line(row: &PopulationRow) -> String {
    let indent = "  ".repeat(row.depth);
    if row.parent.is_none() {
        return format!("{indent}{} (root)", row.name);
    }
    format!(
        "{indent}{} n={} consensus={} color={}",
        row.name,
        format_opt_u64(row.n),
        format_opt_f64(row.consensus),
        row.color.as_deref().unwrap_or("-")
    )
}
