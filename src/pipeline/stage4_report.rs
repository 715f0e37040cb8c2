use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pipeline::ImportOutput;
use crate::report::json::{render_summary_json, render_validation_json, to_pretty_json};
use crate::report::text::render_report_text;
use crate::report::{SummaryData, build_summary, format_opt_f64, format_opt_u64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Text,
    Both,
}

impl ReportFormat {
    fn json(self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::Both)
    }

    fn text(self) -> bool {
        matches!(self, ReportFormat::Text | ReportFormat::Both)
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the import results into `out_dir` and returns the files written.
pub fn write_reports(
    output: &ImportOutput,
    out_dir: &Path,
    format: ReportFormat,
) -> Result<Vec<PathBuf>, ReportError> {
    fs::create_dir_all(out_dir)?;
    let summary = build_summary(output);
    let mut written = Vec::new();

    if format.json() {
        let files = [
            ("validation.json", render_validation_json(&output.validation)?),
            ("tree.json", to_pretty_json(&output.tree)?),
            ("sankey.json", to_pretty_json(&output.graph)?),
            ("colors.json", to_pretty_json(&output.colors)?),
            ("summary.json", render_summary_json(&summary)?),
        ];
        for (name, body) in files {
            let path = out_dir.join(name);
            write_text(&path, &body)?;
            written.push(path);
        }
    }

    let populations_path = out_dir.join("populations.tsv");
    write_populations_tsv(&summary, &populations_path)?;
    written.push(populations_path);

    let genes_path = out_dir.join("genes.tsv");
    write_genes_tsv(output, &genes_path)?;
    written.push(genes_path);

    if format.text() {
        let path = out_dir.join("summary.txt");
        write_text(&path, &render_report_text(&summary))?;
        written.push(path);
    }

    for path in &written {
        tracing::info!("wrote {}", path.display());
    }
    Ok(written)
}

fn write_populations_tsv(summary: &SummaryData, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "index",
        "name",
        "parent",
        "depth",
        "n",
        "consensus",
        "color",
        "n_genes",
        "top_genes",
        "specific_genes",
    ];
    writeln!(w, "{}", header.join("\t"))?;
    for row in &summary.populations {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            row.index,
            row.name,
            row.parent.as_deref().unwrap_or(""),
            row.depth,
            format_opt_u64(row.n),
            format_opt_f64(row.consensus),
            row.color.as_deref().unwrap_or(""),
            row.n_genes,
            row.top_genes.join(","),
            row.specific_genes.join(",")
        )?;
    }
    w.flush()
}

fn write_genes_tsv(output: &ImportOutput, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "gene\tcolor\tspecific_to\tn_populations\tmax_value")?;
    let tree = &output.tree;
    for (gene, color) in &output.colors.gene {
        let owner = output.colors.gene_owner(gene).unwrap_or("");
        let values: Vec<f64> = tree.iter().filter_map(|(_, p)| p.expression(gene)).collect();
        let max_value = values.iter().copied().reduce(f64::max);
        writeln!(
            w,
            "{gene}\t{color}\t{owner}\t{}\t{}",
            values.len(),
            format_opt_f64(max_value)
        )?;
    }
    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_report.rs"]
mod tests;
