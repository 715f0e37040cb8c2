use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::input::{
    CONSENSUS_COLUMN, CellValue, NAME_COLUMN, PARENT_COLUMN, Record, SHEET_MARKERS, SHEET_META,
    SIZE_COLUMN, Workbook,
};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn make_temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!(
        "kira_popsankey_{}_{}_{}",
        tag,
        std::process::id(),
        id
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

pub fn meta_row(name: &str, parent: Option<&str>, n: Option<f64>, consensus: Option<f64>) -> Record {
    let mut record = Record::new()
        .with(NAME_COLUMN, text(name))
        .with(PARENT_COLUMN, parent.map_or(CellValue::Empty, text));
    if let Some(n) = n {
        record.set(SIZE_COLUMN, CellValue::Number(n));
    }
    if let Some(c) = consensus {
        record.set(CONSENSUS_COLUMN, CellValue::Number(c));
    }
    record
}

pub fn root_row(name: &str) -> Record {
    meta_row(name, None, None, None)
}

pub fn child_row(name: &str, parent: &str, n: f64, consensus: f64) -> Record {
    meta_row(name, Some(parent), Some(n), Some(consensus))
}

pub fn markers_row(name: &str, genes: &[(&str, f64)]) -> Record {
    let mut record = Record::new().with(NAME_COLUMN, text(name));
    for (gene, value) in genes {
        record.set(gene, CellValue::Number(*value));
    }
    record
}

pub fn workbook(meta: Vec<Record>, markers: Vec<Record>) -> Workbook {
    Workbook::new()
        .with_sheet(SHEET_META, meta)
        .with_sheet(SHEET_MARKERS, markers)
}

/// Root -> A (-> A1, A2), B.
///
/// GA lives in A and A2, GA1x in A and A1, G1only in A1, GB in B, G0 in the
/// root only and SHARED in the root and A.
pub fn sample_workbook() -> Workbook {
    workbook(
        vec![
            root_row("Root"),
            child_row("A", "Root", 60.0, 0.9),
            child_row("A1", "A", 40.0, 0.8),
            child_row("A2", "A", 20.0, 0.7),
            child_row("B", "Root", 40.0, 0.95),
        ],
        vec![
            markers_row("Root", &[("G0", 1.0), ("SHARED", 2.0), ("GA", 0.0)]),
            markers_row("A", &[("GA", 5.0), ("GA1x", 1.0), ("SHARED", 1.0)]),
            markers_row("A1", &[("GA1x", 3.0), ("G1only", 2.0)]),
            markers_row("A2", &[("GA", 2.0)]),
            markers_row("B", &[("GB", 4.0)]),
        ],
    )
}
