use std::path::Path;

use thiserror::Error;

pub mod json;
pub mod reader;
pub mod tsv;

use json::load_json_workbook;
use tsv::load_delimited_sheet;

pub const SHEET_META: &str = "meta";
pub const SHEET_MARKERS: &str = "markers";

/// Column holding the population name. Spreadsheet exports leave its header blank.
pub const NAME_COLUMN: &str = "";
pub const PARENT_COLUMN: &str = "parent";
pub const SIZE_COLUMN: &str = "n";
pub const CONSENSUS_COLUMN: &str = "consensus";

/// Parent value some exports use instead of leaving the root's parent blank.
pub const NO_PARENT_SENTINEL: &str = "?";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Finite numeric value; `NaN` and infinities count as non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Text form used for names and parent references.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(v) => Some(format!("{v}")),
            CellValue::Empty => None,
        }
    }
}

/// One spreadsheet row, columns kept in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: CellValue) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(c, _)| c == column) {
            slot.1 = value;
        } else {
            self.fields.push((column.to_string(), value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Present and non-blank.
    pub fn has(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| !v.is_empty())
    }

    pub fn name(&self) -> Option<String> {
        self.get(NAME_COLUMN)
            .filter(|v| !v.is_empty())
            .and_then(CellValue::as_label)
    }

    /// Canonical parent reference: blank, absent and `"?"` all mean "no parent".
    pub fn parent(&self) -> Option<String> {
        let label = self.get(PARENT_COLUMN)?.as_label()?;
        if label.is_empty() || label == NO_PARENT_SENTINEL {
            None
        } else {
            Some(label)
        }
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(CellValue::as_f64)
    }

    /// Every column except the name column.
    pub fn value_columns(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields
            .iter()
            .filter(|(c, _)| c != NAME_COLUMN)
            .map(|(c, v)| (c.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, name: &str, records: Vec<Record>) -> Self {
        self.insert(name, records);
        self
    }

    pub fn insert(&mut self, name: &str, records: Vec<Record>) {
        if let Some(sheet) = self.sheets.iter_mut().find(|s| s.name == name) {
            sheet.records = records;
        } else {
            self.sheets.push(Sheet {
                name: name.to_string(),
                records,
            });
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&[Record]> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.records.as_slice())
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn meta(&self) -> Option<&[Record]> {
        self.sheet(SHEET_META)
    }

    pub fn markers(&self) -> Option<&[Record]> {
        self.sheet(SHEET_MARKERS)
    }

    /// Drops every sheet the importer does not consume.
    pub fn retain_known_sheets(&mut self) {
        self.sheets.retain(|sheet| {
            let keep = sheet.name == SHEET_META || sheet.name == SHEET_MARKERS;
            if !keep {
                tracing::debug!(sheet = %sheet.name, "skipping sheet");
            }
            keep
        });
    }
}

/// Where the two tables come from.
#[derive(Debug, Clone)]
pub enum WorkbookSource<'a> {
    Json(&'a Path),
    Delimited { meta: &'a Path, markers: &'a Path },
}

pub fn load_workbook(source: WorkbookSource<'_>) -> Result<Workbook, InputError> {
    let mut workbook = match source {
        WorkbookSource::Json(path) => {
            tracing::info!("loading workbook {}", path.display());
            load_json_workbook(path)?
        }
        WorkbookSource::Delimited { meta, markers } => {
            tracing::info!(
                "loading sheets: meta={}, markers={}",
                meta.display(),
                markers.display()
            );
            Workbook::new()
                .with_sheet(SHEET_META, load_delimited_sheet(meta)?)
                .with_sheet(SHEET_MARKERS, load_delimited_sheet(markers)?)
        }
    };
    workbook.retain_known_sheets();
    for sheet in &workbook.sheets {
        tracing::debug!(sheet = %sheet.name, rows = sheet.records.len(), "sheet loaded");
    }
    Ok(workbook)
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
