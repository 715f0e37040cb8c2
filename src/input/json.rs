use std::path::Path;

use serde_json::Value;

use crate::input::reader::open_maybe_gz;
use crate::input::{CellValue, InputError, Record, Workbook};

/// Reads `{ "<sheet>": [ {column: value, ..}, .. ], .. }`.
pub fn load_json_workbook(path: &Path) -> Result<Workbook, InputError> {
    let reader = open_maybe_gz(path)?;
    let value: Value = serde_json::from_reader(reader)?;
    parse_workbook_value(&value)
}

pub fn parse_workbook_value(value: &Value) -> Result<Workbook, InputError> {
    let Value::Object(sheets) = value else {
        return Err(InputError::Parse(
            "workbook must be an object of named sheets".to_string(),
        ));
    };

    let mut workbook = Workbook::new();
    for (sheet_name, rows) in sheets {
        let Value::Array(rows) = rows else {
            return Err(InputError::Parse(format!(
                "sheet '{sheet_name}' must be an array of rows"
            )));
        };
        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let Value::Object(columns) = row else {
                return Err(InputError::Parse(format!(
                    "sheet '{sheet_name}' row {row_idx} is not an object"
                )));
            };
            let mut record = Record::new();
            for (column, cell) in columns {
                record.set(column, cell_from_json(cell));
            }
            records.push(record);
        }
        workbook.insert(sheet_name, records);
    }
    Ok(workbook)
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}
