use std::io::BufRead;
use std::path::Path;

use crate::input::reader::{logical_name, open_maybe_gz};
use crate::input::{CellValue, InputError, NAME_COLUMN, Record};

pub fn delimiter_for(path: &Path) -> char {
    if logical_name(path).to_ascii_lowercase().ends_with(".csv") {
        ','
    } else {
        '\t'
    }
}

/// Loads one sheet. The first header cell is the population-name column
/// whatever its label, matching spreadsheet exports with a blank corner cell.
pub fn load_delimited_sheet(path: &Path) -> Result<Vec<Record>, InputError> {
    let delimiter = delimiter_for(path);
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();

    let read = reader.read_line(&mut buf)?;
    if read == 0 {
        return Err(InputError::Parse(format!("{} is empty", path.display())));
    }
    let mut header: Vec<String> = buf
        .trim_end_matches(['\r', '\n'])
        .split(delimiter)
        .map(|s| unquote(s.trim()).to_string())
        .collect();
    header[0] = NAME_COLUMN.to_string();

    let mut records = Vec::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() > header.len() {
            return Err(InputError::Parse(format!(
                "{} line {}: {} fields but header has {}",
                path.display(),
                line_no,
                fields.len(),
                header.len()
            )));
        }

        let mut record = Record::new();
        for (idx, column) in header.iter().enumerate() {
            match fields.get(idx) {
                Some(raw) => record.set(column, parse_cell(raw)),
                None => {
                    tracing::debug!(
                        "{} line {}: short row, column '{}' left absent",
                        path.display(),
                        line_no,
                        column
                    );
                }
            }
        }
        records.push(record);
    }

    Ok(records)
}

pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = unquote(raw.trim());
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
