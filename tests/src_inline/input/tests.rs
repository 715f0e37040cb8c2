use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;
use crate::input::json::parse_workbook_value;
use crate::input::tsv::{delimiter_for, parse_cell};
use crate::test_support::{make_temp_dir, text};

fn write_file(path: &Path, contents: &str) {
    let mut f = File::create(path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

#[test]
fn test_parent_normalization() {
    let base = Record::new().with(NAME_COLUMN, text("X"));
    assert_eq!(base.parent(), None);
    assert_eq!(base.clone().with(PARENT_COLUMN, CellValue::Empty).parent(), None);
    assert_eq!(base.clone().with(PARENT_COLUMN, text("")).parent(), None);
    assert_eq!(base.clone().with(PARENT_COLUMN, text("?")).parent(), None);
    assert_eq!(
        base.clone().with(PARENT_COLUMN, text("Root")).parent(),
        Some("Root".to_string())
    );
}

#[test]
fn test_record_set_replaces_in_place() {
    let mut r = Record::new()
        .with(NAME_COLUMN, text("A"))
        .with("G1", CellValue::Number(1.0));
    r.set("G1", CellValue::Number(2.0));
    assert_eq!(r.fields.len(), 2);
    assert_eq!(r.number("G1"), Some(2.0));
    let cols: Vec<&str> = r.value_columns().map(|(c, _)| c).collect();
    assert_eq!(cols, vec!["G1"]);
}

#[test]
fn test_has_treats_blank_as_absent() {
    let r = Record::new()
        .with("n", text(""))
        .with("consensus", CellValue::Number(0.0));
    assert!(!r.has("n"));
    assert!(r.has("consensus"));
    assert!(!r.has("missing"));
}

#[test]
fn test_retain_known_sheets() {
    let mut wb = Workbook::new()
        .with_sheet("cells", Vec::new())
        .with_sheet(SHEET_META, Vec::new())
        .with_sheet(SHEET_MARKERS, Vec::new());
    wb.retain_known_sheets();
    assert_eq!(wb.len(), 2);
    assert!(wb.meta().is_some());
    assert!(wb.markers().is_some());
}

#[test]
fn test_parse_workbook_json_keeps_column_order() {
    let value: serde_json::Value = serde_json::from_str(
        r#"{"meta":[{"":"Root","parent":null},{"":"A","parent":"Root","n":5,"consensus":0.5}],
            "markers":[{"":"Root","Zeta":1,"Alpha":2},{"":"A"}]}"#,
    )
    .unwrap();
    let wb = parse_workbook_value(&value).unwrap();
    let meta = wb.meta().unwrap();
    assert_eq!(meta.len(), 2);
    assert_eq!(meta[0].parent(), None);
    assert_eq!(meta[1].parent().as_deref(), Some("Root"));
    assert_eq!(meta[1].number("n"), Some(5.0));

    let markers = wb.markers().unwrap();
    let cols: Vec<&str> = markers[0].value_columns().map(|(c, _)| c).collect();
    assert_eq!(cols, vec!["Zeta", "Alpha"]);
}

#[test]
fn test_parse_workbook_rejects_non_object() {
    let value = serde_json::json!([1, 2]);
    assert!(matches!(
        parse_workbook_value(&value),
        Err(InputError::Parse(_))
    ));
    let value = serde_json::json!({"meta": [1]});
    assert!(matches!(
        parse_workbook_value(&value),
        Err(InputError::Parse(_))
    ));
}

#[test]
fn test_load_json_workbook_gz_drops_extra_sheets() {
    let dir = make_temp_dir("input_json");
    let path = dir.join("book.json.gz");
    write_gz(
        &path,
        r#"{"cells":[],"meta":[{"":"Root"}],"markers":[{"":"Root","G":1}]}"#,
    );
    let wb = load_workbook(WorkbookSource::Json(&path)).unwrap();
    assert_eq!(wb.len(), 2);
    assert_eq!(wb.markers().unwrap()[0].number("G"), Some(1.0));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_parse_cell_kinds() {
    assert_eq!(parse_cell(""), CellValue::Empty);
    assert_eq!(parse_cell("NA"), CellValue::Empty);
    assert_eq!(parse_cell("3.5"), CellValue::Number(3.5));
    assert_eq!(parse_cell("\"-2\""), CellValue::Number(-2.0));
    assert_eq!(parse_cell("Root"), text("Root"));
    assert_eq!(parse_cell("?"), text("?"));
}

#[test]
fn test_as_f64_rejects_non_finite() {
    assert_eq!(text(" 2.5 ").as_f64(), Some(2.5));
    assert_eq!(text("NaN").as_f64(), None);
    assert_eq!(text("-inf").as_f64(), None);
    assert_eq!(CellValue::Number(f64::NAN).as_f64(), None);
    assert_eq!(CellValue::Empty.as_f64(), None);
    assert_eq!(parse_cell("NaN"), text("NaN"));
}

#[test]
fn test_delimiter_by_extension() {
    assert_eq!(delimiter_for(Path::new("meta.csv")), ',');
    assert_eq!(delimiter_for(Path::new("meta.csv.gz")), ',');
    assert_eq!(delimiter_for(Path::new("meta.tsv")), '\t');
}

#[test]
fn test_load_delimited_sheets() {
    let dir = make_temp_dir("input_tsv");
    let meta = dir.join("meta.tsv");
    let markers = dir.join("markers.csv");
    write_file(
        &meta,
        "cell\tparent\tn\tconsensus\nRoot\t?\t\t\nA\tRoot\t10\t0.75\n\n",
    );
    write_file(&markers, ",G1,G2\nRoot,1,0\nA,0,2\n");

    let wb = load_workbook(WorkbookSource::Delimited {
        meta: &meta,
        markers: &markers,
    })
    .unwrap();
    let meta_rows = wb.meta().unwrap();
    assert_eq!(meta_rows.len(), 2);
    assert_eq!(meta_rows[0].name().as_deref(), Some("Root"));
    assert_eq!(meta_rows[0].parent(), None);
    assert!(!meta_rows[0].has("n"));
    assert_eq!(meta_rows[1].number("consensus"), Some(0.75));

    let marker_rows = wb.markers().unwrap();
    assert_eq!(marker_rows[1].name().as_deref(), Some("A"));
    assert_eq!(marker_rows[1].number("G2"), Some(2.0));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_delimited_row_too_wide_is_error() {
    let dir = make_temp_dir("input_wide");
    let meta = dir.join("meta.tsv");
    write_file(&meta, "\tparent\nRoot\t\textra\n");
    let err = tsv::load_delimited_sheet(&meta).unwrap_err();
    assert!(matches!(err, InputError::Parse(_)));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file_reported() {
    let err = load_workbook(WorkbookSource::Json(Path::new(
        "/nonexistent/kira_popsankey/book.json",
    )))
    .unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}
