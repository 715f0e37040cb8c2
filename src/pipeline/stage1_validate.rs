use std::collections::{HashMap, HashSet};

use crate::input::{CONSENSUS_COLUMN, Record, SHEET_MARKERS, SHEET_META, SIZE_COLUMN, Workbook};
use crate::model::issues::{ValidationIssue, ValidationReport};

/// Collects issues in check order; each kind is recorded once.
#[derive(Debug, Default)]
struct IssueSink {
    issues: Vec<ValidationIssue>,
}

impl IssueSink {
    fn add(&mut self, issue: ValidationIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }
}

/// Name -> parent lookup over `meta`. The first record wins on duplicate names.
struct ParentIndex<'a> {
    by_name: HashMap<String, &'a Record>,
}

impl<'a> ParentIndex<'a> {
    fn new(meta: &'a [Record]) -> Self {
        let mut by_name = HashMap::with_capacity(meta.len());
        for record in meta {
            if let Some(name) = record.name() {
                by_name.entry(name).or_insert(record);
            }
        }
        Self { by_name }
    }

    fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// `None` when `name` is not a known population.
    fn parent_of(&self, name: &str) -> Option<Option<String>> {
        self.by_name.get(name).map(|r| r.parent())
    }
}

pub fn validate(workbook: &Workbook) -> ValidationReport {
    let (meta, markers) = match (workbook.meta(), workbook.markers()) {
        (Some(meta), Some(markers)) if workbook.len() == 2 => (meta, markers),
        _ => return ValidationReport::from_issues(vec![ValidationIssue::FileStructure]),
    };

    let index = ParentIndex::new(meta);
    let mut sink = IssueSink::default();

    check_root_cardinality(meta, &mut sink);
    check_consensus_range(meta, &mut sink);
    check_parents_exist(meta, &index, &mut sink);
    check_acyclic(meta, &index, &mut sink);
    check_required_fields(meta, &mut sink);
    check_cross_tables(meta, markers, &mut sink);
    check_non_negative(markers, &mut sink);

    ValidationReport::from_issues(sink.issues)
}

pub fn run_stage1(workbook: &Workbook) -> ValidationReport {
    let report = validate(workbook);
    if report.valid {
        tracing::info!(
            "validation passed: {} meta row(s), {} markers row(s)",
            workbook.meta().map_or(0, <[Record]>::len),
            workbook.markers().map_or(0, <[Record]>::len)
        );
    } else {
        for issue in &report.issues {
            tracing::warn!(code = issue.code(), "{}", issue.message());
        }
    }
    report
}

fn check_root_cardinality(meta: &[Record], sink: &mut IssueSink) {
    let roots = meta.iter().filter(|r| r.parent().is_none()).count();
    if roots != 1 {
        tracing::debug!(roots, "root count mismatch");
        sink.add(ValidationIssue::RootCardinality);
    }
}

fn check_consensus_range(meta: &[Record], sink: &mut IssueSink) {
    let out_of_range = meta.iter().any(|r| {
        if !r.has(CONSENSUS_COLUMN) {
            return false;
        }
        // Unparseable values fail the range test as well.
        match r.number(CONSENSUS_COLUMN) {
            Some(v) => !(0.0..=1.0).contains(&v),
            None => true,
        }
    });
    if out_of_range {
        sink.add(ValidationIssue::ConsensusRange);
    }
}

fn check_parents_exist(meta: &[Record], index: &ParentIndex<'_>, sink: &mut IssueSink) {
    let dangling = meta
        .iter()
        .filter_map(Record::parent)
        .any(|parent| !index.contains(&parent));
    if dangling {
        sink.add(ValidationIssue::DanglingParent);
    }
}

/// Walks each record's ancestor chain from scratch with a fresh visited set,
/// so converging branches are not mistaken for cycles.
fn check_acyclic(meta: &[Record], index: &ParentIndex<'_>, sink: &mut IssueSink) {
    for record in meta {
        match walk_ancestors(record, index) {
            AncestorWalk::ReachedRoot => {}
            AncestorWalk::Dangling => sink.add(ValidationIssue::DanglingParent),
            AncestorWalk::Cycle => {
                sink.add(ValidationIssue::Circularity);
                return;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AncestorWalk {
    ReachedRoot,
    Dangling,
    Cycle,
}

fn walk_ancestors(record: &Record, index: &ParentIndex<'_>) -> AncestorWalk {
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = record.parent();
    while let Some(name) = current {
        if !visited.insert(name.clone()) {
            return AncestorWalk::Cycle;
        }
        match index.parent_of(&name) {
            Some(next) => current = next,
            None => return AncestorWalk::Dangling,
        }
    }
    AncestorWalk::ReachedRoot
}

/// The root is exempt: its size and consensus never reach a link.
fn check_required_fields(meta: &[Record], sink: &mut IssueSink) {
    let missing = meta
        .iter()
        .filter(|r| r.parent().is_some())
        .any(|r| !r.has(SIZE_COLUMN) || !r.has(CONSENSUS_COLUMN));
    if missing {
        sink.add(ValidationIssue::MissingField);
    }
}

fn check_cross_tables(meta: &[Record], markers: &[Record], sink: &mut IssueSink) {
    let meta_names: HashSet<Option<String>> = meta.iter().map(Record::name).collect();
    let marker_names: HashSet<Option<String>> = markers.iter().map(Record::name).collect();

    if meta.iter().any(|r| !present(r.name(), &marker_names)) {
        tracing::debug!(sheet = SHEET_META, "population missing from the other sheet");
        sink.add(ValidationIssue::MetaNotInMarkers);
    }
    if markers.iter().any(|r| !present(r.name(), &meta_names)) {
        tracing::debug!(sheet = SHEET_MARKERS, "population missing from the other sheet");
        sink.add(ValidationIssue::MarkersNotInMeta);
    }
}

/// Unnamed rows never match anything.
fn present(name: Option<String>, names: &HashSet<Option<String>>) -> bool {
    name.is_some() && names.contains(&name)
}

fn check_non_negative(markers: &[Record], sink: &mut IssueSink) {
    let negative = markers.iter().any(|r| {
        r.value_columns()
            .any(|(_, v)| v.as_f64().is_some_and(|x| x < 0.0))
    });
    if negative {
        sink.add(ValidationIssue::NegativeValue);
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_validate.rs"]
mod tests;
