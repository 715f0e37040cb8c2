use serde::Serialize;
use serde::ser::SerializeStruct;

/// Input defects the validator can report. One message per kind, at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationIssue {
    FileStructure,
    RootCardinality,
    ConsensusRange,
    DanglingParent,
    Circularity,
    MissingField,
    MetaNotInMarkers,
    MarkersNotInMeta,
    NegativeValue,
}

impl ValidationIssue {
    pub fn code(self) -> &'static str {
        match self {
            ValidationIssue::FileStructure => "FILE_ERROR",
            ValidationIssue::RootCardinality => "ROOT_ERROR",
            ValidationIssue::ConsensusRange => "CONS_ERROR",
            ValidationIssue::DanglingParent => "PARENT_ERROR",
            ValidationIssue::Circularity => "CIRCULARITY_ERROR",
            ValidationIssue::MissingField => "MISSING_ERROR",
            ValidationIssue::MetaNotInMarkers => "META_ERROR",
            ValidationIssue::MarkersNotInMeta => "MARKERS_ERROR",
            ValidationIssue::NegativeValue => "NEGATIVE_ERROR",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ValidationIssue::FileStructure => {
                "File should at least contain 'meta' and 'markers' sheets."
            }
            ValidationIssue::RootCardinality => {
                "There should be only one root cell in the 'meta' sheet."
            }
            ValidationIssue::ConsensusRange => {
                "Consensus value should be restricted to [0, 1] in the 'meta' sheet."
            }
            ValidationIssue::DanglingParent => "A cell has an unknown parent in the 'meta' sheet.",
            ValidationIssue::Circularity => {
                "Found circularity in the parent-child relationship in the 'meta' sheet."
            }
            ValidationIssue::MissingField => "Missing 'n' or 'consensus' value in the 'meta' sheet.",
            ValidationIssue::MetaNotInMarkers => {
                "A cell in the 'meta' sheet is not present in the 'markers' sheet."
            }
            ValidationIssue::MarkersNotInMeta => {
                "A cell in the 'markers' sheet is not present in the 'meta' sheet."
            }
            ValidationIssue::NegativeValue => "Values on the 'markers' sheet should be positive.",
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl Serialize for ValidationIssue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationIssue", 2)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", self.message())?;
        s.end()
    }
}

/// Order in which checks run, and therefore the order of reported messages.
pub fn issue_order() -> &'static [ValidationIssue] {
    &[
        ValidationIssue::FileStructure,
        ValidationIssue::RootCardinality,
        ValidationIssue::ConsensusRange,
        ValidationIssue::DanglingParent,
        ValidationIssue::Circularity,
        ValidationIssue::MissingField,
        ValidationIssue::MetaNotInMarkers,
        ValidationIssue::MarkersNotInMeta,
        ValidationIssue::NegativeValue,
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(rename = "messages")]
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(mut issues: Vec<ValidationIssue>) -> Self {
        issues.sort_by_key(|issue| issue_order().iter().position(|o| o == issue));
        issues.dedup();
        Self {
            valid: issues.is_empty(),
            issues,
        }
    }

    pub fn has(&self, issue: ValidationIssue) -> bool {
        self.issues.contains(&issue)
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.issues.iter().map(|i| i.message()).collect()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.valid {
            return write!(f, "input is valid");
        }
        write!(f, "input is invalid ({} issue(s))", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {issue}")?;
        }
        Ok(())
    }
}
