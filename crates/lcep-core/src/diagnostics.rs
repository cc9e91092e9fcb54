//! Issues found while reading a settlement dataset.
//!
//! Readers keep going past odd rows. A defaulted column is a warning and the
//! settlement is kept; a row with no population or an unreadable row is an
//! error and the row is dropped. The issues travel back with the settlements
//! that were read.
//!
//! ```
//! use lcep_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.defaulted("row-4", "relative_wealth_index", 0.0);
//! diag.unreadable("row-7", Some(8), "population is not a number");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.error_count(), 1);
//! assert_eq!(diag.summary(), "1 warning, 1 error");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Value defaulted, settlement kept
    Warning,
    /// Row dropped
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// No settlement id; the row label stands in.
    MissingId,
    /// A column was absent and `value` was used instead.
    Defaulted { column: String, value: f64 },
    MissingPopulation,
    Unreadable { message: String },
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingId | IssueKind::Defaulted { .. } => Severity::Warning,
            IssueKind::MissingPopulation | IssueKind::Unreadable { .. } => Severity::Error,
        }
    }
}

/// One issue, tied to the settlement id or row label it concerns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportIssue {
    pub row: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ImportIssue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::MissingId => write!(f, "{}: missing settlement_id, using row label", self.row)?,
            IssueKind::Defaulted { column, value } => {
                write!(f, "{}: missing {column}, using {value}", self.row)?
            }
            IssueKind::MissingPopulation => {
                write!(f, "{}: population is missing; settlement skipped", self.row)?
            }
            IssueKind::Unreadable { message } => {
                write!(f, "{}: unreadable ({message}); row skipped", self.row)?
            }
        }
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ImportIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, row: &str, line: Option<usize>, kind: IssueKind) {
        self.issues.push(ImportIssue {
            row: row.to_string(),
            line,
            kind,
        });
    }

    pub fn missing_id(&mut self, row: &str) {
        self.push(row, None, IssueKind::MissingId);
    }

    pub fn defaulted(&mut self, row: &str, column: &str, value: f64) {
        self.push(
            row,
            None,
            IssueKind::Defaulted {
                column: column.to_string(),
                value,
            },
        );
    }

    pub fn missing_population(&mut self, row: &str) {
        self.push(row, None, IssueKind::MissingPopulation);
    }

    pub fn unreadable(&mut self, row: &str, line: Option<usize>, message: impl Into<String>) {
        self.push(
            row,
            line,
            IssueKind::Unreadable {
                message: message.into(),
            },
        );
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity() == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    /// How many rows had each column defaulted.
    pub fn defaulted_columns(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            if let IssueKind::Defaulted { column, .. } = &issue.kind {
                *counts.entry(column.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.issues.extend(other.issues);
    }

    /// e.g. "3 warnings, 1 error"
    pub fn summary(&self) -> String {
        fn plural(n: usize, word: &str) -> String {
            format!("{n} {word}{}", if n == 1 { "" } else { "s" })
        }
        match (self.warning_count(), self.error_count()) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => plural(w, "warning"),
            (0, e) => plural(e, "error"),
            (w, e) => format!("{}, {}", plural(w, "warning"), plural(e, "error")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_row_and_line() {
        let mut diag = Diagnostics::new();
        diag.unreadable("row-2", Some(3), "bad float");
        assert_eq!(
            diag.issues[0].to_string(),
            "row-2: unreadable (bad float); row skipped at line 3"
        );
    }

    #[test]
    fn test_defaulted_columns_are_tallied() {
        let mut a = Diagnostics::new();
        a.defaulted("s1", "relative_wealth_index", 0.0);
        a.defaulted("s2", "relative_wealth_index", 0.0);
        let mut b = Diagnostics::new();
        b.defaulted("s3", "distance_to_road_km", 0.0);
        b.missing_population("s4");
        a.merge(b);

        let counts = a.defaulted_columns();
        assert_eq!(counts["relative_wealth_index"], 2);
        assert_eq!(counts["distance_to_road_km"], 1);
        assert!(a.has_errors());
        assert_eq!(a.summary(), "3 warnings, 1 error");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let mut diag = Diagnostics::new();
        diag.defaulted("s1", "latitude", 0.0);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["issues"][0]["kind"], "defaulted");
        assert_eq!(json["issues"][0]["column"], "latitude");
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(Diagnostics::new().summary(), "No issues");
    }
}
