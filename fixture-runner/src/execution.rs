use std::collections::BTreeMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use colored::Colorize;
use rayon::prelude::*;

use crate::case::parse_case;
use crate::panic_message::panic_reason;
use crate::runner::{TestResult, run_case};

/// Kind reported for files that are unreadable or not a valid case.
pub const INVALID_KIND: &str = "invalid";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    fn add(&mut self, result: &TestResult) {
        match result {
            TestResult::Passed => self.passed += 1,
            TestResult::Failed(_) => self.failed += 1,
            TestResult::Skipped(_) => self.skipped += 1,
        }
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub reason: String,
}

/// Results grouped by case kind.
#[derive(Debug, Default)]
pub struct SuiteSummary {
    pub by_kind: BTreeMap<&'static str, Tally>,
    pub failures: BTreeMap<&'static str, Vec<Failure>>,
}

impl SuiteSummary {
    pub fn totals(&self) -> Tally {
        self.by_kind.values().fold(Tally::default(), |acc, t| acc.merge(*t))
    }

    pub fn has_failures(&self) -> bool {
        self.totals().failed > 0
    }

    fn record(&mut self, record: CaseRecord) {
        self.by_kind.entry(record.kind).or_default().add(&record.result);
        if let TestResult::Failed(reason) = record.result {
            self.failures.entry(record.kind).or_default().push(Failure {
                path: record.path,
                reason,
            });
        }
    }
}

pub fn run_suite(files: &[PathBuf], verbose: bool) -> SuiteSummary {
    let records: Vec<CaseRecord> = files.par_iter().map(|path| run_file(path)).collect();
    let mut summary = SuiteSummary::default();

    for record in records {
        if verbose {
            print_record(&record);
        }
        summary.record(record);
    }

    summary
}

struct CaseRecord {
    path: PathBuf,
    kind: &'static str,
    result: TestResult,
}

fn run_file(path: &Path) -> CaseRecord {
    let (kind, result) = match fs::read_to_string(path) {
        Ok(source) => run_source(&source),
        Err(err) => (
            INVALID_KIND,
            TestResult::Skipped(format!("unreadable: {err}")),
        ),
    };

    CaseRecord {
        path: path.to_path_buf(),
        kind,
        result,
    }
}

fn run_source(source: &str) -> (&'static str, TestResult) {
    let case = match parse_case(source) {
        Ok(case) => case,
        Err(err) => return (INVALID_KIND, TestResult::Failed(format!("invalid fixture: {err}"))),
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| run_case(&case))).unwrap_or_else(
        |payload| TestResult::Failed(format!("panicked: {}", panic_reason(payload.as_ref()))),
    );
    (case.kind(), result)
}

fn print_record(record: &CaseRecord) {
    let path = record.path.display();
    match &record.result {
        TestResult::Passed => println!("{} [{}] {path}", "ok  ".green(), record.kind),
        TestResult::Failed(reason) => {
            println!("{} [{}] {path}\n       {reason}", "FAIL".red(), record.kind)
        }
        TestResult::Skipped(reason) => {
            println!("{} [{}] {path} ({reason})", "skip".yellow(), record.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &'static str, result: TestResult) -> CaseRecord {
        CaseRecord {
            path: PathBuf::from(format!("{kind}.yaml")),
            kind,
            result,
        }
    }

    #[test]
    fn invalid_yaml_is_a_failure_of_its_own_kind() {
        let (kind, result) = run_source("kind: [oops");
        assert_eq!(kind, INVALID_KIND);
        assert!(matches!(result, TestResult::Failed(_)));
    }

    #[test]
    fn parsed_cases_report_their_kind() {
        let (kind, result) = run_source("kind: locate\ntrace: \"Error\"\n");
        assert_eq!(kind, "locate");
        assert_eq!(result, TestResult::Passed);
    }

    #[test]
    fn results_are_grouped_by_kind() {
        let mut summary = SuiteSummary::default();
        summary.record(record("format", TestResult::Passed));
        summary.record(record("format", TestResult::Failed("nope".into())));
        summary.record(record("locate", TestResult::Skipped("later".into())));

        assert_eq!(
            summary.by_kind["format"],
            Tally { passed: 1, failed: 1, skipped: 0 }
        );
        assert_eq!(summary.by_kind["locate"].skipped, 1);
        assert_eq!(
            summary.failures["format"],
            vec![Failure { path: PathBuf::from("format.yaml"), reason: "nope".into() }]
        );
        assert!(!summary.failures.contains_key("locate"));
        assert_eq!(summary.totals(), Tally { passed: 1, failed: 1, skipped: 1 });
        assert!(summary.has_failures());
    }
}
