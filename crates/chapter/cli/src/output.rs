//! Terminal rendering: result rows, status lines and rejected term saves

use chapter_runtime::{StoreFailure, ValidationReport};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print rows in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                println!("{}", Table::new(data));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
    }
    Ok(())
}

/// Print a single item as JSON
pub fn print_single<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// How a command ended, as shown in front of its one-line summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The change or check went through
    Done,
    /// The policy refused the permission asked about
    Denied,
    /// Something the operator should know, not a failure
    Notice,
    /// The command failed; written to stderr
    Failed,
}

impl Status {
    fn marker(self) -> ColoredString {
        match self {
            Status::Done => "✓".green(),
            Status::Denied => "✗".yellow(),
            Status::Notice => "•".blue(),
            Status::Failed => "✗".red(),
        }
    }
}

pub fn status_line(status: Status, message: impl fmt::Display) -> String {
    format!("{} {}", status.marker(), message)
}

pub fn print_status(status: Status, message: impl fmt::Display) {
    let line = status_line(status, message);
    match status {
        Status::Failed => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

/// A rejected term: heading, then one line per violation
pub fn violation_lines(report: &ValidationReport) -> Vec<String> {
    let mut lines = vec![status_line(Status::Failed, report)];
    lines.extend(report.violations.iter().map(|v| format!("  - {}", v)));
    lines
}

/// A save the store stopped part way, with what already went through
pub fn store_failure_lines(failure: &StoreFailure) -> Vec<String> {
    let mut lines = vec![
        status_line(
            Status::Failed,
            format!("Term {} save stopped at: {}", failure.year, failure.failed),
        ),
        format!("  cause: {}", failure.source),
    ];
    if failure.completed.is_empty() {
        lines.push("  nothing was written".dimmed().to_string());
    } else {
        lines.extend(failure.completed.iter().map(|step| format!("  completed: {}", step)));
        lines.push(
            "  stored term is partial; save the same draft again to finish"
                .dimmed()
                .to_string(),
        );
    }
    lines
}

pub fn print_violations(report: &ValidationReport) {
    for line in violation_lines(report) {
        eprintln!("{}", line);
    }
}

pub fn print_store_failure(failure: &StoreFailure) {
    for line in store_failure_lines(failure) {
        eprintln!("{}", line);
    }
}

/// Yes/no cell marker
pub fn mark(granted: bool) -> String {
    if granted {
        "✓".green().to_string()
    } else {
        "·".dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapter_runtime::{StoreStep, Violation};
    use chapter_storage::{DocumentId, StorageError};
    use chapter_types::{BoardPosition, MemberId};

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn test_mark_is_distinct() {
        colored::control::set_override(false);
        assert_eq!(mark(true), "✓");
        assert_eq!(mark(false), "·");
    }

    #[test]
    fn test_status_markers() {
        colored::control::set_override(false);
        assert_eq!(status_line(Status::Done, "saved"), "✓ saved");
        assert_eq!(status_line(Status::Denied, "no"), "✗ no");
        assert_eq!(status_line(Status::Notice, 3), "• 3");
        assert_eq!(status_line(Status::Failed, "boom"), "✗ boom");
    }

    #[test]
    fn test_violation_lines() {
        colored::control::set_override(false);
        let report = ValidationReport {
            year: 2026,
            violations: vec![Violation::DuplicateBoardMember {
                member: MemberId::new("M1"),
                positions: vec![
                    BoardPosition::President.code(),
                    BoardPosition::Treasurer.code(),
                ],
            }],
        };

        let lines = violation_lines(&report);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "✗ Term 2026 rejected with 1 violation(s)");
        assert!(lines[1].starts_with("  - "));
        assert!(lines[1].contains("M1"));
    }

    #[test]
    fn test_store_failure_lines() {
        colored::control::set_override(false);
        let failure = StoreFailure {
            year: 2026,
            failed: StoreStep::Create {
                id: DocumentId::new("treasurer:2026:M2"),
                position: BoardPosition::Treasurer.code(),
                member: MemberId::new("M2"),
            },
            completed: vec![
                StoreStep::Query { year: 2026 },
                StoreStep::Delete {
                    id: DocumentId::new("mentor:2026:M1"),
                },
            ],
            source: StorageError::Backend("disk full".into()),
        };

        let lines = store_failure_lines(&failure);
        assert_eq!(
            lines[0],
            "✗ Term 2026 save stopped at: create treasurer for M2"
        );
        assert!(lines[1].contains("disk full"));
        assert_eq!(lines[2], "  completed: query assignments for 2026");
        assert_eq!(lines[3], "  completed: delete mentor:2026:M1");
        assert!(lines[4].contains("save the same draft again"));

        let untouched = StoreFailure {
            completed: Vec::new(),
            failed: StoreStep::Query { year: 2026 },
            ..failure
        };
        let lines = store_failure_lines(&untouched);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "  nothing was written");
    }
}
