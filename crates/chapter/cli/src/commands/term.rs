//! Officer term commands

use crate::context::Context;
use crate::output::{
    print_output, print_single, print_status, print_store_failure, print_violations, OutputFormat,
    Status,
};
use anyhow::Context as _;
use chapter_runtime::{RosterEntry, RuntimeError};
use chapter_storage::DocumentId;
use chapter_types::{BoardPosition, Slot, TermDraft};
use chrono::NaiveDate;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tabled::Tabled;

/// Term subcommands
#[derive(Subcommand)]
pub enum TermCommands {
    /// Check a draft file without saving
    Validate {
        /// Path to draft file (JSON)
        file: String,
    },

    /// Replace the stored term for the draft's year
    Save {
        /// Path to draft file (JSON)
        file: String,
    },

    /// Show the stored term
    Show {
        /// Term year (defaults to the current year)
        year: Option<i32>,
    },

    /// Set the end date of a stored assignment
    End {
        /// Assignment id
        id: String,
        date: NaiveDate,
    },

    /// Clear the end date of a stored assignment
    Reopen {
        /// Assignment id
        id: String,
    },

    /// Mark a stored assignment as acting for a board office
    Acting {
        /// Assignment id
        id: String,
        /// Board office being covered; omit to clear
        #[arg(long = "for")]
        acting_for: Option<BoardPosition>,
    },
}

/// Operator-facing draft file.
///
/// Seats are plain strings: a member id, or blank / `unassigned` for an
/// open seat.
///
/// ```json
/// {
///   "year": 2026,
///   "board": { "president": "M1", "mentor": "unassigned" },
///   "cadre": { "president": ["M2", "M3"] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftFile {
    pub year: i32,
    #[serde(default)]
    pub board: BTreeMap<BoardPosition, String>,
    #[serde(default)]
    pub cadre: BTreeMap<BoardPosition, Vec<String>>,
}

impl DraftFile {
    pub fn into_draft(self) -> TermDraft {
        let mut draft = TermDraft::new(self.year);
        for (position, raw) in self.board {
            draft = draft.with_board(position, Slot::from_input(&raw));
        }
        for (position, raws) in self.cadre {
            draft = draft.with_cadre(
                position,
                raws.iter().map(|raw| Slot::from_input(raw)).collect(),
            );
        }
        draft
    }
}

async fn read_draft(path: &str) -> anyhow::Result<TermDraft> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading draft {}", path))?;
    let file: DraftFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing draft {}", path))?;
    Ok(file.into_draft())
}

/// Table row for a stored assignment
#[derive(Debug, Serialize, Tabled)]
struct RosterRow {
    id: String,
    position: String,
    member: String,
    start: String,
    end: String,
    acting: String,
}

impl From<RosterEntry> for RosterRow {
    fn from(entry: RosterEntry) -> Self {
        let member = match entry.member_name {
            Some(name) => format!("{} ({})", name, entry.member_id),
            None => entry.member_id.to_string(),
        };
        Self {
            id: entry.id.to_string(),
            position: entry.position.to_string(),
            member,
            start: entry.start_date.to_string(),
            end: entry.end_date.map(|d| d.to_string()).unwrap_or_default(),
            acting: entry
                .acting_for
                .map(|p| format!("for {}", p))
                .unwrap_or_default(),
        }
    }
}

/// Print why a save did not go through, then fail the command
fn report(error: RuntimeError) -> anyhow::Error {
    match error {
        RuntimeError::Validation(report) => {
            print_violations(&report);
            anyhow::anyhow!(report)
        }
        RuntimeError::Store(failure) => {
            print_store_failure(&failure);
            anyhow::anyhow!(failure)
        }
        other => other.into(),
    }
}

/// Execute a term command
pub async fn execute(
    command: TermCommands,
    context: &Context,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let service = context.assignments();

    match command {
        TermCommands::Validate { file } => {
            let draft = read_draft(&file).await?;
            let checked = service.check_term(&draft)?;
            if checked.is_empty() {
                print_status(Status::Done, format!("Term {} is valid", draft.year));
                Ok(())
            } else {
                Err(report(RuntimeError::Validation(checked)))
            }
        }

        TermCommands::Save { file } => {
            let draft = read_draft(&file).await?;
            let outcome = service.save_term(&draft).await.map_err(report)?;
            match format {
                OutputFormat::Table => {
                    print_status(
                        Status::Done,
                        format!(
                            "Term {} saved: {} removed, {} stored",
                            outcome.year,
                            outcome.deleted.len(),
                            outcome.created.len()
                        ),
                    );
                    Ok(())
                }
                OutputFormat::Json => print_single(&outcome),
            }
        }

        TermCommands::Show { year } => {
            let year = year.unwrap_or_else(|| service.current_term_year());
            let rows: Vec<RosterRow> = service
                .term_roster(year)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            print_output(rows, format)
        }

        TermCommands::End { id, date } => {
            let assignment = service
                .set_end_date(&DocumentId::new(id), Some(date))
                .await
                .map_err(report)?;
            print_status(
                Status::Done,
                format!("{} for {} ends {}", assignment.position, assignment.member_id, date),
            );
            Ok(())
        }

        TermCommands::Reopen { id } => {
            let assignment = service.set_end_date(&DocumentId::new(id), None).await?;
            print_status(
                Status::Done,
                format!("{} for {} has no end date", assignment.position, assignment.member_id),
            );
            Ok(())
        }

        TermCommands::Acting { id, acting_for } => {
            let assignment = service.set_acting(&DocumentId::new(id), acting_for).await?;
            let message = match assignment.acting_for {
                Some(position) => format!("{} is acting for {}", assignment.member_id, position),
                None => format!("{} is no longer acting", assignment.member_id),
            };
            print_status(Status::Done, message);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_file_interprets_seats() {
        let file: DraftFile = serde_json::from_str(
            r#"{
                "year": 2026,
                "board": {"president": "M1", "mentor": "Unassigned", "treasurer": " "},
                "cadre": {"president": ["M2", "", "M3"]}
            }"#,
        )
        .unwrap();
        let draft = file.into_draft();

        assert_eq!(draft.year, 2026);
        assert_eq!(draft.board[&BoardPosition::President], Slot::assigned("M1"));
        assert_eq!(draft.board[&BoardPosition::Mentor], Slot::Unassigned);
        assert_eq!(draft.board[&BoardPosition::Treasurer], Slot::Unassigned);
        assert_eq!(draft.board[&BoardPosition::Secretary], Slot::Unassigned);
        assert_eq!(
            draft.cadre[&BoardPosition::President],
            vec![Slot::assigned("M2"), Slot::Unassigned, Slot::assigned("M3")]
        );
    }

    #[test]
    fn test_draft_file_rejects_cadre_codes_as_keys() {
        let parsed = serde_json::from_str::<DraftFile>(
            r#"{"year": 2026, "board": {"president_cadre": "M1"}}"#,
        );
        assert!(parsed.is_err());
    }
}
