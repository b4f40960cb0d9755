//! Assignment validator: uniqueness and date checks for a proposed term
//!
//! Every rule runs on every submission and all violations are reported
//! together. A term is accepted only when the report is empty.

use chapter_types::{term_bounds, MemberId, PositionCode, Slot, TermAssignmentSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

fn codes(positions: &[PositionCode]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn ids(members: &[MemberId]) -> String {
    members
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single broken rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Violation {
    #[error("Board position {position} is held by more than one member: {}", ids(.members))]
    SharedBoardSeat {
        position: PositionCode,
        members: Vec<MemberId>,
    },

    #[error("Member {member} holds more than one board position: {}", codes(.positions))]
    DuplicateBoardMember {
        member: MemberId,
        positions: Vec<PositionCode>,
    },

    #[error("Member {member} holds more than one cadre position: {}", codes(.positions))]
    DuplicateCadreMember {
        member: MemberId,
        positions: Vec<PositionCode>,
    },

    #[error(
        "Member {member} holds both board ({}) and cadre ({}) positions",
        codes(.board_positions),
        codes(.cadre_positions)
    )]
    CrossRoleConflict {
        member: MemberId,
        board_positions: Vec<PositionCode>,
        cadre_positions: Vec<PositionCode>,
    },

    #[error("Position {position} ({holder}) ends {end} before it starts {start}")]
    InvalidDateRange {
        position: PositionCode,
        holder: Slot,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Position {position} ({holder}) has {date}, outside term {year}")]
    OutsideTerm {
        position: PositionCode,
        holder: Slot,
        date: NaiveDate,
        year: i32,
    },
}

impl Violation {
    /// Members named by this violation
    pub fn members(&self) -> Vec<&MemberId> {
        match self {
            Violation::DuplicateBoardMember { member, .. }
            | Violation::DuplicateCadreMember { member, .. }
            | Violation::CrossRoleConflict { member, .. } => vec![member],
            Violation::SharedBoardSeat { members, .. } => members.iter().collect(),
            Violation::InvalidDateRange { holder, .. } | Violation::OutsideTerm { holder, .. } => {
                holder.member().into_iter().collect()
            }
        }
    }
}

/// Every violation found in one submission
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, thiserror::Error)]
#[error("Term {year} rejected with {} violation(s)", .violations.len())]
pub struct ValidationReport {
    pub year: i32,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Members named anywhere in the report, each once
    pub fn offending_members(&self) -> BTreeSet<&MemberId> {
        self.violations.iter().flat_map(|v| v.members()).collect()
    }
}

/// Checks a proposed term against the officer invariants
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentValidator;

impl AssignmentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Run every rule and collect what fails
    pub fn check(&self, set: &TermAssignmentSet) -> ValidationReport {
        let board = holders(set, false);
        let cadre = holders(set, true);

        let mut violations = Vec::new();

        // One holder per board seat
        let mut seats: BTreeMap<PositionCode, Vec<MemberId>> = BTreeMap::new();
        for (entry, member) in set.assigned() {
            if !entry.position.is_cadre() {
                seats.entry(entry.position).or_default().push(member.clone());
            }
        }
        for (position, mut members) in seats {
            members.sort();
            members.dedup();
            if members.len() > 1 {
                violations.push(Violation::SharedBoardSeat { position, members });
            }
        }

        for (member, positions) in duplicates(&board) {
            violations.push(Violation::DuplicateBoardMember { member, positions });
        }
        for (member, positions) in duplicates(&cadre) {
            violations.push(Violation::DuplicateCadreMember { member, positions });
        }

        let mut cross: Vec<Violation> = board
            .iter()
            .filter_map(|(member, board_positions)| {
                cadre.get(member).map(|cadre_positions| Violation::CrossRoleConflict {
                    member: member.clone(),
                    board_positions: board_positions.clone(),
                    cadre_positions: cadre_positions.clone(),
                })
            })
            .collect();
        cross.sort_by(|a, b| first_position(a).cmp(&first_position(b)));
        violations.extend(cross);

        for entry in &set.entries {
            if let (Some(start), Some(end)) = (entry.start_date, entry.end_date) {
                if end < start {
                    violations.push(Violation::InvalidDateRange {
                        position: entry.position,
                        holder: entry.holder.clone(),
                        start,
                        end,
                    });
                }
            }
        }

        // Stored records are found again by the year of their start date, so
        // every date must stay inside the term. An unrepresentable year is
        // reported when the term is saved.
        if let Ok((term_start, term_end)) = term_bounds(set.year) {
            for entry in &set.entries {
                for date in [entry.start_date, entry.end_date].into_iter().flatten() {
                    if date < term_start || date > term_end {
                        violations.push(Violation::OutsideTerm {
                            position: entry.position,
                            holder: entry.holder.clone(),
                            date,
                            year: set.year,
                        });
                    }
                }
            }
        }

        debug!(
            year = set.year,
            entries = set.entries.len(),
            violations = violations.len(),
            "Term assignment set checked"
        );

        ValidationReport {
            year: set.year,
            violations,
        }
    }

    /// Accept or reject the set as a whole
    pub fn validate(&self, set: &TermAssignmentSet) -> Result<(), ValidationReport> {
        let report = self.check(set);
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

/// Assigned member -> positions held on one side of the board/cadre divide.
/// Open seats are skipped.
fn holders(set: &TermAssignmentSet, cadre: bool) -> BTreeMap<MemberId, Vec<PositionCode>> {
    let mut map: BTreeMap<MemberId, Vec<PositionCode>> = BTreeMap::new();
    for (entry, member) in set.assigned() {
        if entry.position.is_cadre() == cadre {
            map.entry(member.clone()).or_default().push(entry.position);
        }
    }
    for positions in map.values_mut() {
        positions.sort();
    }
    map
}

/// Members appearing more than once, ordered by their first position
fn duplicates(
    holders: &BTreeMap<MemberId, Vec<PositionCode>>,
) -> Vec<(MemberId, Vec<PositionCode>)> {
    let mut found: Vec<(MemberId, Vec<PositionCode>)> = holders
        .iter()
        .filter(|(_, positions)| positions.len() > 1)
        .map(|(member, positions)| (member.clone(), positions.clone()))
        .collect();
    found.sort_by(|a, b| a.1[0].cmp(&b.1[0]).then_with(|| a.0.cmp(&b.0)));
    found
}

fn first_position(violation: &Violation) -> Option<PositionCode> {
    match violation {
        Violation::CrossRoleConflict {
            board_positions, ..
        } => board_positions.first().copied(),
        _ => None,
    }
}
