//! Officer term assignments
//!
//! A term is one calendar year, Jan 1 through Dec 31. Officers are placed
//! through a [`TermDraft`] (one slot per board office, any number of slots
//! per cadre office), which expands into the [`TermAssignmentSet`] that is
//! validated and persisted as individual [`PositionAssignment`] records.

use crate::{BoardPosition, CatalogError, CatalogResult, MemberId, PositionCode, Slot};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First and last day of the term for `year`
pub fn term_bounds(year: i32) -> CatalogResult<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(CatalogError::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(CatalogError::InvalidYear(year))?;
    Ok((start, end))
}

/// Deterministic document key for a stored assignment.
///
/// Re-creating the same (position, year, member) always targets the same
/// record, so replaying a partially applied save converges.
pub fn assignment_key(position: PositionCode, year: i32, member: &MemberId) -> String {
    format!("{}:{}:{}", position, year, member)
}

/// A persisted officer term
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub member_id: MemberId,
    pub position: PositionCode,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_acting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acting_for: Option<PositionCode>,
}

impl PositionAssignment {
    /// A full-year term for `member` in `position`
    pub fn for_term(member_id: MemberId, position: PositionCode, year: i32) -> CatalogResult<Self> {
        let (start, end) = term_bounds(year)?;
        Ok(Self {
            member_id,
            position,
            start_date: start,
            end_date: Some(end),
            is_acting: false,
            acting_for: None,
        })
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    pub fn key(&self) -> String {
        assignment_key(self.position, self.year(), &self.member_id)
    }

    pub fn with_acting(mut self, acting_for: PositionCode) -> Self {
        self.is_acting = true;
        self.acting_for = Some(acting_for);
        self
    }

    /// True when both dates are present and out of order
    pub fn has_inverted_dates(&self) -> bool {
        matches!(self.end_date, Some(end) if end < self.start_date)
    }
}

/// One seat in a proposed term, possibly left open
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAssignment {
    pub position: PositionCode,
    pub holder: Slot,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProposedAssignment {
    pub fn new(position: PositionCode, holder: Slot) -> Self {
        Self {
            position,
            holder,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}

impl From<PositionAssignment> for ProposedAssignment {
    fn from(assignment: PositionAssignment) -> Self {
        Self {
            position: assignment.position,
            holder: Slot::Assigned(assignment.member_id),
            start_date: Some(assignment.start_date),
            end_date: assignment.end_date,
        }
    }
}

/// Every proposed seat for one calendar year
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermAssignmentSet {
    pub year: i32,
    pub entries: Vec<ProposedAssignment>,
}

impl TermAssignmentSet {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: ProposedAssignment) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn board_entries(&self) -> impl Iterator<Item = &ProposedAssignment> {
        self.entries.iter().filter(|e| !e.position.is_cadre())
    }

    pub fn cadre_entries(&self) -> impl Iterator<Item = &ProposedAssignment> {
        self.entries.iter().filter(|e| e.position.is_cadre())
    }

    /// Seats that have a holder, in entry order
    pub fn assigned(&self) -> impl Iterator<Item = (&ProposedAssignment, &MemberId)> {
        self.entries
            .iter()
            .filter_map(|e| e.holder.member().map(|m| (e, m)))
    }
}

/// The editable form of a term
///
/// Board offices hold at most one member; cadre offices may hold several.
/// Map keys are board positions, so iteration follows canonical order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDraft {
    pub year: i32,
    #[serde(default)]
    pub board: BTreeMap<BoardPosition, Slot>,
    #[serde(default)]
    pub cadre: BTreeMap<BoardPosition, Vec<Slot>>,
}

impl TermDraft {
    /// A draft with every board seat open and no cadre seats
    pub fn new(year: i32) -> Self {
        Self {
            year,
            board: BoardPosition::ALL
                .iter()
                .map(|b| (*b, Slot::Unassigned))
                .collect(),
            cadre: BTreeMap::new(),
        }
    }

    pub fn with_board(mut self, position: BoardPosition, holder: Slot) -> Self {
        self.board.insert(position, holder);
        self
    }

    pub fn with_cadre(mut self, position: BoardPosition, holders: Vec<Slot>) -> Self {
        self.cadre.insert(position, holders);
        self
    }

    pub fn add_cadre(&mut self, position: BoardPosition, holder: Slot) {
        self.cadre.entry(position).or_default().push(holder);
    }

    /// Expand into per-seat proposals stamped with the term's dates.
    ///
    /// Board seats come first, then cadre seats, both in canonical order.
    pub fn to_assignment_set(&self) -> CatalogResult<TermAssignmentSet> {
        let (start, end) = term_bounds(self.year)?;
        let mut set = TermAssignmentSet::new(self.year);

        for (position, holder) in &self.board {
            set.entries.push(
                ProposedAssignment::new(position.code(), holder.clone())
                    .with_dates(Some(start), Some(end)),
            );
        }
        for (position, holders) in &self.cadre {
            for holder in holders {
                set.entries.push(
                    ProposedAssignment::new(position.cadre(), holder.clone())
                        .with_dates(Some(start), Some(end)),
                );
            }
        }
        Ok(set)
    }

    /// Rebuild a draft from stored assignments for the same year
    ///
    /// A draft holds one member per board seat; two stored holders of the
    /// same seat are reported rather than collapsed.
    pub fn from_assignments<'a>(
        year: i32,
        assignments: impl IntoIterator<Item = &'a PositionAssignment>,
    ) -> CatalogResult<Self> {
        let mut draft = TermDraft::new(year);
        let mut sorted: Vec<&PositionAssignment> = assignments
            .into_iter()
            .filter(|a| a.year() == year)
            .collect();
        sorted.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        for assignment in sorted {
            let holder = Slot::Assigned(assignment.member_id.clone());
            match assignment.position {
                PositionCode::Board(board) => {
                    if let Some(Slot::Assigned(first)) = draft.board.get(&board) {
                        if first != &assignment.member_id {
                            return Err(CatalogError::BoardSeatConflict {
                                position: board.to_string(),
                                first: first.to_string(),
                                second: assignment.member_id.to_string(),
                            });
                        }
                    }
                    draft.board.insert(board, holder);
                }
                PositionCode::Cadre(board) => draft.add_cadre(board, holder),
            }
        }
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_bounds() {
        let (start, end) = term_bounds(2026).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(term_bounds(i32::MAX), Err(CatalogError::InvalidYear(i32::MAX)));
    }

    #[test]
    fn test_assignment_key_is_deterministic() {
        let member = MemberId::new("M3");
        let a = PositionAssignment::for_term(member.clone(), BoardPosition::President.cadre(), 2025)
            .unwrap();
        assert_eq!(a.key(), "president_cadre:2025:M3");
        assert_eq!(a.key(), assignment_key(a.position, 2025, &member));
        assert_eq!(a.year(), 2025);
    }

    #[test]
    fn test_inverted_dates() {
        let mut a =
            PositionAssignment::for_term(MemberId::new("M1"), BoardPosition::Treasurer.code(), 2025)
                .unwrap();
        assert!(!a.has_inverted_dates());
        a.end_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        assert!(a.has_inverted_dates());
        a.end_date = None;
        assert!(!a.has_inverted_dates());
    }

    #[test]
    fn test_draft_expansion_order_and_dates() {
        let draft = TermDraft::new(2026)
            .with_board(BoardPosition::Treasurer, Slot::assigned("M2"))
            .with_board(BoardPosition::President, Slot::assigned("M1"))
            .with_cadre(
                BoardPosition::President,
                vec![Slot::assigned("M3"), Slot::assigned("M4")],
            );
        let set = draft.to_assignment_set().unwrap();

        assert_eq!(set.board_entries().count(), 11);
        assert_eq!(set.cadre_entries().count(), 2);
        assert_eq!(set.entries[0].position, BoardPosition::President.code());

        let assigned: Vec<String> = set
            .assigned()
            .map(|(e, m)| format!("{}={}", e.position, m))
            .collect();
        assert_eq!(
            assigned,
            vec![
                "president=M1",
                "treasurer=M2",
                "president_cadre=M3",
                "president_cadre=M4"
            ]
        );
        for entry in &set.entries {
            assert_eq!(entry.start_date, NaiveDate::from_ymd_opt(2026, 1, 1));
            assert_eq!(entry.end_date, NaiveDate::from_ymd_opt(2026, 12, 31));
        }
    }

    #[test]
    fn test_draft_from_assignments() {
        let stored = vec![
            PositionAssignment::for_term(MemberId::new("M9"), BoardPosition::Mentor.cadre(), 2026)
                .unwrap(),
            PositionAssignment::for_term(MemberId::new("M1"), BoardPosition::President.code(), 2026)
                .unwrap(),
            PositionAssignment::for_term(MemberId::new("M8"), BoardPosition::Mentor.cadre(), 2026)
                .unwrap(),
            PositionAssignment::for_term(MemberId::new("M5"), BoardPosition::Mentor.code(), 2025)
                .unwrap(),
        ];
        let draft = TermDraft::from_assignments(2026, &stored).unwrap();

        assert_eq!(draft.board[&BoardPosition::President], Slot::assigned("M1"));
        assert_eq!(draft.board[&BoardPosition::Mentor], Slot::Unassigned);
        assert_eq!(
            draft.cadre[&BoardPosition::Mentor],
            vec![Slot::assigned("M8"), Slot::assigned("M9")]
        );
    }

    #[test]
    fn test_draft_from_assignments_rejects_shared_board_seat() {
        let stored = vec![
            PositionAssignment::for_term(MemberId::new("M2"), BoardPosition::President.code(), 2026)
                .unwrap(),
            PositionAssignment::for_term(MemberId::new("M1"), BoardPosition::President.code(), 2026)
                .unwrap(),
        ];
        let err = TermDraft::from_assignments(2026, &stored).unwrap_err();

        assert_eq!(
            err,
            CatalogError::BoardSeatConflict {
                position: "president".into(),
                first: "M1".into(),
                second: "M2".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Board position president is held by both M1 and M2"
        );

        // Another year's holder of the same seat is not a conflict
        let other_year = vec![
            stored[0].clone(),
            PositionAssignment::for_term(MemberId::new("M1"), BoardPosition::President.code(), 2025)
                .unwrap(),
        ];
        let draft = TermDraft::from_assignments(2026, &other_year).unwrap();
        assert_eq!(draft.board[&BoardPosition::President], Slot::assigned("M2"));
    }

    #[test]
    fn test_draft_json_uses_position_codes() {
        let json = serde_json::json!({
            "year": 2026,
            "board": {
                "president": {"state": "assigned", "member": "M1"},
                "treasurer": {"state": "unassigned"}
            },
            "cadre": {
                "president": [{"state": "assigned", "member": "M2"}]
            }
        });
        let draft: TermDraft = serde_json::from_value(json).unwrap();
        assert_eq!(draft.board.len(), 2);
        assert_eq!(draft.cadre[&BoardPosition::President].len(), 1);
    }
}
