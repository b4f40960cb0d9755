//! Position assignment service: validated replacement of a year's officers
//!
//! Saving a term is "replace all of year Y": validate the proposed set, look
//! up what is stored for Y, delete it, then create one record per assigned
//! seat. The store offers no transactions, so the sequence is fail-closed:
//! the first failed call stops the save and the error lists every call that
//! had already succeeded. Records are keyed by position, year and member,
//! so running the same save again converges on the intended state.

use crate::error::{RuntimeError, RuntimeResult, StoreFailure, StoreStep};
use crate::validator::{AssignmentValidator, ValidationReport, Violation};
use chapter_storage::{Clock, DocumentId, DocumentStore, Filter, MemberDirectory, StorageError};
use chapter_types::{
    term_bounds, BoardPosition, MemberId, PositionAssignment, PositionCode, Slot,
    TermAssignmentSet, TermDraft,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Collection holding one document per stored assignment
pub const DEFAULT_ASSIGNMENT_COLLECTION: &str = "position_assignments";

/// Result of a completed term save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub year: i32,
    pub deleted: Vec<DocumentId>,
    pub created: Vec<DocumentId>,
}

/// A stored assignment joined with the holder's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: DocumentId,
    pub position: PositionCode,
    pub member_id: MemberId,
    /// `None` when the member is not in the directory
    pub member_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_acting: bool,
    pub acting_for: Option<PositionCode>,
}

/// Persists officer terms through a [`DocumentStore`]
pub struct PositionAssignmentService {
    store: Arc<dyn DocumentStore>,
    directory: Arc<dyn MemberDirectory>,
    clock: Arc<dyn Clock>,
    validator: AssignmentValidator,
    collection: String,
}

impl PositionAssignmentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        directory: Arc<dyn MemberDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            clock,
            validator: AssignmentValidator::new(),
            collection: DEFAULT_ASSIGNMENT_COLLECTION.to_string(),
        }
    }

    /// Store assignments in a different collection
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Year of today's date, the default term
    pub fn current_term_year(&self) -> i32 {
        self.clock.today().year()
    }

    /// Validate without touching the store
    pub fn check_term(&self, draft: &TermDraft) -> RuntimeResult<ValidationReport> {
        let set = draft.to_assignment_set()?;
        Ok(self.validator.check(&set))
    }

    /// Replace every assignment of the draft's year with the draft.
    pub async fn save_term(&self, draft: &TermDraft) -> RuntimeResult<SaveOutcome> {
        let set = draft.to_assignment_set()?;
        self.save_assignments(&set).await
    }

    /// Replace every assignment of `set.year` with the assigned seats of `set`.
    ///
    /// Seats without dates take the term bounds. Open seats produce no record.
    pub async fn save_assignments(&self, set: &TermAssignmentSet) -> RuntimeResult<SaveOutcome> {
        let year = set.year;

        if let Err(report) = self.validator.validate(set) {
            warn!(
                year,
                violations = report.len(),
                members = ?report.offending_members(),
                "Term rejected"
            );
            return Err(report.into());
        }

        // Everything that can fail without the store is settled before the
        // first write.
        let (term_start, term_end) = term_bounds(year)?;
        let mut planned = Vec::new();
        for (entry, member) in set.assigned() {
            let assignment = PositionAssignment {
                member_id: member.clone(),
                position: entry.position,
                start_date: entry.start_date.unwrap_or(term_start),
                end_date: Some(entry.end_date.unwrap_or(term_end)),
                is_acting: false,
                acting_for: None,
            };
            // Dates lie inside the term, so the key year is the start year
            let id = DocumentId::new(chapter_types::assignment_key(entry.position, year, member));
            let body = serde_json::to_value(&assignment)?;
            planned.push((id, assignment, body));
        }

        let mut completed = Vec::new();

        let query = StoreStep::Query { year };
        let existing = match self
            .store
            .query(&self.collection, &year_filter(term_start, term_end))
            .await
        {
            Ok(docs) => docs,
            Err(source) => return Err(halt(year, query, completed, source)),
        };
        completed.push(query);

        let mut deleted = Vec::with_capacity(existing.len());
        for doc in existing {
            let step = StoreStep::Delete { id: doc.id.clone() };
            if let Err(source) = self.store.delete(&self.collection, &doc.id).await {
                return Err(halt(year, step, completed, source));
            }
            debug!(year, id = %doc.id, "Previous assignment deleted");
            completed.push(step);
            deleted.push(doc.id);
        }

        let mut created = Vec::with_capacity(planned.len());
        for (id, assignment, body) in planned {
            let step = StoreStep::Create {
                id: id.clone(),
                position: assignment.position,
                member: assignment.member_id.clone(),
            };
            match self.store.create(&self.collection, Some(id), body).await {
                Ok(stored) => {
                    completed.push(step);
                    created.push(stored);
                }
                Err(source) => return Err(halt(year, step, completed, source)),
            }
        }

        info!(
            year,
            deleted = deleted.len(),
            created = created.len(),
            "Term saved"
        );

        Ok(SaveOutcome {
            year,
            deleted,
            created,
        })
    }

    /// Stored assignments starting in `year`, ordered by id
    pub async fn load_assignments(
        &self,
        year: i32,
    ) -> RuntimeResult<Vec<(DocumentId, PositionAssignment)>> {
        let (start, end) = term_bounds(year)?;
        let docs = self
            .store
            .query(&self.collection, &year_filter(start, end))
            .await?;
        docs.into_iter()
            .map(|doc| {
                let assignment = self.decode(&doc.id, doc.body)?;
                Ok((doc.id, assignment))
            })
            .collect()
    }

    /// The stored term for `year`, as an editable draft
    pub async fn load_term(&self, year: i32) -> RuntimeResult<TermDraft> {
        let assignments = self.load_assignments(year).await?;
        Ok(TermDraft::from_assignments(
            year,
            assignments.iter().map(|(_, a)| a),
        )?)
    }

    /// The stored term for `year` with member names, in canonical position order
    pub async fn term_roster(&self, year: i32) -> RuntimeResult<Vec<RosterEntry>> {
        let assignments = self.load_assignments(year).await?;
        let names: HashMap<MemberId, String> = self
            .directory
            .list_members()
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let mut roster: Vec<RosterEntry> = assignments
            .into_iter()
            .map(|(id, a)| RosterEntry {
                id,
                position: a.position,
                member_name: names.get(&a.member_id).cloned(),
                member_id: a.member_id,
                start_date: a.start_date,
                end_date: a.end_date,
                is_acting: a.is_acting,
                acting_for: a.acting_for,
            })
            .collect();
        roster.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.member_id.cmp(&b.member_id))
        });
        Ok(roster)
    }

    /// Close (or reopen, with `None`) a stored assignment
    pub async fn set_end_date(
        &self,
        id: &DocumentId,
        end_date: Option<NaiveDate>,
    ) -> RuntimeResult<PositionAssignment> {
        let mut assignment = self.fetch(id).await?;

        if let Some(end) = end_date {
            if end < assignment.start_date {
                let report = ValidationReport {
                    year: assignment.year(),
                    violations: vec![Violation::InvalidDateRange {
                        position: assignment.position,
                        holder: Slot::Assigned(assignment.member_id.clone()),
                        start: assignment.start_date,
                        end,
                    }],
                };
                warn!(id = %id, %end, start = %assignment.start_date, "End date rejected");
                return Err(report.into());
            }
        }

        self.store
            .update(&self.collection, id, json!({ "end_date": end_date }))
            .await?;
        assignment.end_date = end_date;

        info!(id = %id, end_date = ?end_date, "Assignment end date set");
        Ok(assignment)
    }

    /// Mark a stored assignment as acting for a board office, or clear the mark
    pub async fn set_acting(
        &self,
        id: &DocumentId,
        acting_for: Option<BoardPosition>,
    ) -> RuntimeResult<PositionAssignment> {
        let mut assignment = self.fetch(id).await?;
        let acting_for = acting_for.map(|p| p.code());

        self.store
            .update(
                &self.collection,
                id,
                json!({ "is_acting": acting_for.is_some(), "acting_for": acting_for }),
            )
            .await?;
        assignment.is_acting = acting_for.is_some();
        assignment.acting_for = acting_for;

        info!(id = %id, acting_for = ?acting_for, "Assignment acting status set");
        Ok(assignment)
    }

    async fn fetch(&self, id: &DocumentId) -> RuntimeResult<PositionAssignment> {
        let doc = self
            .store
            .get(&self.collection, id)
            .await?
            .ok_or_else(|| RuntimeError::NotFound(format!("assignment {}", id)))?;
        self.decode(&doc.id, doc.body)
    }

    fn decode(&self, id: &DocumentId, body: serde_json::Value) -> RuntimeResult<PositionAssignment> {
        serde_json::from_value(body).map_err(|source| RuntimeError::Decode {
            collection: self.collection.clone(),
            id: id.clone(),
            source,
        })
    }
}

fn year_filter(start: NaiveDate, end: NaiveDate) -> Filter {
    Filter::range("start_date", start.to_string(), end.to_string())
}

fn halt(
    year: i32,
    failed: StoreStep,
    completed: Vec<StoreStep>,
    source: StorageError,
) -> RuntimeError {
    warn!(
        year,
        failed = %failed,
        completed = completed.len(),
        error = %source,
        "Term save halted; stored state is partial"
    );
    StoreFailure {
        year,
        failed,
        completed,
        source,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapter_storage::{FixedClock, InMemoryDocumentStore, StaticMemberDirectory};
    use chapter_types::{CatalogError, Member};
    use chrono::{TimeZone, Utc};

    fn service() -> (Arc<InMemoryDocumentStore>, PositionAssignmentService) {
        let store = Arc::new(InMemoryDocumentStore::new());
        let directory = StaticMemberDirectory::new(vec![
            Member::new("M1", "Ada"),
            Member::new("M2", "Grace"),
        ]);
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap());
        let service =
            PositionAssignmentService::new(store.clone(), Arc::new(directory), Arc::new(clock));
        (store, service)
    }

    #[test]
    fn test_current_term_year_follows_clock() {
        let (_, service) = service();
        assert_eq!(service.current_term_year(), 2026);
    }

    #[tokio::test]
    async fn test_save_and_load_term() {
        let (store, service) = service();
        let draft = TermDraft::new(2026)
            .with_board(BoardPosition::President, Slot::assigned("M1"))
            .with_cadre(BoardPosition::President, vec![Slot::assigned("M2")]);

        let outcome = service.save_term(&draft).await.unwrap();
        assert!(outcome.deleted.is_empty());
        assert_eq!(
            outcome.created,
            vec![
                DocumentId::new("president:2026:M1"),
                DocumentId::new("president_cadre:2026:M2"),
            ]
        );
        assert_eq!(store.count(DEFAULT_ASSIGNMENT_COLLECTION).await, 2);

        let loaded = service.load_term(2026).await.unwrap();
        assert_eq!(loaded, draft);
    }

    #[tokio::test]
    async fn test_resave_replaces_year_only() {
        let (store, service) = service();
        service
            .save_term(&TermDraft::new(2025).with_board(BoardPosition::Mentor, Slot::assigned("M2")))
            .await
            .unwrap();
        service
            .save_term(&TermDraft::new(2026).with_board(BoardPosition::Mentor, Slot::assigned("M1")))
            .await
            .unwrap();

        let outcome = service
            .save_term(
                &TermDraft::new(2026).with_board(BoardPosition::Treasurer, Slot::assigned("M1")),
            )
            .await
            .unwrap();
        assert_eq!(outcome.deleted, vec![DocumentId::new("mentor:2026:M1")]);
        assert_eq!(store.count(DEFAULT_ASSIGNMENT_COLLECTION).await, 2);
        assert_eq!(service.load_assignments(2025).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roster_joins_names() {
        let (_, service) = service();
        service
            .save_term(
                &TermDraft::new(2026)
                    .with_board(BoardPosition::Secretary, Slot::assigned("M9"))
                    .with_board(BoardPosition::President, Slot::assigned("M1")),
            )
            .await
            .unwrap();

        let roster = service.term_roster(2026).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].position, BoardPosition::President.code());
        assert_eq!(roster[0].member_name.as_deref(), Some("Ada"));
        assert_eq!(roster[1].member_name, None);
    }

    #[tokio::test]
    async fn test_set_end_date() {
        let (_, service) = service();
        service
            .save_term(&TermDraft::new(2026).with_board(BoardPosition::President, Slot::assigned("M1")))
            .await
            .unwrap();
        let id = DocumentId::new("president:2026:M1");

        let end = NaiveDate::from_ymd_opt(2026, 6, 30).unwrap();
        let updated = service.set_end_date(&id, Some(end)).await.unwrap();
        assert_eq!(updated.end_date, Some(end));

        let early = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let err = service.set_end_date(&id, Some(early)).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Validation(ref r) if r.len() == 1));

        let reopened = service.set_end_date(&id, None).await.unwrap();
        assert_eq!(reopened.end_date, None);
        let (_, stored) = &service.load_assignments(2026).await.unwrap()[0];
        assert_eq!(stored.end_date, None);
    }

    #[tokio::test]
    async fn test_set_acting() {
        let (_, service) = service();
        service
            .save_term(
                &TermDraft::new(2026).with_board(BoardPosition::VpPrograms, Slot::assigned("M2")),
            )
            .await
            .unwrap();
        let id = DocumentId::new("vp_programs:2026:M2");

        let acting = service
            .set_acting(&id, Some(BoardPosition::President))
            .await
            .unwrap();
        assert!(acting.is_acting);
        assert_eq!(acting.acting_for, Some(BoardPosition::President.code()));

        let cleared = service.set_acting(&id, None).await.unwrap();
        assert!(!cleared.is_acting);
        let (_, stored) = &service.load_assignments(2026).await.unwrap()[0];
        assert!(!stored.is_acting);
        assert_eq!(stored.acting_for, None);
    }

    #[tokio::test]
    async fn test_missing_assignment() {
        let (_, service) = service();
        let err = service
            .set_acting(&DocumentId::new("nope"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_term_reports_shared_board_seat() {
        let (store, service) = service();
        for member in ["M1", "M2"] {
            let assignment = PositionAssignment::for_term(
                MemberId::new(member),
                BoardPosition::President.code(),
                2026,
            )
            .unwrap();
            store
                .create(
                    DEFAULT_ASSIGNMENT_COLLECTION,
                    Some(DocumentId::new(assignment.key())),
                    serde_json::to_value(&assignment).unwrap(),
                )
                .await
                .unwrap();
        }

        let err = service.load_term(2026).await.unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Catalog(CatalogError::BoardSeatConflict { ref first, ref second, .. })
                if first == "M1" && second == "M2"
        ));
        assert_eq!(service.load_assignments(2026).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_undecodable_document() {
        let (store, service) = service();
        store
            .create(
                DEFAULT_ASSIGNMENT_COLLECTION,
                Some(DocumentId::new("junk")),
                json!({"start_date": "2026-03-01", "position": "chancellor"}),
            )
            .await
            .unwrap();
        let err = service.load_term(2026).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Decode { .. }));
    }
}
