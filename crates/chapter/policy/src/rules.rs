//! Per-role rule tables
//!
//! A rule table maps each role to the actions it may take in each module.
//! It is plain data: built once, looked up by value, and serializable so the
//! exact table in force can be recorded for audit.

use crate::error::Result;
use chapter_types::{Action, Module, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// `Role -> Module -> {Action}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: BTreeMap<Role, BTreeMap<Module, BTreeSet<Action>>>,
}

impl RuleTable {
    /// Create an empty table (denies everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `actions` on `module` to `role`, adding to any existing grant
    pub fn grant(mut self, role: Role, module: Module, actions: &[Action]) -> Self {
        self.rules
            .entry(role)
            .or_default()
            .entry(module)
            .or_default()
            .extend(actions.iter().copied());
        self
    }

    /// Whether the table lists `action` for (`role`, `module`)
    pub fn allows(&self, role: Role, module: Module, action: Action) -> bool {
        self.rules
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .map(|actions| actions.contains(&action))
            .unwrap_or(false)
    }

    /// Actions granted to `role` on `module` (empty if absent)
    pub fn actions(&self, role: Role, module: Module) -> BTreeSet<Action> {
        self.rules
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .cloned()
            .unwrap_or_default()
    }

    /// Roles that have at least one entry
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.rules.keys()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The chapter's standard rule table.
    ///
    /// Developer and administrator have no rows; they are granted through the
    /// super-role override instead.
    pub fn standard() -> Self {
        use Action::{Create as C, Delete as D, Read as R, Update as U};
        use Module::*;

        RuleTable::new()
            .grant(Role::PRESIDENT, MemberManagement, &[C, R, U, D])
            .grant(Role::PRESIDENT, EventManagement, &[C, R, U, D])
            .grant(Role::PRESIDENT, FinanceManagement, &[R])
            .grant(Role::PRESIDENT, Messaging, &[C, R, U])
            .grant(Role::PRESIDENT, Profile, &[R, U])
            .grant(Role::VICE_PRESIDENT, MemberManagement, &[R, U])
            .grant(Role::VICE_PRESIDENT, EventManagement, &[C, R, U, D])
            .grant(Role::VICE_PRESIDENT, FinanceManagement, &[R])
            .grant(Role::VICE_PRESIDENT, Messaging, &[C, R])
            .grant(Role::VICE_PRESIDENT, Profile, &[R, U])
            .grant(Role::SECRETARY, MemberManagement, &[C, R, U])
            .grant(Role::SECRETARY, EventManagement, &[R])
            .grant(Role::SECRETARY, Messaging, &[C, R, U, D])
            .grant(Role::SECRETARY, Profile, &[R, U])
            .grant(Role::TREASURER, MemberManagement, &[R])
            .grant(Role::TREASURER, EventManagement, &[R])
            .grant(Role::TREASURER, FinanceManagement, &[C, R, U, D])
            .grant(Role::TREASURER, Profile, &[R, U])
            .grant(Role::DEPARTMENT_HEAD, MemberManagement, &[R])
            .grant(Role::DEPARTMENT_HEAD, EventManagement, &[C, R, U])
            .grant(Role::DEPARTMENT_HEAD, Messaging, &[C, R])
            .grant(Role::DEPARTMENT_HEAD, Profile, &[R, U])
            .grant(Role::FULL_MEMBER, EventManagement, &[R])
            .grant(Role::FULL_MEMBER, Messaging, &[R])
            .grant(Role::FULL_MEMBER, Profile, &[R, U])
            .grant(Role::ASSOCIATE_MEMBER, EventManagement, &[R])
            .grant(Role::ASSOCIATE_MEMBER, Profile, &[R, U])
            .grant(Role::ALUMNI, Profile, &[R])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_denies() {
        let table = RuleTable::new();
        for role in Role::ALL {
            for module in Module::ALL {
                for action in Action::ALL {
                    assert!(!table.allows(role, module, action));
                }
            }
        }
    }

    #[test]
    fn test_grant_accumulates() {
        let table = RuleTable::new()
            .grant(Role::ALUMNI, Module::Profile, &[Action::Read])
            .grant(Role::ALUMNI, Module::Profile, &[Action::Update]);
        assert_eq!(
            table.actions(Role::ALUMNI, Module::Profile),
            [Action::Read, Action::Update].into_iter().collect()
        );
    }

    #[test]
    fn test_standard_table_spot_checks() {
        let table = RuleTable::standard();
        assert!(table.allows(Role::TREASURER, Module::FinanceManagement, Action::Delete));
        assert!(!table.allows(Role::SECRETARY, Module::FinanceManagement, Action::Read));
        assert!(table.allows(Role::ASSOCIATE_MEMBER, Module::Profile, Action::Update));
        assert!(!table.allows(Role::ALUMNI, Module::Profile, Action::Update));
        assert!(!table.roles().any(|r| *r == Role::DEVELOPER || *r == Role::ADMINISTRATOR));
    }

    #[test]
    fn test_json_round_trip_is_readable() {
        let table = RuleTable::standard();
        let json = table.to_json_pretty().unwrap();
        assert!(json.contains("\"treasurer\""));
        assert!(json.contains("\"finance-management\""));
        assert_eq!(RuleTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_from_json_rejects_unknown_role() {
        let err = RuleTable::from_json(r#"{"janitor": {"profile": ["read"]}}"#);
        assert!(err.is_err());
    }
}
