//! Permission policy
//!
//! Evaluation is a pure lookup: super roles are allowed everything, every
//! other role is allowed exactly what its rule table row lists, and anything
//! not listed is denied.

use crate::rules::RuleTable;
use chapter_types::{Action, Module, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Why a (module, action, role) triple was decided the way it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Allowed by the super-role override, without consulting the table
    SuperRole,
    /// Allowed by the role's rule table entry
    RuleTable,
    /// Not listed for the role; denied by default
    DeniedByDefault,
}

impl Grant {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Grant::DeniedByDefault)
    }
}

/// Rule table plus the explicit super-role override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionPolicy {
    rules: RuleTable,
    super_roles: BTreeSet<Role>,
}

impl PermissionPolicy {
    /// Create a policy from a rule table with no super roles
    pub fn new(rules: RuleTable) -> Self {
        Self {
            rules,
            super_roles: BTreeSet::new(),
        }
    }

    /// The standard table with developer and administrator as super roles
    pub fn standard() -> Self {
        Self::new(RuleTable::standard())
            .with_super_role(Role::DEVELOPER)
            .with_super_role(Role::ADMINISTRATOR)
    }

    pub fn with_super_role(mut self, role: Role) -> Self {
        self.super_roles.insert(role);
        self
    }

    pub fn with_super_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.super_roles = roles.into_iter().collect();
        self
    }

    pub fn is_super(&self, role: Role) -> bool {
        self.super_roles.contains(&role)
    }

    pub fn super_roles(&self) -> &BTreeSet<Role> {
        &self.super_roles
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Decide a triple and say which rule decided it
    pub fn explain(&self, module: Module, action: Action, role: Role) -> Grant {
        if self.is_super(role) {
            return Grant::SuperRole;
        }
        if self.rules.allows(role, module, action) {
            Grant::RuleTable
        } else {
            debug!(role = %role, module = %module, action = %action, "Denied by default");
            Grant::DeniedByDefault
        }
    }

    /// Whether `role` may perform `action` in `module`
    pub fn evaluate(&self, module: Module, action: Action, role: Role) -> bool {
        self.explain(module, action, role).is_allowed()
    }

    /// Every (module, action) pair allowed for `role`, in catalog order
    pub fn grants_for(&self, role: Role) -> Vec<(Module, Action)> {
        Module::ALL
            .into_iter()
            .flat_map(|m| Action::ALL.into_iter().map(move |a| (m, a)))
            .filter(|(m, a)| self.evaluate(*m, *a, role))
            .collect()
    }
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
