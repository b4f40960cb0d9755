//! Role catalog: roles, modules and actions
//!
//! Roles are partitioned into two disjoint kinds. Category roles describe a
//! membership class and govern default permissions; position roles describe
//! an elected or appointed office.

use crate::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Membership class roles
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryRole {
    /// System owner
    Developer,
    Administrator,
    FullMember,
    AssociateMember,
    Alumni,
}

impl CategoryRole {
    pub const ALL: [CategoryRole; 5] = [
        CategoryRole::Developer,
        CategoryRole::Administrator,
        CategoryRole::FullMember,
        CategoryRole::AssociateMember,
        CategoryRole::Alumni,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryRole::Developer => "developer",
            CategoryRole::Administrator => "administrator",
            CategoryRole::FullMember => "full-member",
            CategoryRole::AssociateMember => "associate-member",
            CategoryRole::Alumni => "alumni",
        }
    }
}

/// Office-holding roles
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionRole {
    President,
    VicePresident,
    Secretary,
    Treasurer,
    DepartmentHead,
}

impl PositionRole {
    pub const ALL: [PositionRole; 5] = [
        PositionRole::President,
        PositionRole::VicePresident,
        PositionRole::Secretary,
        PositionRole::Treasurer,
        PositionRole::DepartmentHead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionRole::President => "president",
            PositionRole::VicePresident => "vice-president",
            PositionRole::Secretary => "secretary",
            PositionRole::Treasurer => "treasurer",
            PositionRole::DepartmentHead => "department-head",
        }
    }
}

/// The two disjoint kinds of role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleKind {
    Category,
    Position,
}

/// A role in the chapter. The variant is the role's kind.
///
/// Serialized as its bare code (`"treasurer"`, `"associate-member"`), which
/// keeps rule tables and matrix snapshots readable and usable as map keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Category(CategoryRole),
    Position(PositionRole),
}

impl Role {
    pub const DEVELOPER: Role = Role::Category(CategoryRole::Developer);
    pub const ADMINISTRATOR: Role = Role::Category(CategoryRole::Administrator);
    pub const FULL_MEMBER: Role = Role::Category(CategoryRole::FullMember);
    pub const ASSOCIATE_MEMBER: Role = Role::Category(CategoryRole::AssociateMember);
    pub const ALUMNI: Role = Role::Category(CategoryRole::Alumni);
    pub const PRESIDENT: Role = Role::Position(PositionRole::President);
    pub const VICE_PRESIDENT: Role = Role::Position(PositionRole::VicePresident);
    pub const SECRETARY: Role = Role::Position(PositionRole::Secretary);
    pub const TREASURER: Role = Role::Position(PositionRole::Treasurer);
    pub const DEPARTMENT_HEAD: Role = Role::Position(PositionRole::DepartmentHead);

    /// Every role, categories first, each kind in declaration order
    pub const ALL: [Role; 10] = [
        Role::DEVELOPER,
        Role::ADMINISTRATOR,
        Role::FULL_MEMBER,
        Role::ASSOCIATE_MEMBER,
        Role::ALUMNI,
        Role::PRESIDENT,
        Role::VICE_PRESIDENT,
        Role::SECRETARY,
        Role::TREASURER,
        Role::DEPARTMENT_HEAD,
    ];

    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Category(_) => RoleKind::Category,
            Role::Position(_) => RoleKind::Position,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Category(role) => role.as_str(),
            Role::Position(role) => role.as_str(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> CatalogResult<Self> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = CatalogError;

    fn try_from(value: String) -> CatalogResult<Self> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Functional area a permission applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    MemberManagement,
    EventManagement,
    FinanceManagement,
    Messaging,
    Profile,
}

impl Module {
    pub const ALL: [Module; 5] = [
        Module::MemberManagement,
        Module::EventManagement,
        Module::FinanceManagement,
        Module::Messaging,
        Module::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::MemberManagement => "member-management",
            Module::EventManagement => "event-management",
            Module::FinanceManagement => "finance-management",
            Module::Messaging => "messaging",
            Module::Profile => "profile",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = CatalogError;

    fn from_str(s: &str) -> CatalogResult<Self> {
        Module::ALL
            .iter()
            .copied()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownModule(s.to_string()))
    }
}

/// CRUD verb
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Single-letter form used in compact matrix renderings
    pub fn letter(&self) -> char {
        match self {
            Action::Create => 'C',
            Action::Read => 'R',
            Action::Update => 'U',
            Action::Delete => 'D',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CatalogError;

    fn from_str(s: &str) -> CatalogResult<Self> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownAction(s.to_string()))
    }
}
