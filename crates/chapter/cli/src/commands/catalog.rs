//! Role and position catalog commands

use crate::output::{print_output, print_status, OutputFormat, Status};
use chapter_policy::{Grant, PermissionPolicy};
use chapter_types::{Action, BoardPosition, Module, Role};
use serde::Serialize;
use tabled::Tabled;

/// Table row for role display
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    role: String,
    kind: String,
    #[tabled(rename = "super")]
    is_super: bool,
    grants: String,
}

impl RoleRow {
    fn new(role: Role, policy: &PermissionPolicy) -> Self {
        let grants = if policy.is_super(role) {
            "all".to_string()
        } else {
            let summary: Vec<String> = Module::ALL
                .into_iter()
                .filter_map(|module| {
                    let letters: String = policy
                        .rules()
                        .actions(role, module)
                        .iter()
                        .map(Action::letter)
                        .collect();
                    (!letters.is_empty()).then(|| format!("{}:{}", module, letters))
                })
                .collect();
            summary.join(" ")
        };
        Self {
            role: role.to_string(),
            kind: format!("{:?}", role.kind()).to_lowercase(),
            is_super: policy.is_super(role),
            grants,
        }
    }
}

/// Table row for position display
#[derive(Debug, Serialize, Tabled)]
struct PositionRow {
    #[tabled(rename = "#")]
    ordinal: usize,
    board: String,
    cadre: String,
}

impl From<BoardPosition> for PositionRow {
    fn from(position: BoardPosition) -> Self {
        Self {
            ordinal: position.ordinal() + 1,
            board: position.code().to_string(),
            cadre: position.cadre().to_string(),
        }
    }
}

/// Result of a single permission check
#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    role: String,
    module: String,
    action: String,
    allowed: bool,
    reason: String,
}

pub fn roles(policy: &PermissionPolicy, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<RoleRow> = Role::ALL
        .into_iter()
        .map(|role| RoleRow::new(role, policy))
        .collect();
    print_output(rows, format)
}

pub fn positions(format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<PositionRow> = BoardPosition::ALL.into_iter().map(Into::into).collect();
    print_output(rows, format)
}

pub fn check(
    policy: &PermissionPolicy,
    role: Role,
    module: Module,
    action: Action,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let grant = policy.explain(module, action, role);
    let reason = match grant {
        Grant::SuperRole => "super role",
        Grant::RuleTable => "rule table",
        Grant::DeniedByDefault => "not granted",
    };

    match format {
        OutputFormat::Table => {
            if grant.is_allowed() {
                print_status(
                    Status::Done,
                    format!("{} may {} on {}: {}", role, action, module, reason),
                );
            } else {
                print_status(
                    Status::Denied,
                    format!("{} may not {} on {}", role, action, module),
                );
            }
            Ok(())
        }
        OutputFormat::Json => print_output(
            vec![CheckRow {
                role: role.to_string(),
                module: module.to_string(),
                action: action.to_string(),
                allowed: grant.is_allowed(),
                reason: reason.to_string(),
            }],
            format,
        ),
    }
}
