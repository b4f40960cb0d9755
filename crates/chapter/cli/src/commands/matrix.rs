//! Permission matrix commands

use crate::context::Context;
use crate::output::{mark, print_output, print_single, print_status, OutputFormat, Status};
use chapter_policy::{MatrixStats, PermissionMatrix};
use chapter_types::{Action, Module, Role};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

/// Matrix subcommands
#[derive(Subcommand)]
pub enum MatrixCommands {
    /// Show the current matrix (latest saved, or derived from the policy)
    Show {
        /// Show grant counts instead of cells
        #[arg(long)]
        stats: bool,
    },

    /// List cells that differ from the policy
    Overrides,

    /// Set one cell and save a new snapshot
    Set {
        role: Role,
        module: Module,
        action: Action,
        /// Grant (true) or revoke (false)
        #[arg(action = clap::ArgAction::Set)]
        granted: bool,
        /// Who is making the change
        #[arg(long, env = "USER", default_value = "operator")]
        by: String,
    },

    /// Save a snapshot that matches the policy again
    Reset {
        #[arg(long, env = "USER", default_value = "operator")]
        by: String,
    },
}

/// One role's row: CRUD letters per module
#[derive(Debug, Serialize, Tabled)]
struct MatrixRow {
    role: String,
    #[tabled(rename = "member-mgmt")]
    member_management: String,
    #[tabled(rename = "event-mgmt")]
    event_management: String,
    #[tabled(rename = "finance-mgmt")]
    finance_management: String,
    messaging: String,
    profile: String,
}

impl MatrixRow {
    fn new(matrix: &PermissionMatrix, role: Role) -> Self {
        let cell = |module: Module| -> String {
            Action::ALL
                .into_iter()
                .map(|action| {
                    if matrix.get(module, action, role) {
                        action.letter()
                    } else {
                        '-'
                    }
                })
                .collect()
        };
        Self {
            role: role.to_string(),
            member_management: cell(Module::MemberManagement),
            event_management: cell(Module::EventManagement),
            finance_management: cell(Module::FinanceManagement),
            messaging: cell(Module::Messaging),
            profile: cell(Module::Profile),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    scope: String,
    granted: usize,
    total: usize,
}

fn count_rows(stats: &MatrixStats) -> Vec<CountRow> {
    let roles = stats.per_role.iter().map(|(role, count)| CountRow {
        scope: format!("role {}", role),
        granted: count.granted,
        total: count.total,
    });
    let modules = stats.per_module.iter().map(|(module, count)| CountRow {
        scope: format!("module {}", module),
        granted: count.granted,
        total: count.total,
    });
    let overall = std::iter::once(CountRow {
        scope: "all".to_string(),
        granted: stats.granted,
        total: stats.total,
    });
    roles.chain(modules).chain(overall).collect()
}

#[derive(Debug, Serialize, Tabled)]
struct OverrideRow {
    role: String,
    module: String,
    action: String,
    policy: String,
    matrix: String,
}

/// Latest saved matrix, or a fresh one from the policy
async fn current(context: &Context) -> anyhow::Result<PermissionMatrix> {
    match context.matrices().load_latest(context.policy.clone()).await? {
        Some(loaded) => {
            if !loaded.filled.is_empty() {
                print_status(
                    Status::Notice,
                    format!(
                        "{} cell(s) missing from snapshot {} taken from policy",
                        loaded.filled.len(),
                        loaded.id
                    ),
                );
            }
            Ok(loaded.matrix)
        }
        None => Ok(PermissionMatrix::build(context.policy.clone())),
    }
}

/// Execute a matrix command
pub async fn execute(
    command: MatrixCommands,
    context: &Context,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        MatrixCommands::Show { stats: false } => {
            let matrix = current(context).await?;
            let rows: Vec<MatrixRow> = Role::ALL
                .into_iter()
                .map(|role| MatrixRow::new(&matrix, role))
                .collect();
            print_output(rows, format)
        }

        MatrixCommands::Show { stats: true } => {
            let stats = current(context).await?.stats();
            match format {
                OutputFormat::Table => print_output(count_rows(&stats), format),
                OutputFormat::Json => print_single(&stats),
            }
        }

        MatrixCommands::Overrides => {
            let matrix = current(context).await?;
            let rows: Vec<OverrideRow> = matrix
                .overrides()
                .into_iter()
                .map(|(cell, granted)| OverrideRow {
                    role: cell.role.to_string(),
                    module: cell.module.to_string(),
                    action: cell.action.to_string(),
                    policy: mark(!granted),
                    matrix: mark(granted),
                })
                .collect();
            print_output(rows, format)
        }

        MatrixCommands::Set {
            role,
            module,
            action,
            granted,
            by,
        } => {
            let mut matrix = current(context).await?;
            matrix.toggle(module, action, role, granted);
            let id = context.matrices().save(&matrix, &by).await?;
            print_status(
                Status::Done,
                format!("{}/{}/{} set to {}, snapshot {}", role, module, action, granted, id),
            );
            Ok(())
        }

        MatrixCommands::Reset { by } => {
            let mut matrix = current(context).await?;
            let cleared = matrix.overrides().len();
            matrix.reset();
            let id = context.matrices().save(&matrix, &by).await?;
            print_status(
                Status::Done,
                format!("Cleared {} override(s), snapshot {}", cleared, id),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapter_policy::PermissionPolicy;
    use std::sync::Arc;

    #[test]
    fn test_matrix_row_letters() {
        let matrix = PermissionMatrix::build(Arc::new(PermissionPolicy::standard()));

        let treasurer = MatrixRow::new(&matrix, Role::TREASURER);
        assert_eq!(treasurer.finance_management, "CRUD");
        assert_eq!(treasurer.messaging, "----");
        assert_eq!(treasurer.profile, "-RU-");

        let developer = MatrixRow::new(&matrix, Role::DEVELOPER);
        assert_eq!(developer.member_management, "CRUD");
    }

    #[test]
    fn test_count_rows_cover_roles_and_modules() {
        let matrix = PermissionMatrix::build(Arc::new(PermissionPolicy::standard()));
        let rows = count_rows(&matrix.stats());

        assert_eq!(rows.len(), Role::ALL.len() + Module::ALL.len() + 1);
        let all = rows.last().unwrap();
        assert_eq!(all.total, 200);
    }
}
