//! Group command implementations.

use crate::cli::GroupCommands;
use crate::config::open_existing;
use crate::error::{Error, Result};
use crate::model::{Group, GroupPatch, NewGroup};
use crate::validate;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct GroupListOutput<'a> {
    groups: &'a [Group],
    count: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
}

#[derive(Serialize)]
struct ReorderOutput {
    updated: usize,
    success: bool,
}

/// Execute group commands.
///
/// # Errors
///
/// Returns an error if the database is missing, the group does not exist,
/// or input fails validation.
pub fn execute(
    command: &GroupCommands,
    db_path: Option<&Path>,
    busy_timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut storage = open_existing(db_path, busy_timeout)?;

    match command {
        GroupCommands::List => {
            let groups = storage.list_groups()?;
            if json {
                let output = GroupListOutput {
                    groups: &groups,
                    count: groups.len(),
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if groups.is_empty() {
                println!("No groups found.");
            } else {
                println!("Groups ({} found):", groups.len());
                println!();
                for group in &groups {
                    print_group(group);
                }
            }
        }

        GroupCommands::Show { id } => {
            let group = storage
                .get_group(*id)?
                .ok_or(Error::GroupNotFound { id: *id })?;
            emit(&group, json)?;
        }

        GroupCommands::Add { name, order } => {
            let group = storage.create_group(&NewGroup::new(validate::group_name(name)?, *order))?;
            if json {
                println!("{}", serde_json::to_string(&group)?);
            } else {
                println!("{} {}", "Created group:".green(), group.name);
                print_group(&group);
            }
        }

        GroupCommands::Rename { id, name } => {
            let patch = GroupPatch {
                name: Some(validate::group_name(name)?),
                order_num: None,
            };
            let group = storage
                .update_group(*id, &patch)?
                .ok_or(Error::GroupNotFound { id: *id })?;
            emit(&group, json)?;
        }

        GroupCommands::Move { id, order } => {
            let patch = GroupPatch {
                name: None,
                order_num: Some(*order),
            };
            let group = storage
                .update_group(*id, &patch)?
                .ok_or(Error::GroupNotFound { id: *id })?;
            emit(&group, json)?;
        }

        GroupCommands::Delete { id } => {
            if !storage.delete_group(*id)? {
                return Err(Error::GroupNotFound { id: *id });
            }
            if json {
                let output = DeleteOutput {
                    id: *id,
                    deleted: true,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Deleted group #{id} and its sites");
            }
        }

        GroupCommands::Reorder { pairs } => {
            let orders = validate::order_updates(pairs)?;
            let success = storage.update_group_order(&orders);
            report_reorder(orders.len(), success, json)?;
        }
    }

    Ok(())
}

fn emit(group: &Group, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(group)?);
    } else {
        print_group(group);
    }
    Ok(())
}

fn print_group(group: &Group) {
    let id = group.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    println!(
        "  {} {} {}",
        format!("#{id}").dimmed(),
        group.name.bold(),
        format!("(order {})", group.order_num).dimmed()
    );
}

/// Print the outcome of a batch reorder.
///
/// A rejected batch is not an error: nothing was changed and the caller can
/// retry.
pub(crate) fn report_reorder(count: usize, success: bool, json: bool) -> Result<()> {
    if json {
        let output = ReorderOutput {
            updated: if success { count } else { 0 },
            success,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if success {
        println!("Reordered {count} item(s)");
    } else {
        println!("{}", "Reorder failed; no positions were changed".yellow());
    }
    Ok(())
}
