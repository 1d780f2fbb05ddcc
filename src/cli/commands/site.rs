//! Site command implementations.

use super::group::report_reorder;
use crate::cli::{SiteAddArgs, SiteCommands, SiteUpdateArgs};
use crate::config::open_existing;
use crate::error::{Error, Result};
use crate::model::{NewSite, Site, SitePatch};
use crate::storage::SqliteStorage;
use crate::validate;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SiteListOutput<'a> {
    sites: &'a [Site],
    count: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
}

/// Execute site commands.
///
/// # Errors
///
/// Returns an error if the database is missing, a referenced group or site
/// does not exist, or input fails validation.
pub fn execute(
    command: &SiteCommands,
    db_path: Option<&Path>,
    busy_timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut storage = open_existing(db_path, busy_timeout)?;

    match command {
        SiteCommands::List { group } => list(&storage, *group, json),
        SiteCommands::Show { id } => {
            let site = storage.get_site(*id)?.ok_or(Error::SiteNotFound { id: *id })?;
            emit(&site, json)
        }
        SiteCommands::Add(args) => add(&mut storage, args, json),
        SiteCommands::Update(args) => update(&mut storage, args, json),
        SiteCommands::Delete { id } => {
            if !storage.delete_site(*id)? {
                return Err(Error::SiteNotFound { id: *id });
            }
            if json {
                let output = DeleteOutput {
                    id: *id,
                    deleted: true,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Deleted site #{id}");
            }
            Ok(())
        }
        SiteCommands::Reorder { pairs } => {
            let orders = validate::order_updates(pairs)?;
            let success = storage.update_site_order(&orders);
            report_reorder(orders.len(), success, json)
        }
    }
}

fn list(storage: &SqliteStorage, group: Option<i64>, json: bool) -> Result<()> {
    if let Some(group_id) = group {
        if storage.get_group(group_id)?.is_none() {
            return Err(Error::GroupNotFound { id: group_id });
        }
    }

    let sites = storage.list_sites(group)?;

    if json {
        let output = SiteListOutput {
            sites: &sites,
            count: sites.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if sites.is_empty() {
        println!("No sites found.");
    } else {
        println!("Sites ({} found):", sites.len());
        println!();
        for site in &sites {
            print_site(site);
        }
    }

    Ok(())
}

fn add(storage: &mut SqliteStorage, args: &SiteAddArgs, json: bool) -> Result<()> {
    if storage.get_group(args.group_id)?.is_none() {
        return Err(Error::GroupNotFound { id: args.group_id });
    }

    let new_site = NewSite {
        group_id: args.group_id,
        name: validate::site_name(&args.name)?,
        url: validate::url(&args.url)?,
        icon: args.icon.clone(),
        description: args.description.clone(),
        notes: args.notes.clone(),
        order_num: args.order,
    };
    let site = storage.create_site(&new_site)?;

    if json {
        println!("{}", serde_json::to_string(&site)?);
    } else {
        println!("{} {}", "Created site:".green(), site.name);
        print_site(&site);
    }
    Ok(())
}

fn update(storage: &mut SqliteStorage, args: &SiteUpdateArgs, json: bool) -> Result<()> {
    if let Some(group_id) = args.group {
        if storage.get_group(group_id)?.is_none() {
            return Err(Error::GroupNotFound { id: group_id });
        }
    }

    let patch = SitePatch {
        group_id: args.group,
        name: args.name.as_deref().map(validate::site_name).transpose()?,
        url: args.url.as_deref().map(validate::url).transpose()?,
        icon: args.icon.clone(),
        description: args.description.clone(),
        notes: args.notes.clone(),
        order_num: args.order,
    };

    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "Nothing to update. Pass at least one of --group, --name, --url, --icon, --description, --notes, --order".to_string(),
        ));
    }

    let site = storage
        .update_site(args.id, &patch)?
        .ok_or(Error::SiteNotFound { id: args.id })?;
    emit(&site, json)
}

fn emit(site: &Site, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(site)?);
    } else {
        print_site(site);
    }
    Ok(())
}

fn print_site(site: &Site) {
    let id = site.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    println!(
        "  {} {} {}",
        format!("#{id}").dimmed(),
        site.name.bold(),
        format!("[group {}, order {}]", site.group_id, site.order_num).dimmed()
    );
    println!("    {}", site.url.cyan());
    if !site.description.is_empty() {
        println!("    {}", site.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewGroup;
    use tempfile::TempDir;

    fn setup() -> (TempDir, std::path::PathBuf, i64) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("navcat.db");
        let mut storage = SqliteStorage::open(&db_path).unwrap();
        let group = storage.create_group(&NewGroup::new("Dev", 0)).unwrap();
        (temp_dir, db_path, group.id.unwrap())
    }

    fn add_args(group_id: i64, url: &str) -> SiteAddArgs {
        SiteAddArgs {
            group_id,
            name: "Docs".to_string(),
            url: url.to_string(),
            icon: String::new(),
            description: String::new(),
            notes: String::new(),
            order: 0,
        }
    }

    #[test]
    fn test_add_and_update() {
        let (_dir, db, group_id) = setup();
        let cmd = SiteCommands::Add(add_args(group_id, "https://docs.rs"));
        execute(&cmd, Some(db.as_path()), None, true).unwrap();

        let storage = SqliteStorage::open(&db).unwrap();
        let site_id = storage.list_sites(None).unwrap()[0].id.unwrap();

        let update = SiteCommands::Update(SiteUpdateArgs {
            id: site_id,
            group: None,
            name: None,
            url: None,
            icon: None,
            description: None,
            notes: Some("daily".to_string()),
            order: Some(5),
        });
        execute(&update, Some(db.as_path()), None, true).unwrap();

        let site = storage.get_site(site_id).unwrap().unwrap();
        assert_eq!(site.notes, "daily");
        assert_eq!(site.order_num, 5);
        assert_eq!(site.name, "Docs");
    }

    #[test]
    fn test_add_to_unknown_group_fails() {
        let (_dir, db, _) = setup();
        let cmd = SiteCommands::Add(add_args(999, "https://docs.rs"));
        let err = execute(&cmd, Some(db.as_path()), None, true).unwrap_err();
        assert!(matches!(err, Error::GroupNotFound { id: 999 }));
    }

    #[test]
    fn test_duplicate_url_in_group_conflicts() {
        let (_dir, db, group_id) = setup();
        let cmd = SiteCommands::Add(add_args(group_id, "https://docs.rs"));
        execute(&cmd, Some(db.as_path()), None, true).unwrap();

        let err = execute(&cmd, Some(db.as_path()), None, true).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::Conflict);
    }

    #[test]
    fn test_empty_update_rejected() {
        let (_dir, db, _) = setup();
        let update = SiteCommands::Update(SiteUpdateArgs {
            id: 1,
            group: None,
            name: None,
            url: None,
            icon: None,
            description: None,
            notes: None,
            order: None,
        });
        let err = execute(&update, Some(db.as_path()), None, true).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
