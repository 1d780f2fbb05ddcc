//! Config command implementations (flat key/value store).

use crate::cli::ConfigCommands;
use crate::config::open_existing;
use crate::error::{Error, Result};
use crate::model::ConfigEntry;
use crate::validate;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ConfigListOutput {
    items: Vec<ConfigEntry>,
    count: usize,
}

#[derive(Serialize)]
struct ConfigValueOutput<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct ConfigDeleteOutput<'a> {
    key: &'a str,
    deleted: bool,
}

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the database is missing or the key does not exist.
pub fn execute(
    command: &ConfigCommands,
    db_path: Option<&Path>,
    busy_timeout: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut storage = open_existing(db_path, busy_timeout)?;

    match command {
        ConfigCommands::List => {
            let items = storage.list_config_entries()?;
            if json {
                let output = ConfigListOutput {
                    count: items.len(),
                    items,
                };
                println!("{}", serde_json::to_string(&output)?);
            } else if items.is_empty() {
                println!("No config entries.");
            } else {
                for item in &items {
                    println!("{} = {}", item.key, item.value);
                }
            }
        }

        ConfigCommands::Get { key } => {
            let value = storage
                .get_config(key)?
                .ok_or_else(|| Error::ConfigNotFound { key: key.clone() })?;
            if json {
                let output = ConfigValueOutput { key, value: &value };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("{value}");
            }
        }

        ConfigCommands::Set { key, value } => {
            let key = validate::config_key(key)?;
            storage.set_config(&key, value)?;
            if json {
                let output = ConfigValueOutput { key: &key, value };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Set {key}");
            }
        }

        ConfigCommands::Delete { key } => {
            if !storage.delete_config(key)? {
                return Err(Error::ConfigNotFound { key: key.clone() });
            }
            if json {
                let output = ConfigDeleteOutput { key, deleted: true };
                println!("{}", serde_json::to_string(&output)?);
            } else {
                println!("Deleted {key}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_delete() {
        let temp_dir = TempDir::new().unwrap();
        let db = temp_dir.path().join("navcat.db");
        SqliteStorage::open(&db).unwrap();

        let set = ConfigCommands::Set {
            key: "theme".to_string(),
            value: "dark".to_string(),
        };
        execute(&set, Some(db.as_path()), None, true).unwrap();

        let storage = SqliteStorage::open(&db).unwrap();
        assert_eq!(storage.get_config("theme").unwrap().as_deref(), Some("dark"));

        let delete = ConfigCommands::Delete {
            key: "theme".to_string(),
        };
        execute(&delete, Some(db.as_path()), None, true).unwrap();

        let get = ConfigCommands::Get {
            key: "theme".to_string(),
        };
        let err = execute(&get, Some(db.as_path()), None, true).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }
}
