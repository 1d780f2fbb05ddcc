//! SQLite storage implementation.
//!
//! This module provides the catalog accessor: CRUD over groups, sites and
//! configs, batch reordering, and the two insert-or-get writes the import
//! reconciler builds on. Every value reaches SQL as a bound parameter.

use crate::error::{Error, Result};
use crate::model::{
    now_rfc3339, ConfigEntry, Group, GroupPatch, NewGroup, NewSite, OrderUpdate, Site, SitePatch,
    DB_INITIALIZED_KEY,
};
use crate::storage::schema::apply_schema;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const GROUP_COLUMNS: &str = "id, name, order_num, created_at, updated_at";
const SITE_COLUMNS: &str =
    "id, group_id, name, url, icon, description, notes, order_num, created_at, updated_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Outcome of [`SqliteStorage::init_db`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitOutcome {
    /// True if the initialization marker was already present.
    pub already_initialized: bool,
}

/// Result of an insert-or-update of a site keyed on (group, url).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteUpsert {
    /// No site with that URL existed in the group; a new row was inserted.
    Created(Site),
    /// An existing site was refreshed in place.
    Updated(Site),
}

impl SiteUpsert {
    /// The persisted site, whichever branch was taken.
    #[must_use]
    pub fn site(&self) -> &Site {
        match self {
            Self::Created(site) | Self::Updated(site) => site,
        }
    }
}

/// Row counts for the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogCounts {
    pub groups: usize,
    pub sites: usize,
    pub configs: usize,
}

#[derive(Debug, Clone, Copy)]
enum OrderTable {
    Groups,
    Sites,
}

impl OrderTable {
    const fn update_sql(self) -> &'static str {
        match self {
            Self::Groups => "UPDATE groups SET order_num = ?1, updated_at = ?2 WHERE id = ?3",
            Self::Sites => "UPDATE sites SET order_num = ?1, updated_at = ?2 WHERE id = ?3",
        }
    }
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;

        if let Some(timeout) = timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        } else {
            // Default 5 second timeout
            conn.busy_timeout(Duration::from_secs(5))?;
        }

        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside an IMMEDIATE transaction.
    ///
    /// The write lock is taken up front, so a lookup followed by a write
    /// inside `f` cannot interleave with another writer. Rolls back if `f`
    /// or the commit fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or from beginning/committing.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;
        tx.commit()?;

        debug!(op, "committed");
        Ok(result)
    }

    /// Mark the database as initialized.
    ///
    /// The schema itself is applied on open; this records the
    /// `DB_INITIALIZED` marker the first time it runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the config read or write fails.
    pub fn init_db(&mut self) -> Result<InitOutcome> {
        if self.get_config(DB_INITIALIZED_KEY)?.as_deref() == Some("true") {
            return Ok(InitOutcome {
                already_initialized: true,
            });
        }

        self.set_config(DB_INITIALIZED_KEY, "true")?;
        Ok(InitOutcome {
            already_initialized: false,
        })
    }

    /// Count groups, sites and config entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn counts(&self) -> Result<CatalogCounts> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or_default())
        };

        Ok(CatalogCounts {
            groups: count("SELECT COUNT(*) FROM groups")?,
            sites: count("SELECT COUNT(*) FROM sites")?,
            configs: count("SELECT COUNT(*) FROM configs")?,
        })
    }

    // ================
    // Group Operations
    // ================

    /// List all groups in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GROUP_COLUMNS} FROM groups ORDER BY order_num, id"
        ))?;
        let rows = stmt
            .query_map([], map_group)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Get a group by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let group = self
            .conn
            .query_row(
                &format!("SELECT {GROUP_COLUMNS} FROM groups WHERE id = ?1"),
                [id],
                map_group,
            )
            .optional()?;
        Ok(group)
    }

    /// Find a group by exact (case-sensitive) name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_group_by_name(&self, name: &str) -> Result<Option<Group>> {
        Ok(select_group_by_name(&self.conn, name)?)
    }

    /// Create a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the name is taken.
    pub fn create_group(&mut self, group: &NewGroup) -> Result<Group> {
        let now = now_rfc3339();
        let created = self.conn.query_row(
            &format!(
                "INSERT INTO groups (name, order_num, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 RETURNING {GROUP_COLUMNS}"
            ),
            rusqlite::params![group.name, group.order_num, now],
            map_group,
        )?;
        Ok(created)
    }

    /// Find the group named `group.name`, creating it if absent.
    ///
    /// Returns the persisted group and `true` if it was created. Lookup and
    /// insert run in one transaction, and the insert is a no-op on a name
    /// conflict, so two concurrent callers never produce two groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn find_or_create_group(&mut self, group: &NewGroup) -> Result<(Group, bool)> {
        let now = now_rfc3339();
        self.mutate("find_or_create_group", |tx| {
            let inserted = tx
                .query_row(
                    &format!(
                        "INSERT INTO groups (name, order_num, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?3)
                         ON CONFLICT(name) DO NOTHING
                         RETURNING {GROUP_COLUMNS}"
                    ),
                    rusqlite::params![group.name, group.order_num, now],
                    map_group,
                )
                .optional()?;

            if let Some(created) = inserted {
                return Ok((created, true));
            }

            let existing = select_group_by_name(tx, &group.name)?.ok_or_else(|| {
                Error::Other(format!("group '{}' vanished during insert", group.name))
            })?;
            Ok((existing, false))
        })
    }

    /// Apply a partial update to a group.
    ///
    /// Returns `None` if no group has that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_group(&mut self, id: i64, patch: &GroupPatch) -> Result<Option<Group>> {
        if patch.is_empty() {
            return self.get_group(id);
        }

        let mut sets = vec!["updated_at = ?1".to_string()];
        let mut values = vec![Value::from(now_rfc3339())];

        if let Some(name) = &patch.name {
            values.push(Value::from(name.clone()));
            sets.push(format!("name = ?{}", values.len()));
        }
        if let Some(order_num) = patch.order_num {
            values.push(Value::from(order_num));
            sets.push(format!("order_num = ?{}", values.len()));
        }

        values.push(Value::from(id));
        let sql = format!(
            "UPDATE groups SET {} WHERE id = ?{} RETURNING {GROUP_COLUMNS}",
            sets.join(", "),
            values.len()
        );

        let updated = self
            .conn
            .query_row(&sql, params_from_iter(values), map_group)
            .optional()?;
        Ok(updated)
    }

    /// Delete a group and, through the foreign key, all its sites.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_group(&mut self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM groups WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    // ===============
    // Site Operations
    // ===============

    /// List sites in display order, optionally restricted to one group.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sites(&self, group_id: Option<i64>) -> Result<Vec<Site>> {
        let rows = if let Some(gid) = group_id {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {SITE_COLUMNS} FROM sites WHERE group_id = ?1 ORDER BY order_num, id"
            ))?;
            stmt.query_map([gid], map_site)?
                .collect::<std::result::Result<Vec<_>, _>>()
        } else {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {SITE_COLUMNS} FROM sites ORDER BY order_num, id"
            ))?;
            stmt.query_map([], map_site)?
                .collect::<std::result::Result<Vec<_>, _>>()
        };

        rows.map_err(Error::from)
    }

    /// Get a site by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_site(&self, id: i64) -> Result<Option<Site>> {
        let site = self
            .conn
            .query_row(
                &format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = ?1"),
                [id],
                map_site,
            )
            .optional()?;
        Ok(site)
    }

    /// Find the site with exactly this URL inside a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_site_by_group_and_url(&self, group_id: i64, url: &str) -> Result<Option<Site>> {
        Ok(select_site_by_group_and_url(&self.conn, group_id, url)?)
    }

    /// Create a site.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (unknown group, duplicate URL).
    pub fn create_site(&mut self, site: &NewSite) -> Result<Site> {
        Ok(insert_site(&self.conn, site, &now_rfc3339())?)
    }

    /// Apply a partial update to a site.
    ///
    /// Returns `None` if no site has that ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_site(&mut self, id: i64, patch: &SitePatch) -> Result<Option<Site>> {
        Ok(apply_site_patch(&self.conn, id, patch, &now_rfc3339())?)
    }

    /// Create a site, or refresh the existing one with the same URL in the
    /// same group.
    ///
    /// On the update path only `name`, `icon`, `description` and `notes`
    /// change; `order_num` of the existing row is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn upsert_site_by_url(&mut self, site: &NewSite) -> Result<SiteUpsert> {
        let now = now_rfc3339();
        self.mutate("upsert_site_by_url", |tx| {
            let existing = select_site_by_group_and_url(tx, site.group_id, &site.url)?;

            let Some(existing_id) = existing.and_then(|s| s.id) else {
                return Ok(SiteUpsert::Created(insert_site(tx, site, &now)?));
            };

            let patch = SitePatch::descriptive_from(site);
            let updated = apply_site_patch(tx, existing_id, &patch, &now)?
                .ok_or(Error::SiteNotFound { id: existing_id })?;
            Ok(SiteUpsert::Updated(updated))
        })
    }

    /// Delete a site.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_site(&mut self, id: i64) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM sites WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    // =================
    // Config Operations
    // =================

    /// Get a config value.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_config(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM configs WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a config value.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn set_config(&mut self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO configs (key, value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            rusqlite::params![key, value, now],
        )?;
        Ok(())
    }

    /// All config values as a key-sorted map.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_configs(&self) -> Result<BTreeMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM configs")?;
        let map = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<BTreeMap<String, String>, _>>()?;
        Ok(map)
    }

    /// All config entries with timestamps, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_config_entries(&self) -> Result<Vec<ConfigEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value, created_at, updated_at FROM configs ORDER BY key ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ConfigEntry {
                    key: row.get(0)?,
                    value: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete a config entry.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_config(&mut self, key: &str) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM configs WHERE key = ?1", [key])?;
        Ok(rows > 0)
    }

    // ===================
    // Ordering Operations
    // ===================

    /// Apply a batch of group order changes atomically.
    ///
    /// Returns `true` only if every update was applied; on failure the
    /// whole batch is rolled back and the cause is logged.
    pub fn update_group_order(&mut self, orders: &[OrderUpdate]) -> bool {
        self.apply_order(OrderTable::Groups, orders)
    }

    /// Apply a batch of site order changes atomically.
    ///
    /// Same contract as [`Self::update_group_order`].
    pub fn update_site_order(&mut self, orders: &[OrderUpdate]) -> bool {
        self.apply_order(OrderTable::Sites, orders)
    }

    fn apply_order(&mut self, table: OrderTable, orders: &[OrderUpdate]) -> bool {
        let now = now_rfc3339();
        let result = self.mutate("update_order", |tx| {
            let mut stmt = tx.prepare(table.update_sql())?;
            for item in orders {
                stmt.execute(rusqlite::params![item.order_num, now, item.id])?;
            }
            Ok(())
        });

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(?table, count = orders.len(), error = %e, "Order batch rolled back");
                false
            }
        }
    }
}

fn map_group(row: &Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        order_num: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn map_site(row: &Row) -> rusqlite::Result<Site> {
    Ok(Site {
        id: Some(row.get(0)?),
        group_id: row.get(1)?,
        name: row.get(2)?,
        url: row.get(3)?,
        icon: row.get(4)?,
        description: row.get(5)?,
        notes: row.get(6)?,
        order_num: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn select_group_by_name(conn: &Connection, name: &str) -> rusqlite::Result<Option<Group>> {
    conn.query_row(
        &format!("SELECT {GROUP_COLUMNS} FROM groups WHERE name = ?1"),
        [name],
        map_group,
    )
    .optional()
}

fn select_site_by_group_and_url(
    conn: &Connection,
    group_id: i64,
    url: &str,
) -> rusqlite::Result<Option<Site>> {
    conn.query_row(
        &format!("SELECT {SITE_COLUMNS} FROM sites WHERE group_id = ?1 AND url = ?2"),
        rusqlite::params![group_id, url],
        map_site,
    )
    .optional()
}

fn insert_site(conn: &Connection, site: &NewSite, now: &str) -> rusqlite::Result<Site> {
    conn.query_row(
        &format!(
            "INSERT INTO sites (group_id, name, url, icon, description, notes, order_num, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             RETURNING {SITE_COLUMNS}"
        ),
        rusqlite::params![
            site.group_id,
            site.name,
            site.url,
            site.icon,
            site.description,
            site.notes,
            site.order_num,
            now,
        ],
        map_site,
    )
}

/// Build and run `UPDATE sites SET ...` for the fields present in `patch`.
///
/// Column names come from this fixed list; values are always bound.
fn apply_site_patch(
    conn: &Connection,
    id: i64,
    patch: &SitePatch,
    now: &str,
) -> rusqlite::Result<Option<Site>> {
    let mut sets = vec!["updated_at = ?1".to_string()];
    let mut values = vec![Value::from(now.to_string())];

    let mut push = |column: &str, value: Value| {
        values.push(value);
        sets.push(format!("{column} = ?{}", values.len()));
    };

    if let Some(group_id) = patch.group_id {
        push("group_id", Value::from(group_id));
    }
    if let Some(name) = &patch.name {
        push("name", Value::from(name.clone()));
    }
    if let Some(url) = &patch.url {
        push("url", Value::from(url.clone()));
    }
    if let Some(icon) = &patch.icon {
        push("icon", Value::from(icon.clone()));
    }
    if let Some(description) = &patch.description {
        push("description", Value::from(description.clone()));
    }
    if let Some(notes) = &patch.notes {
        push("notes", Value::from(notes.clone()));
    }
    if let Some(order_num) = patch.order_num {
        push("order_num", Value::from(order_num));
    }

    values.push(Value::from(id));
    let sql = format!(
        "UPDATE sites SET {} WHERE id = ?{} RETURNING {SITE_COLUMNS}",
        sets.join(", "),
        values.len()
    );

    conn.query_row(&sql, params_from_iter(values), map_site)
        .optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_site(group_id: i64, name: &str, url: &str, order_num: i64) -> NewSite {
        NewSite {
            group_id,
            name: name.to_string(),
            url: url.to_string(),
            order_num,
            ..NewSite::default()
        }
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_init_db_sets_marker_once() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        let first = storage.init_db().unwrap();
        assert!(!first.already_initialized);
        assert_eq!(
            storage.get_config(DB_INITIALIZED_KEY).unwrap().as_deref(),
            Some("true")
        );

        let second = storage.init_db().unwrap();
        assert!(second.already_initialized);
    }

    #[test]
    fn test_group_crud() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        // Create
        let dev = storage.create_group(&NewGroup::new("Dev", 2)).unwrap();
        let docs = storage.create_group(&NewGroup::new("Docs", 1)).unwrap();
        assert!(dev.id.is_some());
        assert!(dev.created_at.is_some());

        // List is ordered by order_num
        let names: Vec<_> = storage
            .list_groups()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Docs", "Dev"]);

        // Lookup by name is exact
        assert!(storage.find_group_by_name("Dev").unwrap().is_some());
        assert!(storage.find_group_by_name("dev").unwrap().is_none());

        // Update
        let renamed = storage
            .update_group(
                dev.id.unwrap(),
                &GroupPatch {
                    name: Some("Development".to_string()),
                    ..GroupPatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Development");
        assert_eq!(renamed.order_num, 2);

        // Update of a missing row
        assert!(storage
            .update_group(9999, &GroupPatch::default())
            .unwrap()
            .is_none());

        // Delete
        assert!(storage.delete_group(docs.id.unwrap()).unwrap());
        assert!(!storage.delete_group(docs.id.unwrap()).unwrap());
        assert_eq!(storage.list_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_group_name_is_unique() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.create_group(&NewGroup::new("Dev", 0)).unwrap();
        let err = storage.create_group(&NewGroup::new("Dev", 1)).unwrap_err();
        assert_eq!(err.error_code(), crate::error::ErrorCode::Conflict);
    }

    #[test]
    fn test_find_or_create_group() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        let (created, was_created) = storage
            .find_or_create_group(&NewGroup::new("Dev", 5))
            .unwrap();
        assert!(was_created);
        assert_eq!(created.order_num, 5);

        let (existing, was_created) = storage
            .find_or_create_group(&NewGroup::new("Dev", 99))
            .unwrap();
        assert!(!was_created);
        assert_eq!(existing.id, created.id);
        // Existing placement wins
        assert_eq!(existing.order_num, 5);
    }

    #[test]
    fn test_site_crud() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let gid = storage
            .create_group(&NewGroup::new("Dev", 0))
            .unwrap()
            .id
            .unwrap();

        let site = storage
            .create_site(&new_site(gid, "Repo", "http://x", 0))
            .unwrap();
        assert_eq!(site.group_id, gid);
        assert_eq!(site.icon, "");

        let found = storage
            .find_site_by_group_and_url(gid, "http://x")
            .unwrap()
            .unwrap();
        assert_eq!(found.id, site.id);
        assert!(storage
            .find_site_by_group_and_url(gid, "http://y")
            .unwrap()
            .is_none());

        let updated = storage
            .update_site(
                site.id.unwrap(),
                &SitePatch {
                    notes: Some("pinned".to_string()),
                    order_num: Some(4),
                    ..SitePatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.notes, "pinned");
        assert_eq!(updated.order_num, 4);
        assert_eq!(updated.name, "Repo");

        assert_eq!(storage.list_sites(Some(gid)).unwrap().len(), 1);
        assert_eq!(storage.list_sites(Some(gid + 1)).unwrap().len(), 0);

        assert!(storage.delete_site(site.id.unwrap()).unwrap());
        assert!(storage.get_site(site.id.unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_site_requires_live_group() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let err = storage
            .create_site(&new_site(404, "Orphan", "http://x", 0))
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_same_url_allowed_in_different_groups() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let a = storage.create_group(&NewGroup::new("A", 0)).unwrap().id.unwrap();
        let b = storage.create_group(&NewGroup::new("B", 1)).unwrap().id.unwrap();

        storage.create_site(&new_site(a, "X", "http://x", 0)).unwrap();
        storage.create_site(&new_site(b, "X", "http://x", 0)).unwrap();
        assert!(storage.create_site(&new_site(a, "X2", "http://x", 1)).is_err());
        assert_eq!(storage.list_sites(None).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_group_cascades_to_sites() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let gid = storage.create_group(&NewGroup::new("Dev", 0)).unwrap().id.unwrap();
        storage.create_site(&new_site(gid, "A", "http://a", 0)).unwrap();
        storage.create_site(&new_site(gid, "B", "http://b", 1)).unwrap();

        assert!(storage.delete_group(gid).unwrap());
        assert!(storage.list_sites(None).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_site_by_url_keeps_order() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let gid = storage.create_group(&NewGroup::new("Dev", 0)).unwrap().id.unwrap();

        let first = storage
            .upsert_site_by_url(&new_site(gid, "Old", "http://x", 3))
            .unwrap();
        let SiteUpsert::Created(created) = first else {
            panic!("expected create");
        };

        let mut incoming = new_site(gid, "New", "http://x", 42);
        incoming.description = "desc".to_string();
        let second = storage.upsert_site_by_url(&incoming).unwrap();
        let SiteUpsert::Updated(updated) = second else {
            panic!("expected update");
        };

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description, "desc");
        assert_eq!(updated.order_num, 3);
    }

    #[test]
    fn test_config_upsert_and_list() {
        let mut storage = SqliteStorage::open_memory().unwrap();

        assert!(storage.get_config("theme").unwrap().is_none());
        storage.set_config("theme", "light").unwrap();
        storage.set_config("theme", "dark").unwrap();
        storage.set_config("lang", "en").unwrap();

        assert_eq!(storage.get_config("theme").unwrap().as_deref(), Some("dark"));

        let map = storage.list_configs().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["lang"], "en");

        let entries = storage.list_config_entries().unwrap();
        assert_eq!(entries[0].key, "lang");
        assert!(entries[1].updated_at.is_some());

        assert!(storage.delete_config("lang").unwrap());
        assert!(!storage.delete_config("lang").unwrap());
    }

    #[test]
    fn test_update_group_order_applies_batch() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let a = storage.create_group(&NewGroup::new("A", 0)).unwrap().id.unwrap();
        let b = storage.create_group(&NewGroup::new("B", 1)).unwrap().id.unwrap();

        let ok = storage.update_group_order(&[
            OrderUpdate { id: a, order_num: 1 },
            OrderUpdate { id: b, order_num: 0 },
        ]);
        assert!(ok);

        let names: Vec<_> = storage
            .list_groups()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_update_site_order_is_all_or_nothing() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let gid = storage.create_group(&NewGroup::new("Dev", 0)).unwrap().id.unwrap();
        let a = storage.create_site(&new_site(gid, "A", "http://a", 0)).unwrap().id.unwrap();
        let b = storage.create_site(&new_site(gid, "B", "http://b", 1)).unwrap().id.unwrap();

        storage
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_negative_order BEFORE UPDATE OF order_num ON sites
                 WHEN NEW.order_num < 0
                 BEGIN SELECT RAISE(ABORT, 'negative order'); END;",
            )
            .unwrap();

        let ok = storage.update_site_order(&[
            OrderUpdate { id: a, order_num: 7 },
            OrderUpdate { id: b, order_num: -1 },
        ]);
        assert!(!ok);

        // First update rolled back with the batch
        assert_eq!(storage.get_site(a).unwrap().unwrap().order_num, 0);
    }

    #[test]
    fn test_counts() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.init_db().unwrap();
        let gid = storage.create_group(&NewGroup::new("Dev", 0)).unwrap().id.unwrap();
        storage.create_site(&new_site(gid, "A", "http://a", 0)).unwrap();

        let counts = storage.counts().unwrap();
        assert_eq!(counts.groups, 1);
        assert_eq!(counts.sites, 1);
        assert_eq!(counts.configs, 1);
    }

    #[test]
    fn test_empty_group_patch_changes_nothing() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let dev = storage.create_group(&NewGroup::new("Dev", 3)).unwrap();

        let same = storage
            .update_group(dev.id.unwrap(), &GroupPatch::default())
            .unwrap()
            .unwrap();
        assert_eq!(same, dev);
    }

    /// Run `f` on `n` threads, each with its own handle on `path`, released
    /// together.
    fn race<T, F>(path: &Path, n: usize, f: F) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(&mut SqliteStorage) -> T + Send + Sync + 'static,
    {
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(n));
        let f = std::sync::Arc::new(f);
        let handles: Vec<_> = (0..n)
            .map(|_| {
                let barrier = barrier.clone();
                let f = f.clone();
                let path = path.to_path_buf();
                std::thread::spawn(move || {
                    let mut storage = SqliteStorage::open(&path).unwrap();
                    barrier.wait();
                    f(&mut storage)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn test_concurrent_find_or_create_group_yields_one_row() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("navcat.db");
        SqliteStorage::open(&path).unwrap();

        let outcomes = race(&path, 4, |storage| {
            storage
                .find_or_create_group(&NewGroup::new("Dev", 0))
                .unwrap()
        });

        let created = outcomes.iter().filter(|(_, created)| *created).count();
        assert_eq!(created, 1);
        assert_eq!(outcomes.len() - created, 3);

        let first_id = outcomes[0].0.id;
        assert!(outcomes.iter().all(|(group, _)| group.id == first_id));

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.list_groups().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_upsert_site_yields_one_row() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("navcat.db");
        let gid = SqliteStorage::open(&path)
            .unwrap()
            .create_group(&NewGroup::new("Dev", 0))
            .unwrap()
            .id
            .unwrap();

        let outcomes = race(&path, 4, move |storage| {
            match storage
                .upsert_site_by_url(&new_site(gid, "Repo", "http://x", 0))
                .unwrap()
            {
                SiteUpsert::Created(_) => true,
                SiteUpsert::Updated(_) => false,
            }
        });

        assert_eq!(outcomes.iter().filter(|created| **created).count(), 1);

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.list_sites(Some(gid)).unwrap().len(), 1);
    }
}
