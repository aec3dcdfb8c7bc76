//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD access over the `items` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - The `UNIQUE` constraint on `items.name` is the authoritative uniqueness
//!   guard; its violations surface as `RepoError::UniqueViolation`.
//! - Writes never touch `id` or `created_at` after insertion.

use super::{ensure_table_ready, RepoError, RepoResult};
use crate::model::item::{Item, ItemDraft, ItemId};
use crate::model::RecordKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ITEM_SELECT_SQL: &str = "SELECT id, name, description, created_at FROM items";
const ITEM_COLUMNS: &[&str] = &["id", "name", "description", "created_at"];

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<Item>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn find_item_by_name(&self, name: &str) -> RepoResult<Option<Item>>;
    /// Lists live items in insertion (`id ASC`) order.
    fn list_items(&self) -> RepoResult<Vec<Item>>;
    /// Overwrites mutable fields of an existing item.
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
}

impl<R: ItemRepository + ?Sized> ItemRepository for &R {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<Item> {
        (**self).insert_item(draft)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        (**self).get_item(id)
    }

    fn find_item_by_name(&self, name: &str) -> RepoResult<Option<Item>> {
        (**self).find_item_by_name(name)
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        (**self).list_items()
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        (**self).update_item(item)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        (**self).delete_item(id)
    }
}

/// SQLite-backed item repository.
///
/// Works on any connection, including an open `rusqlite::Transaction`, so the
/// caller decides the unit-of-work boundary.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Wraps a connection that is known to be migrated.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Wraps a connection after verifying the `items` schema is in place.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "items", ITEM_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<Item> {
        self.conn.execute(
            "INSERT INTO items (name, description, created_at) VALUES (?1, ?2, ?3);",
            params![
                draft.name.as_str(),
                draft.description.as_deref(),
                draft.created_at
            ],
        )?;

        Ok(Item {
            id: self.conn.last_insert_rowid(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            created_at: draft.created_at,
        })
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let item = self
            .conn
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_item_row,
            )
            .optional()?;
        Ok(item)
    }

    fn find_item_by_name(&self, name: &str) -> RepoResult<Option<Item>> {
        let item = self
            .conn
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE name = ?1 LIMIT 1;"),
                [name],
                parse_item_row,
            )
            .optional()?;
        Ok(item)
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
        let items = stmt
            .query_map([], parse_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items SET name = ?1, description = ?2 WHERE id = ?3;",
            params![item.name.as_str(), item.description.as_deref(), item.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Item,
                id: item.id,
            });
        }

        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM items WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Item,
                id,
            });
        }

        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
    })
}
