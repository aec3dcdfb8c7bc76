//! Resource store facade.
//!
//! # Responsibility
//! - Own the backend (SQLite connection or in-memory tables) behind one API.
//! - Scope every operation in a unit of work that is committed on success and
//!   rolled back on failure.
//!
//! # Invariants
//! - Callers never receive the raw connection or the raw in-memory tables.
//! - Requests are serialized on the SQLite connection; isolation and atomicity
//!   come from the per-request transaction.

use crate::config::DatabaseTarget;
use crate::db::{open_db, open_db_in_memory, run_in_session, DbResult};
use crate::model::item::{Item, ItemId, ItemPatch, NewItem};
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::repo::item_repo::{ItemRepository, SqliteItemRepository};
use crate::repo::memory::MemoryBackend;
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::error::{StoreError, StoreResult};
use crate::service::health::{probe_connection, HealthReport};
use crate::service::item_service::ItemService;
use crate::service::task_service::TaskService;
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};

enum Backend {
    Sqlite(Mutex<Connection>),
    Memory(MemoryBackend),
}

/// Durable, validated CRUD access to items and tasks.
pub struct ResourceStore {
    backend: Backend,
}

impl ResourceStore {
    /// Opens the backend described by `target`, applying migrations for SQLite.
    pub fn open(target: &DatabaseTarget) -> DbResult<Self> {
        match target {
            DatabaseTarget::SqliteFile(path) => Ok(Self::from_connection(open_db(path)?)),
            DatabaseTarget::SqliteMemory => Ok(Self::from_connection(open_db_in_memory()?)),
            DatabaseTarget::Memory => Ok(Self::in_memory()),
        }
    }

    /// Wraps an already migrated SQLite connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            backend: Backend::Sqlite(Mutex::new(conn)),
        }
    }

    /// Creates a store backed by process-local tables.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(MemoryBackend::new()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Sqlite(_) => "sqlite",
            Backend::Memory(_) => "memory",
        }
    }

    /// Runs `op` against the item service inside one unit of work.
    pub fn with_items<T>(
        &self,
        op: impl FnOnce(&ItemService<&dyn ItemRepository>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        match &self.backend {
            Backend::Sqlite(conn) => {
                let mut conn = lock_connection(conn)?;
                run_in_session(&mut conn, "items", |tx| {
                    let repo = SqliteItemRepository::new(tx);
                    op(&ItemService::new(&repo as &dyn ItemRepository))
                })
            }
            Backend::Memory(memory) => memory.with_items(|repo| {
                op(&ItemService::new(repo as &dyn ItemRepository))
            }),
        }
    }

    /// Runs `op` against the task service inside one unit of work.
    pub fn with_tasks<T>(
        &self,
        op: impl FnOnce(&TaskService<&dyn TaskRepository>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        match &self.backend {
            Backend::Sqlite(conn) => {
                let mut conn = lock_connection(conn)?;
                run_in_session(&mut conn, "tasks", |tx| {
                    let repo = SqliteTaskRepository::new(tx);
                    op(&TaskService::new(&repo as &dyn TaskRepository))
                })
            }
            Backend::Memory(memory) => memory.with_tasks(|repo| {
                op(&TaskService::new(repo as &dyn TaskRepository))
            }),
        }
    }

    pub fn create_item(&self, input: NewItem) -> StoreResult<Item> {
        self.with_items(|items| items.create_item(input))
    }

    pub fn list_items(&self) -> StoreResult<Vec<Item>> {
        self.with_items(|items| items.list_items())
    }

    pub fn get_item(&self, id: ItemId) -> StoreResult<Item> {
        self.with_items(|items| items.get_item(id))
    }

    pub fn update_item(&self, id: ItemId, patch: ItemPatch) -> StoreResult<Item> {
        self.with_items(|items| items.update_item(id, patch))
    }

    pub fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        self.with_items(|items| items.delete_item(id))
    }

    pub fn create_task(&self, input: NewTask) -> StoreResult<Task> {
        self.with_tasks(|tasks| tasks.create_task(input))
    }

    pub fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.with_tasks(|tasks| tasks.list_tasks())
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.with_tasks(|tasks| tasks.get_task(id))
    }

    pub fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.with_tasks(|tasks| tasks.update_task(id, patch))
    }

    pub fn complete_task(&self, id: TaskId) -> StoreResult<Task> {
        self.with_tasks(|tasks| tasks.complete_task(id))
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.with_tasks(|tasks| tasks.delete_task(id))
    }

    /// Runs a read-only probe against the backend.
    pub fn probe(&self) -> HealthReport {
        let result: RepoResult<()> = match &self.backend {
            Backend::Sqlite(conn) => match conn.lock() {
                Ok(conn) => probe_connection(&conn),
                Err(_) => Err(poisoned()),
            },
            Backend::Memory(memory) => memory.probe(),
        };
        HealthReport::from_probe(result)
    }
}

fn lock_connection(conn: &Mutex<Connection>) -> StoreResult<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|_| StoreError::Storage(poisoned()))
}

fn poisoned() -> RepoError {
    RepoError::Unavailable("connection lock poisoned".to_string())
}
