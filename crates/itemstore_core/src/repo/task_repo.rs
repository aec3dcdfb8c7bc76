//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Task listing is always sorted by `created_at DESC, id DESC`.
//! - `completed` is persisted as `0|1`; any other value is rejected on read.

use super::{bool_to_int, ensure_table_ready, int_to_bool, RepoError, RepoResult};
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::model::RecordKind;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT id, description, completed, created_at FROM tasks";
const TASK_COLUMNS: &[&str] = &["id", "description", "completed", "created_at"];

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists live tasks, newest first.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for &R {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        (**self).insert_task(draft)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        (**self).get_task(id)
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        (**self).list_tasks()
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        (**self).update_task(task)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        (**self).delete_task(id)
    }
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "tasks", TASK_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        self.conn.execute(
            "INSERT INTO tasks (description, completed, created_at) VALUES (?1, ?2, ?3);",
            params![
                draft.description.as_str(),
                bool_to_int(draft.completed),
                draft.created_at
            ],
        )?;

        Ok(Task {
            id: self.conn.last_insert_rowid(),
            description: draft.description.clone(),
            completed: draft.completed,
            created_at: draft.created_at,
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET description = ?1, completed = ?2 WHERE id = ?3;",
            params![
                task.description.as_str(),
                bool_to_int(task.completed),
                task.id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id: task.id,
            });
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Task,
                id,
            });
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        description: row.get("description")?,
        completed: int_to_bool("tasks", "completed", row.get("completed")?)?,
        created_at: row.get("created_at")?,
    })
}
