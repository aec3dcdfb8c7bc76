//! In-memory backend for the item and task repositories.
//!
//! # Responsibility
//! - Keep live records in an ordered map keyed by id, one table per record kind.
//! - Hand out ids from a monotonic counter.
//! - Give each unit of work an isolated working copy that is written back
//!   only on success. The copy is taken on the first write, so read-only
//!   units of work never clone a table.
//!
//! # Invariants
//! - Ids are never reused, even when a unit of work is discarded.
//! - Item names are unique within the table, mirroring the SQLite constraint.
//! - The raw tables are never exposed outside this module.

use super::item_repo::ItemRepository;
use super::task_repo::TaskRepository;
use super::{RepoError, RepoResult};
use crate::model::item::{Item, ItemDraft, ItemId};
use crate::model::task::{Task, TaskDraft, TaskId};
use crate::model::{RecordId, RecordKind};
use log::debug;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct MemoryTable<R> {
    last_id: RecordId,
    rows: BTreeMap<RecordId, R>,
}

impl<R> MemoryTable<R> {
    fn new() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> RecordId {
        self.last_id += 1;
        self.last_id
    }
}

/// Process-local store for items and tasks.
#[derive(Debug)]
pub struct MemoryBackend {
    items: Mutex<MemoryTable<Item>>,
    tasks: Mutex<MemoryTable<Task>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(MemoryTable::new()),
            tasks: Mutex::new(MemoryTable::new()),
        }
    }

    /// Runs `work` as one unit of work over the items table.
    pub fn with_items<T, E>(
        &self,
        work: impl FnOnce(&MemoryItemRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError> + Display,
    {
        run_scoped(&self.items, "items", |table| {
            work(&MemoryItemRepository { table })
        })
    }

    /// Runs `work` as one unit of work over the tasks table.
    pub fn with_tasks<T, E>(
        &self,
        work: impl FnOnce(&MemoryTaskRepository<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RepoError> + Display,
    {
        run_scoped(&self.tasks, "tasks", |table| {
            work(&MemoryTaskRepository { table })
        })
    }

    /// Checks that both tables can still be locked.
    pub fn probe(&self) -> RepoResult<()> {
        lock_table(&self.items, "items")?;
        lock_table(&self.tasks, "tasks")?;
        Ok(())
    }
}

fn lock_table<'a, R>(
    table: &'a Mutex<MemoryTable<R>>,
    scope: &str,
) -> RepoResult<MutexGuard<'a, MemoryTable<R>>> {
    table
        .lock()
        .map_err(|_| RepoError::Unavailable(format!("{scope} table lock poisoned")))
}

/// One unit of work over a table.
///
/// Reads see the committed rows until the first write takes a private copy.
struct ScopedTable<'a, R> {
    committed: &'a MemoryTable<R>,
    working: RefCell<Option<MemoryTable<R>>>,
}

impl<R: Clone> ScopedTable<'_, R> {
    fn read<T>(&self, f: impl FnOnce(&MemoryTable<R>) -> T) -> T {
        match self.working.borrow().as_ref() {
            Some(table) => f(table),
            None => f(self.committed),
        }
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemoryTable<R>) -> T) -> T {
        let mut working = self.working.borrow_mut();
        f(working.get_or_insert_with(|| self.committed.clone()))
    }
}

fn run_scoped<R: Clone, T, E>(
    table: &Mutex<MemoryTable<R>>,
    scope: &str,
    work: impl FnOnce(&ScopedTable<'_, R>) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<RepoError> + Display,
{
    let mut guard = lock_table(table, scope).map_err(E::from)?;
    let scoped = ScopedTable {
        committed: &*guard,
        working: RefCell::new(None),
    };
    let result = work(&scoped);
    let working = scoped.working.into_inner();

    match result {
        Ok(value) => {
            if let Some(table) = working {
                *guard = table;
            }
            Ok(value)
        }
        Err(err) => {
            if let Some(table) = working {
                guard.last_id = guard.last_id.max(table.last_id);
            }
            debug!(
                "event=session_rollback module=memory status=ok scope={} reason={}",
                scope, err
            );
            Err(err)
        }
    }
}

/// Item repository view over one in-memory unit of work.
pub struct MemoryItemRepository<'a> {
    table: &'a ScopedTable<'a, Item>,
}

impl ItemRepository for MemoryItemRepository<'_> {
    fn insert_item(&self, draft: &ItemDraft) -> RepoResult<Item> {
        self.table.write(|table| {
            if table.rows.values().any(|item| item.name == draft.name) {
                return Err(unique_name_violation(&draft.name));
            }

            let item = Item {
                id: table.allocate_id(),
                name: draft.name.clone(),
                description: draft.description.clone(),
                created_at: draft.created_at,
            };
            table.rows.insert(item.id, item.clone());
            Ok(item)
        })
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.table.read(|table| table.rows.get(&id).cloned()))
    }

    fn find_item_by_name(&self, name: &str) -> RepoResult<Option<Item>> {
        Ok(self.table.read(|table| {
            table
                .rows
                .values()
                .find(|item| item.name == name)
                .cloned()
        }))
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        Ok(self
            .table
            .read(|table| table.rows.values().cloned().collect()))
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        self.table.write(|table| -> RepoResult<()> {
            if table
                .rows
                .values()
                .any(|other| other.id != item.id && other.name == item.name)
            {
                return Err(unique_name_violation(&item.name));
            }

            let stored = table.rows.get_mut(&item.id).ok_or(RepoError::NotFound {
                kind: RecordKind::Item,
                id: item.id,
            })?;
            stored.name = item.name.clone();
            stored.description = item.description.clone();
            Ok(())
        })
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        self.table.write(|table| {
            table
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or(RepoError::NotFound {
                    kind: RecordKind::Item,
                    id,
                })
        })
    }
}

/// Task repository view over one in-memory unit of work.
pub struct MemoryTaskRepository<'a> {
    table: &'a ScopedTable<'a, Task>,
}

impl TaskRepository for MemoryTaskRepository<'_> {
    fn insert_task(&self, draft: &TaskDraft) -> RepoResult<Task> {
        self.table.write(|table| {
            let task = Task {
                id: table.allocate_id(),
                description: draft.description.clone(),
                completed: draft.completed,
                created_at: draft.created_at,
            };
            table.rows.insert(task.id, task.clone());
            Ok(task)
        })
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.table.read(|table| table.rows.get(&id).cloned()))
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .table
            .read(|table| table.rows.values().cloned().collect());
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.table.write(|table| -> RepoResult<()> {
            let stored = table.rows.get_mut(&task.id).ok_or(RepoError::NotFound {
                kind: RecordKind::Task,
                id: task.id,
            })?;
            stored.description = task.description.clone();
            stored.completed = task.completed;
            Ok(())
        })
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.table.write(|table| {
            table
                .rows
                .remove(&id)
                .map(|_| ())
                .ok_or(RepoError::NotFound {
                    kind: RecordKind::Task,
                    id,
                })
        })
    }
}

fn unique_name_violation(name: &str) -> RepoError {
    RepoError::UniqueViolation(format!("items.name already holds `{name}`"))
}

#[cfg(test)]
mod tests {
    use super::{run_scoped, MemoryBackend, MemoryItemRepository, ScopedTable};
    use crate::model::item::{Item, ItemDraft};
    use crate::repo::item_repo::ItemRepository;
    use crate::repo::{RepoError, RepoResult};

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            description: None,
            created_at: 1,
        }
    }

    #[test]
    fn failed_unit_of_work_discards_writes_but_not_ids() {
        let backend = MemoryBackend::new();

        let result: Result<(), RepoError> = backend.with_items(|repo| {
            repo.insert_item(&draft("discarded"))?;
            Err(RepoError::InvalidData("forced failure".to_string()))
        });
        assert!(result.is_err());

        let item = backend
            .with_items(|repo| {
                assert!(repo.list_items()?.is_empty());
                repo.insert_item(&draft("kept"))
            })
            .unwrap();
        assert_eq!(item.id, 2);
    }

    #[test]
    fn duplicate_names_are_rejected_as_unique_violations() {
        let backend = MemoryBackend::new();

        let err = backend
            .with_items(|repo| {
                repo.insert_item(&draft("widget"))?;
                repo.insert_item(&draft("widget"))
            })
            .unwrap_err();
        assert!(matches!(err, RepoError::UniqueViolation(_)));
    }

    #[test]
    fn read_only_unit_of_work_never_copies_the_table() {
        let backend = MemoryBackend::new();
        backend
            .with_items(|repo| repo.insert_item(&draft("widget")))
            .unwrap();

        let copied = run_scoped(
            &backend.items,
            "items",
            |table: &ScopedTable<'_, Item>| -> RepoResult<bool> {
                let repo = MemoryItemRepository { table };
                assert_eq!(repo.list_items()?.len(), 1);
                assert!(repo.get_item(1)?.is_some());
                assert!(repo.find_item_by_name("widget")?.is_some());
                Ok(table.working.borrow().is_some())
            },
        )
        .unwrap();
        assert!(!copied);
    }

    #[test]
    fn writes_are_visible_to_later_reads_in_the_same_unit_of_work() {
        let backend = MemoryBackend::new();

        let names = backend
            .with_items(|repo| {
                repo.insert_item(&draft("a"))?;
                repo.insert_item(&draft("b"))?;
                repo.delete_item(1)?;
                Ok::<_, RepoError>(
                    repo.list_items()?
                        .into_iter()
                        .map(|item| item.name)
                        .collect::<Vec<_>>(),
                )
            })
            .unwrap();
        assert_eq!(names, vec!["b".to_string()]);
    }
}
