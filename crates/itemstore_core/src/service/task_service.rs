//! Task use-case service.
//!
//! # Invariants
//! - `complete_task` is idempotent for an already completed task.
//! - Task listing order is owned by the repository (newest first).

use super::error::{StoreError, StoreResult};
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::model::{now_epoch_ms, RecordKind};
use crate::repo::task_repo::TaskRepository;
use log::info;

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, input: NewTask) -> StoreResult<Task> {
        let draft = input.into_draft(now_epoch_ms())?;
        let task = self.repo.insert_task(&draft)?;
        info!(
            "event=task_create module=service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    pub fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.repo.list_tasks()?)
    }

    pub fn get_task(&self, id: TaskId) -> StoreResult<Task> {
        self.repo.get_task(id)?.ok_or(StoreError::NotFound {
            kind: RecordKind::Task,
            id,
        })
    }

    pub fn update_task(&self, id: TaskId, patch: TaskPatch) -> StoreResult<Task> {
        let mut task = self.get_task(id)?;
        patch.validate()?;
        patch.apply_to(&mut task);
        self.repo.update_task(&task)?;
        info!("event=task_update module=service status=ok task_id={id}");
        Ok(task)
    }

    /// Marks a task as completed.
    pub fn complete_task(&self, id: TaskId) -> StoreResult<Task> {
        self.update_task(id, TaskPatch::completed(true))
    }

    pub fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
