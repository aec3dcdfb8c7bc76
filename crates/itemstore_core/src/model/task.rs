//! Task record model.
//!
//! # Invariants
//! - `description` is required, non-empty and bounded in length.
//! - `completed` starts as `false` unless the create input says otherwise.

use super::patch::FieldUpdate;
use super::validation::{require_text, ValidationError, DESCRIPTION_MAX_CHARS};
use super::RecordId;
use serde::{Deserialize, Serialize};

pub type TaskId = RecordId;

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Create input for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl NewTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            completed: false,
        }
    }

    pub fn into_draft(self, created_at: i64) -> Result<TaskDraft, ValidationError> {
        require_text(
            "description",
            self.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
        )?;

        Ok(TaskDraft {
            description: self.description.unwrap_or_default(),
            completed: self.completed,
            created_at,
        })
    }
}

/// Validated task ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub completed: bool,
    pub created_at: i64,
}

/// Partial update input for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub description: FieldUpdate<String>,
    #[serde(default)]
    pub completed: FieldUpdate<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: FieldUpdate::Set(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_unchanged() && self.completed.is_unchanged()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        match &self.description {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => return Err(ValidationError::MissingField("description")),
            FieldUpdate::Set(description) => {
                require_text(
                    "description",
                    Some(description.as_str()),
                    DESCRIPTION_MAX_CHARS,
                )?;
            }
        }

        if matches!(self.completed, FieldUpdate::Clear) {
            return Err(ValidationError::NullField("completed"));
        }

        Ok(())
    }

    pub fn apply_to(self, task: &mut Task) {
        if let FieldUpdate::Set(description) = self.description {
            task.description = description;
        }
        if let FieldUpdate::Set(completed) = self.completed {
            task.completed = completed;
        }
    }
}
