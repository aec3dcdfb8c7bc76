//! Record types persisted by the resource store.
//!
//! # Responsibility
//! - Define the canonical `Item` and `Task` records and their input shapes.
//! - Own field-level validation so every backend enforces the same rules.
//!
//! # Invariants
//! - Record ids are assigned by the store and never reused.
//! - `created_at` is assigned at creation and never user-settable.
//! - Deletion is a hard delete; there are no tombstones.

pub mod item;
pub mod patch;
pub mod task;
pub mod validation;

use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned record identifier.
pub type RecordId = i64;

/// Which record collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Item,
    Task,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item => write!(f, "Item"),
            Self::Task => write!(f, "Task"),
        }
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the system clock is set before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
