//! Resource store for the itemstore service.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError, DatabaseTarget};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::item::{Item, ItemId, ItemPatch, NewItem};
pub use model::patch::FieldUpdate;
pub use model::task::{NewTask, Task, TaskId, TaskPatch};
pub use model::validation::ValidationError;
pub use model::{RecordId, RecordKind};
pub use repo::item_repo::{ItemRepository, SqliteItemRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::error::{StoreError, StoreResult};
pub use service::health::HealthReport;
pub use service::item_service::ItemService;
pub use service::task_service::TaskService;
pub use store::ResourceStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
