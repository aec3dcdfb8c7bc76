//! Item use-case service.
//!
//! # Responsibility
//! - Provide validated CRUD entry points for items.
//! - Enforce name uniqueness with an application-level check that yields a
//!   precise conflict, backed by the storage-level constraint.
//!
//! # Invariants
//! - Inputs are validated before any repository call that writes.
//! - A rename to the item's current name never conflicts with itself.
//! - Fields absent from a patch are persisted unchanged.

use super::error::{StoreError, StoreResult};
use crate::model::item::{Item, ItemId, ItemPatch, NewItem};
use crate::model::{now_epoch_ms, RecordKind};
use crate::repo::item_repo::ItemRepository;
use log::{info, warn};

/// Use-case service wrapper for item CRUD operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an item and returns it with its assigned id.
    ///
    /// # Errors
    /// - `Validation` when the name is missing, blank or too long.
    /// - `Conflict` when a live item already uses the name.
    /// - `Storage` on persistence failure.
    pub fn create_item(&self, input: NewItem) -> StoreResult<Item> {
        let draft = input.into_draft(now_epoch_ms()).map_err(|err| {
            warn!("event=item_create module=service status=rejected reason={err}");
            err
        })?;

        if self.repo.find_item_by_name(&draft.name)?.is_some() {
            warn!("event=item_create module=service status=conflict");
            return Err(StoreError::Conflict { name: draft.name });
        }

        let item = self
            .repo
            .insert_item(&draft)
            .map_err(|err| StoreError::from_name_write(err, &draft.name))?;
        info!(
            "event=item_create module=service status=ok item_id={}",
            item.id
        );
        Ok(item)
    }

    /// Lists all live items in insertion order.
    pub fn list_items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.repo.list_items()?)
    }

    /// Gets one item by id.
    pub fn get_item(&self, id: ItemId) -> StoreResult<Item> {
        self.repo.get_item(id)?.ok_or(StoreError::NotFound {
            kind: RecordKind::Item,
            id,
        })
    }

    /// Applies a partial update to an existing item.
    ///
    /// # Errors
    /// - `NotFound` when `id` does not exist (checked before the patch).
    /// - `Validation` when the patch is empty or carries an invalid field.
    /// - `Conflict` when the new name belongs to another live item.
    pub fn update_item(&self, id: ItemId, patch: ItemPatch) -> StoreResult<Item> {
        let mut item = self.get_item(id)?;
        patch.validate()?;

        if let Some(name) = patch.name.as_set() {
            if *name != item.name {
                if let Some(existing) = self.repo.find_item_by_name(name)? {
                    if existing.id != id {
                        warn!(
                            "event=item_update module=service status=conflict item_id={}",
                            id
                        );
                        return Err(StoreError::Conflict { name: name.clone() });
                    }
                }
            }
        }

        patch.apply_to(&mut item);
        self.repo
            .update_item(&item)
            .map_err(|err| StoreError::from_name_write(err, &item.name))?;
        info!("event=item_update module=service status=ok item_id={id}");
        Ok(item)
    }

    /// Permanently removes an item.
    pub fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        self.repo.delete_item(id)?;
        info!("event=item_delete module=service status=ok item_id={id}");
        Ok(())
    }
}
