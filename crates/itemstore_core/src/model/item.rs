//! Item record model.
//!
//! # Responsibility
//! - Define the persisted `Item` record and its create/update inputs.
//! - Validate inputs before they reach any repository.
//!
//! # Invariants
//! - `name` is non-empty and unique among live items.
//! - `description` is nullable and bounded in length.

use super::patch::FieldUpdate;
use super::validation::{
    check_length, require_text, ValidationError, DESCRIPTION_MAX_CHARS, ITEM_NAME_MAX_CHARS,
};
use super::RecordId;
use serde::{Deserialize, Serialize};

pub type ItemId = RecordId;

/// Persisted item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Create input for an item.
///
/// `name` is optional here so that a missing name surfaces as a validation
/// error instead of a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the input and stamps it with a creation time.
    pub fn into_draft(self, created_at: i64) -> Result<ItemDraft, ValidationError> {
        require_text("name", self.name.as_deref(), ITEM_NAME_MAX_CHARS)?;
        if let Some(description) = self.description.as_deref() {
            check_length("description", description, DESCRIPTION_MAX_CHARS)?;
        }

        Ok(ItemDraft {
            name: self.name.unwrap_or_default(),
            description: self.description,
            created_at,
        })
    }
}

/// Validated item ready for insertion; the id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
}

/// Partial update input for an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: FieldUpdate<String>,
    #[serde(default)]
    pub description: FieldUpdate<String>,
}

impl ItemPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: FieldUpdate::Set(name.into()),
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: FieldUpdate::Set(description.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_unchanged() && self.description.is_unchanged()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        match &self.name {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => return Err(ValidationError::MissingField("name")),
            FieldUpdate::Set(name) => {
                require_text("name", Some(name.as_str()), ITEM_NAME_MAX_CHARS)?;
            }
        }

        if let Some(description) = self.description.as_set() {
            check_length("description", description, DESCRIPTION_MAX_CHARS)?;
        }

        Ok(())
    }

    /// Applies present fields onto `item`; absent fields are left as-is.
    ///
    /// Callers must run [`ItemPatch::validate`] first.
    pub fn apply_to(self, item: &mut Item) {
        if let FieldUpdate::Set(name) = self.name {
            item.name = name;
        }
        match self.description {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => item.description = None,
            FieldUpdate::Set(description) => item.description = Some(description),
        }
    }
}
