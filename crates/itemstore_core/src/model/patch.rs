//! Tri-state field update used by partial-update inputs.

use serde::{Deserialize, Deserializer};

/// One field of a partial update.
///
/// Deserializes from JSON with `#[serde(default)]` on the containing field:
/// an absent key is `Unchanged`, `null` is `Clear`, any value is `Set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Clear,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            Self::Unchanged | Self::Clear => None,
        }
    }
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Set(value),
            None => Self::Clear,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldUpdate;
    use crate::model::item::ItemPatch;
    use crate::model::task::TaskPatch;

    #[test]
    fn absent_null_and_value_decode_to_distinct_updates() {
        let patch: ItemPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(patch.name, FieldUpdate::Unchanged);
        assert_eq!(patch.description, FieldUpdate::Clear);

        let patch: ItemPatch = serde_json::from_str(r#"{"name": "Widget"}"#).unwrap();
        assert_eq!(patch.name, FieldUpdate::Set("Widget".to_string()));
        assert!(patch.description.is_unchanged());
    }

    #[test]
    fn empty_object_decodes_to_empty_patch() {
        let patch: TaskPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn wrongly_typed_value_fails_to_decode() {
        assert!(serde_json::from_str::<TaskPatch>(r#"{"completed": "yes"}"#).is_err());
    }
}
