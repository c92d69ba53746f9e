use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::spec::field::FieldId;
use crate::spec::form::Form;

/// Live snapshot of field values for one open form instance.
///
/// Entries keep first-insertion order: overwriting a key updates it in
/// place, a new key is appended. The evaluator receives the pairs exactly
/// in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValueStore {
    entries: Vec<(FieldId, Value)>,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot as CBOR: {0}")]
    Cbor(#[from] serde_cbor::Error),
    #[error("failed to encode snapshot as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from every field's initial value, main fields and
    /// group fields alike, so visibility is correct before any edit.
    pub fn from_form(form: &Form) -> Self {
        let mut store = Self::new();
        for field in form.fields() {
            if !field.value.is_null() {
                store.set(field.id.clone(), field.value.clone());
            }
        }
        store
    }

    /// Upserts one entry. This is the single mutation point of the core.
    pub fn set(&mut self, id: FieldId, value: Value) {
        match self.entries.iter_mut().find(|(key, _)| key == &id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((id, value)),
        }
    }

    /// Current value of one field, if any.
    pub fn value(&self, id: &FieldId) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value)
    }

    /// All entries in insertion order, including null-valued ones.
    pub fn entries(&self) -> &[(FieldId, Value)] {
        &self.entries
    }

    /// The pairs handed to the evaluator: entries with a defined
    /// (non-null) value, in insertion order.
    pub fn pairs(&self) -> Vec<(FieldId, Value)> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .cloned()
            .collect()
    }

    /// Map view of the snapshot for callers that key by id.
    pub fn as_map(&self) -> BTreeMap<FieldId, Value> {
        self.entries.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for FieldValueStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldValueStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = FieldValueStore;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field ids to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut store = FieldValueStore::new();
                while let Some((id, value)) = access.next_entry::<FieldId, Value>()? {
                    store.set(id, value);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
