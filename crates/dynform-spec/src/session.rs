use serde_json::Value;

use crate::project::{EffectiveForm, project};
use crate::spec::field::FieldId;
use crate::spec::form::Form;
use crate::values::FieldValueStore;
use crate::visibility::{VisibilityPartition, resolve_form_visibility};

/// One open form instance: the form definition, its value store, and the
/// partition derived from them.
///
/// Every `set` is a complete, synchronous state transition; the partition
/// is recomputed before the call returns, so reads always observe a state
/// consistent with the latest snapshot. A session is owned by exactly one
/// open form (one modal); independent forms get independent sessions.
#[derive(Debug, Clone)]
pub struct FormSession {
    form: Form,
    store: FieldValueStore,
    partition: VisibilityPartition,
}

impl FormSession {
    /// Opens a session, seeding the store from the form's initial values.
    pub fn open(form: Form) -> Self {
        let store = FieldValueStore::from_form(&form);
        let partition = resolve_form_visibility(&form, &store);
        Self {
            form,
            store,
            partition,
        }
    }

    /// Opens a session with an externally supplied snapshot (e.g. values
    /// restored by a host). Initial field values already in the snapshot
    /// are kept; missing ones are seeded from the form.
    pub fn open_with_values(form: Form, values: FieldValueStore) -> Self {
        let mut store = FieldValueStore::from_form(&form);
        for (id, value) in values.entries() {
            store.set(id.clone(), value.clone());
        }
        let partition = resolve_form_visibility(&form, &store);
        Self {
            form,
            store,
            partition,
        }
    }

    /// Applies one edit and recomputes visibility.
    pub fn set(&mut self, id: FieldId, value: Value) {
        self.store.set(id, value);
        self.partition = resolve_form_visibility(&self.form, &self.store);
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn values(&self) -> &FieldValueStore {
        &self.store
    }

    pub fn partition(&self) -> &VisibilityPartition {
        &self.partition
    }

    /// The currently presented form structure.
    pub fn effective(&self) -> EffectiveForm {
        project(&self.form, &self.partition)
    }
}
