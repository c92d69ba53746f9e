use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::evaluate_rules;
use crate::spec::field::FieldId;
use crate::spec::form::Form;
use crate::values::FieldValueStore;

/// The displayed/hidden partition over a form's field ids.
///
/// `hidden` is the authoritative suppression set: a malformed rule may
/// list an id on both sides, and consumers that filter on `hidden` resolve
/// the overlap consistently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VisibilityPartition {
    pub displayed: BTreeSet<FieldId>,
    pub hidden: BTreeSet<FieldId>,
}

impl VisibilityPartition {
    /// Partition with every given id displayed and nothing hidden.
    pub fn show_all(ids: impl IntoIterator<Item = FieldId>) -> Self {
        Self {
            displayed: ids.into_iter().collect(),
            hidden: BTreeSet::new(),
        }
    }

    pub fn is_hidden(&self, id: &FieldId) -> bool {
        self.hidden.contains(id)
    }
}

/// Resolves the visibility partition for a form's fields.
///
/// With no rule source (or a blank one) every field is displayed. With a
/// rule source, the rule program runs against the snapshot pairs and its
/// raw output is taken verbatim, restricted to declared ids; every
/// declared id the rules left unmentioned is then added to `displayed`.
/// The result is total over `all_ids` and fails open: any rule failure is
/// indistinguishable from "no rules configured".
pub fn resolve_visibility(
    rule_source: Option<&str>,
    all_ids: &[FieldId],
    pairs: &[(FieldId, Value)],
) -> VisibilityPartition {
    let source = match rule_source {
        Some(source) if !source.trim().is_empty() => source,
        _ => return VisibilityPartition::show_all(all_ids.iter().cloned()),
    };

    let (raw_displayed, raw_hidden) = evaluate_rules(source, pairs);

    let known: BTreeSet<&FieldId> = all_ids.iter().collect();
    let mut partition = VisibilityPartition::default();
    partition.displayed.extend(
        raw_displayed
            .into_iter()
            .filter(|id| known.contains(id)),
    );
    partition.hidden.extend(
        raw_hidden
            .into_iter()
            .filter(|id| known.contains(id)),
    );

    for id in all_ids {
        if !partition.displayed.contains(id) && !partition.hidden.contains(id) {
            partition.displayed.insert(id.clone());
        }
    }

    partition
}

/// Convenience wrapper resolving visibility for a whole form against its
/// current value store.
pub fn resolve_form_visibility(form: &Form, store: &FieldValueStore) -> VisibilityPartition {
    resolve_visibility(
        form.render_rules.as_deref(),
        &form.field_ids(),
        &store.pairs(),
    )
}
