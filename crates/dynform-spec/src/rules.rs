use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::expr::Expr;
use crate::spec::field::FieldId;

/// One conditional visibility rule: when the condition holds, the listed
/// fields are shown respectively hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Rule {
    pub when: Expr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub show: Vec<FieldId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hide: Vec<FieldId>,
}

/// Declarative rule program parsed from the form's opaque rule source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleProgram {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule source is not a valid rule program: {0}")]
    Parse(#[source] serde_json::Error),
}

impl RuleProgram {
    /// Parses the opaque rule source text.
    pub fn parse(source: &str) -> Result<Self, RuleError> {
        serde_json::from_str(source).map_err(RuleError::Parse)
    }

    /// Runs every rule against the snapshot pairs, in program order, and
    /// collects the raw displayed/hidden id arrays.
    ///
    /// A rule whose condition is indeterminate (references an unset field)
    /// contributes nothing. Duplicates across rules are kept verbatim; the
    /// resolver copes with overlap.
    pub fn evaluate(&self, pairs: &[(FieldId, Value)]) -> (Vec<FieldId>, Vec<FieldId>) {
        let mut displayed = Vec::new();
        let mut hidden = Vec::new();
        for rule in &self.rules {
            if rule.when.evaluate(pairs) == Some(true) {
                displayed.extend(rule.show.iter().cloned());
                hidden.extend(rule.hide.iter().cloned());
            }
        }
        (displayed, hidden)
    }
}

/// Parses and evaluates a rule source against the snapshot pairs.
///
/// Any failure, malformed JSON, a document of the wrong shape, an unknown
/// expression operator, yields the empty-empty output; nothing escapes as
/// an error. The pairs are passed through in the order given, never
/// reordered.
pub fn evaluate_rules(source: &str, pairs: &[(FieldId, Value)]) -> (Vec<FieldId>, Vec<FieldId>) {
    match RuleProgram::parse(source) {
        Ok(program) => program.evaluate(pairs),
        Err(_) => (Vec::new(), Vec::new()),
    }
}
