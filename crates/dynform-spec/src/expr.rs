use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::field::FieldId;

/// Lightweight expression AST used by rule conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Expr {
    LiteralBool { value: bool },
    Eq { field: FieldId, value: Value },
    Ne { field: FieldId, value: Value },
    In { field: FieldId, values: Vec<Value> },
    Contains { field: FieldId, value: Value },
    IsSet { field: FieldId },
    And { expressions: Vec<Expr> },
    Or { expressions: Vec<Expr> },
    Not { expression: Box<Expr> },
}

impl Expr {
    fn lookup<'a>(pairs: &'a [(FieldId, Value)], field: &FieldId) -> Option<&'a Value> {
        pairs
            .iter()
            .find(|(id, _)| id == field)
            .map(|(_, value)| value)
    }

    /// Evaluates the expression against the current value snapshot.
    ///
    /// `None` means the expression is indeterminate, typically because a
    /// referenced field has no current value; callers treat an
    /// indeterminate condition as "rule does not apply".
    pub fn evaluate(&self, pairs: &[(FieldId, Value)]) -> Option<bool> {
        match self {
            Expr::LiteralBool { value } => Some(*value),
            Expr::Eq { field, value } => {
                let current = Self::lookup(pairs, field)?;
                Some(current == value)
            }
            Expr::Ne { field, value } => {
                let current = Self::lookup(pairs, field)?;
                Some(current != value)
            }
            Expr::In { field, values } => {
                let current = Self::lookup(pairs, field)?;
                Some(values.contains(current))
            }
            Expr::Contains { field, value } => {
                let current = Self::lookup(pairs, field)?;
                match current {
                    Value::Array(items) => Some(items.contains(value)),
                    scalar => Some(scalar == value),
                }
            }
            Expr::IsSet { field } => Some(Self::lookup(pairs, field).is_some()),
            Expr::And { expressions } => {
                for expr in expressions {
                    match expr.evaluate(pairs) {
                        Some(true) => continue,
                        Some(false) => return Some(false),
                        None => return None,
                    }
                }
                Some(true)
            }
            Expr::Or { expressions } => {
                for expr in expressions {
                    if let Some(true) = expr.evaluate(pairs) {
                        return Some(true);
                    }
                }
                Some(false)
            }
            Expr::Not { expression } => expression.evaluate(pairs).map(|value| !value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs() -> Vec<(FieldId, Value)> {
        vec![
            (FieldId::from("kind"), json!("company")),
            (FieldId::from("tags"), json!(["vip", "lead"])),
        ]
    }

    #[test]
    fn eq_matches_current_value() {
        let expr = Expr::Eq {
            field: FieldId::from("kind"),
            value: json!("company"),
        };
        assert_eq!(expr.evaluate(&pairs()), Some(true));
    }

    #[test]
    fn eq_on_missing_field_is_indeterminate() {
        let expr = Expr::Eq {
            field: FieldId::from("missing"),
            value: json!("x"),
        };
        assert_eq!(expr.evaluate(&pairs()), None);
    }

    #[test]
    fn contains_checks_array_membership() {
        let expr = Expr::Contains {
            field: FieldId::from("tags"),
            value: json!("vip"),
        };
        assert_eq!(expr.evaluate(&pairs()), Some(true));
    }

    #[test]
    fn and_short_circuits_on_indeterminate() {
        let expr = Expr::And {
            expressions: vec![
                Expr::Eq {
                    field: FieldId::from("missing"),
                    value: json!("x"),
                },
                Expr::LiteralBool { value: true },
            ],
        };
        assert_eq!(expr.evaluate(&pairs()), None);
    }
}
