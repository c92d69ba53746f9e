#![allow(missing_docs)]

pub mod examples;
pub mod expr;
pub mod project;
pub mod render;
pub mod rules;
pub mod session;
pub mod spec;
pub mod template;
pub mod validate;
pub mod values;
pub mod values_schema;
pub mod visibility;

pub use examples::generate as example_values;
pub use expr::Expr;
pub use project::{EffectiveForm, EffectiveGroup, project};
pub use render::{
    RenderField, RenderGroup, RenderPayload, build_render_payload, render_json_ui, render_text,
};
pub use rules::{Rule, RuleError, RuleProgram, evaluate_rules};
pub use session::FormSession;
pub use spec::{Constraint, Field, FieldGroup, FieldId, FieldOption, FieldType, Form};
pub use template::TemplateEngine;
pub use validate::{ValidationError, ValidationResult, validate};
pub use values::{FieldValueStore, SnapshotError};
pub use values_schema::generate as values_schema;
pub use visibility::{VisibilityPartition, resolve_form_visibility, resolve_visibility};
