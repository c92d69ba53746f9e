pub mod field;
pub mod form;

pub use field::{Constraint, Field, FieldId, FieldOption, FieldType};
pub use form::{FieldGroup, Form};
