use handlebars::Handlebars;
use serde_json::json;

use crate::values::FieldValueStore;

/// Interpolates `{{values.<id>}}` placeholders in label text from the
/// current snapshot.
///
/// Rendering never fails outward: a template error returns the raw text
/// unchanged, the same fail-open posture as visibility resolution.
pub struct TemplateEngine<'reg> {
    registry: Handlebars<'reg>,
}

impl TemplateEngine<'_> {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        Self { registry }
    }

    pub fn render_label(&self, text: &str, store: &FieldValueStore) -> String {
        if !text.contains("{{") {
            return text.to_string();
        }
        let ctx = json!({ "values": store });
        self.registry
            .render_template(text, &ctx)
            .unwrap_or_else(|_| text.to_string())
    }
}

impl Default for TemplateEngine<'_> {
    fn default() -> Self {
        Self::new()
    }
}
