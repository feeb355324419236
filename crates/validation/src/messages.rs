//! Message templates for validation failures

use std::collections::HashMap;

/// Custom failure messages keyed by rule name.
///
/// Keys are either `rule` (applies to every field) or `field.rule` (applies to
/// one field only). Templates may use `:attribute`, `:min`, `:max` and
/// `:values`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationMessages {
    templates: HashMap<String, String>,
}

impl ValidationMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Most specific template for a field and rule
    pub fn resolve(&self, field: &str, rule: &str) -> Option<&str> {
        self.get(&format!("{}.{}", field, rule))
            .or_else(|| self.get(rule))
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ValidationMessages
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(entries: [(K, V); N]) -> Self {
        Self {
            templates: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Human form of a field name: `first_name` becomes `first name`
pub fn display_attribute(field: &str) -> String {
    field.replace('_', " ")
}

/// Substitute placeholders in a template
pub fn render(template: &str, field: &str, params: &[(&str, String)]) -> String {
    let mut message = template.replace(":attribute", &display_attribute(field));
    for (placeholder, value) in params {
        message = message.replace(placeholder, value);
    }
    message
}

/// Format a bound without a trailing `.0` for whole numbers
pub fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}
