//! Declarative rule sets
//!
//! A [`RuleSet`] is what a model hands to the REST layer: an ordered list of
//! fields, each with the raw rule strings declared for it. Parsing into
//! [`RuleSpec`] happens when the set is compiled into a validator, so models
//! can build rule sets cheaply and compare them for equality.

use crate::error::RuleParseError;

/// A single parsed rule
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSpec {
    Required,
    Nullable,
    String,
    Integer,
    Numeric,
    Boolean,
    Email,
    Uuid,
    Min(f64),
    Max(f64),
    In(Vec<String>),
    Regex(String),
}

impl RuleSpec {
    /// Parse one rule declaration such as `max:255` or `in:draft,published`
    pub fn parse(field: &str, raw: &str) -> Result<Self, RuleParseError> {
        let (name, param) = match raw.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (raw.trim(), None),
        };

        let require_param = || {
            param
                .filter(|p| !p.is_empty())
                .ok_or_else(|| RuleParseError::MissingParameter {
                    field: field.to_string(),
                    rule: name.to_string(),
                })
        };

        let parse_bound = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| RuleParseError::InvalidParameter {
                    field: field.to_string(),
                    rule: name.to_string(),
                    value: value.to_string(),
                })
        };

        match name {
            "required" => Ok(RuleSpec::Required),
            "nullable" => Ok(RuleSpec::Nullable),
            "string" => Ok(RuleSpec::String),
            "integer" => Ok(RuleSpec::Integer),
            "numeric" => Ok(RuleSpec::Numeric),
            "boolean" => Ok(RuleSpec::Boolean),
            "email" => Ok(RuleSpec::Email),
            "uuid" => Ok(RuleSpec::Uuid),
            "min" => Ok(RuleSpec::Min(parse_bound(require_param()?)?)),
            "max" => Ok(RuleSpec::Max(parse_bound(require_param()?)?)),
            "in" => Ok(RuleSpec::In(
                require_param()?
                    .split(',')
                    .map(|v| v.trim().to_string())
                    .collect(),
            )),
            "regex" => {
                let pattern = require_param()?;
                // `/pattern/` delimiters are accepted and stripped
                let pattern = pattern
                    .strip_prefix('/')
                    .and_then(|p| p.strip_suffix('/'))
                    .unwrap_or(pattern);
                Ok(RuleSpec::Regex(pattern.to_string()))
            }
            other => Err(RuleParseError::UnknownRule {
                field: field.to_string(),
                rule: other.to_string(),
            }),
        }
    }

    /// Rule name as used in message lookup keys
    pub fn name(&self) -> &'static str {
        match self {
            RuleSpec::Required => "required",
            RuleSpec::Nullable => "nullable",
            RuleSpec::String => "string",
            RuleSpec::Integer => "integer",
            RuleSpec::Numeric => "numeric",
            RuleSpec::Boolean => "boolean",
            RuleSpec::Email => "email",
            RuleSpec::Uuid => "uuid",
            RuleSpec::Min(_) => "min",
            RuleSpec::Max(_) => "max",
            RuleSpec::In(_) => "in",
            RuleSpec::Regex(_) => "regex",
        }
    }
}

/// Field-level validation constraints for a model operation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, Vec<String>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add pipe-separated rules for a field, e.g. `"required|string|max:255"`.
    ///
    /// Calling this twice for the same field appends to its rule list.
    pub fn field(self, field: impl Into<String>, rules: &str) -> Self {
        let parts = rules
            .split('|')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        self.field_rules(field, parts)
    }

    /// Add rules for a field without pipe splitting. Needed for `regex`
    /// patterns that contain `|`.
    pub fn field_rules<I, S>(mut self, field: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        let rules: Vec<String> = rules.into_iter().map(Into::into).collect();

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((field, rules)),
        }
        self
    }

    /// Drop every rule of the given field
    pub fn without(mut self, field: &str) -> Self {
        self.fields.retain(|(name, _)| name != field);
        self
    }

    /// Combine with another set; rules of shared fields are appended
    pub fn merge(mut self, other: RuleSet) -> Self {
        for (field, rules) in other.fields {
            self = self.field_rules(field, rules);
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Parse every declared rule
    pub fn parse(&self) -> Result<Vec<(String, Vec<RuleSpec>)>, RuleParseError> {
        self.fields
            .iter()
            .map(|(field, rules)| {
                let specs = rules
                    .iter()
                    .map(|raw| RuleSpec::parse(field, raw))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((field.clone(), specs))
            })
            .collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RuleSet
where
    K: Into<String>,
    V: AsRef<str>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries
            .into_iter()
            .fold(RuleSet::new(), |set, (field, rules)| set.field(field, rules.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_rules_are_split() {
        let rules = RuleSet::new().field("name", "required|string|max:255");
        assert_eq!(
            rules.get("name").unwrap(),
            &["required".to_string(), "string".to_string(), "max:255".to_string()]
        );
    }

    #[test]
    fn test_field_order_is_declaration_order() {
        let rules = RuleSet::from([("title", "required"), ("body", "string"), ("author", "uuid")]);
        let fields: Vec<&str> = rules.fields().collect();
        assert_eq!(fields, vec!["title", "body", "author"]);
    }

    #[test]
    fn test_repeated_field_appends() {
        let rules = RuleSet::new().field("age", "integer").field("age", "min:0");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.get("age").unwrap().len(), 2);
    }

    #[test]
    fn test_equality() {
        let a = RuleSet::from([("name", "required")]);
        let b = RuleSet::new().field("name", "required");
        assert_eq!(a, b);
        assert_ne!(a, RuleSet::new());
    }

    #[test]
    fn test_parse_known_rules() {
        assert_eq!(RuleSpec::parse("n", "max:10").unwrap(), RuleSpec::Max(10.0));
        assert_eq!(
            RuleSpec::parse("s", "in:draft, published").unwrap(),
            RuleSpec::In(vec!["draft".to_string(), "published".to_string()])
        );
        assert_eq!(
            RuleSpec::parse("c", "regex:/^[A-Z]+$/").unwrap(),
            RuleSpec::Regex("^[A-Z]+$".to_string())
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RuleSpec::parse("n", "sometimes"),
            Err(RuleParseError::UnknownRule { .. })
        ));
        assert!(matches!(
            RuleSpec::parse("n", "max"),
            Err(RuleParseError::MissingParameter { .. })
        ));
        assert!(matches!(
            RuleSpec::parse("n", "min:abc"),
            Err(RuleParseError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_without_and_merge() {
        let create = RuleSet::from([("name", "required|string"), ("email", "required|email")]);
        let update = create.clone().without("email").merge(RuleSet::from([("email", "email")]));

        assert_eq!(update.get("email").unwrap(), &["email".to_string()]);
        assert_eq!(update.get("name"), create.get("name"));
    }
}
