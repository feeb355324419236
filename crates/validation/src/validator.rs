//! Compiles a [`RuleSet`] into validators and runs them over a payload

use crate::error::{RuleParseError, ValidationErrors, ValidationResult};
use crate::messages::ValidationMessages;
use crate::rule_set::{RuleSet, RuleSpec};
use crate::traits::ValidationRule;
use crate::validators::*;
use serde_json::{Map, Value};
use std::sync::Arc;

struct FieldRules {
    field: String,
    required: Option<RequiredValidator>,
    nullable: bool,
    rules: Vec<Arc<dyn ValidationRule>>,
}

/// Ready-to-run validator for one rule set.
///
/// Fields absent from the payload are only checked by `required`; every
/// other rule applies to present values. `nullable` lets an explicit `null`
/// through.
pub struct Validator {
    fields: Vec<FieldRules>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.validated_fields())
            .finish()
    }
}

impl Validator {
    pub fn compile(rules: &RuleSet, messages: &ValidationMessages) -> Result<Self, RuleParseError> {
        let fields = rules
            .parse()?
            .into_iter()
            .map(|(field, specs)| compile_field(field, specs, messages))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn validated_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }

    pub async fn validate(&self, data: &Map<String, Value>) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            let value = match data.get(&field.field) {
                Some(value) => value,
                None => {
                    if let Some(required) = &field.required {
                        errors.add(required.missing(&field.field));
                    }
                    continue;
                }
            };

            if let Some(required) = &field.required {
                if let Err(e) = required.validate(value, &field.field).await {
                    errors.merge(e);
                    continue;
                }
            } else if value.is_null() && field.nullable {
                continue;
            }

            for rule in &field.rules {
                if let Err(e) = rule.validate(value, &field.field).await {
                    errors.merge(e);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                fields = errors.len(),
                total = errors.total_errors(),
                "validation failed"
            );
            Err(errors)
        }
    }

    /// Validate a JSON value; anything but an object is validated as an
    /// empty payload.
    pub async fn validate_value(&self, data: &Value) -> ValidationResult<()> {
        match data.as_object() {
            Some(map) => self.validate(map).await,
            None => self.validate(&Map::new()).await,
        }
    }
}

fn compile_field(
    field: String,
    specs: Vec<RuleSpec>,
    messages: &ValidationMessages,
) -> Result<FieldRules, RuleParseError> {
    let numeric = specs
        .iter()
        .any(|s| matches!(s, RuleSpec::Integer | RuleSpec::Numeric));
    let custom = |rule: &str| messages.resolve(&field, rule).map(str::to_string);

    let mut compiled = FieldRules {
        field: field.clone(),
        required: None,
        nullable: false,
        rules: Vec::new(),
    };

    for spec in specs {
        let message = custom(spec.name());
        let rule: Arc<dyn ValidationRule> = match spec {
            RuleSpec::Required => {
                compiled.required = Some(RequiredValidator { message });
                continue;
            }
            RuleSpec::Nullable => {
                compiled.nullable = true;
                continue;
            }
            RuleSpec::String => Arc::new(TypeValidator { expected: ValueType::String, message }),
            RuleSpec::Integer => Arc::new(TypeValidator { expected: ValueType::Integer, message }),
            RuleSpec::Numeric => Arc::new(TypeValidator { expected: ValueType::Numeric, message }),
            RuleSpec::Boolean => Arc::new(TypeValidator { expected: ValueType::Boolean, message }),
            RuleSpec::Email => Arc::new(EmailValidator { message }),
            RuleSpec::Uuid => Arc::new(UuidValidator { message }),
            RuleSpec::Min(min) => Arc::new(SizeValidator { message, ..SizeValidator::min(min).numeric(numeric) }),
            RuleSpec::Max(max) => Arc::new(SizeValidator { message, ..SizeValidator::max(max).numeric(numeric) }),
            RuleSpec::In(allowed) => Arc::new(OneOfValidator { allowed, message }),
            RuleSpec::Regex(pattern) => {
                let mut validator =
                    PatternValidator::new(&pattern).map_err(|_| RuleParseError::InvalidParameter {
                        field: field.clone(),
                        rule: "regex".to_string(),
                        value: pattern.clone(),
                    })?;
                validator.message = message;
                Arc::new(validator)
            }
        };
        compiled.rules.push(rule);
    }

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_empty_rule_set_accepts_anything() {
        let validator = Validator::compile(&RuleSet::new(), &ValidationMessages::new()).unwrap();
        assert!(validator.is_empty());
        assert!(validator.validate(&payload(json!({"x": 1}))).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_required_field() {
        let rules = RuleSet::from([("name", "required|string"), ("bio", "string")]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();

        let errors = validator.validate(&payload(json!({}))).await.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first("name"), Some("The name field is required."));
    }

    #[tokio::test]
    async fn test_required_failure_skips_remaining_rules() {
        let rules = RuleSet::from([("name", "required|string|min:2")]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();

        let errors = validator.validate(&payload(json!({"name": ""}))).await.unwrap_err();
        assert_eq!(errors.total_errors(), 1);
    }

    #[tokio::test]
    async fn test_nullable() {
        let rules = RuleSet::from([("nickname", "nullable|string|max:10"), ("bio", "string")]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();

        assert!(validator.validate(&payload(json!({"nickname": null}))).await.is_ok());

        let errors = validator.validate(&payload(json!({"bio": null}))).await.unwrap_err();
        assert!(errors.has_field_errors("bio"));
    }

    #[tokio::test]
    async fn test_collects_errors_across_fields() {
        let rules = RuleSet::from([
            ("email", "required|email"),
            ("age", "integer|min:18"),
            ("status", "in:active,inactive"),
        ]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();

        let errors = validator
            .validate(&payload(json!({"email": "nope", "age": "12", "status": "gone"})))
            .await
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first("age"), Some("The age must be at least 18."));
    }

    #[tokio::test]
    async fn test_custom_messages() {
        let rules = RuleSet::from([("title", "required|max:3")]);
        let messages = ValidationMessages::from([
            ("required", "Please provide a :attribute"),
            ("title.max", "Keep the :attribute under :max"),
        ]);
        let validator = Validator::compile(&rules, &messages).unwrap();

        let errors = validator.validate(&payload(json!({}))).await.unwrap_err();
        assert_eq!(errors.first("title"), Some("Please provide a title"));

        let errors = validator.validate(&payload(json!({"title": "long"}))).await.unwrap_err();
        assert_eq!(errors.first("title"), Some("Keep the title under 3"));
    }

    #[tokio::test]
    async fn test_numeric_rejects_non_finite_strings() {
        let rules = RuleSet::from([("age", "numeric|min:0")]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();

        for raw in ["NaN", "inf", "-infinity"] {
            let errors = validator.validate(&payload(json!({"age": raw}))).await.unwrap_err();
            assert_eq!(errors.first("age"), Some("The age must be a number."), "{}", raw);
        }
        assert!(validator.validate(&payload(json!({"age": "12.5"}))).await.is_ok());
    }

    #[test]
    fn test_invalid_regex_is_a_compile_error() {
        let rules = RuleSet::new().field_rules("code", ["regex:/(/"]);
        let err = Validator::compile(&rules, &ValidationMessages::new()).unwrap_err();
        assert!(matches!(err, RuleParseError::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn test_non_object_payload() {
        let rules = RuleSet::from([("name", "required")]);
        let validator = Validator::compile(&rules, &ValidationMessages::new()).unwrap();
        assert!(validator.validate_value(&json!([1, 2])).await.is_err());
    }
}
