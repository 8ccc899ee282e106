//! Validation orchestrator.
//!
//! A call runs in two phases. Planning walks the record, parses every
//! annotation, checks every rule name and resolves every value; any
//! [`ConfigError`] surfaces here, before a single rule has run. Evaluation
//! then runs the planned checks in order and stops at the first rule that
//! fails.

use serde::Serialize;

use crate::annotation::{parse_nested_rules, parse_rules, RuleToken};
use crate::error::{ConfigError, ValidationError};
use crate::message::format_violation;
use crate::record::{resolve, FieldSpec, Record, MAX_RECORD_DEPTH};
use crate::rules::RuleRegistry;
use crate::value::FieldValue;

/// Flow-control token: when the value is zero, the rest of the list is skipped.
const OMIT_EMPTY: &str = "omitempty";

/// Label of the value checked by [`Validator::validate_var`].
const VAR_LABEL: &str = "value";

/// The first rule a record broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Display label of the field; `parent.child` inside nested records.
    pub field: String,
    pub rule: String,
    /// Rule parameter, `""` when the rule takes none.
    pub param: String,
}

impl From<Violation> for ValidationError {
    fn from(violation: Violation) -> Self {
        Self::Invalid {
            message: format_violation(&violation),
            violation,
        }
    }
}

/// One rule list bound to the value it applies to.
struct Check<'r> {
    label: String,
    value: FieldValue<'r>,
    rules: Vec<RuleToken>,
}

/// Validates records against their rule annotations.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: RuleRegistry,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::global().clone())
    }
}

impl Validator {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate `record`, returning the first violation as
    /// [`ValidationError::Invalid`].
    pub fn validate(&self, record: &dyn Record) -> Result<(), ValidationError> {
        match self.first_violation(record)? {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// The first rule `record` breaks, if any.
    ///
    /// Fields are checked in declaration order: a field's own rules, then its
    /// nested-rule entries, then the declared rules of the record it holds.
    pub fn first_violation(&self, record: &dyn Record) -> Result<Option<Violation>, ConfigError> {
        let mut checks = Vec::new();
        self.plan_record(record, None, 0, &mut checks)?;
        tracing::trace!(checks = checks.len(), "Planned record validation");
        self.run(&checks)
    }

    /// Validate a loose value against a simple rule annotation. Violations
    /// are labelled `value`.
    pub fn validate_var(&self, value: &FieldValue<'_>, rules: &str) -> Result<(), ValidationError> {
        let checks = [Check {
            label: VAR_LABEL.to_string(),
            value: value.clone(),
            rules: self.plan_rules(rules)?,
        }];
        match self.run(&checks)? {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }

    /// Run a single rule. `Ok(false)` means the value broke it.
    pub fn check(
        &self,
        value: &FieldValue<'_>,
        rule: &str,
        param: Option<&str>,
    ) -> Result<bool, ConfigError> {
        self.registry.execute(rule, value, param)
    }

    fn plan_record<'r>(
        &self,
        record: &'r dyn Record,
        prefix: Option<&str>,
        depth: usize,
        checks: &mut Vec<Check<'r>>,
    ) -> Result<(), ConfigError> {
        if depth > MAX_RECORD_DEPTH {
            return Err(ConfigError::NestingTooDeep {
                field: prefix.unwrap_or_default().to_string(),
                limit: MAX_RECORD_DEPTH,
            });
        }

        for spec in record.field_specs() {
            let label = match prefix {
                Some(prefix) => format!("{prefix}.{}", spec.label()),
                None => spec.label().to_string(),
            };
            let value = resolve(record, &spec.name)?;

            let rules = self.plan_rules(&spec.rules)?;
            if !rules.is_empty() {
                checks.push(Check {
                    label: label.clone(),
                    value: value.clone(),
                    rules,
                });
            }

            self.plan_nested(spec, &label, &value, checks)?;

            if let FieldValue::Record(child) = value {
                self.plan_record(child, Some(&label), depth + 1, checks)?;
            }
        }
        Ok(())
    }

    /// Checks for the `Field>>rules` entries attached to `spec`. An absent
    /// nested record has only absent fields.
    fn plan_nested<'r>(
        &self,
        spec: &FieldSpec,
        label: &str,
        value: &FieldValue<'r>,
        checks: &mut Vec<Check<'r>>,
    ) -> Result<(), ConfigError> {
        let entries = parse_nested_rules(&spec.nested)?;
        if entries.is_empty() {
            return Ok(());
        }

        let child = match value {
            FieldValue::Record(child) => Some(*child),
            FieldValue::Absent => None,
            other => {
                return Err(ConfigError::domain_mismatch("nested", "record", other.kind()));
            }
        };

        for entry in entries {
            let rules = self.plan_rules(&entry.rules)?;
            let (child_label, child_value) = match child {
                Some(child) => (
                    declared_label(child, &entry.field),
                    resolve(child, &entry.field)?,
                ),
                None => (entry.field.clone(), FieldValue::Absent),
            };
            checks.push(Check {
                label: format!("{label}.{child_label}"),
                value: child_value,
                rules,
            });
        }
        Ok(())
    }

    /// Parse a simple annotation and check that every rule exists and gets
    /// the parameter it expects.
    fn plan_rules(&self, annotation: &str) -> Result<Vec<RuleToken>, ConfigError> {
        let tokens = parse_rules(annotation)?;
        for token in &tokens {
            if token.name == OMIT_EMPTY {
                if let Some(param) = &token.param {
                    return Err(ConfigError::UnexpectedParam {
                        rule: token.name.clone(),
                        param: param.clone(),
                    });
                }
                continue;
            }
            self.registry
                .lookup(&token.name)?
                .check_arity(token.param.as_deref())?;
        }
        Ok(tokens)
    }

    fn run(&self, checks: &[Check<'_>]) -> Result<Option<Violation>, ConfigError> {
        for check in checks {
            for token in &check.rules {
                if token.name == OMIT_EMPTY {
                    if check.value.is_zero() {
                        break;
                    }
                    continue;
                }

                let passed = self
                    .registry
                    .execute(&token.name, &check.value, token.param.as_deref())?;
                if !passed {
                    tracing::debug!(field = %check.label, rule = %token, "Validation failed");
                    return Ok(Some(Violation {
                        field: check.label.clone(),
                        rule: token.name.clone(),
                        param: token.param_str().to_string(),
                    }));
                }
            }
        }
        Ok(None)
    }
}

/// Label of `field` as declared by `record`, or the bare name when the record
/// declares nothing about it.
fn declared_label(record: &dyn Record, field: &str) -> String {
    record
        .field_specs()
        .iter()
        .find(|spec| spec.name == field)
        .map_or(field, FieldSpec::label)
        .to_string()
}

/// Validate `record` with the built-in rules.
pub fn validate(record: &dyn Record) -> Result<(), ValidationError> {
    Validator::default().validate(record)
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use assert_matches::assert_matches;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::record::FieldTable;

    struct Item {
        id: i64,
        locale: String,
    }

    struct Data {
        id: i64,
        item: Item,
    }

    static ITEM_FIELDS: LazyLock<FieldTable<Item>> = LazyLock::new(|| {
        FieldTable::<Item>::new()
            .field(FieldSpec::new("ID").alias("id"), |item| item.id.into())
            .field(
                FieldSpec::new("Locale").alias("locale").rules("omitempty,isLocale"),
                |item| (&item.locale).into(),
            )
    });

    static DATA_FIELDS: LazyLock<FieldTable<Data>> = LazyLock::new(|| {
        FieldTable::<Data>::new()
            .field(FieldSpec::new("ID").alias("id").rules("gt=0"), |data| {
                data.id.into()
            })
            .field(
                FieldSpec::new("Item")
                    .alias("item")
                    .nested("ID>>gt=0;Locale>>required,len=2"),
                |data| FieldValue::Record(&data.item),
            )
    });

    impl Record for Item {
        fn field_specs(&self) -> &[FieldSpec] {
            ITEM_FIELDS.specs()
        }

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            ITEM_FIELDS.get(self, name)
        }
    }

    impl Record for Data {
        fn field_specs(&self) -> &[FieldSpec] {
            DATA_FIELDS.specs()
        }

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            DATA_FIELDS.get(self, name)
        }
    }

    fn data(id: i64, item_id: i64, locale: &str) -> Data {
        Data {
            id,
            item: Item {
                id: item_id,
                locale: locale.to_string(),
            },
        }
    }

    /// A record whose `Me` field refers back to itself.
    struct Looped {
        id: i64,
    }

    static LOOPED_FIELDS: LazyLock<FieldTable<Looped>> = LazyLock::new(|| {
        FieldTable::<Looped>::new()
            .field(FieldSpec::new("ID").rules("gt=0"), |looped| looped.id.into())
            .field(FieldSpec::new("Me"), |looped| FieldValue::Record(looped))
    });

    impl Record for Looped {
        fn field_specs(&self) -> &[FieldSpec] {
            LOOPED_FIELDS.specs()
        }

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            LOOPED_FIELDS.get(self, name)
        }
    }

    /// Record with declared fields over a JSON object.
    struct Fixture {
        specs: Vec<FieldSpec>,
        values: Map<String, Value>,
    }

    impl Fixture {
        fn new(specs: Vec<FieldSpec>, values: Value) -> Self {
            let Value::Object(values) = values else {
                panic!("fixture values must be an object");
            };
            Self { specs, values }
        }
    }

    impl Record for Fixture {
        fn field_specs(&self) -> &[FieldSpec] {
            &self.specs
        }

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            self.specs.iter().find(|spec| spec.name == name)?;
            Some(self.values.get(name).map_or(FieldValue::Absent, FieldValue::from))
        }
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    #[test]
    fn valid_record_passes() {
        assert!(validate(&data(1, 1, "en")).is_ok());
    }

    #[test]
    fn top_level_field_fails_with_alias_label() {
        let err = validate(&data(0, 1, "en")).unwrap_err();
        assert_eq!(err.message(), Some("id: Should be greater than 0"));
        assert_matches!(
            err,
            ValidationError::Invalid { violation, .. } if violation.rule == "gt" && violation.param == "0"
        );
    }

    #[test]
    fn nested_rules_run_in_declaration_order() {
        let err = validate(&data(1, 0, "e")).unwrap_err();
        assert_eq!(err.message(), Some("item.id: Should be greater than 0"));

        let err = validate(&data(1, 1, "e")).unwrap_err();
        assert_eq!(err.message(), Some("item.locale: len"));
    }

    #[test]
    fn nested_record_declared_rules_run_after_nested_entries() {
        let err = validate(&data(1, 1, "xx")).unwrap_err();
        assert_eq!(err.message(), Some("item.locale: isLocale"));
    }

    #[test]
    fn first_violation_reports_structured_result() {
        let violation = Validator::default()
            .first_violation(&data(1, 1, "e"))
            .unwrap();
        assert_eq!(
            violation,
            Some(Violation {
                field: "item.locale".to_string(),
                rule: "len".to_string(),
                param: "2".to_string(),
            })
        );
        assert_eq!(
            Validator::default()
                .first_violation(&data(1, 1, "en"))
                .unwrap(),
            None
        );
    }

    // -----------------------------------------------------------------------
    // Configuration errors
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_rule_is_reported_before_any_rule_runs() {
        let record = Fixture::new(
            vec![
                FieldSpec::new("A").rules("gt=0"),
                FieldSpec::new("B").rules("nope"),
            ],
            json!({"A": 0, "B": 1}),
        );
        assert_matches!(
            validate(&record),
            Err(ValidationError::Config(ConfigError::UnknownRule { rule })) if rule == "nope"
        );
    }

    #[test]
    fn malformed_nested_annotation_is_reported_before_any_rule_runs() {
        let record = Fixture::new(
            vec![
                FieldSpec::new("A").rules("gt=0"),
                FieldSpec::new("B").nested("ID-gt=0"),
            ],
            json!({"A": 0, "B": {"ID": 1}}),
        );
        let err = validate(&record).unwrap_err();
        assert!(!err.is_invalid());
        assert_matches!(err, ValidationError::Config(ConfigError::Grammar(_)));
    }

    #[test]
    fn nested_annotation_on_scalar_is_domain_mismatch() {
        let record = Fixture::new(
            vec![FieldSpec::new("A").nested("ID>>gt=0")],
            json!({"A": 5}),
        );
        assert_matches!(
            validate(&record),
            Err(ValidationError::Config(ConfigError::DomainMismatch { rule, .. })) if rule == "nested"
        );
    }

    #[test]
    fn sequence_rule_on_scalar_aborts_validation() {
        let record = Fixture::new(
            vec![FieldSpec::new("Items").rules("uniqueField=ID")],
            json!({"Items": "not a list"}),
        );
        assert_matches!(
            validate(&record),
            Err(ValidationError::Config(ConfigError::DomainMismatch { .. }))
        );
    }

    #[test]
    fn self_referencing_record_is_a_config_error() {
        let looped = Looped { id: 1 };
        assert_matches!(
            validate(&looped),
            Err(ValidationError::Config(ConfigError::NestingTooDeep { field, limit }))
                if limit == MAX_RECORD_DEPTH && field.starts_with("Me.Me")
        );
    }

    #[test]
    fn self_referencing_records_compare_without_overflow() {
        let a = Looped { id: 1 };
        let b = Looped { id: 1 };
        assert_eq!(FieldValue::Record(&a), FieldValue::Record(&a));
        assert_ne!(FieldValue::Record(&a), FieldValue::Record(&b));
    }

    #[test]
    fn missing_param_is_a_config_error() {
        let record = Fixture::new(vec![FieldSpec::new("A").rules("gt")], json!({"A": 1}));
        assert_matches!(
            validate(&record),
            Err(ValidationError::Config(ConfigError::MissingParam { .. }))
        );
    }

    #[test]
    fn omitempty_takes_no_parameter() {
        assert_matches!(
            Validator::default().validate_var(&FieldValue::Int(1), "omitempty=1"),
            Err(ValidationError::Config(ConfigError::UnexpectedParam { .. }))
        );
    }

    // -----------------------------------------------------------------------
    // Nested values
    // -----------------------------------------------------------------------

    #[test]
    fn absent_nested_record_has_absent_fields() {
        let record = Fixture::new(
            vec![FieldSpec::new("Item").nested("ID>>required")],
            json!({}),
        );
        let err = validate(&record).unwrap_err();
        assert_eq!(err.message(), Some("Item.ID: required"));
    }

    #[test]
    fn nested_json_object_is_checked() {
        let record = Fixture::new(
            vec![FieldSpec::new("Item").nested("Locale>>required;Locale>>isLocale")],
            json!({"Item": {"Locale": "zz"}}),
        );
        let err = validate(&record).unwrap_err();
        assert_eq!(err.message(), Some("Item.Locale: isLocale"));
    }

    #[test]
    fn sequence_rules_on_record_fields() {
        let record = Fixture::new(
            vec![FieldSpec::new("Items")
                .alias("items")
                .rules("uniqueField=ID,atLeastOneField=Locale:ru,isLocaleField=Locale")],
            json!({"Items": [{"ID": 1, "Locale": "en"}, {"ID": 2, "Locale": "ru"}]}),
        );
        assert!(validate(&record).is_ok());

        let record = Fixture::new(
            record.specs.clone(),
            json!({"Items": [{"ID": 1, "Locale": "en"}, {"ID": 1, "Locale": "ru"}]}),
        );
        assert_eq!(
            validate(&record).unwrap_err().message(),
            Some("items: uniqueField")
        );
    }

    // -----------------------------------------------------------------------
    // Ad-hoc values
    // -----------------------------------------------------------------------

    #[test]
    fn validate_var_labels_value() {
        let validator = Validator::default();
        let err = validator
            .validate_var(&FieldValue::Int(11), "gte=1,lte=10")
            .unwrap_err();
        assert_eq!(err.message(), Some("value: Should be less than or equal to 10"));
        assert_eq!(
            err.to_string(),
            "Input validation error: value: Should be less than or equal to 10"
        );
    }

    #[test]
    fn validate_var_on_sequences() {
        let items = json!([{"Locale": "en"}, {"Locale": ""}]);
        let err = Validator::default()
            .validate_var(&FieldValue::from(&items), "isLocaleField=Locale")
            .unwrap_err();
        assert_eq!(err.message(), Some("value: isLocaleField"));
    }

    #[test]
    fn omitempty_skips_zero_values() {
        let validator = Validator::default();
        assert!(validator
            .validate_var(&FieldValue::Str(""), "omitempty,isLocale")
            .is_ok());
        assert!(validator
            .validate_var(&FieldValue::Absent, "omitempty,gt=0")
            .is_ok());
        assert!(validator
            .validate_var(&FieldValue::Str("xx"), "omitempty,isLocale")
            .is_err());
    }

    #[test]
    fn check_runs_a_single_rule() {
        let validator = Validator::default();
        assert!(validator.check(&FieldValue::Int(1), "gt", Some("0")).unwrap());
        assert!(!validator.check(&FieldValue::Int(0), "gt", Some("0")).unwrap());
        assert_matches!(
            validator.check(&FieldValue::Int(0), "nope", None),
            Err(ConfigError::UnknownRule { .. })
        );
    }

    #[test]
    fn custom_registry_is_used() {
        let registry = RuleRegistry::builder()
            .register("even", crate::rules::Arity::None, |value, _| {
                Ok(matches!(value, FieldValue::Int(n) if n % 2 == 0))
            })
            .build();
        let validator = Validator::new(registry);
        assert!(validator.validate_var(&FieldValue::Int(4), "even,gt=0").is_ok());
        assert_eq!(
            validator
                .validate_var(&FieldValue::Int(3), "even")
                .unwrap_err()
                .message(),
            Some("value: even")
        );
    }
}
