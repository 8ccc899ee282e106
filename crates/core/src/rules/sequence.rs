//! Rules over every element of a sequence of records.
//!
//! The parameter names a field of the element record:
//!
//! ```text
//! uniqueField=Locale          no two elements share a Locale
//! atLeastOneField=Locale:ru   some element has Locale "ru"
//! isLocaleField=Locale        every Locale is a known language code
//! ```

use super::registry::RuleArgs;
use crate::error::ConfigError;
use crate::locale::is_locale_code;
use crate::record::resolve_each;
use crate::value::FieldValue;

/// Parameter naming a field of the element record.
fn element_field<'p>(args: &RuleArgs<'p>) -> Result<&'p str, ConfigError> {
    if args.param.is_empty() {
        return Err(ConfigError::invalid_param(
            args.rule,
            args.param,
            "expected a field name",
        ));
    }
    Ok(args.param)
}

/// Fails when two elements have equal values for the field, absent values
/// included.
pub(super) fn unique_field(
    value: &FieldValue<'_>,
    args: &RuleArgs<'_>,
) -> Result<bool, ConfigError> {
    let field = element_field(args)?;
    let values = resolve_each(value, args.rule, field)?;

    let duplicate = values
        .iter()
        .enumerate()
        .any(|(i, current)| values[..i].contains(current));
    Ok(!duplicate)
}

/// Passes when at least one element's field renders exactly to the expected
/// text. The parameter is `field:expected`.
pub(super) fn at_least_one_field(
    value: &FieldValue<'_>,
    args: &RuleArgs<'_>,
) -> Result<bool, ConfigError> {
    let parts: Vec<&str> = args.param.split(':').collect();
    let [field, expected] = parts.as_slice() else {
        return Err(ConfigError::invalid_param(
            args.rule,
            args.param,
            "expected `field:value`",
        ));
    };
    if field.is_empty() {
        return Err(ConfigError::invalid_param(
            args.rule,
            args.param,
            "expected a field name before `:`",
        ));
    }

    let values = resolve_each(value, args.rule, field)?;
    Ok(values.iter().any(|v| v.to_string() == *expected))
}

/// Passes when every element's field is a string in the locale table.
pub(super) fn is_locale_field(
    value: &FieldValue<'_>,
    args: &RuleArgs<'_>,
) -> Result<bool, ConfigError> {
    let field = element_field(args)?;
    let values = resolve_each(value, args.rule, field)?;

    Ok(values
        .iter()
        .all(|v| v.as_str().is_some_and(is_locale_code)))
}
