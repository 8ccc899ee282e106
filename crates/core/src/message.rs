//! User-facing violation messages.

use crate::validator::Violation;

/// Message text for a broken rule.
///
/// Ordering rules get a sentence; every other rule is reported by name.
pub fn rule_message(rule: &str, param: &str) -> String {
    match rule {
        "lte" => format!("Should be less than or equal to {param}"),
        "lt" => format!("Should be less than {param}"),
        "gte" => format!("Should be greater than or equal to {param}"),
        "gt" => format!("Should be greater than {param}"),
        other => other.to_string(),
    }
}

/// `"{label}: {message}"` for a violation.
pub fn format_violation(violation: &Violation) -> String {
    format!(
        "{}: {}",
        violation.field,
        rule_message(&violation.rule, &violation.param)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(field: &str, rule: &str, param: &str) -> Violation {
        Violation {
            field: field.to_string(),
            rule: rule.to_string(),
            param: param.to_string(),
        }
    }

    #[test]
    fn ordering_rules_get_sentences() {
        assert_eq!(rule_message("lte", "10"), "Should be less than or equal to 10");
        assert_eq!(rule_message("lt", "10"), "Should be less than 10");
        assert_eq!(rule_message("gte", "1"), "Should be greater than or equal to 1");
        assert_eq!(rule_message("gt", "0"), "Should be greater than 0");
    }

    #[test]
    fn other_rules_fall_back_to_name() {
        assert_eq!(rule_message("required", ""), "required");
        assert_eq!(rule_message("isLocaleField", "Locale"), "isLocaleField");
    }

    #[test]
    fn formats_label_and_message() {
        assert_eq!(
            format_violation(&violation("id", "gt", "0")),
            "id: Should be greater than 0"
        );
        assert_eq!(
            format_violation(&violation("item.Locale", "required", "")),
            "item.Locale: required"
        );
    }
}
