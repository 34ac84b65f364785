use super::{Condition, ConditionRule, Visibility};
use serde_json::Value;

/// Flattens one mode of a visibility specification into conditions.
///
/// A field holding a mapping expands one level into `field.sub` paths; any other value
/// becomes a condition on the field itself. A missing or non-mapping mode yields nothing.
pub fn conditions_for(display_options: &Value, visibility: Visibility) -> Vec<Condition> {
    let Some(fields) = display_options
        .get(visibility.key())
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    let mut conditions = Vec::new();
    for (field, value) in fields {
        match value {
            Value::Object(nested) => {
                for (sub_field, sub_value) in nested {
                    conditions.push(Condition::new(format!("{}.{}", field, sub_field), sub_value));
                }
            }
            other => conditions.push(Condition::new(field.as_str(), other)),
        }
    }
    conditions
}

/// Converts a `{show?, hide?}` specification into at most two rules, show first.
///
/// A mode with no fields emits no rule. Malformed input degrades to fewer rules and
/// never fails.
pub fn rules_from_display_options(display_options: &Value, target: Option<&str>) -> Vec<ConditionRule> {
    if !display_options.is_object() {
        return Vec::new();
    }

    Visibility::ALL
        .into_iter()
        .filter_map(|visibility| {
            let conditions = conditions_for(display_options, visibility);
            (!conditions.is_empty()).then(|| ConditionRule {
                conditions,
                visibility,
                target: target.map(str::to_string),
            })
        })
        .collect()
}
