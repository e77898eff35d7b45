//! Props: a shallow string-keyed map of JSON values.

use serde_json::Value;

/// Component props.
pub type Props = serde_json::Map<String, Value>;

/// Build a [`Props`] map from `key => value` pairs.
///
/// ```
/// use trellis::props;
/// let p = props! { "text" => "Start", "disabled" => false };
/// assert_eq!(p["text"], "Start");
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::component::Props::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::component::Props::new();
        $( map.insert(::std::string::String::from($key), $crate::serde_json::Value::from($value)); )+
        map
    }};
}

/// Shallow merge: `base`, then each layer in order; later keys win.
pub fn merge<'a>(base: &Props, layers: impl IntoIterator<Item = &'a Props>) -> Props {
    let mut merged = base.clone();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Render a prop value as display text: strings verbatim, `null` as empty,
/// everything else through its JSON form.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Truthiness used for boolean props.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn props_macro_builds_map() {
        let p = props! { "a" => 1, "b" => "x", "c" => true };
        assert_eq!(Value::Object(p), json!({ "a": 1, "b": "x", "c": true }));
        assert!(props!().is_empty());
    }

    #[test]
    fn merge_is_shallow_and_later_wins() {
        let defaults = props! { "text" => "Button", "style" => json!({ "a": 1, "b": 2 }) };
        let current = props! { "text" => "Start" };
        let partial = props! { "style" => json!({ "a": 9 }) };
        let merged = merge(&defaults, [&current, &partial]);
        assert_eq!(
            Value::Object(merged),
            json!({ "text": "Start", "style": { "a": 9 } })
        );
    }

    #[test]
    fn display_values() {
        assert_eq!(display(&json!("hi")), "hi");
        assert_eq!(display(&json!(3)), "3");
        assert_eq!(display(&Value::Null), "");
    }

    #[test]
    fn truthiness() {
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!("x")));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&Value::Null));
    }
}
