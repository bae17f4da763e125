//! Parameter dictionary comparison.
//!
//! # Purpose
//! Stream definition schemas are opaque JSON documents. The only operation the
//! topology service needs is equality, used to deduplicate definitions that are
//! created twice under the same name.
use serde_json::Value;

pub struct ParameterDictionaryComparator;

impl ParameterDictionaryComparator {
    /// Structural equality of two parameter dictionaries.
    ///
    /// A missing (`null`) dictionary is the same as an empty one. Object key
    /// order is irrelevant.
    ///
    /// ```
    /// use serde_json::json;
    /// use topology::schema::ParameterDictionaryComparator;
    ///
    /// assert!(ParameterDictionaryComparator::equivalent(
    ///     &json!({"temp": "f32", "time": "i64"}),
    ///     &json!({"time": "i64", "temp": "f32"}),
    /// ));
    /// assert!(ParameterDictionaryComparator::equivalent(&json!(null), &json!({})));
    /// ```
    pub fn equivalent(left: &Value, right: &Value) -> bool {
        normalize(left) == normalize(right)
    }
}

fn normalize(value: &Value) -> &Value {
    static EMPTY: std::sync::OnceLock<Value> = std::sync::OnceLock::new();
    match value {
        Value::Null => EMPTY.get_or_init(|| Value::Object(serde_json::Map::new())),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn different_dictionaries_are_not_equivalent() {
        assert!(!ParameterDictionaryComparator::equivalent(
            &json!({"temp": "f32"}),
            &json!({"temp": "f64"}),
        ));
        assert!(!ParameterDictionaryComparator::equivalent(
            &json!(null),
            &json!({"temp": "f32"}),
        ));
    }

    #[test]
    fn nested_values_compare_structurally() {
        let a = json!({"temp": {"units": "C", "fill": -9999}, "order": [1, 2]});
        let b = json!({"order": [1, 2], "temp": {"fill": -9999, "units": "C"}});
        assert!(ParameterDictionaryComparator::equivalent(&a, &b));
        let c = json!({"order": [2, 1], "temp": {"fill": -9999, "units": "C"}});
        assert!(!ParameterDictionaryComparator::equivalent(&a, &c));
    }
}
