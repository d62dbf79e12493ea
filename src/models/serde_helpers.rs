//! Serde helpers for the JS-facing and persisted JSON shapes

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicitly null"
///
/// Use together with `#[serde(default)]`: an absent field stays `None`,
/// `null` becomes `Some(None)`, and a value becomes `Some(Some(v))`.
pub fn deserialize_explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Debug)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_explicit_null")]
        comment: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"comment":null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"comment":"note"}"#).unwrap();

        assert_eq!(absent.comment, None);
        assert_eq!(null.comment, Some(None));
        assert_eq!(value.comment, Some(Some("note".to_string())));
    }
}
