//! Forgiving field deserializers for provider-authored JSON.
//!
//! The provider is asked for a shape, not held to it. These helpers never
//! reject a value: wrong types are coerced or replaced with an empty value,
//! so a JSON-valid payload always normalizes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Any scalar as text. `null` becomes `""`; arrays and objects keep their JSON text.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

/// Like [`string`], but blank and `null` become `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = value_to_string(Value::deserialize(deserializer)?);
    Ok(Some(text).filter(|s| !s.trim().is_empty()))
}

/// Counts such as `1200`, `"1200"`, `"1,200+"` or `1200.4`. Anything else is `0`.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .unwrap_or(0),
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    })
}

pub fn id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    count(deserializer).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

/// Ratings such as `4.5` or `"4.5"`.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// A list of strings. A single string becomes a one-element list.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(value_to_string)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Probe {
        #[serde(deserialize_with = "string")]
        text: String,
        #[serde(deserialize_with = "opt_string")]
        maybe: Option<String>,
        #[serde(deserialize_with = "count")]
        total: u64,
        #[serde(deserialize_with = "opt_number")]
        rating: Option<f64>,
        #[serde(deserialize_with = "string_list")]
        items: Vec<String>,
    }

    #[test]
    fn coerces_mismatched_types() {
        let probe: Probe = serde_json::from_value(json!({
            "text": 42,
            "maybe": "   ",
            "total": "1,200+",
            "rating": "4.5",
            "items": "Aadhaar Card"
        }))
        .unwrap();

        assert_eq!(probe.text, "42");
        assert_eq!(probe.maybe, None);
        assert_eq!(probe.total, 1200);
        assert_eq!(probe.rating, Some(4.5));
        assert_eq!(probe.items, vec!["Aadhaar Card".to_string()]);
    }

    #[test]
    fn missing_and_null_fields_become_empty() {
        let probe: Probe = serde_json::from_value(json!({ "text": null, "items": null })).unwrap();

        assert_eq!(probe.text, "");
        assert_eq!(probe.total, 0);
        assert!(probe.rating.is_none());
        assert!(probe.items.is_empty());
    }

    #[test]
    fn fractional_counts_round() {
        let probe: Probe = serde_json::from_value(json!({ "total": 1199.6 })).unwrap();
        assert_eq!(probe.total, 1200);
    }
}
