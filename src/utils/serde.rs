/*!
 * Serde helpers for the loosely-typed provider payloads.
 *
 * The dining provider is not strict about its JSON: lists come back as
 * `null` when a venue has nothing published, and identifiers are usually
 * strings but occasionally bare numbers.
 */

use serde::{Deserialize, Deserializer};

/// Deserialize a value that may be `null`, falling back to `Default`.
///
/// `#[serde(default)]` alone only covers a missing key; an explicit `null`
/// still fails for `Vec<T>`. Pair both:
///
/// ```rust
/// use serde::Deserialize;
/// use menu_sync::utils::serde::deserialize_null_default;
///
/// #[derive(Deserialize)]
/// struct Category {
///     #[serde(default, deserialize_with = "deserialize_null_default")]
///     items: Vec<String>,
/// }
///
/// let category: Category = serde_json::from_str(r#"{"items": null}"#).unwrap();
/// assert!(category.items.is_empty());
/// ```
pub fn deserialize_null_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Deserialize an identifier that may be represented as a string or a number.
pub fn deserialize_string_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "Expected string or numeric identifier, found: {other}"
        ))),
    }
}
