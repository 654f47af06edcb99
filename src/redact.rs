use serde_json::Value;

/// Marker substituted for redacted values.
pub const REDACTED: &str = "***REDACTED***";

/// A key is sensitive when its lower-cased form contains any of these
/// substrings, so `ApiKey`, `refresh_token` and `x-authorization` all match.
const SENSITIVE_KEY_PARTS: &[&str] = &[
    "password",
    "token",
    "secret",
    "key",
    "apikey",
    "accesstoken",
    "authorization",
];

/// Returns a copy of `value` with sensitive fields replaced by [`REDACTED`].
///
/// Arrays are sanitized element-wise and objects key-wise. A matching key
/// has its value replaced with the marker regardless of the value's type;
/// other leaves pass through unchanged. The input is never mutated.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String(REDACTED.to_owned()))
                    } else {
                        (key.clone(), sanitize(value))
                    }
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_KEY_PARTS.iter().any(|part| lowered.contains(part))
}
