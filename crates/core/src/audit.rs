//! Audit event constants and metadata redaction.
//!
//! Audit entries are best-effort side effects of access decisions; these
//! helpers are shared by the access gate and the storage implementations.

/// Known audit event types.
pub mod event_types {
    pub const UNAUTHORIZED_ACCESS: &str = "unauthorized_access";
    pub const ACCESS_REDIRECT: &str = "access_redirect";
    pub const ACCESS_DENIED: &str = "access_denied";
}

/// Known audit entry statuses. An access-gate status is the decision outcome.
pub mod statuses {
    pub const ALLOW: &str = "allow";
    pub const DENY: &str = "deny";
    pub const REDIRECT: &str = "redirect";
}

/// Fields whose values never reach the audit table.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "authorization",
    "api_key",
    "session",
    "cookie",
];

/// Replace the value of any key containing a [`SENSITIVE_FIELDS`] entry
/// with `"[REDACTED]"`, recursively.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn redacts_nested_sensitive_keys() {
        let input = json!({
            "path": "/admin",
            "context": { "Authorization": "Bearer abc", "referrer": "/dashboard" },
            "attempts": [{ "session_id": "s1" }],
        });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["path"], "/admin");
        assert_eq!(out["context"]["Authorization"], "[REDACTED]");
        assert_eq!(out["context"]["referrer"], "/dashboard");
        assert_eq!(out["attempts"][0]["session_id"], "[REDACTED]");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(redact_sensitive_fields(&json!(42)), json!(42));
        assert_eq!(redact_sensitive_fields(&json!(null)), json!(null));
    }
}
