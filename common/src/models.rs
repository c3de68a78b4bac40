use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Methods the store understands, in the order the UI offers them.
pub const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];

/// Prefix of client-assigned ids for definitions not yet saved to the store.
pub const PROVISIONAL_PREFIX: &str = "new-";

pub const DEFAULT_RESPONSE_BODY: &str = r#"{"code": 200, "data": {}, "message": "success"}"#;

fn default_method() -> String {
    "GET".to_string()
}

/// One mock API definition as the store serializes it. Logs are not part of
/// the list payload; they are fetched per definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(rename = "responseBody", default)]
    pub response_body: String,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: String,
}

impl Definition {
    /// A fresh unsaved definition: provisional id, GET with its default
    /// headers, and the caller's canned response body. The store assigns the
    /// persistent id and timestamp on first save.
    pub fn draft(response_body: &str) -> Self {
        Self {
            id: format!("{}{}", PROVISIONAL_PREFIX, uuid::Uuid::new_v4()),
            name: String::new(),
            method: "GET".to_string(),
            url: String::new(),
            headers: default_headers("GET"),
            response_body: response_body.to_string(),
            updated_at: now_timestamp(),
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.id.starts_with(PROVISIONAL_PREFIX)
    }
}

/// Headers a new definition starts with, keyed by method. Write methods also
/// get a Content-Type.
pub fn default_headers(method: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    if method == "POST" || method == "PUT" {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }
    headers
}

/// Timestamps are exchanged as plain `YYYY-MM-DD HH:MM:SS` strings.
pub fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// One recorded invocation of a definition's mock endpoint. Read-only from
/// the UI; the store appends and clears them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "statusCode", default)]
    pub status_code: u16,
    #[serde(rename = "requestBody", default)]
    pub request_body: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LogEntry {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_uses_store_field_names() {
        let def = Definition {
            id: "1".to_string(),
            name: "Ping".to_string(),
            method: "GET".to_string(),
            url: "/ping".to_string(),
            headers: HashMap::new(),
            response_body: "{}".to_string(),
            updated_at: "2025-01-01 00:00:00".to_string(),
        };
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains(r#""responseBody":"{}""#));
        assert!(json.contains(r#""updatedAt":"2025-01-01 00:00:00""#));
        assert!(!json.contains("response_body"));
    }

    #[test]
    fn definition_decodes_with_missing_fields() {
        let def: Definition = serde_json::from_str(r#"{"id":"7"}"#).unwrap();
        assert_eq!(def.id, "7");
        assert_eq!(def.method, "GET");
        assert!(def.name.is_empty());
        assert!(def.headers.is_empty());
    }

    #[test]
    fn definition_ignores_embedded_logs() {
        let def: Definition =
            serde_json::from_str(r#"{"id":"7","logs":[{"statusCode":200}],"createdAt":"x"}"#)
                .unwrap();
        assert_eq!(def.id, "7");
    }

    #[test]
    fn draft_is_provisional_with_get_defaults() {
        let draft = Definition::draft(DEFAULT_RESPONSE_BODY);
        assert!(draft.is_provisional());
        assert_eq!(draft.method, "GET");
        assert!(draft.name.is_empty());
        assert!(draft.url.is_empty());
        assert_eq!(
            draft.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert!(!draft.headers.contains_key("Content-Type"));
        assert_eq!(draft.response_body, DEFAULT_RESPONSE_BODY);
        assert!(!draft.updated_at.is_empty());
    }

    #[test]
    fn drafts_get_distinct_ids() {
        let a = Definition::draft("{}");
        let b = Definition::draft("{}");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn default_headers_per_method() {
        for method in METHODS {
            let headers = default_headers(method);
            assert_eq!(
                headers.get("Accept").map(String::as_str),
                Some("application/json"),
                "{method}"
            );
            let wants_content_type = method == "POST" || method == "PUT";
            assert_eq!(headers.contains_key("Content-Type"), wants_content_type, "{method}");
        }
    }

    #[test]
    fn log_entry_success_is_exactly_200() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"method":"GET","url":"/x","statusCode":200,"timestamp":"t"}"#,
        )
        .unwrap();
        assert!(entry.is_success());

        let entry: LogEntry = serde_json::from_str(
            r#"{"method":"GET","url":"/x","statusCode":201,"timestamp":"t"}"#,
        )
        .unwrap();
        assert!(!entry.is_success());
    }

    #[test]
    fn log_entry_optional_fields() {
        let entry: LogEntry = serde_json::from_str(
            r#"{"method":"POST","url":"/x","statusCode":405,"timestamp":"t","requestBody":"{}","error":"boom"}"#,
        )
        .unwrap();
        assert_eq!(entry.request_body.as_deref(), Some("{}"));
        assert_eq!(entry.error.as_deref(), Some("boom"));
    }
}
