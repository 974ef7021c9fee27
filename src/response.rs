use crate::error::{ApiError, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Pagination metadata attached to collection responses.
///
/// Page size and total are backend-authoritative; nothing in this crate
/// assumes a fixed page size.
#[derive(Debug, Clone, Deserialize)]
pub struct ListMeta {
    /// Total number of matching items across all pages
    pub total: i64,

    /// Current page number
    #[serde(default)]
    pub page: Option<i64>,

    /// Items per page
    #[serde(default)]
    pub max_results: Option<i64>,
}

/// Collection envelope returned by list endpoints:
/// `{"_items": [...], "_meta": {"total": N, ...}}`.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "_items")]
    items: Option<Vec<T>>,

    #[serde(rename = "_meta")]
    meta: Option<ListMeta>,
}

/// An unwrapped item sequence paired with its backend-reported total,
/// for paginated tables.
#[derive(Debug)]
pub struct DataWithMeta<T> {
    pub data: Vec<T>,
    pub total: i64,
}

impl<T> Collection<T> {
    /// Unwrap the item sequence, failing if the `_items` field is absent
    pub fn into_items(self) -> Result<Vec<T>> {
        self.items.ok_or(ApiError::MalformedEnvelope)
    }

    /// Unwrap items plus pagination total; both fields are required
    pub fn into_data_with_meta(self) -> Result<DataWithMeta<T>> {
        let total = self
            .meta
            .as_ref()
            .map(|m| m.total)
            .ok_or(ApiError::MalformedEnvelope)?;
        Ok(DataWithMeta {
            data: self.items.ok_or(ApiError::MalformedEnvelope)?,
            total,
        })
    }
}

/// Convert a non-2xx response into the matching [`ApiError`].
///
/// The backend reports errors in three shapes, all normalized here:
/// - `{"_status":"ERR","_error":{"message":M}}` -- `M` is carried verbatim,
///   whether it is a string or a structured object
/// - any other non-empty body -- carried as its text form
/// - an empty body -- falls back to the HTTP status line
///
/// 404 and 412 are mapped to their dedicated variants first, since callers
/// handle those distinctly (missing item vs. stale etag).
pub fn normalize_error(status: StatusCode, body: &[u8]) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => return ApiError::NotFound,
        StatusCode::PRECONDITION_FAILED => return ApiError::PreconditionFailed,
        _ => {}
    }

    if body.is_empty() {
        return ApiError::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        };
    }

    if let Ok(value) = serde_json::from_slice::<Value>(body) {
        if value.get("_status").and_then(Value::as_str) == Some("ERR") {
            if let Some(message) = value.pointer("/_error/message") {
                return ApiError::Server {
                    message: message.clone(),
                    status: status.as_u16(),
                };
            }
        }
    }

    ApiError::Opaque {
        body: String::from_utf8_lossy(body).into_owned(),
        status: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_deserialization() {
        let body = r#"{"_items": [{"id": 1}, {"id": 2}], "_meta": {"total": 17, "page": 1}}"#;
        let collection: Collection<Value> = serde_json::from_str(body).unwrap();
        let with_meta = collection.into_data_with_meta().unwrap();
        assert_eq!(with_meta.data.len(), 2);
        assert_eq!(with_meta.total, 17);
    }

    #[test]
    fn test_missing_items_is_malformed() {
        let collection: Collection<Value> = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            collection.into_items(),
            Err(ApiError::MalformedEnvelope)
        ));
    }

    #[test]
    fn test_missing_meta_is_malformed_for_paginated_reads() {
        let collection: Collection<Value> =
            serde_json::from_str(r#"{"_items": []}"#).unwrap();
        assert!(matches!(
            collection.into_data_with_meta(),
            Err(ApiError::MalformedEnvelope)
        ));
    }

    #[test]
    fn test_normalize_structured_error() {
        let body = serde_json::to_vec(&json!({
            "_status": "ERR",
            "_error": {"message": "blah"}
        }))
        .unwrap();
        let error = normalize_error(StatusCode::UNAUTHORIZED, &body);
        assert_eq!(error.to_string(), "blah");
        match error {
            ApiError::Server { message, status } => {
                assert_eq!(message, json!("blah"));
                assert_eq!(status, 401);
            }
            other => panic!("expected ApiError::Server, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_structured_error_object_message() {
        let body = serde_json::to_vec(&json!({
            "_status": "ERR",
            "_error": {"message": {"errors": ["x", "y"]}}
        }))
        .unwrap();
        match normalize_error(StatusCode::FORBIDDEN, &body) {
            ApiError::Server { message, .. } => {
                assert_eq!(message, json!({"errors": ["x", "y"]}));
            }
            other => panic!("expected ApiError::Server, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_opaque_error() {
        let error = normalize_error(StatusCode::UNAUTHORIZED, b"an error message");
        assert_eq!(error.to_string(), "an error message");
        assert!(matches!(error, ApiError::Opaque { status: 401, .. }));
    }

    #[test]
    fn test_normalize_empty_body_mentions_status() {
        let error = normalize_error(StatusCode::UNAUTHORIZED, b"");
        assert!(error.to_string().contains("401"));
    }

    #[test]
    fn test_normalize_404_and_412() {
        assert!(matches!(
            normalize_error(StatusCode::NOT_FOUND, b""),
            ApiError::NotFound
        ));
        assert!(matches!(
            normalize_error(StatusCode::PRECONDITION_FAILED, b""),
            ApiError::PreconditionFailed
        ));
    }
}
