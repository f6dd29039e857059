//! Knowledge base loading.
//!
//! One read, no retries. The caller decides whether a failure is fatal
//! (the CLI always aborts before the chat loop starts).

use serde_json::Value;
use skyline_core::error::KnowledgeError;
use std::path::Path;
use tracing::{debug, info};

use crate::document::KnowledgeDocument;

/// Load and validate the knowledge base at `path`.
///
/// - [`KnowledgeError::NotFound`] if the file cannot be read.
/// - [`KnowledgeError::Parse`] if it is not valid JSON or not shaped like a
///   knowledge document.
/// - [`KnowledgeError::Empty`] if it parses to a falsy value (`{}`, `[]`,
///   `null`, `""`, `0`, `false`).
pub fn load(path: impl AsRef<Path>) -> Result<KnowledgeDocument, KnowledgeError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading knowledge base");

    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => KnowledgeError::Parse {
            path: path.to_path_buf(),
            reason: format!("not UTF-8: {e}"),
        },
        _ => KnowledgeError::NotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| KnowledgeError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if is_falsy(&value) {
        return Err(KnowledgeError::Empty {
            path: path.to_path_buf(),
        });
    }

    let document: KnowledgeDocument =
        serde_json::from_value(value).map_err(|e| KnowledgeError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    info!(
        path = %path.display(),
        sections = document.section_count(),
        projects = document.project_count(),
        faqs = document.faq_count(),
        "Knowledge base loaded"
    );

    Ok(document)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_kb(content: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge_base.json");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_valid_document() {
        let (_dir, path) = write_kb(
            br#"{"company_info": {"name": "Skyline Residences"}, "faqs": [{"question": "Q", "answer": "A"}]}"#,
        );
        let doc = load(&path).unwrap();
        assert_eq!(doc.section_count(), 2);
        assert_eq!(doc.faq_count(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load("/nonexistent/knowledge_base.json").unwrap_err();
        assert!(matches!(err, KnowledgeError::NotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, KnowledgeError::NotFound { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let (_dir, path) = write_kb(br#"{"company_info": {"name": "Skyline""#);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let (_dir, path) = write_kb(&[0x7b, 0xff, 0xfe, 0x7d]);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        let (_dir, path) = write_kb(br#"{"projects": "Skyline Heights"}"#);
        let err = load(&path).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[test]
    fn falsy_documents_are_empty() {
        for content in ["{}", "[]", "null", "\"\"", "0", "false"] {
            let (_dir, path) = write_kb(content.as_bytes());
            let err = load(&path).unwrap_err();
            assert!(
                matches!(err, KnowledgeError::Empty { .. }),
                "{content} should be empty, got {err}"
            );
        }
    }

    #[test]
    fn non_object_truthy_document_is_parse_error() {
        let (_dir, path) = write_kb(b"[1, 2, 3]");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }
}
