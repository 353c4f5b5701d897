//! Wire messages exchanged with the dev server.
//!
//! Inbound frames are JSON build-status notifications. The only outbound
//! frame is a `hash-check` request.

use serde::Deserialize;
use serde_json::Value;

/// Kind of an inbound build-status message.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum MessageKind {
    /// A new compile finished without diagnostics.
    #[serde(rename = "content-changed")]
    ContentChanged,
    /// The compile produced errors.
    #[serde(rename = "errors")]
    Errors,
    /// The compile produced warnings only.
    #[serde(rename = "warnings")]
    Warnings,
    /// Build-hash synchronization probe.
    #[serde(rename = "hash-check")]
    HashCheck,
}

/// Build statistics attached to a message.
///
/// Error and warning descriptors are opaque to this crate and passed through
/// to the overlay verbatim.
#[derive(Debug, Default, Deserialize)]
pub struct BuildStats {
    /// Opaque identifier of the compilation output.
    pub hash: Option<String>,
    /// Compile error descriptors.
    #[serde(default)]
    pub errors: Vec<Value>,
    /// Compile warning descriptors.
    #[serde(default)]
    pub warnings: Vec<Value>,
}

/// A decoded inbound message.
#[derive(Debug, Deserialize)]
pub struct BuildMessage {
    /// Declared message kind.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Build statistics.
    #[serde(default)]
    pub stats: BuildStats,
}

impl BuildMessage {
    /// Effective kind after reclassifying `content-changed` notifications
    /// that carry compile diagnostics. Errors take precedence over warnings.
    #[must_use]
    pub fn effective_kind(&self) -> MessageKind {
        if self.kind == MessageKind::ContentChanged {
            if !self.stats.errors.is_empty() {
                return MessageKind::Errors;
            }
            if !self.stats.warnings.is_empty() {
                return MessageKind::Warnings;
            }
        }
        self.kind
    }

    /// Incoming build hash, normalized: an empty string counts as absent.
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        self.stats.hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// Render the outbound hash-check request frame.
pub(crate) fn hash_check_request() -> String {
    serde_json::json!({ "type": "hash-check" }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_content_changed() {
        let msg: BuildMessage =
            serde_json::from_str(r#"{"type":"content-changed","stats":{"hash":"abc"}}"#).unwrap();

        assert_eq!(msg.kind, MessageKind::ContentChanged);
        assert_eq!(msg.hash(), Some("abc"));
        assert!(msg.stats.errors.is_empty());
    }

    #[test]
    fn test_decode_missing_stats() {
        let msg: BuildMessage = serde_json::from_str(r#"{"type":"hash-check"}"#).unwrap();

        assert_eq!(msg.kind, MessageKind::HashCheck);
        assert_eq!(msg.hash(), None);
    }

    #[test]
    fn test_empty_hash_counts_as_absent() {
        let msg: BuildMessage =
            serde_json::from_str(r#"{"type":"content-changed","stats":{"hash":""}}"#).unwrap();

        assert_eq!(msg.hash(), None);
    }

    #[test]
    fn test_reclassify_errors() {
        let msg: BuildMessage = serde_json::from_str(
            r#"{"type":"content-changed","stats":{"hash":"abc","errors":["boom"]}}"#,
        )
        .unwrap();

        assert_eq!(msg.effective_kind(), MessageKind::Errors);
    }

    #[test]
    fn test_reclassify_warnings() {
        let msg: BuildMessage = serde_json::from_str(
            r#"{"type":"content-changed","stats":{"hash":"abc","warnings":["careful"]}}"#,
        )
        .unwrap();

        assert_eq!(msg.effective_kind(), MessageKind::Warnings);
    }

    #[test]
    fn test_reclassify_errors_take_precedence() {
        let msg: BuildMessage = serde_json::from_str(
            r#"{"type":"content-changed","stats":{"errors":["boom"],"warnings":["careful"]}}"#,
        )
        .unwrap();

        assert_eq!(msg.effective_kind(), MessageKind::Errors);
    }

    #[test]
    fn test_native_kinds_not_reclassified() {
        // A native warnings message with an empty list keeps its kind.
        let msg: BuildMessage =
            serde_json::from_str(r#"{"type":"warnings","stats":{"warnings":[]}}"#).unwrap();

        assert_eq!(msg.effective_kind(), MessageKind::Warnings);
    }

    #[test]
    fn test_hash_check_request_shape() {
        let value: serde_json::Value = serde_json::from_str(&hash_check_request()).unwrap();

        assert_eq!(value, serde_json::json!({ "type": "hash-check" }));
    }
}
