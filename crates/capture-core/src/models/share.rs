use serde::{Deserialize, Serialize};

/// Normalized result of one share event, handed to exactly one consumer.
///
/// `text` distinguishes absent (`None`) from the empty string: a bare-URL share
/// carries `Some("")` so the consumer can tell a link share from nothing at all.
/// `file_paths` holds absolute paths of staged files in the order their
/// attachments were received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub text: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

impl SharePayload {
    /// Canonical empty payload, the state after a consumer fetch
    pub fn empty() -> Self {
        Self::default()
    }

    /// Payload for a text share
    pub fn from_text(text: impl Into<String>, url: Option<String>) -> Self {
        Self {
            text: Some(text.into()),
            url,
            file_paths: Vec::new(),
        }
    }

    /// Payload for an attachment share
    pub fn from_files(file_paths: Vec<String>) -> Self {
        Self {
            text: None,
            url: None,
            file_paths,
        }
    }

    /// True for the canonical empty payload
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.url.is_none() && self.file_paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload() {
        let payload = SharePayload::empty();
        assert!(payload.is_empty());
        assert_eq!(payload, SharePayload::default());
    }

    #[test]
    fn test_empty_text_is_not_empty_payload() {
        let payload = SharePayload::from_text("", Some("https://example.com".to_string()));
        assert!(!payload.is_empty());
        assert_eq!(payload.text.as_deref(), Some(""));
    }

    #[test]
    fn test_serializes_with_consumer_field_names() {
        let payload = SharePayload::from_files(vec!["/tmp/a.png".to_string()]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": null, "url": null, "filePaths": ["/tmp/a.png"] })
        );
    }

    #[test]
    fn test_deserializes_without_file_paths() {
        let payload: SharePayload =
            serde_json::from_str(r#"{ "text": "hi", "url": null }"#).unwrap();
        assert_eq!(payload, SharePayload::from_text("hi", None));
    }
}
