use std::path::PathBuf;
use std::sync::LazyLock;

use capture_core::error::log_absorbed;
use capture_core::{MediaKind, SharePayload};
use capture_storage::{ContentStager, StagingError};
use regex::Regex;

use crate::classifier::TypeClassifier;
use crate::error::ClassificationError;
use crate::event::{Attachment, IntakeEvent};

/// Any Unicode whitespace (including U+00A0) ends the URL.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// What happened to a single attachment.
///
/// Consumers only ever see staged paths; the other variants exist so the
/// reason an attachment went missing can be logged and tested.
#[derive(Debug)]
pub enum AttachmentOutcome {
    Staged { path: PathBuf, kind: MediaKind },
    Rejected(ClassificationError),
    Failed(StagingError),
}

impl AttachmentOutcome {
    pub fn staged_path(&self) -> Option<&PathBuf> {
        match self {
            AttachmentOutcome::Staged { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Builds the normalized payload for one intake event
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    stager: ContentStager,
}

impl PayloadBuilder {
    pub fn new(stager: ContentStager) -> Self {
        Self { stager }
    }

    pub fn stager(&self) -> &ContentStager {
        &self.stager
    }

    /// Build the payload for `event`, silently dropping attachments that are
    /// unsupported or fail to stage
    pub async fn build(&self, event: IntakeEvent) -> SharePayload {
        self.build_with_outcomes(event).await.0
    }

    /// Build the payload and report the outcome of every attachment, in order
    pub async fn build_with_outcomes(
        &self,
        event: IntakeEvent,
    ) -> (SharePayload, Vec<AttachmentOutcome>) {
        match event {
            IntakeEvent::SingleText { text, subject } => {
                (Self::build_text(text, subject), Vec::new())
            }
            IntakeEvent::SingleAttachment(attachment) => {
                self.build_attachments(vec![attachment]).await
            }
            IntakeEvent::MultipleAttachments(items) => self.build_attachments(items).await,
        }
    }

    /// Text share rules.
    ///
    /// Text that starts with `http://` or `https://` becomes the URL and leaves
    /// the text empty; a subject, if given, then labels the link. Any other text
    /// is kept as-is and the first embedded URL, if any, is extracted alongside.
    pub fn build_text(text: String, subject: Option<String>) -> SharePayload {
        let (mut text, url) = if text.starts_with("http://") || text.starts_with("https://") {
            (String::new(), Some(text))
        } else {
            let url = URL_PATTERN.find(&text).map(|m| m.as_str().to_string());
            (text, url)
        };

        if let Some(subject) = subject {
            if text.is_empty() {
                text = subject;
            }
        }

        SharePayload::from_text(text, url)
    }

    async fn build_attachments(
        &self,
        items: Vec<Attachment>,
    ) -> (SharePayload, Vec<AttachmentOutcome>) {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            outcomes.push(self.stage_attachment(item).await);
        }

        let file_paths = outcomes
            .iter()
            .filter_map(AttachmentOutcome::staged_path)
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        (SharePayload::from_files(file_paths), outcomes)
    }

    /// Classify and stage one attachment; failures are logged and returned, never raised
    pub async fn stage_attachment(&self, attachment: Attachment) -> AttachmentOutcome {
        let Attachment { mime, source } = attachment;

        let (extension, kind) = match TypeClassifier::classify(mime.as_deref()) {
            Ok(resolved) => resolved,
            Err(e) => {
                log_absorbed(&e, "Dropping shared attachment");
                return AttachmentOutcome::Rejected(e);
            }
        };

        match self.stager.stage(source, Some(extension)).await {
            Ok(path) => AttachmentOutcome::Staged { path, kind },
            Err(e) => {
                log_absorbed(&e, "Dropping shared attachment");
                AttachmentOutcome::Failed(e)
            }
        }
    }
}
