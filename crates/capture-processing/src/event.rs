//! Share intake events
//!
//! [`RawShareIntent`] is the trigger as the host delivers it. [`IntakeEvent`]
//! is the classified form the payload builder works on: a share is either
//! text-only or attachment-bearing, never both.

use std::fmt;
use std::str::FromStr;

use capture_storage::SourceHandle;

/// One attachment handed over by another application
pub struct Attachment {
    /// Declared content type, if the sender provided one
    pub mime: Option<String>,
    pub source: Box<dyn SourceHandle>,
}

impl Attachment {
    pub fn new(mime: Option<String>, source: impl SourceHandle + 'static) -> Self {
        Self {
            mime,
            source: Box::new(source),
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("mime", &self.mime)
            .field("source", &self.source.describe())
            .finish()
    }
}

/// A classified share event
#[derive(Debug)]
pub enum IntakeEvent {
    SingleText {
        text: String,
        subject: Option<String>,
    },
    SingleAttachment(Attachment),
    MultipleAttachments(Vec<Attachment>),
}

impl IntakeEvent {
    pub fn text(text: impl Into<String>, subject: Option<String>) -> Self {
        IntakeEvent::SingleText {
            text: text.into(),
            subject,
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            IntakeEvent::SingleText { .. } => "text",
            IntakeEvent::SingleAttachment(_) => "attachment",
            IntakeEvent::MultipleAttachments(_) => "attachments",
        }
    }

    /// Number of attachments carried by the event
    pub fn attachment_count(&self) -> usize {
        match self {
            IntakeEvent::SingleText { .. } => 0,
            IntakeEvent::SingleAttachment(_) => 1,
            IntakeEvent::MultipleAttachments(items) => items.len(),
        }
    }
}

/// Host share action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareAction {
    Send,
    SendMultiple,
}

impl FromStr for ShareAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "send" | "android.intent.action.SEND" => Ok(ShareAction::Send),
            "send-multiple" | "send_multiple" | "android.intent.action.SEND_MULTIPLE" => {
                Ok(ShareAction::SendMultiple)
            }
            other => Err(format!("Unsupported share action: {}", other)),
        }
    }
}

/// Share trigger as delivered by the host environment
#[derive(Debug, Default)]
pub struct RawShareIntent {
    pub action: Option<String>,
    /// Declared content type of the whole share
    pub mime_type: Option<String>,
    pub text: Option<String>,
    pub subject: Option<String>,
    /// Attached streams; an attachment without its own type inherits `mime_type`
    pub streams: Vec<Attachment>,
}

impl RawShareIntent {
    /// Classify the trigger, or `None` when it is not a share this bridge handles.
    ///
    /// Triggers without a declared content type or with an unknown action are
    /// ignored, as is a plain-text share that carries no text.
    pub fn classify(self) -> Option<IntakeEvent> {
        let action = match self.action.as_deref().map(str::parse::<ShareAction>) {
            Some(Ok(action)) => action,
            Some(Err(reason)) => {
                tracing::debug!(reason = %reason, "Ignoring share trigger");
                return None;
            }
            None => {
                tracing::debug!("Ignoring share trigger without an action");
                return None;
            }
        };

        let Some(mime_type) = self.mime_type else {
            tracing::debug!("Ignoring share trigger without a declared content type");
            return None;
        };

        let mut streams = inherit_mime(self.streams, &mime_type);

        match action {
            ShareAction::Send if is_plain_text(&mime_type) && self.text.is_some() => {
                self.text.map(|text| IntakeEvent::SingleText {
                    text,
                    subject: self.subject,
                })
            }
            ShareAction::Send if !streams.is_empty() => {
                Some(IntakeEvent::SingleAttachment(streams.swap_remove(0)))
            }
            ShareAction::SendMultiple if !streams.is_empty() => {
                Some(IntakeEvent::MultipleAttachments(streams))
            }
            _ => {
                tracing::debug!(
                    action = ?action,
                    mime_type = %mime_type,
                    "Ignoring share trigger with nothing to take in"
                );
                None
            }
        }
    }
}

fn inherit_mime(streams: Vec<Attachment>, declared: &str) -> Vec<Attachment> {
    streams
        .into_iter()
        .map(|mut attachment| {
            if attachment.mime.is_none() {
                attachment.mime = Some(declared.to_string());
            }
            attachment
        })
        .collect()
}

fn is_plain_text(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/plain"))
        .unwrap_or(false)
}
