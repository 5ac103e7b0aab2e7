use capture_core::MediaKind;

use crate::error::ClassificationError;

const IMAGE_EXTENSIONS: &[&str] = &["bmp", "png", "jpg", "jpeg", "gif", "svg", "webp", "avif"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "3gp", "flac", "ogg", "oga", "opus"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogv", "mov", "mkv"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Maps declared content types to file extensions and checks them against the
/// fixed allow-list.
///
/// Pure and stateless. An unknown MIME type is reported as `None`, never as an
/// error; absence is the "unknown" signal.
pub struct TypeClassifier;

impl TypeClassifier {
    /// Canonical extension for a declared MIME type
    ///
    /// Matching ignores case, surrounding whitespace and parameters such as
    /// `; charset=utf-8`.
    pub fn extension_for_mime(mime: Option<&str>) -> Option<&'static str> {
        let mime = mime?;
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();

        let extension = match essence.as_str() {
            // Images
            "image/bmp" | "image/x-ms-bmp" => "bmp",
            "image/png" => "png",
            "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
            "image/gif" => "gif",
            "image/svg+xml" => "svg",
            "image/webp" => "webp",
            "image/avif" => "avif",
            "image/heic" => "heic",
            "image/tiff" => "tiff",
            "image/x-icon" | "image/vnd.microsoft.icon" => "ico",
            // Audio
            "audio/mpeg" | "audio/mp3" => "mp3",
            "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
            "audio/mp4" | "audio/x-m4a" | "audio/m4a" => "m4a",
            "audio/3gpp" | "video/3gpp" => "3gp",
            "audio/flac" | "audio/x-flac" => "flac",
            "audio/ogg" | "application/ogg" => "ogg",
            "audio/opus" => "opus",
            "audio/aac" => "aac",
            "audio/amr" => "amr",
            // Videos
            "video/mp4" => "mp4",
            "video/webm" | "audio/webm" => "webm",
            "video/ogg" => "ogv",
            "video/quicktime" => "mov",
            "video/x-matroska" => "mkv",
            "video/x-msvideo" => "avi",
            "video/mpeg" => "mpeg",
            // Documents
            "application/pdf" => "pdf",
            "application/msword" => "doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
            "application/vnd.ms-excel" => "xls",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
            "application/vnd.ms-powerpoint" => "ppt",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation" => "pptx",
            "application/json" => "json",
            "application/zip" => "zip",
            "text/plain" => "txt",
            "text/html" => "html",
            "text/csv" => "csv",
            _ => return None,
        };

        Some(extension)
    }

    /// Allow-list family of an extension, case-insensitively
    pub fn media_kind(extension: &str) -> Option<MediaKind> {
        let ext = extension.to_lowercase();
        let ext = ext.as_str();

        if IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Video)
        } else if DOCUMENT_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Document)
        } else {
            None
        }
    }

    /// True iff the extension is present and on the allow-list
    pub fn is_supported(extension: Option<&str>) -> bool {
        extension.and_then(Self::media_kind).is_some()
    }

    /// Resolve a declared MIME type to a stageable extension
    pub fn classify(mime: Option<&str>) -> Result<(&'static str, MediaKind), ClassificationError> {
        let extension =
            Self::extension_for_mime(mime).ok_or_else(|| ClassificationError::Unknown {
                mime: mime.map(str::to_string),
            })?;

        let kind = Self::media_kind(extension).ok_or_else(|| ClassificationError::Unsupported {
            extension: extension.to_string(),
        })?;

        Ok((extension, kind))
    }
}
