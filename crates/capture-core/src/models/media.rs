use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Broad family a supported attachment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    Document,
}

impl FromStr for MediaKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            "document" => Ok(MediaKind::Document),
            _ => Err(anyhow::anyhow!("Invalid media kind: {}", s)),
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Document => write!(f, "document"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_display_parse() {
        for kind in [
            MediaKind::Image,
            MediaKind::Audio,
            MediaKind::Video,
            MediaKind::Document,
        ] {
            assert_eq!(kind.to_string().parse::<MediaKind>().unwrap(), kind);
        }
        assert_eq!("IMAGE".parse::<MediaKind>().unwrap(), MediaKind::Image);
        assert!("spreadsheet".parse::<MediaKind>().is_err());
    }
}
