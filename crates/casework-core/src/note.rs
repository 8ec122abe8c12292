//! Free-text notes attached to a case

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

/// Default width of a note preview, in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 44;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub full_text: String,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Note {
    #[must_use]
    pub fn new(full_text: impl Into<String>, created_by: UserId) -> Self {
        Self::at(full_text, created_by, Utc::now())
    }

    #[must_use]
    pub fn at(full_text: impl Into<String>, created_by: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            full_text: full_text.into(),
            created_by,
            created_at,
        }
    }

    /// The first `width` characters of the text, cut mid-word if need be.
    #[must_use]
    pub fn preview(&self, width: usize) -> String {
        self.full_text.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Note {
        Note::new(text, UserId::parse("u-1").expect("valid id"))
    }

    #[test]
    fn test_preview_truncates_without_ellipsis() {
        let text: String = (1..=100).map(|n| n.to_string()).collect();
        let preview = note(&text).preview(DEFAULT_PREVIEW_CHARS);

        assert_eq!(preview.chars().count(), 44);
        assert!(preview.starts_with("1234"));
        assert!(text.starts_with(&preview));
    }

    #[test]
    fn test_preview_of_short_text_is_whole_text() {
        assert_eq!(note("called back").preview(44), "called back");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let preview = note("señora López llamó").preview(6);
        assert_eq!(preview, "señora");
    }
}
