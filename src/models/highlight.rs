//! Highlight records and the transient pending selection

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Position;
use super::serde_helpers::deserialize_explicit_null;

/// Fallback display color for highlights stored without one
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffeb3b";

/// 1-based page number, as shown to users
pub type PageNumber = u32;

/// A persisted annotation tied to a page region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// Stable identifier, unique within a store and never reused
    pub id: String,

    /// The exact selected text
    pub text: String,

    /// Page the highlight lives on (1-based, fixed at creation)
    pub page_number: PageNumber,

    /// Relative geometry of the highlighted fragments
    pub position: Position,

    /// Display color (CSS color string)
    #[serde(default = "default_color")]
    pub color: String,

    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Creation time in milliseconds since the Unix epoch
    #[serde(default)]
    pub created_at: i64,
}

fn default_color() -> String {
    DEFAULT_HIGHLIGHT_COLOR.to_string()
}

impl Highlight {
    /// Create a highlight with a fresh id and the current time
    pub fn new(text: impl Into<String>, page_number: PageNumber, position: Position, color: impl Into<String>) -> Self {
        Self {
            id: new_highlight_id(),
            text: text.into(),
            page_number,
            position,
            color: color.into(),
            comment: None,
            created_at: now_millis(),
        }
    }

    /// Tooltip text: the comment when there is one, otherwise the highlighted text
    pub fn title(&self) -> &str {
        match self.comment.as_deref() {
            Some(comment) if !comment.is_empty() => comment,
            _ => &self.text,
        }
    }

    /// Merge a partial update into this record
    ///
    /// `id` and `page_number` are not patchable.
    pub fn apply(&mut self, patch: HighlightPatch) {
        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
    }
}

/// Partial update for an existing highlight
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// `Some(None)` clears the comment
    #[serde(
        default,
        deserialize_with = "deserialize_explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl HighlightPatch {
    pub fn comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(Some(comment.into())),
            ..Default::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }
}

/// The most recent text selection, not yet committed as a highlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSelection {
    /// Selected text, trimmed
    pub selected_text: String,
    pub page_number: PageNumber,
    pub position: Position,
}

impl PendingSelection {
    /// Turn the selection into a new highlight record
    pub fn into_highlight(self, color: impl Into<String>) -> Highlight {
        Highlight::new(self.selected_text, self.page_number, self.position, color)
    }
}

/// Generate a highlight id (`highlight-<uuid v4>`)
pub fn new_highlight_id() -> String {
    format!("highlight-{}", Uuid::new_v4())
}

/// Current time in epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
