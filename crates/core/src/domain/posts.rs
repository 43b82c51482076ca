use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Posts stay editable for three days after creation.
pub const EDIT_WINDOW_MS: i64 = 3 * 24 * 60 * 60 * 1000;

pub fn edit_window() -> TimeDelta {
    TimeDelta::milliseconds(EDIT_WINDOW_MS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub handle: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// The boundary itself is still inside the window.
    pub fn can_edit(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= edit_window()
    }

    pub fn editable_until(&self) -> DateTime<Utc> {
        self.created_at + edit_window()
    }
}

/// Already-validated field values for an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub handle: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<Post>,
    pub next_cursor: Option<i64>,
    pub has_more: bool,
}

impl PostPage {
    /// `has_more` only says the page came back full; it reports `true` when
    /// exactly `limit` rows were left.
    pub fn from_rows(items: Vec<Post>, limit: usize) -> Self {
        let next_cursor = items.last().map(|post| post.id);
        let has_more = items.len() == limit;
        Self {
            items,
            next_cursor,
            has_more,
        }
    }
}
