use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

pub const DELETED_PLACEHOLDER: &str = "[deleted]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub handle: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub handle: String,
    pub content: String,
}

/// Reply target as the client sent it. A malformed one is only reported
/// after the post, handle and content checks pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Reply(i64),
    Malformed,
}

impl From<Option<i64>> for ParentRef {
    fn from(parent_id: Option<i64>) -> Self {
        parent_id.map_or(ParentRef::Root, ParentRef::Reply)
    }
}

/// A comment with its replies. Serializes as the comment's own fields plus
/// `isEdited` and `replies`.
///
/// Reply chains can be arbitrarily deep, so building, serializing and
/// dropping a node all run on explicit stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub is_edited: bool,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// With `mask_deleted`, a deleted comment keeps its place and replies
    /// but shows a placeholder instead of author and body.
    fn new(comment: Comment, replies: Vec<CommentNode>, mask_deleted: bool) -> Self {
        let mut node = Self {
            is_edited: comment.is_edited(),
            comment,
            replies,
        };
        if mask_deleted && node.comment.is_deleted {
            node.comment.handle = DELETED_PLACEHOLDER.to_string();
            node.comment.content = DELETED_PLACEHOLDER.to_string();
            node.is_edited = false;
        }
        node
    }

    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.replies.iter());
        }
        count
    }

    fn write_json(&self, out: &mut Vec<u8>) -> serde_json::Result<()> {
        enum Step<'a> {
            Open(&'a CommentNode),
            Separator,
            Close,
        }

        let mut steps = vec![Step::Open(self)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(node) => {
                    let fields = serde_json::to_vec(&node.comment)?;
                    // Reopen the comment object to append the tree fields.
                    let Some((&b'}', head)) = fields.split_last() else {
                        return Err(serde_json::Error::custom("comment is not a JSON object"));
                    };
                    out.extend_from_slice(head);
                    out.extend_from_slice(b",\"isEdited\":");
                    let edited: &[u8] = if node.is_edited { b"true" } else { b"false" };
                    out.extend_from_slice(edited);
                    out.extend_from_slice(b",\"replies\":[");
                    steps.push(Step::Close);
                    for (idx, reply) in node.replies.iter().enumerate().rev() {
                        steps.push(Step::Open(reply));
                        if idx > 0 {
                            steps.push(Step::Separator);
                        }
                    }
                }
                Step::Separator => out.push(b','),
                Step::Close => out.extend_from_slice(b"]}"),
            }
        }
        Ok(())
    }
}

impl Serialize for CommentNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = Vec::new();
        self.write_json(&mut out).map_err(S::Error::custom)?;
        let json = String::from_utf8(out).map_err(S::Error::custom)?;
        let raw = RawValue::from_string(json).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    pub post_id: i64,
    pub total: usize,
    pub comments: Vec<CommentNode>,
}

impl CommentThread {
    /// Display form of a post's comments: nested, with deleted ones masked.
    pub fn from_comments(post_id: i64, comments: Vec<Comment>) -> Self {
        Self {
            post_id,
            total: comments.len(),
            comments: build_forest(comments, true),
        }
    }
}

/// Nests a post's comments under their parents.
///
/// Input order is kept among siblings. A comment whose parent is not in the
/// input, or whose parent chain loops back to itself, becomes a root, so every
/// input comment shows up exactly once.
pub fn build_comment_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    build_forest(comments, false)
}

fn build_forest(comments: Vec<Comment>, mask_deleted: bool) -> Vec<CommentNode> {
    let mut index = HashMap::with_capacity(comments.len());
    for (idx, comment) in comments.iter().enumerate() {
        index.entry(comment.id).or_insert(idx);
    }

    let mut parent_of: Vec<Option<usize>> = comments
        .iter()
        .map(|comment| {
            comment
                .parent_id
                .and_then(|parent_id| index.get(&parent_id).copied())
        })
        .collect();
    detach_cycles(&mut parent_of);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
    let mut roots = Vec::new();
    for (idx, parent) in parent_of.iter().enumerate() {
        match parent {
            Some(parent_idx) => children[*parent_idx].push(idx),
            None => roots.push(idx),
        }
    }

    let mut slots: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode>> = slots.iter().map(|_| None).collect();
    let mut forest = Vec::with_capacity(roots.len());
    for root in roots {
        // Post-order: a node is assembled once all of its replies are.
        let mut pending = vec![(root, false)];
        while let Some((idx, expanded)) = pending.pop() {
            if !expanded {
                pending.push((idx, true));
                pending.extend(children[idx].iter().map(|child| (*child, false)));
                continue;
            }
            let Some(comment) = slots[idx].take() else {
                continue;
            };
            let replies = children[idx]
                .iter()
                .filter_map(|child| built[*child].take())
                .collect();
            built[idx] = Some(CommentNode::new(comment, replies, mask_deleted));
        }
        forest.extend(built[root].take());
    }
    forest
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    OnPath,
    Done,
}

/// Cuts every parent loop so its members become roots. Comments hanging off
/// a loop stay attached to their parent.
fn detach_cycles(parent_of: &mut [Option<usize>]) {
    let mut marks = vec![Mark::Unseen; parent_of.len()];
    let mut path = Vec::new();
    for start in 0..parent_of.len() {
        let mut current = Some(start);
        while let Some(idx) = current {
            match marks[idx] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(pos) = path.iter().position(|member| *member == idx) {
                        for member in &path[pos..] {
                            parent_of[*member] = None;
                        }
                    }
                    break;
                }
                Mark::Unseen => {
                    marks[idx] = Mark::OnPath;
                    path.push(idx);
                    current = parent_of[idx];
                }
            }
        }
        for member in path.drain(..) {
            marks[member] = Mark::Done;
        }
    }
}
