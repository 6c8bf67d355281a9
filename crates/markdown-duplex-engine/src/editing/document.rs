use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editing::{
    Cmd, Patch,
    delimited::DelimitedSpan,
    reconcile::{Reconciliation, reconcile},
    snapshot::{RenderSpan, Snapshot},
    span::{DualStateSpan, StyleFlags},
};

/// Stable node identity.
///
/// Ids are allocated once per node and never reused, so a host can hold on
/// to one across edits and look up the current committed state through
/// [`Document::get`] instead of caching a reference that may go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

/// A plain text fragment.
///
/// Splits and dissolution produce these; once created they are ordinary
/// document content with no further dual-state behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub(crate) text: String,
}

impl TextNode {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The closed set of node variants the document stores.
#[derive(Debug, Clone)]
pub enum Node {
    Text(TextNode),
    Delimited(DelimitedSpan),
}

impl Node {
    /// Type discriminator for hosts deciding whether a node participates in
    /// mode switching and reconciliation.
    pub fn is_delimited_span(&self) -> bool {
        matches!(self, Node::Delimited(_))
    }

    pub fn as_delimited_span(&self) -> Option<&DelimitedSpan> {
        match self {
            Node::Delimited(span) => Some(span),
            Node::Text(_) => None,
        }
    }

    pub fn as_delimited_span_mut(&mut self) -> Option<&mut DelimitedSpan> {
        match self {
            Node::Delimited(span) => Some(span),
            Node::Text(_) => None,
        }
    }

    /// The text the host currently renders for this node.
    pub fn live_text(&self) -> &str {
        match self {
            Node::Text(t) => &t.text,
            Node::Delimited(span) => span.live_text(),
        }
    }

    /// The style currently in effect on this node's rendered text.
    pub fn live_style(&self) -> StyleFlags {
        match self {
            Node::Text(_) => StyleFlags::NONE,
            Node::Delimited(span) => span.live_style(),
        }
    }
}

/// Errors from [`Document::apply`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("unknown node id {0:?}")]
    UnknownNode(NodeId),
    #[error("edit range {start}..{end} out of bounds for node {id:?} of length {len}")]
    RangeOutOfBounds {
        id: NodeId,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("byte offset {at} inside node {id:?} is not a char boundary")]
    NotCharBoundary { id: NodeId, at: usize },
}

/// Ordered arena of sibling nodes.
///
/// The document owns every node and hands out [`NodeId`]s as the only
/// long-lived handle. Sibling order lives in `order`; node state lives in
/// the id-indexed map, so "get the latest version" is a plain lookup into
/// the current committed arena. All edits flow through [`Document::apply`]
/// as explicit [`Cmd`] messages.
#[derive(Debug, Clone, Default)]
pub struct Document {
    order: Vec<NodeId>,
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    version: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Appends a plain text node.
    pub fn push_text(&mut self, text: impl Into<String>) -> NodeId {
        let id = self.alloc();
        self.nodes.insert(id, Node::Text(TextNode { text: text.into() }));
        self.order.push(id);
        id
    }

    /// Appends a delimited span node.
    pub fn push_span(&mut self, span: DelimitedSpan) -> NodeId {
        let id = self.alloc();
        self.nodes.insert(id, Node::Delimited(span));
        self.order.push(id);
        id
    }

    /// Current committed state of a node, or `None` for a stale id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Sibling order, front to back.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Version counter, incremented by every applied command.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn position_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|&n| n == id)
    }

    /// Inserts a plain text sibling immediately before `id`.
    pub fn insert_text_before(&mut self, id: NodeId, text: impl Into<String>) -> Option<NodeId> {
        let pos = self.position_of(id)?;
        let new_id = self.alloc();
        self.nodes
            .insert(new_id, Node::Text(TextNode { text: text.into() }));
        self.order.insert(pos, new_id);
        Some(new_id)
    }

    /// Inserts a plain text sibling immediately after `id`.
    pub fn insert_text_after(&mut self, id: NodeId, text: impl Into<String>) -> Option<NodeId> {
        let pos = self.position_of(id)?;
        let new_id = self.alloc();
        self.nodes
            .insert(new_id, Node::Text(TextNode { text: text.into() }));
        self.order.insert(pos + 1, new_id);
        Some(new_id)
    }

    /// Replaces a node in place with plain text. The id stays valid and
    /// keeps its position; only the variant changes.
    pub fn replace_with_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                *node = Node::Text(TextNode { text: text.into() });
                true
            }
            None => false,
        }
    }

    /// Concatenated live text of every node, in sibling order.
    pub fn text(&self) -> String {
        self.order
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(Node::live_text)
            .collect()
    }

    /// Immutable projection for the host renderer.
    pub fn snapshot(&self) -> Snapshot {
        let spans = self
            .order
            .iter()
            .filter_map(|&id| self.nodes.get(&id).map(|node| (id, node)))
            .map(|(id, node)| RenderSpan {
                id,
                text: node.live_text().to_string(),
                style: node.live_style(),
            })
            .collect();
        Snapshot {
            version: self.version,
            spans,
        }
    }

    /// Applies one edit message and reports the outcome.
    ///
    /// Text mutations commit the new live text first, then run the
    /// reconciler exactly once. Mode changes on plain text nodes are
    /// ignored rather than rejected, matching the collaborator-misuse
    /// contract of the reconciler itself.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let outcome = match cmd {
            Cmd::ApplyModeChange { id, mode } => {
                let node = self.nodes.get_mut(&id).ok_or(EditError::UnknownNode(id))?;
                if let Node::Delimited(span) = node {
                    span.set_display_mode(mode);
                }
                Reconciliation::Noop
            }
            Cmd::ReplaceText { id, text } => self.commit_text_edit(id, text)?,
            Cmd::InsertText { id, at, text } => {
                let current = self.live_text_of(id)?;
                if at > current.len() {
                    return Err(EditError::RangeOutOfBounds {
                        id,
                        start: at,
                        end: at,
                        len: current.len(),
                    });
                }
                if !current.is_char_boundary(at) {
                    return Err(EditError::NotCharBoundary { id, at });
                }
                let mut edited = current.to_string();
                edited.insert_str(at, &text);
                self.commit_text_edit(id, edited)?
            }
            Cmd::DeleteText { id, range } => {
                let current = self.live_text_of(id)?;
                if range.start > range.end || range.end > current.len() {
                    return Err(EditError::RangeOutOfBounds {
                        id,
                        start: range.start,
                        end: range.end,
                        len: current.len(),
                    });
                }
                if !current.is_char_boundary(range.start) {
                    return Err(EditError::NotCharBoundary {
                        id,
                        at: range.start,
                    });
                }
                if !current.is_char_boundary(range.end) {
                    return Err(EditError::NotCharBoundary { id, at: range.end });
                }
                let mut edited = current.to_string();
                edited.replace_range(range, "");
                self.commit_text_edit(id, edited)?
            }
        };
        self.version += 1;
        Ok(Patch {
            outcome,
            version: self.version,
        })
    }

    fn live_text_of(&self, id: NodeId) -> Result<&str, EditError> {
        self.nodes
            .get(&id)
            .map(Node::live_text)
            .ok_or(EditError::UnknownNode(id))
    }

    /// Commits an already-validated text mutation, then reconciles.
    fn commit_text_edit(&mut self, id: NodeId, text: String) -> Result<Reconciliation, EditError> {
        match self.nodes.get_mut(&id).ok_or(EditError::UnknownNode(id))? {
            Node::Text(t) => {
                t.text = text;
                return Ok(Reconciliation::Noop);
            }
            Node::Delimited(span) => span.set_live_text(text),
        }
        Ok(reconcile(self, id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::editing::delimited::{MarkupRule, create_delimited_span};
    use crate::editing::span::DisplayMode;

    fn strong_rule() -> MarkupRule {
        MarkupRule::from_tag("**", StyleFlags::BOLD)
    }

    fn sample_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        doc.push_text("hello ");
        let span = doc.push_span(create_delimited_span("**bold**", strong_rule()));
        doc.push_text(" world");
        (doc, span)
    }

    #[test]
    fn nodes_keep_sibling_order() {
        let (doc, span) = sample_doc();

        let ids: Vec<_> = doc.node_ids().collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[1], span);
        assert_eq!(doc.text(), "hello bold world");
    }

    #[test]
    fn insert_before_and_after_preserve_order() {
        let (mut doc, span) = sample_doc();

        let before = doc.insert_text_before(span, "A").expect("known id");
        let after = doc.insert_text_after(span, "B").expect("known id");

        let ids: Vec<_> = doc.node_ids().collect();
        let span_pos = ids.iter().position(|&n| n == span).unwrap();
        assert_eq!(ids[span_pos - 1], before);
        assert_eq!(ids[span_pos + 1], after);
        assert_eq!(doc.text(), "hello AboldB world");
    }

    #[test]
    fn replace_with_text_keeps_identity_and_position() {
        let (mut doc, span) = sample_doc();

        assert!(doc.replace_with_text(span, "plain"));

        let node = doc.get(span).expect("id still valid");
        assert!(!node.is_delimited_span());
        assert_eq!(node.live_text(), "plain");
        assert_eq!(doc.node_ids().nth(1), Some(span));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let (mut doc, _) = sample_doc();
        // An id allocated by a clone is never present in the original.
        let absent = doc.clone().push_text("probe");

        let err = doc
            .apply(Cmd::ReplaceText {
                id: absent,
                text: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditError::UnknownNode(absent));
    }

    #[test]
    fn mode_change_on_plain_text_is_ignored() {
        let mut doc = Document::new();
        let text = doc.push_text("plain");

        let patch = doc
            .apply(Cmd::ApplyModeChange {
                id: text,
                mode: DisplayMode::Raw,
            })
            .expect("known id");

        assert_eq!(patch.outcome, Reconciliation::Noop);
        assert_eq!(doc.get(text).unwrap().live_text(), "plain");
    }

    #[test]
    fn version_increments_per_command() {
        let (mut doc, span) = sample_doc();
        assert_eq!(doc.version(), 0);

        doc.apply(Cmd::ApplyModeChange {
            id: span,
            mode: DisplayMode::Raw,
        })
        .unwrap();
        assert_eq!(doc.version(), 1);

        doc.apply(Cmd::ReplaceText {
            id: span,
            text: "**bolder**".to_string(),
        })
        .unwrap();
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn insert_text_edits_live_text_at_offset() {
        let (mut doc, span) = sample_doc();
        doc.apply(Cmd::ApplyModeChange {
            id: span,
            mode: DisplayMode::Raw,
        })
        .unwrap();

        let patch = doc
            .apply(Cmd::InsertText {
                id: span,
                at: 2,
                text: "very ".to_string(),
            })
            .unwrap();

        assert_eq!(patch.outcome, Reconciliation::Resynced);
        let node = doc.get(span).unwrap();
        assert_eq!(node.live_text(), "**very bold**");
    }

    #[test]
    fn delete_text_edits_live_text_range() {
        let (mut doc, span) = sample_doc();
        doc.apply(Cmd::ApplyModeChange {
            id: span,
            mode: DisplayMode::Raw,
        })
        .unwrap();

        // "**bold**" -> "**bd**"
        let patch = doc
            .apply(Cmd::DeleteText {
                id: span,
                range: 3..5,
            })
            .unwrap();

        assert_eq!(patch.outcome, Reconciliation::Resynced);
        assert_eq!(doc.get(span).unwrap().live_text(), "**bd**");
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let (mut doc, span) = sample_doc();

        let err = doc
            .apply(Cmd::InsertText {
                id: span,
                at: 100,
                text: "x".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, EditError::RangeOutOfBounds { .. }));

        let err = doc
            .apply(Cmd::DeleteText {
                id: span,
                range: 2..100,
            })
            .unwrap_err();
        assert!(matches!(err, EditError::RangeOutOfBounds { .. }));
    }

    #[test]
    fn non_boundary_offsets_are_rejected() {
        let mut doc = Document::new();
        let text = doc.push_text("héllo");

        let err = doc
            .apply(Cmd::InsertText {
                id: text,
                at: 2, // inside the two-byte é
                text: "x".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditError::NotCharBoundary { id: text, at: 2 });
    }

    #[test]
    fn snapshot_reflects_live_text_and_style() {
        let (mut doc, span) = sample_doc();

        let snap = doc.snapshot();
        assert_eq!(snap.spans.len(), 3);
        assert_eq!(snap.spans[1].text, "bold");
        assert_eq!(snap.spans[1].style, StyleFlags::BOLD);
        assert_eq!(snap.spans[0].style, StyleFlags::NONE);

        doc.apply(Cmd::ApplyModeChange {
            id: span,
            mode: DisplayMode::Raw,
        })
        .unwrap();

        let snap = doc.snapshot();
        assert_eq!(snap.version, doc.version());
        assert_eq!(snap.spans[1].text, "**bold**");
        assert_eq!(snap.spans[1].style, StyleFlags::NONE);
    }
}
