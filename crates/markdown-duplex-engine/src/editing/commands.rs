use std::ops::Range;

use crate::editing::{document::NodeId, span::DisplayMode};

/// Edit messages the host sends through [`Document::apply`].
///
/// Mode transitions are explicit commands rather than a side effect of
/// cursor movement, so span behavior is testable without an editor harness.
/// Text commands commit the mutation and then run the reconciler once.
///
/// [`Document::apply`]: crate::editing::Document::apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Switch a span's display representation, typically when the cursor
    /// enters (raw) or leaves (formatted) it.
    ApplyModeChange { id: NodeId, mode: DisplayMode },
    /// Replace a node's entire live text with an already-edited string.
    ReplaceText { id: NodeId, text: String },
    /// Insert text at a byte offset within a node's live text.
    InsertText {
        id: NodeId,
        at: usize,
        text: String,
    },
    /// Delete a byte range from a node's live text.
    DeleteText { id: NodeId, range: Range<usize> },
}
