use serde::Serialize;

use crate::editing::{document::NodeId, span::StyleFlags};

/// One renderable node: its live text plus the style currently in effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderSpan {
    pub id: NodeId,
    pub text: String,
    /// [`StyleFlags::NONE`] for plain text and for raw-mode spans.
    pub style: StyleFlags,
}

/// Immutable projection of the document for the host renderer.
///
/// The host renders from snapshots and never mutates nodes directly; all
/// writes go back through commands. Built by `Document::snapshot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub version: u64,
    /// Sibling order, front to back.
    pub spans: Vec<RenderSpan>,
}
