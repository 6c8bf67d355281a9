use serde::{Deserialize, Serialize};

use crate::editing::{
    document::{Document, Node, NodeId},
    span::{DisplayMode, DualStateSpan},
};

/// Outcome of one reconciliation pass over a span.
///
/// Split outcomes carry the id of the plain text sibling that was created,
/// so the host can move the cursor into it without rescanning the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reconciliation {
    /// The live text no longer matched the span's pattern; the node was
    /// replaced in place by plain text. Terminal for the span.
    Dissolved,
    /// Leading characters fell outside the match and were moved into a new
    /// plain text sibling before the span.
    SplitBefore { sibling: NodeId },
    /// Trailing characters fell outside the match and were moved into a new
    /// plain text sibling after the span.
    SplitAfter { sibling: NodeId },
    /// The live text is exactly one well-formed occurrence; both stored
    /// representations were re-derived from it.
    Resynced,
    /// Nothing to do: the node is plain text, the span is formatted, or the
    /// id is stale. Collaborator misuse lands here instead of erroring.
    Noop,
}

/// What the decision phase concluded, before any mutation happens.
enum Plan {
    Noop,
    Dissolve(String),
    SplitBefore { prefix: String, rest: String },
    SplitAfter { matched: String, rest: String },
    Resync,
}

/// Re-validates a span after a live-text mutation and restores consistency.
///
/// Runs synchronously to exactly one outcome per invocation, once per
/// observed mutation. Only raw-mode delimited spans are acted on; the host
/// does not allow direct edits while formatted, and a formatted-mode call
/// is answered with [`Reconciliation::Noop`] rather than rejected.
///
/// Branches, first match wins:
/// 1. no pattern match — replace the span in place with its current text
/// 2. match starts past 0 — move the prefix into a sibling before the span
/// 3. match ends early — move the remainder into a sibling after the span
/// 4. exact match — resync the stored representations from the live text
///
/// At most one split per invocation. When an edit leaves excess on both
/// sides, the leading split wins and the trailing excess resolves on the
/// next mutation event, because the host re-invokes this per keystroke.
pub fn reconcile(doc: &mut Document, id: NodeId) -> Reconciliation {
    let plan = match doc.get(id) {
        Some(Node::Delimited(span)) if span.display_mode() == DisplayMode::Raw => {
            let live = span.live_text();
            match span.rule().pattern().find(live) {
                None => Plan::Dissolve(live.to_string()),
                Some(m) if m.start() > 0 => Plan::SplitBefore {
                    prefix: live[..m.start()].to_string(),
                    rest: live[m.start()..].to_string(),
                },
                Some(m) if m.end() < live.len() => Plan::SplitAfter {
                    matched: live[m.start()..m.end()].to_string(),
                    rest: live[m.end()..].to_string(),
                },
                Some(_) => Plan::Resync,
            }
        }
        _ => Plan::Noop,
    };

    match plan {
        Plan::Noop => Reconciliation::Noop,
        Plan::Dissolve(text) => {
            doc.replace_with_text(id, text);
            Reconciliation::Dissolved
        }
        Plan::SplitBefore { prefix, rest } => {
            let Some(sibling) = doc.insert_text_before(id, prefix) else {
                return Reconciliation::Noop;
            };
            if let Some(span) = doc.get_mut(id).and_then(Node::as_delimited_span_mut) {
                span.set_live_text(rest);
            }
            Reconciliation::SplitBefore { sibling }
        }
        Plan::SplitAfter { matched, rest } => {
            let Some(sibling) = doc.insert_text_after(id, rest) else {
                return Reconciliation::Noop;
            };
            if let Some(span) = doc.get_mut(id).and_then(Node::as_delimited_span_mut) {
                span.set_live_text(matched);
            }
            Reconciliation::SplitAfter { sibling }
        }
        Plan::Resync => {
            if let Some(span) = doc.get_mut(id).and_then(Node::as_delimited_span_mut) {
                span.resync_from_live_text();
            }
            Reconciliation::Resynced
        }
    }
}
