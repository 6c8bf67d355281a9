/*!
 * # Two-State Span Editing Core
 *
 * This module implements the dual-representation span model: an editable
 * text segment shown either as its literal markup (raw) or as its content
 * alone with a visual style (formatted), kept consistent with its sibling
 * nodes while the user types through it.
 *
 * ## Architecture Overview
 *
 * ### 1. Dual-State Contract
 * - Every span owns a raw form, a formatted form, and a **display mode**
 * - Exactly one form is the span's **live text** — what the host renders
 * - The [`DualStateSpan`] trait is the capability interface; concrete span
 *   kinds are configured by composition (tag + pattern + style injected)
 *
 * ### 2. Delimited Spans
 * - [`DelimitedSpan`] binds one [`MarkupRule`]: a literal tag, a regex
 *   matching a complete occurrence, and a [`StyleFlags`] bitset
 * - Raw form is `tag + content + tag`; formatted form is the content
 * - The style is in effect only while formatted; raw mode is neutral
 *
 * ### 3. Mutation Reconciliation
 * - After each committed edit to a raw-mode span, [`reconcile`] re-runs the
 *   pattern and settles on one outcome: dissolve to plain text, split
 *   excess characters into a plain sibling (one side per event), or resync
 *   the stored representations
 * - Malformed content is a normal transition, never an error
 *
 * ### 4. Stable Node Identity via the Arena
 * - [`Document`] is an ordered arena; [`NodeId`]s are never reused and
 *   "get the latest version" is an index lookup into the committed arena
 * - Splits insert plain siblings; dissolution replaces in place, so the id
 *   a host holds stays valid
 *
 * ### 5. Command-Based Editing, Snapshot Reads
 * - All writes are explicit [`Cmd`] messages through [`Document::apply`],
 *   which returns a [`Patch`] with the reconciliation outcome and version
 * - The host renders from immutable [`Snapshot`]s and never mutates nodes
 *   directly
 *
 * ## Usage Pattern
 *
 * ```rust
 * use markdown_duplex_engine::editing::*;
 *
 * let mut doc = Document::new();
 * doc.push_text("hello ");
 * let rule = MarkupRule::from_tag("**", StyleFlags::BOLD);
 * let span = doc.push_span(create_delimited_span("**bold**", rule));
 *
 * // Cursor enters the span: show the raw markup, style off
 * doc.apply(Cmd::ApplyModeChange { id: span, mode: DisplayMode::Raw }).unwrap();
 * assert_eq!(doc.get(span).unwrap().live_text(), "**bold**");
 *
 * // The user edits the markup; the reconciler keeps both forms consistent
 * let patch = doc
 *     .apply(Cmd::ReplaceText { id: span, text: "**strong**".to_string() })
 *     .unwrap();
 * assert_eq!(patch.outcome, Reconciliation::Resynced);
 *
 * // Cursor leaves: back to formatted content with the style applied
 * doc.apply(Cmd::ApplyModeChange { id: span, mode: DisplayMode::Formatted }).unwrap();
 * assert_eq!(doc.snapshot().spans[1].text, "strong");
 * ```
 */

// Module exports
pub mod commands;
pub mod delimited;
pub mod document;
pub mod patch;
pub mod reconcile;
pub mod snapshot;
pub mod span;

// Public API re-exports
pub use commands::Cmd;
pub use delimited::{DelimitedSpan, MarkupRule, create_delimited_span};
pub use document::{Document, EditError, Node, NodeId, TextNode};
pub use patch::Patch;
pub use reconcile::{Reconciliation, reconcile};
pub use snapshot::{RenderSpan, Snapshot};
pub use span::{DisplayMode, DualStateSpan, SpanState, StyleFlags};
