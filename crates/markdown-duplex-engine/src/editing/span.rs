use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Which of a span's two representations is currently materialized as its
/// live text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Literal markup including delimiters, editable as plain text.
    Raw,
    /// Content only, delimiters hidden, visual style applied.
    Formatted,
}

/// Opaque formatting bitset applied to rendered content.
///
/// The engine never interprets individual bits; it only guarantees that a
/// span's configured flags are in effect while the span is formatted and
/// that the flags are [`StyleFlags::NONE`] while it is raw. The host maps
/// bits to whatever visual treatment it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleFlags(u32);

impl StyleFlags {
    /// No formatting (the raw-mode style).
    pub const NONE: StyleFlags = StyleFlags(0);
    pub const BOLD: StyleFlags = StyleFlags(1);
    pub const ITALIC: StyleFlags = StyleFlags(1 << 1);
    pub const STRIKETHROUGH: StyleFlags = StyleFlags(1 << 2);
    pub const CODE: StyleFlags = StyleFlags(1 << 3);

    pub const fn from_bits(bits: u32) -> Self {
        StyleFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: StyleFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StyleFlags {
    type Output = StyleFlags;

    fn bitor(self, rhs: StyleFlags) -> StyleFlags {
        StyleFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for StyleFlags {
    fn bitor_assign(&mut self, rhs: StyleFlags) {
        self.0 |= rhs.0;
    }
}

/// Capability interface for dual-representation spans.
///
/// A dual-state span owns two strings for the same segment: the raw form
/// (markup included) and the formatted form (content only). Exactly one of
/// them is the span's *live text* — the text the host document currently
/// renders — selected by the display mode.
///
/// Concrete span kinds are configured by composition (a tag, a pattern and
/// a style are injected), not by deepening a type hierarchy. `DelimitedSpan`
/// is the only implementor today; future delimiter kinds plug in behind
/// this same interface.
pub trait DualStateSpan {
    /// The literal markup form, delimiters included.
    fn raw_text(&self) -> &str;

    /// The content form, delimiters stripped.
    fn formatted_text(&self) -> &str;

    /// The text the host currently renders for this span.
    ///
    /// Equal to `raw_text()` in raw mode and `formatted_text()` in
    /// formatted mode, except transiently after a direct live-text edit and
    /// before [`DualStateSpan::resync_from_live_text`] runs.
    fn live_text(&self) -> &str;

    /// The style currently in effect on the rendered content.
    /// [`StyleFlags::NONE`] whenever the span is raw.
    fn live_style(&self) -> StyleFlags;

    fn display_mode(&self) -> DisplayMode;

    /// Switches the live text to the representation matching `mode` and
    /// applies or clears the span's style accordingly. Idempotent.
    fn set_display_mode(&mut self, mode: DisplayMode);

    /// How many leading bytes of the raw form are structural (delimiter)
    /// rather than content. The host places the cursor past this offset
    /// when the span enters raw mode.
    fn cursor_offset(&self) -> usize;

    /// Re-derives both stored representations from the live text, given
    /// the current mode. Must run after any direct live-text edit before
    /// the other accessors are trusted again.
    fn resync_from_live_text(&mut self);
}

/// Shared storage for dual-representation spans.
///
/// Holds the two representations, the live text and the mode. Concrete
/// variants embed this and layer their own parse/synthesis rules on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanState {
    pub(crate) raw_text: String,
    pub(crate) formatted_text: String,
    pub(crate) live_text: String,
    pub(crate) mode: DisplayMode,
}

impl SpanState {
    /// Builds the state with the live text materialized per `mode`.
    pub fn new(raw_text: String, formatted_text: String, mode: DisplayMode) -> Self {
        let live_text = match mode {
            DisplayMode::Raw => raw_text.clone(),
            DisplayMode::Formatted => formatted_text.clone(),
        };
        Self {
            raw_text,
            formatted_text,
            live_text,
            mode,
        }
    }
}
