use regex::Regex;

use crate::editing::span::{DisplayMode, DualStateSpan, SpanState, StyleFlags};

/// Injected description of one inline markup tag.
///
/// Bundles the literal delimiter string, a regex matching a complete
/// well-formed occurrence of the tag, and the style to apply while the
/// span is formatted. One rule per span; overlapping styles on a single
/// span are out of scope.
#[derive(Debug, Clone)]
pub struct MarkupRule {
    tag: String,
    pattern: Regex,
    style: StyleFlags,
}

impl MarkupRule {
    /// Builds a rule from an explicit pattern.
    ///
    /// The pattern is used only to re-validate the span after live-text
    /// edits, never for the initial raw-to-formatted parse.
    pub fn new(tag: impl Into<String>, pattern: Regex, style: StyleFlags) -> Self {
        Self {
            tag: tag.into(),
            pattern,
            style,
        }
    }

    /// Builds a rule whose pattern is derived from the tag itself:
    /// `tag`, lazily-matched content, `tag`.
    pub fn from_tag(tag: impl Into<String>, style: StyleFlags) -> Self {
        let tag = tag.into();
        let escaped = regex::escape(&tag);
        let pattern =
            Regex::new(&format!("{escaped}(.*?){escaped}")).expect("escaped tag pattern");
        Self {
            tag,
            pattern,
            style,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn style(&self) -> StyleFlags {
        self.style
    }
}

/// A dual-state span bound to one [`MarkupRule`].
///
/// The raw form is `tag + content + tag`; the formatted form is the content
/// alone. While formatted, the rule's style is in effect on the rendered
/// text; while raw, no style is.
#[derive(Debug, Clone)]
pub struct DelimitedSpan {
    state: SpanState,
    rule: MarkupRule,
    /// Style currently applied to the rendered content.
    applied: StyleFlags,
}

impl DelimitedSpan {
    /// Builds a span from its raw markup form.
    ///
    /// The formatted form is derived by stripping one occurrence of the tag
    /// from each end — once, not recursively. Well-formed input is assumed;
    /// if the tag is present only on one end, only that occurrence is
    /// stripped and the remainder keeps the other end verbatim. See the
    /// construction notes in DESIGN.md.
    pub fn new(raw_text: impl Into<String>, rule: MarkupRule, mode: DisplayMode) -> Self {
        let raw_text = raw_text.into();
        let formatted_text = strip_tag_once(&raw_text, &rule.tag);
        let applied = match mode {
            DisplayMode::Raw => StyleFlags::NONE,
            DisplayMode::Formatted => rule.style,
        };
        Self {
            state: SpanState::new(raw_text, formatted_text, mode),
            rule,
            applied,
        }
    }

    pub fn rule(&self) -> &MarkupRule {
        &self.rule
    }

    /// Overwrites the live text with an already-committed edit. The stored
    /// representations go stale until the reconciler resyncs or splits.
    pub(crate) fn set_live_text(&mut self, text: String) {
        self.state.live_text = text;
    }
}

impl DualStateSpan for DelimitedSpan {
    fn raw_text(&self) -> &str {
        &self.state.raw_text
    }

    fn formatted_text(&self) -> &str {
        &self.state.formatted_text
    }

    fn live_text(&self) -> &str {
        &self.state.live_text
    }

    fn live_style(&self) -> StyleFlags {
        self.applied
    }

    fn display_mode(&self) -> DisplayMode {
        self.state.mode
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.state.mode = mode;
        match mode {
            DisplayMode::Raw => {
                self.state.live_text = self.state.raw_text.clone();
                self.applied = StyleFlags::NONE;
            }
            DisplayMode::Formatted => {
                self.state.live_text = self.state.formatted_text.clone();
                self.applied = self.rule.style;
            }
        }
    }

    fn cursor_offset(&self) -> usize {
        self.rule.tag.len()
    }

    fn resync_from_live_text(&mut self) {
        match self.state.mode {
            DisplayMode::Raw => {
                self.state.raw_text = self.state.live_text.clone();
                self.state.formatted_text = strip_tag_once(&self.state.live_text, &self.rule.tag);
            }
            DisplayMode::Formatted => {
                self.state.formatted_text = self.state.live_text.clone();
                self.state.raw_text = format!(
                    "{tag}{content}{tag}",
                    tag = self.rule.tag,
                    content = self.state.live_text
                );
            }
        }
    }
}

/// Creates a span from its raw markup, starting in formatted mode.
///
/// This is the entry point hosts use when their inline scanner recognizes a
/// complete tag occurrence in plain text and promotes it to a span.
pub fn create_delimited_span(raw_text: impl Into<String>, rule: MarkupRule) -> DelimitedSpan {
    DelimitedSpan::new(raw_text, rule, DisplayMode::Formatted)
}

/// Strips one occurrence of `tag` from each end of `s`.
fn strip_tag_once(s: &str, tag: &str) -> String {
    let s = s.strip_prefix(tag).unwrap_or(s);
    let s = s.strip_suffix(tag).unwrap_or(s);
    s.to_string()
}
