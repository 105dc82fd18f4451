//! Rules that rewrite the serialized markup.
//!
//! Each one is a pure string transform run through [`rewrite_markup`], which
//! validates and reparses the result before it replaces the document.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::ast::Document;
use crate::error::ShrinkError;
use crate::rules::{Rule, rewrite_markup};

static DOCTYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!DOCTYPE\b[^\[>]*(?:\[[\s\S]*?\])?\s*>").expect("doctype pattern is valid")
});

// CDATA sections are matched too so that `<!--` inside a style sheet is
// skipped rather than treated as a comment.
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!\[CDATA\[[\s\S]*?\]\]>|<!--[\s\S]*?-->").expect("comment pattern is valid")
});

// Zero-width space/non-joiner/joiner, line and paragraph separators, the
// soft hyphen and DEL, literal or as character references.
static INVISIBLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"[\u{200B}\u{200C}\u{200D}\u{2028}\u{2029}\u{00AD}\u{7F}]",
        r"|&#(?:[xX]0*(?:200[bBcCdD]|202[89]|[aA][dD]|7[fF])|0*(?:820[345]|823[23]|173|127));",
    ))
    .expect("invisible character pattern is valid")
});

// CR, LF and TAB references. Their literal forms are ordinary whitespace, and
// inside an attribute they still separate values, so they become a space.
static WHITESPACE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]0*(?:[aA]|[dD]|9)|0*(?:10|13|9));").expect("whitespace reference pattern is valid")
});

/// Literal characters [`RemoveInvisibleCharacters`] deletes.
pub(crate) fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2028}' | '\u{2029}' | '\u{00AD}' | '\u{7F}')
}

static EMPTY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z_][\w.:-]*)(\s[^<>]*)?></([A-Za-z_][\w.:-]*)\s*>").expect("empty tag pattern is valid")
});

static INTER_TAG_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("whitespace pattern is valid"));

// A non-self-closing `<text>` element with its content. Spaces between its
// `<tspan>` children are rendered.
static TEXT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<text(?:\s[^>]*[^/>]|\s*)>[\s\S]*?</text\s*>").expect("text element pattern is valid")
});

/// Removes the DOCTYPE declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveDoctype;

impl Rule for RemoveDoctype {
    fn name(&self) -> &'static str {
        "remove-doctype"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        rewrite_markup(doc, self.name(), |markup| DOCTYPE_RE.replace(markup, "").into_owned())
    }
}

/// Removes all comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveComments;

impl Rule for RemoveComments {
    fn name(&self) -> &'static str {
        "remove-comments"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        rewrite_markup(doc, self.name(), |markup| {
            COMMENT_RE
                .replace_all(markup, |caps: &Captures| {
                    if caps[0].starts_with("<![CDATA[") {
                        caps[0].to_string()
                    } else {
                        String::new()
                    }
                })
                .into_owned()
        })
    }
}

/// Removes zero-width, separator and control characters that render as
/// nothing. Line break and tab references are written as a plain space.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveInvisibleCharacters;

impl Rule for RemoveInvisibleCharacters {
    fn name(&self) -> &'static str {
        "remove-invisible-characters"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        rewrite_markup(doc, self.name(), |markup| {
            let visible = INVISIBLE_RE.replace_all(markup, "");
            WHITESPACE_REF_RE.replace_all(&visible, " ").into_owned()
        })
    }
}

/// Writes `<x ...></x>` as `<x .../>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertEmptyTagsToSelfClosing;

impl Rule for ConvertEmptyTagsToSelfClosing {
    fn name(&self) -> &'static str {
        "convert-empty-tags-to-self-closing"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        rewrite_markup(doc, self.name(), collapse_empty_tags)
    }
}

fn collapse_empty_tags(markup: &str) -> String {
    EMPTY_TAG_RE
        .replace_all(markup, |caps: &Captures| {
            let open = &caps[1];
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            // `<a x="1"/></a>` is a self-closed child followed by its
            // parent's end tag, not an empty pair.
            if open != &caps[3] || attrs.ends_with('/') {
                return caps[0].to_string();
            }
            format!("<{}{}/>", open, attrs.trim_end())
        })
        .into_owned()
}

/// Removes whitespace-only runs between tags, except inside `<text>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveWhitespace;

impl Rule for RemoveWhitespace {
    fn name(&self) -> &'static str {
        "remove-whitespace"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        rewrite_markup(doc, self.name(), strip_inter_tag_whitespace)
    }
}

fn strip_inter_tag_whitespace(markup: &str) -> String {
    let markup = markup.trim();
    let text_spans: Vec<_> = TEXT_ELEMENT_RE.find_iter(markup).map(|m| m.range()).collect();
    INTER_TAG_WHITESPACE_RE
        .replace_all(markup, |caps: &Captures| {
            let run = caps.get(0).map_or(0..0, |m| m.range());
            let in_text = text_spans
                .iter()
                .any(|span| span.start <= run.start && run.end <= span.end);
            if in_text { caps[0].to_string() } else { "><".to_string() }
        })
        .into_owned()
}
