//! Rewrite rules.
//!
//! Each rule is an independent, stateless transformation of a [`Document`].
//! Most rules edit the tree directly. The ones in [`text`] work on the
//! serialized markup and go through [`rewrite_markup`], which reparses the
//! result and only swaps it in once it is known to be well-formed.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ast::Document;
use crate::error::ShrinkError;
use crate::validate::is_valid;

mod attributes;
mod colors;
mod coordinates;
mod groups;
mod metadata;
mod namespaces;
mod sort;
mod text;
mod transforms;

pub use attributes::{
    CleanEnableBackground, RemoveDefaultAttributes, RemoveDeprecatedAttributes, RemoveEmptyAttributes,
};
pub use colors::ConvertColorsToHex;
pub use coordinates::MinifyCoordinates;
pub use groups::FlattenGroups;
pub use metadata::RemoveMetadata;
pub use namespaces::RemoveUnusedNamespaces;
pub use sort::SortAttributes;
pub use text::{
    ConvertEmptyTagsToSelfClosing, RemoveComments, RemoveDoctype, RemoveInvisibleCharacters,
    RemoveWhitespace,
};
pub use transforms::MinifyTransforms;

/// A document rewrite.
///
/// Implementations must leave the document parseable. Rules are shared
/// between runs, so they hold configuration only.
pub trait Rule: fmt::Debug + Send + Sync {
    /// Stable kebab-case name, used in logs and errors.
    fn name(&self) -> &'static str;

    /// Rewrite `doc` in place.
    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError>;
}

/// Serialize `doc`, run `transform` over the markup, and replace the
/// document with the reparsed result.
///
/// The document is only replaced when the rewritten markup passes
/// [`is_valid`] and parses; otherwise it is left as it was and a
/// [`ShrinkError::Processing`] naming `rule` is returned.
pub fn rewrite_markup(
    doc: &mut Document,
    rule: &'static str,
    transform: impl FnOnce(&str) -> String,
) -> Result<(), ShrinkError> {
    let before = doc.to_markup();
    let after = transform(&before);

    if after == before {
        tracing::debug!(rule, "no textual change");
        return Ok(());
    }

    if !is_valid(&after) {
        return Err(ShrinkError::processing(rule, "rewritten markup is not a valid SVG document"));
    }

    doc.reparse(&after)
        .map_err(|e| ShrinkError::processing(rule, format!("rewritten markup does not parse: {}", e)))?;

    tracing::debug!(rule, before = before.len(), after = after.len(), "markup rewritten");
    Ok(())
}

/// Every built-in rule, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    MinifyCoordinates,
    MinifyTransforms,
    ConvertColorsToHex,
    FlattenGroups,
    RemoveDeprecatedAttributes,
    RemoveDefaultAttributes,
    RemoveEmptyAttributes,
    CleanEnableBackground,
    RemoveMetadata,
    RemoveUnusedNamespaces,
    SortAttributes,
    RemoveDoctype,
    RemoveComments,
    RemoveInvisibleCharacters,
    ConvertEmptyTagsToSelfClosing,
    RemoveWhitespace,
}

impl RuleKind {
    /// All rules in the default order.
    ///
    /// Invisible characters go first so the attribute rules see clean
    /// values. Groups are flattened next so cascaded attributes go through
    /// the value rules. Rules that add or rename attributes run before the
    /// sorter, and the remaining text-level rules sit together at the end
    /// with whitespace removal ahead of empty-tag collapsing.
    pub const ALL: [RuleKind; 16] = [
        RuleKind::RemoveInvisibleCharacters,
        RuleKind::FlattenGroups,
        RuleKind::MinifyCoordinates,
        RuleKind::MinifyTransforms,
        RuleKind::ConvertColorsToHex,
        RuleKind::RemoveDeprecatedAttributes,
        RuleKind::RemoveDefaultAttributes,
        RuleKind::RemoveEmptyAttributes,
        RuleKind::CleanEnableBackground,
        RuleKind::RemoveMetadata,
        RuleKind::RemoveUnusedNamespaces,
        RuleKind::SortAttributes,
        RuleKind::RemoveDoctype,
        RuleKind::RemoveComments,
        RuleKind::RemoveWhitespace,
        RuleKind::ConvertEmptyTagsToSelfClosing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuleKind::MinifyCoordinates => "minify-coordinates",
            RuleKind::MinifyTransforms => "minify-transforms",
            RuleKind::ConvertColorsToHex => "convert-colors-to-hex",
            RuleKind::FlattenGroups => "flatten-groups",
            RuleKind::RemoveDeprecatedAttributes => "remove-deprecated-attributes",
            RuleKind::RemoveDefaultAttributes => "remove-default-attributes",
            RuleKind::RemoveEmptyAttributes => "remove-empty-attributes",
            RuleKind::CleanEnableBackground => "clean-enable-background",
            RuleKind::RemoveMetadata => "remove-metadata",
            RuleKind::RemoveUnusedNamespaces => "remove-unused-namespaces",
            RuleKind::SortAttributes => "sort-attributes",
            RuleKind::RemoveDoctype => "remove-doctype",
            RuleKind::RemoveComments => "remove-comments",
            RuleKind::RemoveInvisibleCharacters => "remove-invisible-characters",
            RuleKind::ConvertEmptyTagsToSelfClosing => "convert-empty-tags-to-self-closing",
            RuleKind::RemoveWhitespace => "remove-whitespace",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RuleKind::MinifyCoordinates => "Strip redundant zeros from coordinates and path data",
            RuleKind::MinifyTransforms => "Drop identity transforms and tidy transform lists",
            RuleKind::ConvertColorsToHex => "Rewrite rgb() colors as lowercase hex",
            RuleKind::FlattenGroups => "Push group attributes down and remove <g> wrappers",
            RuleKind::RemoveDeprecatedAttributes => "Replace xlink/xml attributes and drop obsolete ones",
            RuleKind::RemoveDefaultAttributes => "Remove fill=\"none\" and stroke=\"none\"",
            RuleKind::RemoveEmptyAttributes => "Remove attributes with blank values",
            RuleKind::CleanEnableBackground => "Remove enable-background matching the element size",
            RuleKind::RemoveMetadata => "Remove metadata, title, desc and editor data",
            RuleKind::RemoveUnusedNamespaces => "Remove unused xmlns:prefix declarations",
            RuleKind::SortAttributes => "Sort attributes (id, width, height first)",
            RuleKind::RemoveDoctype => "Remove the DOCTYPE declaration",
            RuleKind::RemoveComments => "Remove comments",
            RuleKind::RemoveInvisibleCharacters => "Remove zero-width and control characters",
            RuleKind::ConvertEmptyTagsToSelfClosing => "Write <x></x> as <x/>",
            RuleKind::RemoveWhitespace => "Remove whitespace between tags",
        }
    }

    /// Instantiate the rule.
    pub fn build(self, shorthand_colors: bool) -> Box<dyn Rule> {
        match self {
            RuleKind::MinifyCoordinates => Box::new(MinifyCoordinates),
            RuleKind::MinifyTransforms => Box::new(MinifyTransforms),
            RuleKind::ConvertColorsToHex => Box::new(ConvertColorsToHex {
                shorthand: shorthand_colors,
            }),
            RuleKind::FlattenGroups => Box::new(FlattenGroups),
            RuleKind::RemoveDeprecatedAttributes => Box::new(RemoveDeprecatedAttributes),
            RuleKind::RemoveDefaultAttributes => Box::new(RemoveDefaultAttributes),
            RuleKind::RemoveEmptyAttributes => Box::new(RemoveEmptyAttributes),
            RuleKind::CleanEnableBackground => Box::new(CleanEnableBackground),
            RuleKind::RemoveMetadata => Box::new(RemoveMetadata),
            RuleKind::RemoveUnusedNamespaces => Box::new(RemoveUnusedNamespaces),
            RuleKind::SortAttributes => Box::new(SortAttributes),
            RuleKind::RemoveDoctype => Box::new(RemoveDoctype),
            RuleKind::RemoveComments => Box::new(RemoveComments),
            RuleKind::RemoveInvisibleCharacters => Box::new(RemoveInvisibleCharacters),
            RuleKind::ConvertEmptyTagsToSelfClosing => Box::new(ConvertEmptyTagsToSelfClosing),
            RuleKind::RemoveWhitespace => Box::new(RemoveWhitespace),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleKind {
    type Err = ShrinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ShrinkError::Configuration(format!("Unknown rule: {}", s)))
    }
}
