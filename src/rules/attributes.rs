//! Attribute pruning: deprecated syntax, defaults, blanks, enable-background.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{Document, Element};
use crate::error::ShrinkError;
use crate::rules::Rule;
use crate::rules::text::is_invisible;

/// Old attribute names and their SVG 2 replacements.
const RENAMED: [(&str, &str); 3] = [("xlink:href", "href"), ("xlink:title", "title"), ("xml:lang", "lang")];

const OBSOLETE: [&str; 7] = [
    "baseProfile",
    "requiredFeatures",
    "version",
    "xlink:arcrole",
    "xlink:show",
    "xlink:type",
    "zoomAndPan",
];

/// Replaces `xlink:`/`xml:` attributes with their plain SVG 2 names and
/// drops attributes SVG 2 no longer defines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveDeprecatedAttributes;

impl Rule for RemoveDeprecatedAttributes {
    fn name(&self) -> &'static str {
        "remove-deprecated-attributes"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(normalize_element);

        // Other xlink attributes may survive (xlink:actuate, xlink:role); the
        // declaration has to stay for them.
        let mut xlink_in_use = false;
        doc.for_each_element(|elem| {
            xlink_in_use |= elem
                .attributes
                .iter()
                .any(|a| a.name.prefix.as_deref() == Some("xlink"));
        });
        if !xlink_in_use {
            doc.root.remove_attr("xmlns:xlink");
        }
        Ok(())
    }
}

fn normalize_element(elem: &mut Element) {
    for (old, new) in RENAMED {
        if !elem.rename_attr(old, new)
            && let Some(value) = elem.remove_attr(old)
        {
            // Both spellings present: the old one carries the value
            if elem.get_attr(new) != Some(value.as_str()) {
                elem.set_attr(new, value);
            }
        }
    }
    elem.attributes
        .retain(|attr| !OBSOLETE.iter().any(|name| attr.name.matches(name)));
}

/// Removes `fill="none"` and `stroke="none"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveDefaultAttributes;

impl Rule for RemoveDefaultAttributes {
    fn name(&self) -> &'static str {
        "remove-default-attributes"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(|elem| {
            elem.attributes.retain(|attr| !is_default_value(&attr.name.full_name(), &attr.value));
        });
        Ok(())
    }
}

fn is_default_value(attr: &str, value: &str) -> bool {
    matches!((attr, value), ("fill", "none") | ("stroke", "none"))
}

/// Removes attributes whose value is blank: only whitespace and characters
/// that render as nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyAttributes;

impl Rule for RemoveEmptyAttributes {
    fn name(&self) -> &'static str {
        "remove-empty-attributes"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(|elem| {
            elem.attributes.retain(|attr| !is_blank(&attr.value));
        });
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.chars().all(|c| c.is_whitespace() || is_invisible(c))
}

static ENABLE_BACKGROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*new\s+0\s+0\s+(\S+)\s+(\S+)\s*$").expect("enable-background pattern is valid")
});

/// Removes `enable-background="new 0 0 W H"` when W and H are the element's
/// own `width` and `height`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanEnableBackground;

impl Rule for CleanEnableBackground {
    fn name(&self) -> &'static str {
        "clean-enable-background"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        doc.for_each_element_mut(|elem| {
            if enable_background_is_redundant(elem) {
                elem.remove_attr("enable-background");
            }
        });
        Ok(())
    }
}

fn enable_background_is_redundant(elem: &Element) -> bool {
    let Some(caps) = elem
        .get_attr("enable-background")
        .and_then(|value| ENABLE_BACKGROUND_RE.captures(value))
    else {
        return false;
    };
    elem.get_attr("width") == Some(&caps[1]) && elem.get_attr("height") == Some(&caps[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    fn run(rule: &dyn Rule, svg: &str) -> String {
        let mut doc = parse_svg(svg).unwrap();
        rule.apply(&mut doc).unwrap();
        doc.to_markup()
    }

    #[test]
    fn test_xlink_href_renamed() {
        assert_eq!(
            run(
                &RemoveDeprecatedAttributes,
                r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a" x="1"/></svg>"##
            ),
            r##"<svg><use href="#a" x="1"/></svg>"##
        );
    }

    #[test]
    fn test_renamed_attribute_overrides_existing() {
        assert_eq!(
            run(&RemoveDeprecatedAttributes, r##"<svg><use href="#b" xlink:href="#a"/></svg>"##),
            r##"<svg><use href="#a"/></svg>"##
        );
        assert_eq!(
            run(&RemoveDeprecatedAttributes, r##"<svg><use href="#a" xlink:href="#a"/></svg>"##),
            r##"<svg><use href="#a"/></svg>"##
        );
    }

    #[test]
    fn test_title_and_lang() {
        assert_eq!(
            run(&RemoveDeprecatedAttributes, r#"<svg xml:lang="en"><a xlink:title="t"/></svg>"#),
            r#"<svg lang="en"><a title="t"/></svg>"#
        );
    }

    #[test]
    fn test_obsolete_removed() {
        assert_eq!(
            run(
                &RemoveDeprecatedAttributes,
                r#"<svg version="1.1" baseProfile="full" zoomAndPan="magnify"><a xlink:show="new" xlink:type="simple" xlink:arcrole="x" requiredFeatures="y"/></svg>"#
            ),
            r#"<svg><a/></svg>"#
        );
    }

    #[test]
    fn test_xlink_declaration_kept_while_used() {
        assert_eq!(
            run(
                &RemoveDeprecatedAttributes,
                r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:actuate="onLoad"/></svg>"#
            ),
            r#"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><a xlink:actuate="onLoad"/></svg>"#
        );
    }

    #[test]
    fn test_default_values_removed() {
        assert_eq!(
            run(
                &RemoveDefaultAttributes,
                r#"<svg><rect fill="none" stroke="none"/><rect fill="red" stroke="none "/></svg>"#
            ),
            r#"<svg><rect/><rect fill="red" stroke="none "/></svg>"#
        );
    }

    #[test]
    fn test_empty_values_removed() {
        assert_eq!(
            run(&RemoveEmptyAttributes, "<svg class=\"\"><rect id=\"  \" x=\"0\" style=\"&#10;\"/></svg>"),
            r#"<svg><rect x="0"/></svg>"#
        );
        assert_eq!(
            run(&RemoveEmptyAttributes, "<svg><rect class=\"\u{200B}\" id=\"&#xAD; \" x=\"a\u{200B}\"/></svg>"),
            "<svg><rect x=\"a\u{200B}\"/></svg>"
        );
    }

    #[test]
    fn test_enable_background() {
        assert_eq!(
            run(
                &CleanEnableBackground,
                r#"<svg width="100" height="50" enable-background="new 0 0 100 50"><g enable-background="new 0 0 10 10" width="20" height="10"/></svg>"#
            ),
            r#"<svg width="100" height="50"><g enable-background="new 0 0 10 10" width="20" height="10"/></svg>"#
        );
        assert_eq!(
            run(&CleanEnableBackground, r#"<svg enable-background="new"/>"#),
            r#"<svg enable-background="new"/>"#
        );
    }
}
