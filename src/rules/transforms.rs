//! `transform` attribute cleanup.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::ast::{Document, Pattern};
use crate::error::ShrinkError;
use crate::rules::Rule;

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?(?:\d+\.?\d*|\.\d+))%").expect("percent pattern is valid"));

static IDENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:",
        r"translate\(\s*0(?:(?:\s*,\s*|\s+)0)?\s*\)",
        r"|scale\(\s*1(?:(?:\s*,\s*|\s+)1)?\s*\)",
        r"|rotate\(\s*0\s*\)",
        r"|skewX\(\s*0\s*\)",
        r"|skewY\(\s*0\s*\)",
        r")",
    ))
    .expect("identity pattern is valid")
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static COMMA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,\s*").expect("comma pattern is valid"));

/// Removes identity sub-transforms and normalizes spacing in `transform`
/// lists. A list that reduces to nothing is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyTransforms;

impl Rule for MinifyTransforms {
    fn name(&self) -> &'static str {
        "minify-transforms"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        for path in doc.query(Pattern::Attribute("transform")) {
            let Some(elem) = doc.element_mut(&path) else {
                continue;
            };
            let Some(value) = elem.get_attr("transform") else {
                continue;
            };

            let cleaned = minify_transform(value);
            if cleaned.is_empty() || cleaned == "0" {
                elem.remove_attr("transform");
            } else {
                elem.set_attr("transform", cleaned);
            }
        }
        Ok(())
    }
}

pub(crate) fn minify_transform(value: &str) -> String {
    let value = PERCENT_RE.replace_all(value, |caps: &Captures| percent_to_decimal(&caps[1]));
    let value = IDENTITY_RE.replace_all(&value, "");
    let value = WHITESPACE_RE.replace_all(&value, " ");
    let value = COMMA_RE.replace_all(&value, ",");
    value.trim().to_string()
}

fn percent_to_decimal(number: &str) -> String {
    match number.parse::<f64>() {
        Ok(n) => format!("{}", n / 100.0),
        Err(_) => format!("{}%", number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_identities_removed() {
        assert_eq!(
            minify_transform("translate(0,0) scale(1,1) translate(10,20)"),
            "translate(10,20)"
        );
        assert_eq!(minify_transform("translate(0)"), "");
        assert_eq!(minify_transform("scale(1) rotate(0) skewX(0) skewY(0)"), "");
        assert_eq!(minify_transform("translate(0 0) rotate(45)"), "rotate(45)");
    }

    #[test]
    fn test_non_identities_kept() {
        assert_eq!(minify_transform("translate(10,20)"), "translate(10,20)");
        assert_eq!(minify_transform("rotate(45)"), "rotate(45)");
        assert_eq!(minify_transform("scale(1,2)"), "scale(1,2)");
        assert_eq!(minify_transform("translate(0,5)"), "translate(0,5)");
        assert_eq!(minify_transform("rotate(0.5)"), "rotate(0.5)");
    }

    #[test]
    fn test_spacing_normalized() {
        assert_eq!(
            minify_transform("  translate( 10 , 20 )\n\n rotate(45)  "),
            "translate( 10,20 ) rotate(45)"
        );
    }

    #[test]
    fn test_percentages() {
        assert_eq!(minify_transform("scale(50%)"), "scale(0.5)");
        assert_eq!(minify_transform("scale(100%)"), "scale(1)");
        assert_eq!(minify_transform("scale(12.5%, 200%)"), "scale(0.125,2)");
    }

    #[test]
    fn test_attribute_removed_when_empty() {
        let mut doc = parse_svg(
            r#"<svg><g transform="translate(0,0)"><rect transform="rotate(45)"/></g><rect transform=" scale(1) "/></svg>"#,
        )
        .unwrap();
        MinifyTransforms.apply(&mut doc).unwrap();
        assert_eq!(
            doc.to_markup(),
            r#"<svg><g><rect transform="rotate(45)"/></g><rect/></svg>"#
        );
    }

    #[test]
    fn test_zero_value_removed() {
        let mut doc = parse_svg(r#"<svg><rect transform="0"/></svg>"#).unwrap();
        MinifyTransforms.apply(&mut doc).unwrap();
        assert!(!doc.root.child_elements().next().unwrap().has_attr("transform"));
    }
}
