//! Cheap structural check that a string looks like an SVG document.
//!
//! This is not schema validation. It only confirms that, once the XML
//! declaration and DOCTYPE are skipped, the markup opens with an `<svg>` tag.

use std::sync::LazyLock;

use regex::Regex;

static PROLOG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:<\?xml\b[^>]*\?>\s*)?(?:<!DOCTYPE\b[^\[>]*(?:\[[\s\S]*?\])?\s*>\s*)?")
        .expect("prolog pattern is valid")
});

static SVG_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<svg(?:\s|/?>)").expect("svg pattern is valid"));

/// Check whether `markup` is plausibly an SVG document.
pub fn is_valid(markup: &str) -> bool {
    let rest = match PROLOG_RE.find(markup) {
        Some(m) => &markup[m.end()..],
        None => markup,
    };
    SVG_OPEN_RE.is_match(rest)
}

/// Remove a leading XML declaration, if any.
pub(crate) fn strip_xml_declaration(markup: &str) -> &str {
    let trimmed = markup.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return &trimmed[end + 2..];
    }
    markup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_svg() {
        assert!(is_valid(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#));
        assert!(is_valid("<svg/>"));
        assert!(is_valid("<svg>"));
        assert!(is_valid("\n  <svg\n width=\"1\"/>"));
    }

    #[test]
    fn test_accepts_prolog() {
        assert!(is_valid(r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg/>"#));
        assert!(is_valid(r#"<!DOCTYPE svg [ <!ENTITY ns "x"> ]><svg/>"#));
    }

    #[test]
    fn test_rejects_other_markup() {
        assert!(!is_valid(""));
        assert!(!is_valid("<html></html>"));
        assert!(!is_valid("<svgfoo/>"));
        assert!(!is_valid("just text"));
        assert!(!is_valid("<!-- c --><svg/>"));
    }

    #[test]
    fn test_strip_xml_declaration() {
        assert_eq!(strip_xml_declaration("<?xml version=\"1.0\"?><svg/>"), "<svg/>");
        assert_eq!(strip_xml_declaration("<svg/>"), "<svg/>");
    }
}
