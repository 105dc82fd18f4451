//! SVG serialization back to XML.
//!
//! Serialization is faithful: text, comments and empty-element syntax are
//! written as they are in the tree. Stripping them is the job of the rules.

use crate::ast::*;

/// Serialize a Document to an SVG string.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();

    if let Some(ref decl) = doc.xml_declaration {
        out.push_str("<?xml version=\"");
        out.push_str(&decl.version);
        out.push('"');
        if let Some(ref enc) = decl.encoding {
            out.push_str(" encoding=\"");
            out.push_str(enc);
            out.push('"');
        }
        if let Some(standalone) = decl.standalone {
            out.push_str(" standalone=\"");
            out.push_str(if standalone { "yes" } else { "no" });
            out.push('"');
        }
        out.push_str("?>");
    }

    if let Some(ref dt) = doc.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(dt);
        out.push('>');
    }

    serialize_element(&mut out, &doc.root);

    out
}

fn serialize_element(out: &mut String, elem: &Element) {
    let name = elem.name.full_name();
    out.push('<');
    out.push_str(&name);

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() && elem.self_closing {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &elem.children {
        serialize_node(out, child);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn serialize_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(elem) => serialize_element(out, elem),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::ProcessingInstruction { target, content } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(c) = content {
                out.push(' ');
                out.push_str(c);
            }
            out.push_str("?>");
        }
    }
}

// Line breaks and tabs inside attribute values would be normalized to
// spaces by the next parser, so they are written as character references.
fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            '\u{7f}' => out.push_str("&#127;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\u{7f}' => out.push_str("&#127;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_serialize_simple() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><rect/></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), svg);
    }

    #[test]
    fn test_serialize_is_faithful() {
        let svg = "<?xml version=\"1.0\"?><svg>\n  <!-- note --><rect></rect>\n</svg>";
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), svg);
    }

    #[test]
    fn test_serialize_escapes() {
        let mut doc = parse_svg("<svg/>").unwrap();
        doc.root.set_attr("data-x", "a\"b\nc");
        doc.root.children.push(Node::Text("1 < 2 & 3".into()));
        assert_eq!(
            serialize(&doc),
            "<svg data-x=\"a&quot;b&#10;c\">1 &lt; 2 &amp; 3</svg>"
        );
    }

    #[test]
    fn test_serialize_keeps_doctype() {
        let svg = r#"<!DOCTYPE svg><svg/>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), svg);
    }
}
