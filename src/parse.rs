//! SVG parsing from XML.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::ShrinkError;

/// Parse an SVG string into a Document.
pub fn parse_svg(svg: &str) -> Result<Document, ShrinkError> {
    let mut reader = Reader::from_str(svg);

    let mut xml_declaration = None;
    let mut doctype = None;
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Decl(decl) => {
                xml_declaration = Some(XmlDeclaration {
                    version: String::from_utf8_lossy(decl.version()?.as_ref()).into_owned(),
                    encoding: decl
                        .encoding()
                        .transpose()
                        .ok()
                        .flatten()
                        .map(|e| String::from_utf8_lossy(e.as_ref()).into_owned()),
                    standalone: decl.standalone().transpose().ok().flatten().map(|s| {
                        let s = String::from_utf8_lossy(s.as_ref());
                        s == "yes"
                    }),
                });
            }
            Event::DocType(dt) => {
                doctype = Some(String::from_utf8_lossy(&dt).trim().to_string());
            }
            Event::Start(start) => {
                root = Some(parse_element(&mut reader, &start)?);
                break;
            }
            Event::Empty(start) => {
                root = Some(parse_element_start(&start, true)?);
                break;
            }
            Event::End(_) => {
                return Err(ShrinkError::InvalidSvg("Unexpected closing tag before root".into()));
            }
            Event::Eof => break,
            // Top-level comments, whitespace and PIs before the root are dropped
            _ => {}
        }
    }

    let root = root.ok_or_else(|| ShrinkError::InvalidSvg("No root element found".into()))?;

    // Anything after the root must still be well-formed
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(_) | Event::Empty(_) | Event::End(_) => {
                return Err(ShrinkError::InvalidSvg("Content after root element".into()));
            }
            _ => {}
        }
    }

    Ok(Document {
        xml_declaration,
        doctype,
        root,
    })
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Element, ShrinkError> {
    let mut element = parse_element_start(start, false)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start, true)?));
            }
            Event::End(_) => {
                break;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                // quick-xml may split text around entity boundaries
                if let Some(Node::Text(prev)) = element.children.last_mut() {
                    prev.push_str(&text);
                } else {
                    element.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                let (target, rest) = content
                    .split_once(char::is_whitespace)
                    .map(|(t, r)| (t.to_string(), Some(r.to_string())))
                    .unwrap_or_else(|| (content, None));
                element
                    .children
                    .push(Node::ProcessingInstruction { target, content: rest });
            }
            Event::Eof => {
                return Err(ShrinkError::InvalidSvg("Unexpected end of file".into()));
            }
            _ => {}
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart, self_closing: bool) -> Result<Element, ShrinkError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
        children: Vec::new(),
        self_closing,
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| ShrinkError::InvalidSvg(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = normalize_attr_whitespace(std::str::from_utf8(&attr.value)?);
        let value = unescape(&raw)
            .map_err(|e| ShrinkError::InvalidSvg(format!("Invalid value for `{}`: {}", key, e)))?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

/// Attribute-value normalization: literal line breaks and tabs read as a
/// single space each. Character references such as `&#10;` are resolved
/// afterwards and keep their character.
fn normalize_attr_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}
