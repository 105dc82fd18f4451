//! Non-rendering content removal.

use crate::ast::{Document, Element, Pattern};
use crate::error::ShrinkError;
use crate::rules::Rule;

const METADATA_ELEMENTS: [&str; 3] = ["metadata", "title", "desc"];

const EDITOR_PREFIXES: [&str; 2] = ["sodipodi", "inkscape"];

/// Removes `<metadata>`, `<title>` and `<desc>` elements along with
/// Inkscape/Sodipodi editor elements and attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveMetadata;

impl Rule for RemoveMetadata {
    fn name(&self) -> &'static str {
        "remove-metadata"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        // Reverse pre-order keeps the remaining snapshot paths valid
        let doomed: Vec<_> = doc
            .query(Pattern::Any)
            .into_iter()
            .filter(|path| !path.is_empty())
            .filter(|path| doc.element(path).is_some_and(is_metadata))
            .collect();
        for path in doomed.iter().rev() {
            doc.remove(path);
        }

        doc.for_each_element_mut(|elem| {
            elem.attributes
                .retain(|attr| !is_editor_prefix(attr.name.prefix.as_deref()));
        });
        Ok(())
    }
}

fn is_metadata(elem: &Element) -> bool {
    METADATA_ELEMENTS.iter().any(|&name| elem.name.local == name) || is_editor_prefix(elem.name.prefix.as_deref())
}

fn is_editor_prefix(prefix: Option<&str>) -> bool {
    prefix.is_some_and(|p| EDITOR_PREFIXES.contains(&p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_metadata_elements_removed() {
        let mut doc = parse_svg(
            r#"<svg><title>T</title><metadata><rdf:RDF/></metadata><g><desc>d</desc><rect/></g></svg>"#,
        )
        .unwrap();
        RemoveMetadata.apply(&mut doc).unwrap();
        assert_eq!(doc.to_markup(), "<svg><g><rect/></g></svg>");
    }

    #[test]
    fn test_editor_data_removed() {
        let mut doc = parse_svg(
            r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" inkscape:version="1.0"><sodipodi:namedview inkscape:zoom="1"/><g inkscape:label="Layer 1"><rect/></g></svg>"#,
        )
        .unwrap();
        RemoveMetadata.apply(&mut doc).unwrap();
        let out = doc.to_markup();
        assert!(!out.contains("inkscape:version"));
        assert!(!out.contains("sodipodi:namedview"));
        assert!(!out.contains("inkscape:label"));
        // namespace declarations are left to remove-unused-namespaces
        assert!(out.contains("xmlns:inkscape"));
    }
}
