//! Attribute ordering.

use std::collections::HashMap;

use crate::ast::{Attribute, Document, Element};
use crate::error::ShrinkError;
use crate::rules::Rule;

const PINNED: [&str; 3] = ["id", "width", "height"];

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";

/// Puts `id`, `width` and `height` first, then orders the remaining
/// attributes by `namespaceURI:localName` (or plain name when the attribute
/// has no namespace), comparing bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortAttributes;

impl Rule for SortAttributes {
    fn name(&self) -> &'static str {
        "sort-attributes"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        let mut scope = HashMap::new();
        scope.insert("xml".to_string(), XML_NS.to_string());
        scope.insert("xmlns".to_string(), XMLNS_NS.to_string());
        sort_element(&mut doc.root, &scope);
        Ok(())
    }
}

fn sort_element(elem: &mut Element, parent_scope: &HashMap<String, String>) {
    let mut scope = parent_scope.clone();
    for attr in &elem.attributes {
        if attr.name.prefix.as_deref() == Some("xmlns") {
            scope.insert(attr.name.local.clone(), attr.value.clone());
        }
    }

    let mut keyed: Vec<(SortKey, Attribute)> = std::mem::take(&mut elem.attributes)
        .into_iter()
        .map(|attr| (sort_key(&attr, &scope), attr))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    elem.attributes = keyed.into_iter().map(|(_, attr)| attr).collect();

    for child in elem.child_elements_mut() {
        sort_element(child, &scope);
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Pinned(usize),
    Qualified(String),
}

fn sort_key(attr: &Attribute, scope: &HashMap<String, String>) -> SortKey {
    let name = &attr.name;
    if name.prefix.is_none()
        && let Some(rank) = PINNED.iter().position(|&p| p == name.local)
    {
        return SortKey::Pinned(rank);
    }

    let key = match &name.prefix {
        Some(prefix) => match scope.get(prefix) {
            Some(uri) => format!("{}:{}", uri, name.local),
            None => name.full_name(),
        },
        // The default namespace declaration lives in the xmlns namespace
        None if name.local == "xmlns" => format!("{}:xmlns", XMLNS_NS),
        None => name.local.clone(),
    };
    SortKey::Qualified(key)
}
