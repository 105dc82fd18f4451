//! Unused namespace declaration removal.

use std::collections::HashSet;

use crate::ast::{Document, Element};
use crate::error::ShrinkError;
use crate::rules::Rule;

/// Removes `xmlns:prefix` declarations whose prefix appears on no element
/// or attribute. The default namespace is always kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveUnusedNamespaces;

impl Rule for RemoveUnusedNamespaces {
    fn name(&self) -> &'static str {
        "remove-unused-namespaces"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        let mut used_prefixes = HashSet::new();
        doc.for_each_element(|elem| collect_used_prefixes(elem, &mut used_prefixes));

        doc.for_each_element_mut(|elem| {
            elem.attributes.retain(|attr| {
                // xmlns:prefix - keep if prefix is used
                attr.name.prefix.as_deref() != Some("xmlns") || used_prefixes.contains(&attr.name.local)
            });
        });
        Ok(())
    }
}

fn collect_used_prefixes(elem: &Element, used: &mut HashSet<String>) {
    if let Some(prefix) = &elem.name.prefix {
        used.insert(prefix.clone());
    }
    for attr in &elem.attributes {
        if let Some(prefix) = &attr.name.prefix
            && !attr.name.is_xmlns()
        {
            used.insert(prefix.clone());
        }
    }
}
