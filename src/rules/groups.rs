//! Group flattening.

use std::collections::VecDeque;
use std::mem;

use crate::ast::{Attribute, Document, Element, Node};
use crate::error::ShrinkError;
use crate::rules::Rule;

/// Replaces every `<g>` with its children, cascading the group's attributes
/// onto child elements that do not define them.
///
/// Groups are handled parent-before-child: an outer group's attributes reach
/// an inner group before the inner group is itself dissolved, so any depth of
/// nesting collapses in a single pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlattenGroups;

impl Rule for FlattenGroups {
    fn name(&self) -> &'static str {
        "flatten-groups"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), ShrinkError> {
        let mut flattened = 0;
        flatten_children(&mut doc.root, &mut flattened);
        if flattened > 0 {
            tracing::debug!(groups = flattened, "flattened groups");
        }
        Ok(())
    }
}

fn flatten_children(parent: &mut Element, flattened: &mut usize) {
    let mut pending: VecDeque<Node> = mem::take(&mut parent.children).into();
    let mut children = Vec::with_capacity(pending.len());

    while let Some(node) = pending.pop_front() {
        match node {
            Node::Element(group) if group.is("g") => {
                *flattened += 1;
                let Element {
                    attributes, children: mut inner, ..
                } = group;
                cascade(&attributes, &mut inner);
                // Spliced children go back on the queue so nested groups are
                // seen next, already carrying the cascaded attributes.
                for child in inner.into_iter().rev() {
                    pending.push_front(child);
                }
            }
            Node::Element(mut elem) => {
                flatten_children(&mut elem, flattened);
                children.push(Node::Element(elem));
            }
            other => children.push(other),
        }
    }

    parent.children = children;
}

fn cascade(attributes: &[Attribute], children: &mut [Node]) {
    for child in children.iter_mut().filter_map(Node::as_element_mut) {
        for attr in attributes {
            // Copying an id would duplicate it across siblings
            if attr.name.prefix.is_none() && attr.name.local == "id" {
                continue;
            }
            if !child.attributes.iter().any(|a| a.name == attr.name) {
                child.attributes.push(attr.clone());
            }
        }
    }
}
