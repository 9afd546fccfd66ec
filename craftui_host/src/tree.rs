// Copyright 2025 the Craftui Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational element tree backing [`HeadlessDom`](crate::HeadlessDom).

use craftui_selector::{QueryImpl, SelectorQuery};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::parser::SelectorImpl;
use selectors::{Element, OpaqueElement};

use crate::types::ElementId;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    tag: String,
    attrs: Vec<(String, String)>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(generation: u32, tag: &str) -> Self {
        Self {
            generation,
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ElementTree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl ElementTree {
    pub(crate) fn create(&mut self, tag: &str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    pub(crate) fn is_alive(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    fn get(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|n| n.generation == id.generation())
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|n| n.generation == id.generation())
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Returns `false` if either id is stale or the move would create a cycle.
    pub(crate) fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return false;
        }
        if self.ancestors_inclusive(parent).any(|a| a == child) {
            return false;
        }
        self.detach(child);
        if let Some(n) = self.get_mut(child) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        true
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// Remove `id` and its subtree. Ids into the subtree become stale.
    pub(crate) fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        let children = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            if let Some(n) = self.get_mut(child) {
                n.parent = None;
            }
            self.remove(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    pub(crate) fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|n| n.tag.as_str())
    }

    pub(crate) fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub(crate) fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    fn prev_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    pub(crate) fn ancestors_inclusive(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        let start = self.is_alive(id).then_some(id);
        core::iter::successors(start, move |cur| self.parent(*cur))
    }

    pub(crate) fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(n) = self.get_mut(id) else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match n.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => value.clone_into(v),
            None => n.attrs.push((name, value.to_owned())),
        }
    }

    pub(crate) fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    pub(crate) fn add_class(&mut self, id: ElementId, class: &str) {
        if !self.is_alive(id) || self.has_class(id, class) {
            return;
        }
        let value = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.set_attribute(id, "class", &value);
    }

    pub(crate) fn remove_class(&mut self, id: ElementId, class: &str) {
        let Some(existing) = self.attribute(id, "class") else {
            return;
        };
        let value = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(id, "class", &value);
    }

    pub(crate) fn element(&self, id: ElementId) -> Option<NodeRef<'_>> {
        self.get(id).map(|node| NodeRef {
            tree: self,
            id,
            node,
        })
    }

    /// Depth-first, pre-order walk of the subtree rooted at `root`.
    pub(crate) fn descendants_inclusive(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Stale ids never match.
    pub(crate) fn matches(&self, id: ElementId, query: &SelectorQuery) -> bool {
        self.element(id).is_some_and(|e| query.matches(&e))
    }
}

/// Borrowed view of one live element, as seen by the selector engine.
///
/// Every element is an HTML element without a namespace on its attributes.
/// There are no text nodes, so `:empty` means "no element children".
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef<'a> {
    tree: &'a ElementTree,
    id: ElementId,
    node: &'a Node,
}

impl NodeRef<'_> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.node
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Element for NodeRef<'_> {
    type Impl = QueryImpl;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.node)
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree.element(self.node.parent?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.tree.element(self.tree.prev_sibling(self.id)?)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.tree.element(self.tree.next_sibling(self.id)?)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.tree.element(*self.node.children.first()?)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &<QueryImpl as SelectorImpl>::BorrowedLocalName) -> bool {
        *local_name.0 == *self.node.tag
    }

    fn has_namespace(&self, ns: &<QueryImpl as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        **ns == *HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.node.tag == other.node.tag
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&<QueryImpl as SelectorImpl>::NamespaceUrl>,
        local_name: &<QueryImpl as SelectorImpl>::LocalName,
        operation: &AttrSelectorOperation<&<QueryImpl as SelectorImpl>::AttrValue>,
    ) -> bool {
        if let NamespaceConstraint::Specific(url) = ns
            && !url.is_empty()
        {
            return false;
        }
        self.attr(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &<QueryImpl as SelectorImpl>::NonTSPseudoClass,
        _context: &mut MatchingContext<'_, QueryImpl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &<QueryImpl as SelectorImpl>::PseudoElement,
        _context: &mut MatchingContext<'_, QueryImpl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.node.tag.as_str(), "a" | "area" | "link") && self.attr("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.node.tag == "slot"
    }

    fn has_id(
        &self,
        id: &<QueryImpl as SelectorImpl>::Identifier,
        case_sensitivity: CaseSensitivity,
    ) -> bool {
        self.attr("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(
        &self,
        name: &<QueryImpl as SelectorImpl>::Identifier,
        case_sensitivity: CaseSensitivity,
    ) -> bool {
        self.attr("class").is_some_and(|list| {
            list.split_ascii_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn imported_part(
        &self,
        _name: &<QueryImpl as SelectorImpl>::Identifier,
    ) -> Option<<QueryImpl as SelectorImpl>::Identifier> {
        None
    }

    fn is_part(&self, _name: &<QueryImpl as SelectorImpl>::Identifier) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.node.children.is_empty()
    }

    fn is_root(&self) -> bool {
        self.node.parent.is_none() && self.node.tag == "html"
    }
}
