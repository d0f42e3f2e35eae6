//! Css selector parsing and matching.
//!
//! Binding workers locate the element they drive by a selector scoped to
//! the owning widget's root. The grammar is the subset those workers
//! actually use: type, `.class`, `#id` and `[attr]`/`[attr=value]` simple
//! selectors, compounds thereof, and descendant chains
//! (per [Selectors Level 4](https://www.w3.org/TR/selectors-4/)).

use thiserror::Error;

use crate::element::ElementData;
use crate::tree::{DomTree, NodeId};

/// A selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector '{selector}': {reason}")]
pub struct SelectorError {
    /// The offending selector text.
    pub selector: String,
    /// Why it was rejected.
    pub reason: String,
}

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    /// Type selector: `span`, `fluent-checkbox`.
    Type(String),
    /// Class selector: `.u-error-icon`.
    Class(String),
    /// Id selector: `#main`.
    Id(String),
    /// Attribute selector: `[slot]` or `[slot=selected-value]`.
    Attribute {
        name: String,
        value: Option<String>,
    },
}

impl SimpleSelector {
    fn matches(&self, element: &ElementData) -> bool {
        match self {
            SimpleSelector::Type(tag) => element.tag_name.eq_ignore_ascii_case(tag),
            SimpleSelector::Class(class) => element.has_class(class),
            SimpleSelector::Id(id) => element.id() == Some(id),
            SimpleSelector::Attribute { name, value } => match value {
                None => element.attr(name).is_some(),
                Some(expected) => element.attr(name) == Some(expected),
            },
        }
    }
}

/// All conditions that must hold on one element (e.g. `span.u-icon`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompoundSelector {
    simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    fn matches(&self, element: &ElementData) -> bool {
        self.simples.iter().all(|simple| simple.matches(element))
    }
}

/// A parsed selector: a descendant chain of compound selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<CompoundSelector>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] for empty input or syntax outside the
    /// supported subset.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let error = |reason: &str| SelectorError {
            selector: input.to_string(),
            reason: reason.to_string(),
        };
        let mut compounds = Vec::new();
        for part in input.split_whitespace() {
            compounds.push(parse_compound(part).map_err(|reason| error(&reason))?);
        }
        if compounds.is_empty() {
            return Err(error("empty selector"));
        }
        Ok(Selector { compounds })
    }

    /// Whether `id` matches this selector within `scope`.
    ///
    /// The rightmost compound must match `id`; each remaining compound
    /// must match an ancestor, no higher than `scope`.
    pub fn matches(&self, tree: &DomTree, id: NodeId, scope: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(element) {
            return false;
        }
        let mut remaining = ancestors.iter().rev();
        let Some(mut expected) = remaining.next() else {
            return true;
        };
        let mut current = tree.parent(id);
        loop {
            let Some(node) = current else {
                return false;
            };
            if let Some(ancestor) = tree.as_element(node)
                && expected.matches(ancestor)
            {
                match remaining.next() {
                    Some(next) => expected = next,
                    None => return true,
                }
            }
            if node == scope {
                return false;
            }
            current = tree.parent(node);
        }
    }
}

fn parse_compound(part: &str) -> Result<CompoundSelector, String> {
    let mut simples = Vec::new();
    let mut chars = part.chars().peekable();
    while let Some(&first) = chars.peek() {
        match first {
            '.' | '#' => {
                let _ = chars.next();
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(format!("expected a name after '{first}'"));
                }
                simples.push(if first == '.' {
                    SimpleSelector::Class(name)
                } else {
                    SimpleSelector::Id(name)
                });
            }
            '[' => {
                let _ = chars.next();
                let body: String = chars.by_ref().take_while(|&c| c != ']').collect();
                if body.is_empty() {
                    return Err("empty attribute selector".to_string());
                }
                let (name, value) = match body.split_once('=') {
                    None => (body, None),
                    Some((name, value)) => (
                        name.to_string(),
                        Some(value.trim_matches(['\'', '"']).to_string()),
                    ),
                };
                simples.push(SimpleSelector::Attribute { name, value });
            }
            _ => {
                let name = take_name(&mut chars);
                if name.is_empty() {
                    return Err(format!("unexpected character '{first}'"));
                }
                simples.push(SimpleSelector::Type(name));
            }
        }
    }
    if simples.is_empty() {
        return Err("empty compound selector".to_string());
    }
    Ok(CompoundSelector { simples })
}

fn take_name(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c);
            let _ = chars.next();
        } else {
            break;
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::DomTree;

    fn classed(dom: &mut DomTree, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = dom.create_element(tag);
        if !class.is_empty() {
            dom.as_element_mut(id).unwrap().add_class(class);
        }
        dom.append_child(parent, id);
        id
    }

    #[test]
    fn class_and_type_queries() {
        let mut dom = DomTree::new();
        let root = dom.create_element("fluent-text-field");
        dom.append_child(NodeId::ROOT, root);
        let icon = classed(&mut dom, root, "span", "u-error-icon");
        let label = classed(&mut dom, root, "span", "u-label-text");

        let by_class = Selector::parse(".u-error-icon").unwrap();
        assert_eq!(dom.query_selector(root, &by_class), Some(icon));

        let by_compound = Selector::parse("span.u-label-text").unwrap();
        assert_eq!(dom.query_selector(root, &by_compound), Some(label));

        let by_type = Selector::parse("em").unwrap();
        assert_eq!(dom.query_selector(root, &by_type), None);
    }

    #[test]
    fn descendant_chains_stay_in_scope() {
        let mut dom = DomTree::new();
        let outer = dom.create_element("div");
        dom.as_element_mut(outer).unwrap().add_class("u-section");
        dom.append_child(NodeId::ROOT, outer);
        let inner = classed(&mut dom, outer, "div", "u-section");
        let leaf = classed(&mut dom, inner, "span", "u-text");

        let chained = Selector::parse(".u-section .u-text").unwrap();
        assert_eq!(dom.query_selector(outer, &chained), Some(leaf));
        // Scoped to `leaf`'s own parent the ancestor is still found, but
        // scoped below it nothing matches.
        assert_eq!(dom.query_selector(leaf, &chained), None);
    }

    #[test]
    fn attribute_selectors() {
        let mut dom = DomTree::new();
        let root = dom.create_element("fluent-select");
        dom.append_child(NodeId::ROOT, root);
        let option = dom.create_element("fluent-option");
        dom.as_element_mut(option).unwrap().set_attr("slot", "selected-value");
        dom.append_child(root, option);

        let with_value = Selector::parse("[slot='selected-value']").unwrap();
        assert_eq!(dom.query_selector(root, &with_value), Some(option));
        let bare = Selector::parse("[slot]").unwrap();
        assert_eq!(dom.query_selector(root, &bare), Some(option));
        let other = Selector::parse("[slot=end]").unwrap();
        assert_eq!(dom.query_selector(root, &other), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("+wat").is_err());
    }
}
