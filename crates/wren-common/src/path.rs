//! Logical property paths.
//!
//! A logical property is identified by a colon-delimited path such as
//! `html:disabled`, `uniface:icon`, `classes:u-button` or plain `value`.
//! A path whose first segment is not one of the known groups names a
//! sub-widget, with the remainder re-parsed in that sub-widget's scope
//! (e.g. `change-button:uniface:icon`).

use std::fmt;

/// A parsed logical property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropPath {
    /// The scalar field value of the widget.
    Value,
    /// The valrep option list of the widget.
    ValRep,
    /// An HTML attribute/property of the wrapped control (`html:<id>`).
    Html(String),
    /// A framework-level property (`uniface:<id>`); bare ids parse here.
    Uniface(String),
    /// An inline style property (`style:<id>`).
    Style(String),
    /// A css class toggle (`classes:<id>`; `class:` is accepted as alias).
    Classes(String),
    /// A property delegated to a sub-widget under its id prefix.
    Sub(String, Box<PropPath>),
}

impl PropPath {
    /// Parse a colon-delimited property path.
    ///
    /// Bare ids other than `value`/`valrep` are framework-level
    /// (`uniface`) properties, matching how the host framework flattens
    /// them in deltas.
    pub fn parse(path: &str) -> Self {
        match path {
            "value" => return PropPath::Value,
            "valrep" => return PropPath::ValRep,
            _ => {}
        }
        match path.split_once(':') {
            None => PropPath::Uniface(path.to_string()),
            Some((prefix, rest)) => match prefix {
                "html" => PropPath::Html(rest.to_string()),
                "uniface" => PropPath::Uniface(rest.to_string()),
                "style" => PropPath::Style(rest.to_string()),
                "classes" | "class" => PropPath::Classes(rest.to_string()),
                _ => PropPath::Sub(prefix.to_string(), Box::new(PropPath::parse(rest))),
            },
        }
    }
}

/// Normalize a host-delivered trigger name.
///
/// Host-side identifiers cannot contain `:` or `-`, so trigger names
/// arrive with underscores: a double underscore encodes the sub-widget
/// delimiter and a single underscore encodes a dash.
pub fn normalize_trigger_name(name: &str) -> String {
    name.replace("__", ":").replace('_', "-")
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropPath::Value => write!(f, "value"),
            PropPath::ValRep => write!(f, "valrep"),
            PropPath::Html(id) => write!(f, "html:{id}"),
            PropPath::Uniface(id) => write!(f, "uniface:{id}"),
            PropPath::Style(id) => write!(f, "style:{id}"),
            PropPath::Classes(id) => write!(f, "classes:{id}"),
            PropPath::Sub(id, rest) => write!(f, "{id}:{rest}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_prefixes() {
        assert_eq!(PropPath::parse("value"), PropPath::Value);
        assert_eq!(PropPath::parse("valrep"), PropPath::ValRep);
        assert_eq!(PropPath::parse("html:disabled"), PropPath::Html("disabled".into()));
        assert_eq!(PropPath::parse("uniface:icon"), PropPath::Uniface("icon".into()));
        assert_eq!(PropPath::parse("style:width"), PropPath::Style("width".into()));
        assert_eq!(PropPath::parse("classes:u-button"), PropPath::Classes("u-button".into()));
        assert_eq!(PropPath::parse("class:u-button"), PropPath::Classes("u-button".into()));
    }

    #[test]
    fn bare_ids_are_framework_properties() {
        assert_eq!(PropPath::parse("error"), PropPath::Uniface("error".into()));
    }

    #[test]
    fn unknown_prefix_is_a_sub_widget() {
        assert_eq!(
            PropPath::parse("change-button:uniface:icon"),
            PropPath::Sub(
                "change-button".into(),
                Box::new(PropPath::Uniface("icon".into()))
            )
        );
        assert_eq!(
            PropPath::parse("change-button:value"),
            PropPath::Sub("change-button".into(), Box::new(PropPath::Value))
        );
    }

    #[test]
    fn trigger_names_normalize_underscores() {
        assert_eq!(
            normalize_trigger_name("trigger_Name__disabled"),
            "trigger-Name:disabled"
        );
        assert_eq!(normalize_trigger_name("onchange"), "onchange");
        assert_eq!(normalize_trigger_name("change-button:detail"), "change-button:detail");
    }

    #[test]
    fn display_round_trips() {
        for path in ["value", "html:readonly", "sw1:html:disabled", "classes:x"] {
            assert_eq!(PropPath::parse(path).to_string(), path);
        }
    }
}
