//! Owned, parser-independent view of one ability definition

use super::{
    descendants_of_kind, first_descendant_of_kind, named_children, node_text, string_literal_value,
    strip_quotes,
};
use tree_sitter::Node;

/// One top-level property of an ability object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerView {
    pub name: String,
    /// Full property text, including the name and parameters
    pub text: String,
    /// Text of the first statement block inside the property, if any
    pub body: Option<String>,
}

impl HandlerView {
    pub fn new(name: impl Into<String>, text: impl Into<String>, body: Option<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            body,
        }
    }

    fn from_node(node: Node<'_>, source: &[u8]) -> Option<Self> {
        let name = match node.kind() {
            "pair" | "method_definition" => {
                let field = if node.kind() == "pair" { "key" } else { "name" };
                strip_quotes(node_text(node.child_by_field_name(field)?, source))
            }
            "shorthand_property_identifier" => node_text(node, source).to_string(),
            _ => return None,
        };
        let body = first_descendant_of_kind(node, "statement_block")
            .map(|block| node_text(block, source).to_string());
        Some(Self {
            name,
            text: node_text(node, source).to_string(),
            body,
        })
    }
}

/// First argument of a call, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArgument {
    /// A plain string literal, unescaped
    StringLiteral(String),
    /// Anything else (identifiers, templates, expressions)
    Other(String),
}

/// A call expression somewhere inside an ability definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Callee expression text, e.g. `this.field.setWeather`
    pub callee: String,
    pub first_argument: Option<CallArgument>,
}

impl CallSite {
    fn from_node(node: Node<'_>, source: &[u8]) -> Option<Self> {
        let callee = node_text(node.child_by_field_name("function")?, source).to_string();
        let first_argument = node
            .child_by_field_name("arguments")
            .and_then(|args| named_children(args).into_iter().next())
            .map(|arg| match string_literal_value(arg, source) {
                Some(value) => CallArgument::StringLiteral(value),
                None => CallArgument::Other(node_text(arg, source).to_string()),
            });
        Some(Self { callee, first_argument })
    }
}

/// Everything the detectors may look at for one ability
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilitySource {
    pub id: String,
    /// Text of the whole ability object literal
    pub text: String,
    /// Top-level properties in declaration order
    pub handlers: Vec<HandlerView>,
    /// Every call expression inside the object, in document order
    pub calls: Vec<CallSite>,
}

impl AbilitySource {
    /// Lower an ability object literal into an owned view
    pub fn from_node(id: impl Into<String>, object: Node<'_>, source: &[u8]) -> Self {
        let handlers = named_children(object)
            .into_iter()
            .filter_map(|child| HandlerView::from_node(child, source))
            .collect();
        let calls = descendants_of_kind(object, "call_expression")
            .into_iter()
            .filter_map(|call| CallSite::from_node(call, source))
            .collect();

        Self {
            id: id.into(),
            text: node_text(object, source).to_string(),
            handlers,
            calls,
        }
    }

    /// Hand-built view, mostly for tests and synthetic inputs
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_handler(mut self, handler: HandlerView) -> Self {
        self.text.push_str(&handler.text);
        self.text.push('\n');
        self.handlers.push(handler);
        self
    }

    /// First property with the given name
    pub fn handler(&self, name: &str) -> Option<&HandlerView> {
        self.handlers.iter().find(|h| h.name == name)
    }

    /// Present handlers among `names`, in the order of `names`
    pub fn handlers_in<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a HandlerView> + 'a {
        names.iter().filter_map(move |name| self.handler(name))
    }

    /// First present handler among `names`, by priority
    pub fn first_handler(&self, names: &[&str]) -> Option<&HandlerView> {
        names.iter().find_map(|name| self.handler(name))
    }

    /// Bodies of present handlers among `names`; body-less handlers are skipped
    pub fn bodies_in<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.handlers_in(names).filter_map(|h| h.body.as_deref())
    }

    /// First call whose callee text ends with `suffix`
    pub fn first_call_ending_with(&self, suffix: &str) -> Option<&CallSite> {
        self.calls.iter().find(|call| call.callee.ends_with(suffix))
    }
}
