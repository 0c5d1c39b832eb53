//! TypeScript source adapter
//!
//! Parses ability modules with tree-sitter and lowers each ability entry into
//! an owned [`AbilitySource`] view. Everything downstream of this module
//! works on those views and never sees a parser type.

pub mod ability;
pub mod locator;

pub use ability::{AbilitySource, CallArgument, CallSite, HandlerView};
pub use locator::{locate_abilities, ContainerEntry, LocateStrategy, LocatedContainer, SkipReason};

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Well-known binding name of the ability table
pub const ABILITIES_BINDING: &str = "Abilities";

/// Wrapper expressions that may sit between a declarator and its object
/// literal (`{...} as T`, `{...} satisfies T`, `({...})`, `x!`)
const TRANSPARENT_WRAPPERS: &[&str] = &[
    "as_expression",
    "satisfies_expression",
    "parenthesized_expression",
    "non_null_expression",
];

/// One parsed input module
pub struct SourceModule {
    path: PathBuf,
    text: String,
    tree: Tree,
}

impl std::fmt::Debug for SourceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceModule")
            .field("path", &self.path)
            .field("bytes", &self.text.len())
            .finish()
    }
}

impl SourceModule {
    /// Parse TypeScript source text
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let text = text.into();

        let mut parser = Parser::new();
        parser
            .set_language(tree_sitter_typescript::language_typescript())
            .map_err(|e| Error::Parse(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| Error::Parse(format!("tree-sitter produced no tree for {}", path.display())))?;

        Ok(Self { path, text, tree })
    }

    /// Read and parse a module from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, text)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Locate the `Abilities` object of this module
    pub fn locate_abilities(&self) -> Option<LocatedContainer<'_>> {
        locate_abilities(self.root_node(), self.text.as_bytes())
    }

    /// The first qualifying ability entry with exactly this id
    pub fn find_ability(&self, id: &str) -> Option<AbilitySource> {
        let container = self.locate_abilities()?;
        container
            .entries(self.text.as_bytes())
            .into_iter()
            .find_map(|entry| match entry {
                ContainerEntry::Ability(ability) if ability.id == id => Some(ability),
                _ => None,
            })
    }
}

/// Source text covered by `node`; invalid UTF-8 yields an empty slice
pub fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or_default()
}

/// All descendants of `node` (excluding `node` itself) in document order
pub fn descendants(node: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = children(node);
    stack.reverse();
    while let Some(current) = stack.pop() {
        out.push(current);
        let mut kids = children(current);
        kids.reverse();
        stack.extend(kids);
    }
    out
}

/// Descendants of the given kind, in document order
pub fn descendants_of_kind<'t>(node: Node<'t>, kind: &str) -> Vec<Node<'t>> {
    descendants(node).into_iter().filter(|n| n.kind() == kind).collect()
}

/// First descendant of the given kind in pre-order
pub fn first_descendant_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut stack = children(node);
    stack.reverse();
    while let Some(current) = stack.pop() {
        if current.kind() == kind {
            return Some(current);
        }
        let mut kids = children(current);
        kids.reverse();
        stack.extend(kids);
    }
    None
}

/// Named, non-comment children
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let kids: Vec<_> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    kids
}

fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let kids: Vec<_> = node.children(&mut cursor).collect();
    kids
}

/// Strip type assertions and parentheses around an expression
pub fn unwrap_expression(mut node: Node<'_>) -> Node<'_> {
    while TRANSPARENT_WRAPPERS.contains(&node.kind()) {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Literal value of a `string` node; `None` for any other node kind
pub fn string_literal_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let raw = node_text(node, source);
    let inner = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    Some(unescape(inner))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Property key text with every quote character removed
pub fn strip_quotes(key: &str) -> String {
    key.chars().filter(|c| !matches!(c, '\'' | '"' | '`')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_walk() {
        let module = SourceModule::parse("inline.ts", "const a = foo(1); bar('x');").unwrap();
        let calls = descendants_of_kind(module.root_node(), "call_expression");
        let callees: Vec<_> = calls
            .iter()
            .filter_map(|c| c.child_by_field_name("function"))
            .map(|f| node_text(f, module.text().as_bytes()))
            .collect();
        assert_eq!(callees, vec!["foo", "bar"]);
    }

    #[test]
    fn test_first_descendant_is_preorder() {
        let module = SourceModule::parse("inline.ts", "function f() { if (x) { y(); } }").unwrap();
        let block = first_descendant_of_kind(module.root_node(), "statement_block").unwrap();
        assert!(node_text(block, module.text().as_bytes()).starts_with("{ if"));
    }

    #[test]
    fn test_string_literal_value() {
        let module = SourceModule::parse("inline.ts", r#"f('rain\'s', "sun");"#).unwrap();
        let strings = descendants_of_kind(module.root_node(), "string");
        let values: Vec<_> = strings
            .iter()
            .filter_map(|s| string_literal_value(*s, module.text().as_bytes()))
            .collect();
        assert_eq!(values, vec!["rain's".to_string(), "sun".to_string()]);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'quark drive'"), "quark drive");
        assert_eq!(strip_quotes("\"x\""), "x");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SourceModule::load(Path::new("/definitely/not/here/abilities.ts")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
