//! Locating the `Abilities` object inside a parsed module

use super::{
    descendants_of_kind, named_children, node_text, strip_quotes, unwrap_expression, AbilitySource,
    ABILITIES_BINDING,
};
use tree_sitter::Node;

/// Which lookup found the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateStrategy {
    /// Direct child of the program, possibly under `export`
    TopLevel,
    /// Any declarator anywhere in the tree
    ExhaustiveScan,
}

impl std::fmt::Display for LocateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopLevel => write!(f, "top_level"),
            Self::ExhaustiveScan => write!(f, "exhaustive_scan"),
        }
    }
}

type Strategy = for<'t> fn(Node<'t>, &[u8]) -> Option<Node<'t>>;

/// Tried in order; the first hit wins
const STRATEGIES: &[(LocateStrategy, Strategy)] = &[
    (LocateStrategy::TopLevel, find_top_level),
    (LocateStrategy::ExhaustiveScan, find_anywhere),
];

/// The located ability table
#[derive(Debug, Clone, Copy)]
pub struct LocatedContainer<'t> {
    /// The `object` node bound to `Abilities`, wrappers already stripped
    pub object: Node<'t>,
    pub strategy: LocateStrategy,
}

/// Why a container entry produced no ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ComputedKey,
    Method,
    Spread,
    NotAnObject,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::ComputedKey => "computed key",
            Self::Method => "method shorthand",
            Self::Spread => "spread element",
            Self::NotAnObject => "value is not an object literal",
        };
        f.write_str(reason)
    }
}

/// One own entry of the container, in declaration order
#[derive(Debug, Clone)]
pub enum ContainerEntry {
    Ability(AbilitySource),
    Skipped { key: String, reason: SkipReason },
}

impl<'t> LocatedContainer<'t> {
    /// Number of syntactic entries, qualifying or not
    pub fn entry_count(&self) -> usize {
        named_children(self.object).len()
    }

    /// Lower every qualifying entry into an owned view
    pub fn entries(&self, source: &[u8]) -> Vec<ContainerEntry> {
        named_children(self.object)
            .into_iter()
            .map(|entry| classify_entry(entry, source))
            .collect()
    }
}

fn classify_entry(entry: Node<'_>, source: &[u8]) -> ContainerEntry {
    let skipped = |key: &str, reason| ContainerEntry::Skipped { key: key.to_string(), reason };

    match entry.kind() {
        "pair" => {
            let (Some(key), Some(value)) =
                (entry.child_by_field_name("key"), entry.child_by_field_name("value"))
            else {
                return skipped(node_text(entry, source), SkipReason::NotAnObject);
            };
            if key.kind() == "computed_property_name" {
                return skipped(node_text(key, source), SkipReason::ComputedKey);
            }
            let id = strip_quotes(node_text(key, source));
            if value.kind() != "object" {
                return ContainerEntry::Skipped { key: id, reason: SkipReason::NotAnObject };
            }
            ContainerEntry::Ability(AbilitySource::from_node(id, value, source))
        }
        "method_definition" => {
            let name = entry
                .child_by_field_name("name")
                .map_or("", |n| node_text(n, source));
            skipped(name, SkipReason::Method)
        }
        "spread_element" => skipped(node_text(entry, source), SkipReason::Spread),
        _ => skipped(node_text(entry, source), SkipReason::NotAnObject),
    }
}

/// Run the strategy chain against a program root
pub fn locate_abilities<'t>(root: Node<'t>, source: &[u8]) -> Option<LocatedContainer<'t>> {
    STRATEGIES.iter().find_map(|(strategy, find)| {
        find(root, source).map(|object| LocatedContainer { object, strategy: *strategy })
    })
}

fn find_top_level<'t>(root: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
    named_children(root).into_iter().find_map(|statement| {
        let declaration = if statement.kind() == "export_statement" {
            statement.child_by_field_name("declaration")?
        } else {
            statement
        };
        if !matches!(declaration.kind(), "lexical_declaration" | "variable_declaration") {
            return None;
        }
        named_children(declaration)
            .into_iter()
            .filter(|child| child.kind() == "variable_declarator")
            .find_map(|declarator| abilities_object(declarator, source))
    })
}

fn find_anywhere<'t>(root: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
    descendants_of_kind(root, "variable_declarator")
        .into_iter()
        .find_map(|declarator| abilities_object(declarator, source))
}

/// The object literal initializer of an `Abilities` declarator
fn abilities_object<'t>(declarator: Node<'t>, source: &[u8]) -> Option<Node<'t>> {
    let name = declarator.child_by_field_name("name")?;
    if name.kind() != "identifier" || node_text(name, source) != ABILITIES_BINDING {
        return None;
    }
    let value = unwrap_expression(declarator.child_by_field_name("value")?);
    (value.kind() == "object").then_some(value)
}
