//! Highlight tags and the style table that assigns them to node names.

use std::collections::BTreeMap;

use log::debug;

/// Abstract highlight categories. The terminal theme turns these into colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    VariableName,
    Bool,
    String,
    Comment,
    Keyword,
    DefinitionKeyword,
    ControlKeyword,
    Number,
    Paren,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::VariableName => "variableName",
            Tag::Bool => "bool",
            Tag::String => "string",
            Tag::Comment => "comment",
            Tag::Keyword => "keyword",
            Tag::DefinitionKeyword => "definitionKeyword",
            Tag::ControlKeyword => "controlKeyword",
            Tag::Number => "number",
            Tag::Paren => "paren",
        }
    }
}

/// Selector → tag. A selector is a space-separated list of node names.
pub const STYLE_RULES: &[(&str, Tag)] = &[
    ("Identifier", Tag::VariableName),
    ("BooleanLiteral", Tag::Bool),
    ("String", Tag::String),
    ("LineComment", Tag::Comment),
    (
        "if else for foreach in to while loop match lambda and or null",
        Tag::Keyword,
    ),
    ("set function", Tag::DefinitionKeyword),
    ("return continue break", Tag::ControlKeyword),
    ("Number", Tag::Number),
    ("( )", Tag::Paren),
];

/// Resolved node-name → tag lookup for one parser vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleTable {
    tags: BTreeMap<&'static str, Tag>,
}

impl StyleTable {
    /// Applies `rules` to the names in `vocabulary`. Names the vocabulary
    /// lacks are skipped; the first rule to claim a name keeps it.
    pub fn build(rules: &[(&'static str, Tag)], vocabulary: &[&'static str]) -> Self {
        let mut tags = BTreeMap::new();
        for &(selector, tag) in rules {
            for name in selector.split_whitespace() {
                let Some(&known) = vocabulary.iter().find(|v| **v == name) else {
                    debug!("Style rule for '{}' has no matching node, skipping", name);
                    continue;
                };
                if let Some(existing) = tags.get(known) {
                    debug!(
                        "Node '{}' already styled as {:?}, ignoring {:?}",
                        known, existing, tag
                    );
                    continue;
                }
                tags.insert(known, tag);
            }
        }
        Self { tags }
    }

    pub fn get(&self, name: &str) -> Option<Tag> {
        self.tags.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Tag)> + '_ {
        self.tags.iter().map(|(name, tag)| (*name, *tag))
    }
}
