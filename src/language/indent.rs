//! Indentation rules keyed by node name.

use std::collections::BTreeMap;

use log::debug;

use super::syntax::{SyntaxNode, SyntaxTree, BLOCK};

/// Columns added per nesting level unless the caller says otherwise.
pub const DEFAULT_INDENT_UNIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentRule {
    /// Interior lines sit one unit deeper than the line that opened the
    /// node; a line starting with `closing` returns to that base. With
    /// `align`, content after the opener on its own line sets the column.
    Delimited { closing: char, align: bool },
}

pub const INDENT_RULES: &[(&str, IndentRule)] = &[(
    BLOCK,
    IndentRule::Delimited {
        closing: '}',
        align: false,
    },
)];

/// Resolved node-name → rule lookup for one parser vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentTable {
    rules: BTreeMap<&'static str, IndentRule>,
}

impl IndentTable {
    pub fn build(rules: &[(&'static str, IndentRule)], vocabulary: &[&'static str]) -> Self {
        let mut table = BTreeMap::new();
        for &(name, rule) in rules {
            if vocabulary.contains(&name) {
                table.entry(name).or_insert(rule);
            } else {
                debug!("Indent rule for '{}' has no matching node, skipping", name);
            }
        }
        Self { rules: table }
    }

    pub fn get(&self, name: &str) -> Option<IndentRule> {
        self.rules.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Indentation in columns for the line beginning at byte `line_start`.
    pub fn indent_at(&self, tree: &SyntaxTree, source: &str, line_start: usize, unit: usize) -> usize {
        let line_start = line_start.min(source.len());
        let Some((node, rule)) = self.innermost(&tree.root, line_start) else {
            return 0;
        };
        let IndentRule::Delimited { closing, align } = rule;

        let opener_line = line_start_of(source, node.span.start);
        let base = leading_columns(&source[opener_line..], unit);
        let closes = source[line_start..]
            .trim_start_matches([' ', '\t'])
            .starts_with(closing);

        if align {
            let after_opener = node.span.start + 1;
            let rest = &source[after_opener..line_end_of(source, after_opener)];
            let content = rest.len() - rest.trim_start().len();
            if !rest.trim().is_empty() {
                let target = if closes {
                    node.span.start
                } else {
                    after_opener + content
                };
                return column_of(source, opener_line, target, unit);
            }
        }

        if closes { base } else { base + unit }
    }

    fn innermost<'t>(&self, node: &'t SyntaxNode, pos: usize) -> Option<(&'t SyntaxNode, IndentRule)> {
        let mut found = None;
        for child in &node.children {
            if child.is_leaf() || !encloses(child, pos) {
                continue;
            }
            if let Some(rule) = self.get(child.name) {
                found = Some((child, rule));
            }
            if let Some(deeper) = self.innermost(child, pos) {
                found = Some(deeper);
            }
        }
        found
    }
}

/// True when a line starting at `pos` lies inside `node`. An unclosed node
/// also owns a line starting at its very end.
fn encloses(node: &SyntaxNode, pos: usize) -> bool {
    let closed = node.children.len() > 1
        && node
            .children
            .last()
            .is_some_and(|last| last.is_leaf() && last.name == "}");
    node.span.start < pos && (pos < node.span.end || (!closed && pos <= node.span.end))
}

fn line_start_of(source: &str, pos: usize) -> usize {
    source[..pos].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end_of(source: &str, pos: usize) -> usize {
    source[pos..].find('\n').map_or(source.len(), |i| pos + i)
}

fn leading_columns(line: &str, unit: usize) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { unit } else { 1 })
        .sum()
}

fn column_of(source: &str, line_start: usize, pos: usize, unit: usize) -> usize {
    source[line_start..pos]
        .chars()
        .map(|c| if c == '\t' { unit } else { 1 })
        .sum()
}
