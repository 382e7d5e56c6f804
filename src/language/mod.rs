//! # Language Mode
//!
//! Editor support for Ice built on top of a syntax tree producer.
//!
//! ```text
//! SyntaxParser ──node_names()──▶ build_mode() ──▶ LanguageMode
//!                                                  ├─ StyleTable   (highlight)
//!                                                  ├─ IndentTable  (indent_for)
//!                                                  └─ catalog      (complete)
//! ```
//!
//! The mode is built once per process (`LANGUAGE_MODE`) and shared
//! read-only by every editor component.

pub mod completion;
pub mod highlight;
pub mod indent;
pub mod syntax;

use std::ops::Range;
use std::sync::LazyLock;

use log::debug;

pub use completion::{Completion, CompletionKind};
pub use highlight::{StyleTable, Tag};
pub use indent::{DEFAULT_INDENT_UNIT, IndentRule, IndentTable};
pub use syntax::{IceParser, SyntaxNode, SyntaxParser, SyntaxTree};

/// Process-wide Ice mode.
pub static LANGUAGE_MODE: LazyLock<LanguageMode<IceParser>> =
    LazyLock::new(|| build_mode(IceParser));

/// A styled byte range of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub tag: Tag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMode<P: SyntaxParser> {
    parser: P,
    styles: StyleTable,
    indents: IndentTable,
    completions: Vec<Completion>,
}

/// Attaches styling, indentation and completion to `parser`.
pub fn build_mode<P: SyntaxParser>(parser: P) -> LanguageMode<P> {
    let vocabulary = parser.node_names();
    let styles = StyleTable::build(highlight::STYLE_RULES, vocabulary);
    let indents = IndentTable::build(indent::INDENT_RULES, vocabulary);
    let completions = completion::catalog();
    debug!(
        "Built language mode: {} styled nodes, {} completions",
        styles.len(),
        completions.len()
    );
    LanguageMode {
        parser,
        styles,
        indents,
        completions,
    }
}

impl<P: SyntaxParser> LanguageMode<P> {
    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    pub fn tag_for(&self, node_name: &str) -> Option<Tag> {
        self.styles.get(node_name)
    }

    /// Tags every styled leaf. Spans come back in source order and never overlap.
    pub fn highlight(&self, source: &str) -> Vec<HighlightSpan> {
        self.parser
            .parse(source)
            .leaves()
            .into_iter()
            .filter_map(|leaf| {
                self.tag_for(leaf.name).map(|tag| HighlightSpan {
                    range: leaf.span.clone(),
                    tag,
                })
            })
            .collect()
    }

    /// Indentation for the line beginning at byte `line_start`, using the
    /// default unit.
    pub fn indent_for(&self, source: &str, line_start: usize) -> usize {
        self.indent_with_unit(source, line_start, DEFAULT_INDENT_UNIT)
    }

    pub fn indent_with_unit(&self, source: &str, line_start: usize, unit: usize) -> usize {
        let tree = self.parser.parse(source);
        self.indents.indent_at(&tree, source, line_start, unit)
    }

    /// Catalog entries whose label starts with `prefix`, in catalog order.
    /// An empty prefix offers nothing.
    pub fn complete(&self, prefix: &str) -> Vec<&Completion> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.completions
            .iter()
            .filter(|c| c.label.starts_with(prefix))
            .collect()
    }
}
