//! Syntax trees for the language mode.
//!
//! The mode only needs named nodes with byte spans, so the tree here is
//! deliberately shallow: `Program` holds leaves and `Block` nodes, and blocks
//! nest. Names follow the grammar vocabulary: node classes are capitalized
//! (`Identifier`, `Number`), punctuation and keywords are named by their own
//! text (`(`, `if`).

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

use crate::language::completion::KEYWORDS;

/// A named node covering `span` bytes of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub name: &'static str,
    pub span: Range<usize>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(name: &'static str, span: Range<usize>) -> Self {
        Self {
            name,
            span,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Collects every leaf under this node, in source order.
    pub fn leaves(&self) -> Vec<&SyntaxNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxTree {
    pub fn leaves(&self) -> Vec<&SyntaxNode> {
        self.root.leaves()
    }
}

/// Turns source text into a syntax tree labeled from a fixed vocabulary.
pub trait SyntaxParser {
    /// Every node name this parser can produce.
    fn node_names(&self) -> &[&'static str];

    /// Parses `source`. Parsing never fails; unknown input becomes `Invalid`.
    fn parse(&self, source: &str) -> SyntaxTree;
}

pub const PROGRAM: &str = "Program";
pub const BLOCK: &str = "Block";
pub const IDENTIFIER: &str = "Identifier";
pub const BOOLEAN_LITERAL: &str = "BooleanLiteral";
pub const STRING: &str = "String";
pub const LINE_COMMENT: &str = "LineComment";
pub const NUMBER: &str = "Number";
pub const OPERATOR: &str = "Operator";
pub const PUNCTUATION: &str = "Punctuation";
pub const INVALID: &str = "Invalid";

const ICE_NODE_NAMES: &[&str] = &[
    PROGRAM,
    BLOCK,
    IDENTIFIER,
    BOOLEAN_LITERAL,
    STRING,
    LINE_COMMENT,
    NUMBER,
    OPERATOR,
    PUNCTUATION,
    INVALID,
    "(", ")", "{", "}", "[", "]",
    "set", "function", "lambda",
    "if", "else", "match", "for", "foreach", "in", "to", "while", "loop",
    "and", "or", "null",
    "return", "break", "continue",
];

/// Token-level tree builder for Ice source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IceParser;

impl SyntaxParser for IceParser {
    fn node_names(&self) -> &[&'static str] {
        ICE_NODE_NAMES
    }

    fn parse(&self, source: &str) -> SyntaxTree {
        let mut chars = source.char_indices().peekable();
        let mut root = SyntaxNode {
            name: PROGRAM,
            span: 0..source.len(),
            children: Vec::new(),
        };
        // Innermost open block last.
        let mut open_blocks: Vec<SyntaxNode> = Vec::new();

        while let Some((start, ch)) = chars.next() {
            let node = match ch {
                c if c.is_whitespace() => continue,
                '{' => {
                    open_blocks.push(SyntaxNode {
                        name: BLOCK,
                        span: start..source.len(),
                        children: vec![SyntaxNode::leaf("{", start..start + 1)],
                    });
                    continue;
                }
                '}' => {
                    let close = SyntaxNode::leaf("}", start..start + 1);
                    match open_blocks.pop() {
                        Some(mut block) => {
                            block.children.push(close);
                            block.span.end = start + 1;
                            block
                        }
                        None => close,
                    }
                }
                '-' if matches!(chars.peek(), Some((_, '-'))) => {
                    let end = eat_while(&mut chars, source.len(), |c| c != '\n');
                    SyntaxNode::leaf(LINE_COMMENT, start..end)
                }
                '"' | '\'' => {
                    let end = eat_string(&mut chars, ch, source.len());
                    SyntaxNode::leaf(STRING, start..end)
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let end = eat_while(&mut chars, source.len(), |c| {
                        c.is_ascii_alphanumeric() || c == '_'
                    });
                    SyntaxNode::leaf(word_name(&source[start..end]), start..end)
                }
                c if c.is_ascii_digit() => {
                    let end = eat_number(&mut chars, source, source.len());
                    SyntaxNode::leaf(NUMBER, start..end)
                }
                '(' => SyntaxNode::leaf("(", start..start + 1),
                ')' => SyntaxNode::leaf(")", start..start + 1),
                '[' => SyntaxNode::leaf("[", start..start + 1),
                ']' => SyntaxNode::leaf("]", start..start + 1),
                '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' => {
                    let mut end = start + 1;
                    if let Some(&(i, '=')) = chars.peek() {
                        chars.next();
                        end = i + 1;
                    }
                    SyntaxNode::leaf(OPERATOR, start..end)
                }
                ',' | ';' | ':' | '.' => SyntaxNode::leaf(PUNCTUATION, start..start + 1),
                other => SyntaxNode::leaf(INVALID, start..start + other.len_utf8()),
            };
            push_child(&mut root, &mut open_blocks, node);
        }

        // Unclosed blocks run to the end of the input.
        while let Some(block) = open_blocks.pop() {
            push_child(&mut root, &mut open_blocks, block);
        }

        SyntaxTree { root }
    }
}

fn push_child(root: &mut SyntaxNode, open_blocks: &mut [SyntaxNode], node: SyntaxNode) {
    match open_blocks.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.children.push(node),
    }
}

fn word_name(word: &str) -> &'static str {
    match word {
        "true" | "false" => BOOLEAN_LITERAL,
        _ => KEYWORDS
            .iter()
            .copied()
            .find(|kw| *kw == word)
            .unwrap_or(IDENTIFIER),
    }
}

/// Consumes characters while `keep` holds; returns the end byte offset.
fn eat_while(
    chars: &mut Peekable<CharIndices<'_>>,
    len: usize,
    keep: impl Fn(char) -> bool,
) -> usize {
    while let Some(&(i, c)) = chars.peek() {
        if !keep(c) {
            return i;
        }
        chars.next();
    }
    len
}

/// Consumes through the closing quote. A backslash escapes the next
/// character; an unterminated string stops before the end of its line.
fn eat_string(chars: &mut Peekable<CharIndices<'_>>, quote: char, len: usize) -> usize {
    while let Some(&(i, c)) = chars.peek() {
        match c {
            '\n' => return i,
            '\\' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, next)) if next != '\n') {
                    chars.next();
                }
            }
            c if c == quote => {
                chars.next();
                return i + c.len_utf8();
            }
            _ => {
                chars.next();
            }
        }
    }
    len
}

fn eat_number(chars: &mut Peekable<CharIndices<'_>>, source: &str, len: usize) -> usize {
    let end = eat_while(chars, len, |c| c.is_ascii_digit());
    let fraction_follows = source[end..].starts_with('.')
        && source[end + 1..].starts_with(|c: char| c.is_ascii_digit());
    if fraction_follows {
        chars.next();
        return eat_while(chars, len, |c| c.is_ascii_digit());
    }
    end
}
