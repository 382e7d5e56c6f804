//! Completion catalog: every reserved word and every builtin the
//! interpreter registers.

/// Reserved words, in the order they are offered.
pub const KEYWORDS: &[&str] = &[
    "set", "function", "lambda",
    "if", "else", "match",
    "for", "foreach", "in", "to", "while", "loop",
    "continue", "break", "return",
    "and", "or",
    "true", "false", "null",
];

/// Builtin functions with an optional one-line description.
pub const BUILTINS: &[(&str, Option<&str>)] = &[
    ("print", Some("Prints its arguments on one output line")),
    ("readline", Some("Reads one line of input")),
    ("type_of", Some("Returns the type of the argument")),
    ("parse_number", Some("Parses a string into a number")),
    ("length", Some("Returns the length of strings, array and object")),
    ("sqrt", None),
    ("pow", None),
    ("floor", None),
    ("round", None),
    ("ceil", None),
    ("import", Some("Runs a module file and returns its export")),
    ("export", Some("Exports a value from the current module")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Keyword,
    Function,
}

impl CompletionKind {
    pub fn label(self) -> &'static str {
        match self {
            CompletionKind::Keyword => "keyword",
            CompletionKind::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub label: &'static str,
    pub kind: CompletionKind,
    pub info: Option<&'static str>,
}

/// Builds the static catalog: keywords first, then builtins.
pub fn catalog() -> Vec<Completion> {
    let keywords = KEYWORDS.iter().map(|&label| Completion {
        label,
        kind: CompletionKind::Keyword,
        info: None,
    });
    let builtins = BUILTINS.iter().map(|&(label, info)| Completion {
        label,
        kind: CompletionKind::Function,
        info,
    });
    keywords.chain(builtins).collect()
}

/// Returns the byte offset where the word ending at `pos` starts, and the word.
pub fn word_before(source: &str, pos: usize) -> (usize, &str) {
    let before = &source[..pos];
    let start = before
        .char_indices()
        .rev()
        .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos);
    (start, &source[start..pos])
}
