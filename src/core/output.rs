//! # Output Channel
//!
//! How a running program's output becomes visible without going through the
//! interpreter's return value. The interpreter receives a `&mut dyn OutputSink`
//! and appends one `OutputEntry` per call of the program's print primitive.
//!
//! ```text
//! interpreter ──append()──▶ OutputSink ──▶ OutputPanel (Vec<OutputEntry>)
//!                                              │
//!                                   clear() at the start of every run
//! ```
//!
//! Entries are visible as soon as they are appended; there is no flush step.

/// One unit of program output, rendered as its own block in the output pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub text: String,
}

impl OutputEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Receiver for program output. Order of `append` calls is the render order.
pub trait OutputSink {
    fn append(&mut self, entry: OutputEntry);
}

/// The console-owned sink backing the output pane.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputPanel {
    entries: Vec<OutputEntry>,
}

impl OutputPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry. Nothing from the previous run survives.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[OutputEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry texts in render order.
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }
}

impl OutputSink for OutputPanel {
    fn append(&mut self, entry: OutputEntry) {
        self.entries.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_call_order() {
        let mut panel = OutputPanel::new();
        panel.append(OutputEntry::new("a"));
        panel.append(OutputEntry::new("b"));
        panel.append(OutputEntry::new("a"));

        assert_eq!(panel.texts(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_clear_removes_every_entry() {
        let mut panel = OutputPanel::new();
        for i in 0..10 {
            panel.append(OutputEntry::new(i.to_string()));
        }
        assert_eq!(panel.len(), 10);

        panel.clear();
        assert!(panel.is_empty());
        assert!(panel.entries().is_empty());
    }

    #[test]
    fn test_sink_usable_as_trait_object() {
        fn emit(sink: &mut dyn OutputSink) {
            sink.append(OutputEntry::new("from trait object"));
        }

        let mut panel = OutputPanel::new();
        emit(&mut panel);
        assert_eq!(panel.texts(), vec!["from trait object"]);
    }
}
