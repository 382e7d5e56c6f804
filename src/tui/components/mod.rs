//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, interpreter, status message, raised separator
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `Editor`: highlighted source buffer with block-aware indentation
//! - `OutputPane`: scrollable entries of the latest run plus its verdict
//! - `CompletionPopup`: candidates for the word before the cursor
//!
//! Stateful components that must survive across frames keep their data in a
//! `*State` struct owned by `TuiState`, wrapped each frame by a transient
//! component borrowing it.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs               (this file)
//! ├── title_bar.rs         (Top status bar)
//! ├── editor/              (Source editor, cursor, theme)
//! ├── output_pane.rs       (Scrollable output + verdict)
//! └── completion_popup.rs  (Completion overlay)
//! ```

mod title_bar;
pub use title_bar::{TITLE_BAR_HEIGHT, TitleBar};

pub mod completion_popup;
pub mod editor;
pub mod output_pane;
pub use completion_popup::{CompletionPopup, CompletionState};
pub use editor::{Editor, EditorEvent};
pub use output_pane::{OutputPane, OutputPaneState};
