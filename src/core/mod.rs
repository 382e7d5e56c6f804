//! # Core Application Logic
//!
//! The execution console: run lifecycle, output channel, and the state the
//! UI renders. It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Console (state)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • runner (one run)     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Headless  │      │ Interpreter│
//!     │  Adapter   │      │   runner   │      │ (external) │
//!     │ (ratatui)  │      │  (stdout)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `Console` struct, all run state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`runner`]: Clear, call, record: one run end to end
//! - [`output`]: The `OutputSink` contract and the `OutputPanel`
//! - [`scroll`]: Current/previous viewport offset
//! - [`config`]: `~/.icepad/config.toml` loading and resolution

pub mod action;
pub mod config;
pub mod output;
pub mod runner;
pub mod scroll;
pub mod state;
