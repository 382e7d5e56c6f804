//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into console operations.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms in `poll` and only
//! redraws after an event (including terminal resize). A run blocks the loop
//! until the interpreter exits; the frame drawn right before it shows
//! "Running...".
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use std::io::{self, stdout};
use std::process::ExitCode;
use std::time::Duration;

use log::{debug, info, warn};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::Console;
use crate::interpreter::InterpreterFault;
use crate::tui::component::EventHandler;
use crate::tui::components::{CompletionState, Editor, EditorEvent, OutputPaneState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Poll timeout while idle.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub editor: Editor,
    pub completion: CompletionState,
    pub output_pane: OutputPaneState,
    // Props from config
    pub header_threshold: u16,
}

impl TuiState {
    pub fn new(source: &str, indent_unit: usize, header_threshold: u16) -> Self {
        Self {
            editor: Editor::new(source, indent_unit),
            completion: CompletionState::new(),
            output_pane: OutputPaneState::new(),
            header_threshold,
        }
    }
}

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Kitty keyboard protocol is harmlessly ignored by terminals that
        // don't support it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset on redraw
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> io::Result<ExitCode> {
    let mut console = Console::from_config(&config);
    let mut tui = TuiState::new(console.source(), config.indent_unit, config.header_threshold);

    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new();
    if let Err(e) = &terminal_mode_guard {
        warn!("Failed to enable terminal modes: {}", e);
    }

    let result = event_loop(&mut terminal, &mut console, &mut tui);

    drop(terminal_mode_guard);
    ratatui::restore();
    info!("icepad shutting down after {} runs", console.run_count);
    result.map(|()| ExitCode::SUCCESS)
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    console: &mut Console,
    tui: &mut TuiState,
) -> io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, console, tui))?;
            needs_redraw = false;
        }

        let Some(first_event) = poll_event_timeout(IDLE_POLL)? else {
            continue;
        };
        needs_redraw = true;

        // Process first event + drain ALL pending events before next draw
        let mut pending = Some(first_event);
        while let Some(event) = pending.take() {
            if event == TuiEvent::Run {
                // Show "Running..." before the interpreter blocks the loop
                console.status_message = String::from("Running...");
                terminal.draw(|f| ui::draw_ui(f, console, tui))?;
            }
            if dispatch(console, tui, event)? == Flow::Quit {
                return Ok(());
            }
            pending = poll_event_immediate()?;
        }
    }
}

/// Applies one event to the console and the presentation state.
pub fn dispatch(
    console: &mut Console,
    tui: &mut TuiState,
    event: TuiEvent,
) -> Result<Flow, InterpreterFault> {
    match event {
        TuiEvent::Resize => {}
        TuiEvent::Quit => {
            if update(console, Action::Quit) == Effect::Quit {
                return Ok(Flow::Quit);
            }
        }
        TuiEvent::Run => {
            tui.completion.close();
            if console.run()? == Effect::RevealOutput {
                tui.output_pane.reveal();
            }
            debug!("Run finished in phase {:?}", console.phase());
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.output_pane.handle_event(&event);
        }
        TuiEvent::NextCompletion | TuiEvent::PrevCompletion => {
            tui.completion.handle_event(&event);
        }
        TuiEvent::Tab if tui.completion.is_open() => {
            if let Some(choice) = tui.completion.selected() {
                let range = tui.completion.word_start..tui.editor.cursor_pos();
                tui.editor.replace_range(range, choice.label);
                console.on_text_change(tui.editor.buffer.clone());
            }
            tui.completion.close();
        }
        event => match tui.editor.handle_event(&event) {
            Some(EditorEvent::ContentChanged) => {
                console.on_text_change(tui.editor.buffer.clone());
                if matches!(event, TuiEvent::InputChar(_) | TuiEvent::Backspace) {
                    tui.completion
                        .refresh(&tui.editor.buffer, tui.editor.cursor_pos());
                } else {
                    tui.completion.close();
                }
            }
            Some(EditorEvent::CursorMoved) => tui.completion.close(),
            None => {}
        },
    }

    Ok(Flow::Continue)
}
