//! Terminal User Interface module for hoidap.
//!
//! Provides a four-region TUI with question input, document path input,
//! answer panel, and document panel using ratatui for rendering and
//! crossterm for terminal management.

use std::io;
use std::panic;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::chat::ChatClientBuilder;
use crate::config::Config;
use crate::knowledge::KnowledgeBase;
use crate::resolver::{AnswerResolver, AnswerResolverBuilder};

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus};
pub use event::Action;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
/// Returns a configured Terminal instance.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen.
/// This should always be called before exiting the TUI,
/// even in error cases, to prevent terminal corruption.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for panic handler.
///
/// Does not require a Terminal reference, making it safe to call
/// from a panic hook where we may not have access to the Terminal.
/// Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Initializes a panic hook that restores the terminal before panicking.
///
/// This ensures the terminal is restored even if a panic occurs anywhere
/// in the application, not just in the event loop. The original panic
/// hook is preserved and called after terminal restoration.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the main event loop for the TUI.
///
/// Polls for keyboard events, updates app state, and re-renders. Question
/// and document submissions run synchronously inside the loop: a new
/// submission is only possible after the previous render cycle completes.
///
/// # Errors
///
/// Returns an error if event polling, rendering, or terminal operations fail.
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, resolver: &AnswerResolver) -> Result<()> {
    let mut terminal = init_terminal()?;

    // Ensure terminal is restored even if we panic or error
    let result = run_event_loop_internal(app, resolver, &mut terminal);

    // Always restore terminal state
    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

/// Internal event loop implementation.
///
/// Separated from `run_event_loop` to ensure terminal restoration happens
/// in the outer function.
fn run_event_loop_internal(
    app: &mut App,
    resolver: &AnswerResolver,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
        {
            match event::handle_key_event(app, key) {
                Action::Quit => break,
                Action::SubmitQuestion => submit_question(app, resolver),
                Action::SubmitFile => submit_file(app),
                Action::None => {}
            }
        }
    }

    Ok(())
}

/// Resolves the question currently in the input and stores the outcome.
///
/// Blank questions are ignored. Failure outcomes land in the answer panel
/// like any other answer; they never abort the loop.
fn submit_question(app: &mut App, resolver: &AnswerResolver) {
    let question = app.question_input().trim().to_string();
    if question.is_empty() {
        return;
    }
    app.set_answer(resolver.resolve(&question));
}

/// Extracts the document at the path currently in the file input.
///
/// Extraction errors render inline in the document panel, matching the
/// per-file failure policy: nothing propagates past this call.
fn submit_file(app: &mut App) {
    let path = app.file_input().trim().to_string();
    if path.is_empty() {
        return;
    }
    match crate::extract::extract_file(&path) {
        Ok(result) => app.set_document_text(result.to_display_string()),
        Err(e) => app.set_document_error(format!("Error processing file: {e}")),
    }
}

/// Entry point for the TUI application.
///
/// Loads the knowledge base, validates the credential, builds the resolver,
/// and starts the event loop. A missing knowledge file or credential shows
/// as a persistent warning in the shortcut bar rather than aborting.
///
/// # Errors
///
/// Returns an error if the knowledge base file exists but cannot be read,
/// the completion client cannot be constructed, or the terminal fails.
pub fn run(config: &Config) -> Result<()> {
    // Install panic hook to restore terminal on panic
    init_panic_hook();

    let knowledge = KnowledgeBase::load(config.training_file())
        .context("Failed to load knowledge base")?;

    let mut app = App::new();
    app.set_knowledge_missing(knowledge.source_missing());

    let mut builder = AnswerResolverBuilder::new().knowledge(knowledge);
    match config.require_api_key() {
        Ok(api_key) => {
            let client = ChatClientBuilder::new()
                .api_key(api_key)
                .build()
                .context("Failed to build completion client")?;
            builder = builder.client(Arc::new(client));
        }
        Err(_) => {
            app.set_completion_disabled(true);
        }
    }
    let resolver = builder.build();

    run_event_loop(&mut app, &resolver).context("TUI event loop failed")?;

    Ok(())
}
