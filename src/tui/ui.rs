//! UI rendering functions for the TUI.
//!
//! Implements the four-region layout with question input, document path
//! input, answer panel, and document panel using ratatui widgets and layout
//! management.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::resolver::AnswerOutcome;

use super::app::{App, Focus};

/// Main rendering function for the TUI.
///
/// Draws the question input, file path input, answer and document panels,
/// and the shortcut bar. Applies focus indicators based on app state.
pub fn draw(frame: &mut Frame, app: &App) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Question input
            Constraint::Length(3), // Document path input
            Constraint::Min(0),    // Content area
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    // Split content area horizontally: answer (50%) | document (50%)
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[2]);

    render_question_input(frame, app, main_chunks[0]);
    render_file_input(frame, app, main_chunks[1]);
    render_answer_view(frame, app, content_chunks[0]);
    render_document_view(frame, app, content_chunks[1]);
    render_shortcut_bar(frame, app, main_chunks[3]);
}

/// Border style for a panel, highlighted when focused.
fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders the question input bar at the top of the screen.
fn render_question_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::QuestionInput);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Ask me a question")
        .border_style(border_style(is_focused));

    let mut content = app.question_input().to_string();
    if is_focused {
        content.push('█'); // Cursor indicator
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the document path input bar.
fn render_file_input(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::FileInput);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Document path (.pdf, .docx, .xlsx)")
        .border_style(border_style(is_focused));

    let mut content = app.file_input().to_string();
    if is_focused {
        content.push('█');
    }

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Renders the answer panel.
///
/// Completion answers render as markdown; failures render in red. The panel
/// title names the answer source.
fn render_answer_view(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::AnswerView);

    let title = match app.answer() {
        Some(outcome) => format!("Answer [{}]", outcome.source_label()),
        None => "Answer".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));

    let content: Text = match app.answer() {
        Some(AnswerOutcome::FromCompletionService(answer)) => tui_markdown::from_str(answer),
        Some(AnswerOutcome::FromKnowledgeBase(answer)) => Text::from(answer.as_str()),
        Some(AnswerOutcome::Failure(message)) => {
            Text::from(Span::styled(message.as_str(), Style::default().fg(Color::Red)))
        }
        None => Text::from(Span::styled(
            "Type a question and press Enter.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the document panel with the latest extraction output.
fn render_document_view(frame: &mut Frame, app: &App, area: Rect) {
    let is_focused = matches!(app.focus(), Focus::DocumentView);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("File Content")
        .border_style(border_style(is_focused));

    let content: Text = if app.document_text().is_empty() {
        Text::from(Span::styled(
            "Enter a document path and press Enter.",
            Style::default().fg(Color::DarkGray),
        ))
    } else if app.document_is_error() {
        Text::from(Span::styled(
            app.document_text(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Text::from(app.document_text())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.document_scroll(), 0));

    frame.render_widget(paragraph, area);
}

/// Renders the shortcut bar, plus any startup warnings.
fn render_shortcut_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " Tab focus | Enter submit | j/k scroll | Esc input | Ctrl-C quit ",
        Style::default().fg(Color::DarkGray),
    )];

    if app.knowledge_missing() {
        spans.push(Span::styled(
            " [no training file] ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if app.completion_disabled() {
        spans.push(Span::styled(
            " [completion disabled: no API key] ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
