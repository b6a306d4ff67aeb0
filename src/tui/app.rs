use crate::resolver::AnswerOutcome;

/// Application state for the TUI.
///
/// Holds the two input buffers, the last answer outcome, the last extracted
/// document text, panel focus, and scroll positions. Pure state: no I/O
/// happens here, so everything is testable without a terminal.
#[derive(Debug, Clone)]
pub struct App {
    /// Question input buffer
    question_input: String,
    /// Document path input buffer
    file_input: String,
    /// Outcome of the most recent question submission
    answer: Option<AnswerOutcome>,
    /// Rendered content of the most recent document extraction
    document_text: String,
    /// True if `document_text` is an inline extraction error message
    document_is_error: bool,
    /// Currently focused panel
    focus: Focus,
    /// Scroll offset for the answer panel
    answer_scroll: u16,
    /// Scroll offset for the document panel
    document_scroll: u16,
    /// True if the knowledge base file was absent at startup
    knowledge_missing: bool,
    /// True if no API key was configured (completion path disabled)
    completion_disabled: bool,
}

/// Panel focus state for keyboard navigation.
///
/// Determines which panel receives keyboard input and how keys are
/// interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Question input bar is focused (typing edits the question)
    QuestionInput,
    /// Document path input bar is focused (typing edits the path)
    FileInput,
    /// Answer panel is focused (j/k scrolling)
    AnswerView,
    /// Document panel is focused (j/k scrolling)
    DocumentView,
}

impl App {
    /// Creates a new App with default state.
    ///
    /// Default focus is `QuestionInput`; both inputs are empty and no answer
    /// or document content is present.
    pub fn new() -> Self {
        Self {
            question_input: String::new(),
            file_input: String::new(),
            answer: None,
            document_text: String::new(),
            document_is_error: false,
            focus: Focus::QuestionInput,
            answer_scroll: 0,
            document_scroll: 0,
            knowledge_missing: false,
            completion_disabled: false,
        }
    }

    /// Returns the question input buffer.
    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    /// Returns the document path input buffer.
    pub fn file_input(&self) -> &str {
        &self.file_input
    }

    /// Returns the most recent answer outcome, if any.
    pub fn answer(&self) -> Option<&AnswerOutcome> {
        self.answer.as_ref()
    }

    /// Returns the document panel content.
    pub fn document_text(&self) -> &str {
        &self.document_text
    }

    /// Returns true if the document panel shows an error message.
    pub fn document_is_error(&self) -> bool {
        self.document_is_error
    }

    /// Returns the current focus state.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Returns the answer panel scroll offset.
    pub fn answer_scroll(&self) -> u16 {
        self.answer_scroll
    }

    /// Returns the document panel scroll offset.
    pub fn document_scroll(&self) -> u16 {
        self.document_scroll
    }

    /// Returns true if the knowledge base file was absent at startup.
    pub fn knowledge_missing(&self) -> bool {
        self.knowledge_missing
    }

    /// Returns true if the completion path is disabled.
    pub fn completion_disabled(&self) -> bool {
        self.completion_disabled
    }

    /// Marks the knowledge base file as absent (startup warning).
    pub fn set_knowledge_missing(&mut self, missing: bool) {
        self.knowledge_missing = missing;
    }

    /// Marks the completion path as disabled (missing credential).
    pub fn set_completion_disabled(&mut self, disabled: bool) {
        self.completion_disabled = disabled;
    }

    /// Stores a question outcome and resets the answer scroll position.
    pub fn set_answer(&mut self, outcome: AnswerOutcome) {
        self.answer = Some(outcome);
        self.answer_scroll = 0;
    }

    /// Stores extracted document content and resets the document scroll.
    pub fn set_document_text(&mut self, text: String) {
        self.document_text = text;
        self.document_is_error = false;
        self.document_scroll = 0;
    }

    /// Stores an inline extraction error in the document panel.
    pub fn set_document_error(&mut self, message: String) {
        self.document_text = message;
        self.document_is_error = true;
        self.document_scroll = 0;
    }

    /// Cycles focus to the next panel in Tab order.
    ///
    /// Order: `QuestionInput` -> `FileInput` -> `AnswerView` ->
    /// `DocumentView` -> `QuestionInput`
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QuestionInput => Focus::FileInput,
            Focus::FileInput => Focus::AnswerView,
            Focus::AnswerView => Focus::DocumentView,
            Focus::DocumentView => Focus::QuestionInput,
        };
    }

    /// Cycles focus to the previous panel in reverse Tab order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::QuestionInput => Focus::DocumentView,
            Focus::FileInput => Focus::QuestionInput,
            Focus::AnswerView => Focus::FileInput,
            Focus::DocumentView => Focus::AnswerView,
        };
    }

    /// Returns focus to the question input (Esc behavior).
    pub fn reset_focus(&mut self) {
        self.focus = Focus::QuestionInput;
    }

    /// Appends a character to whichever input is focused.
    ///
    /// Does nothing when a view panel is focused.
    pub fn push_input_char(&mut self, c: char) {
        match self.focus {
            Focus::QuestionInput => self.question_input.push(c),
            Focus::FileInput => self.file_input.push(c),
            Focus::AnswerView | Focus::DocumentView => {}
        }
    }

    /// Removes the last character from whichever input is focused.
    pub fn pop_input_char(&mut self) {
        match self.focus {
            Focus::QuestionInput => {
                self.question_input.pop();
            }
            Focus::FileInput => {
                self.file_input.pop();
            }
            Focus::AnswerView | Focus::DocumentView => {}
        }
    }

    /// Scrolls the focused view panel down by the given amount.
    pub fn scroll_down(&mut self, amount: u16) {
        match self.focus {
            Focus::AnswerView => {
                self.answer_scroll = self.answer_scroll.saturating_add(amount);
            }
            Focus::DocumentView => {
                self.document_scroll = self.document_scroll.saturating_add(amount);
            }
            Focus::QuestionInput | Focus::FileInput => {}
        }
    }

    /// Scrolls the focused view panel up by the given amount.
    pub fn scroll_up(&mut self, amount: u16) {
        match self.focus {
            Focus::AnswerView => {
                self.answer_scroll = self.answer_scroll.saturating_sub(amount);
            }
            Focus::DocumentView => {
                self.document_scroll = self.document_scroll.saturating_sub(amount);
            }
            Focus::QuestionInput | Focus::FileInput => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
