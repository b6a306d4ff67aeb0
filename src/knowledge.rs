//! Knowledge base loading from marker-prefixed training files.
//!
//! The knowledge base is a plain UTF-8 text file containing alternating
//! `HỎI:` (question) and `ĐÁP:` (answer) lines. It is loaded once at startup
//! into an immutable mapping and threaded through call sites by reference.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Line marker introducing a question.
const QUESTION_MARKER: &str = "HỎI:";

/// Line marker introducing an answer.
const ANSWER_MARKER: &str = "ĐÁP:";

/// Errors that can occur while loading a knowledge base file.
///
/// A missing file is deliberately *not* an error: the loader falls back to an
/// empty base and flags it via [`KnowledgeBase::source_missing`], so the rest
/// of the session keeps working.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The file exists but could not be read.
    #[error("Failed to read knowledge base file: {0}")]
    Io(#[from] io::Error),
}

/// An immutable question-to-answer mapping loaded from a training file.
///
/// Lookups are exact and case-sensitive. Once constructed the mapping is
/// never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeBase {
    entries: HashMap<String, String>,
    source_missing: bool,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a knowledge base from the given file path.
    ///
    /// If the file does not exist, returns an empty base with
    /// [`source_missing`](Self::source_missing) set so the caller can warn
    /// without aborting the session.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::Io` if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let contents = match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    entries: HashMap::new(),
                    source_missing: true,
                });
            }
            Err(e) => return Err(KnowledgeError::Io(e)),
        };

        Ok(Self::parse(&contents))
    }

    /// Parses knowledge base text into a mapping.
    ///
    /// Parsing is strictly sequential: state is the last seen question, and
    /// an answer line binds to whichever question was most recently seen,
    /// regardless of blank or unrecognized lines in between. A question with
    /// no answer before the next question contributes no entry; duplicate
    /// questions keep the last answer.
    pub fn parse(contents: &str) -> Self {
        let mut entries = HashMap::new();
        let mut pending_question: Option<String> = None;

        for line in contents.lines() {
            if let Some(question) = line.strip_prefix(QUESTION_MARKER) {
                pending_question = Some(question.trim().to_string());
            } else if let Some(answer) = line.strip_prefix(ANSWER_MARKER)
                && let Some(question) = &pending_question
            {
                entries.insert(question.clone(), answer.trim().to_string());
            }
        }

        Self {
            entries,
            source_missing: false,
        }
    }

    /// Looks up the answer for an exact question string.
    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries.get(question).map(String::as_str)
    }

    /// Returns the number of question/answer entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the base holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the base is empty because the source file was absent.
    pub fn source_missing(&self) -> bool {
        self.source_missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_builds_entry_per_complete_pair() {
        let kb = KnowledgeBase::parse(
            "HỎI: What is Rust?\nĐÁP: A systems language.\nHỎI: Who?\nĐÁP: You.\n",
        );
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.get("What is Rust?"), Some("A systems language."));
        assert_eq!(kb.get("Who?"), Some("You."));
    }

    #[test]
    fn parse_ignores_unrecognized_lines() {
        let kb = KnowledgeBase::parse(
            "# comment\nHỎI: Q\nsome stray text\n\nĐÁP: A\ntrailing noise\n",
        );
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Q"), Some("A"));
    }

    #[test]
    fn answer_binds_to_most_recent_question() {
        // The first question is overwritten before any answer arrives.
        let kb = KnowledgeBase::parse("HỎI: Q1\nHỎI: Q2\nĐÁP: A\n");
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Q1"), None);
        assert_eq!(kb.get("Q2"), Some("A"));
    }

    #[test]
    fn trailing_unmatched_question_contributes_no_entry() {
        let kb = KnowledgeBase::parse("HỎI: Q1\nĐÁP: A1\nHỎI: dangling\n");
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("dangling"), None);
    }

    #[test]
    fn duplicate_question_keeps_last_answer() {
        let kb = KnowledgeBase::parse("HỎI: Q\nĐÁP: A1\nHỎI: Q\nĐÁP: A2\n");
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Q"), Some("A2"));
    }

    #[test]
    fn marker_payloads_are_trimmed() {
        let kb = KnowledgeBase::parse("HỎI:   padded question  \nĐÁP:\tpadded answer \n");
        assert_eq!(kb.get("padded question"), Some("padded answer"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let kb = KnowledgeBase::parse("HỎI: Hello\nĐÁP: world\n");
        assert_eq!(kb.get("Hello"), Some("world"));
        assert_eq!(kb.get("hello"), None);
    }

    #[test]
    fn consecutive_answers_rebind_to_same_question() {
        let kb = KnowledgeBase::parse("HỎI: Q\nĐÁP: A1\nĐÁP: A2\n");
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Q"), Some("A2"));
    }

    #[test]
    fn answer_without_preceding_question_is_dropped() {
        let kb = KnowledgeBase::parse("ĐÁP: orphan answer\nHỎI: Q\nĐÁP: A\n");
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.get("Q"), Some("A"));
    }

    #[test]
    fn load_missing_file_yields_empty_flagged_base() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("does-not-exist.txt");

        let kb = KnowledgeBase::load(&path).expect("missing file should not error");
        assert!(kb.is_empty());
        assert!(kb.source_missing());
    }

    #[test]
    fn load_existing_file_is_not_flagged_missing() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("training.txt");
        let mut file = std::fs::File::create(&path).expect("failed to create file");
        writeln!(file, "HỎI: Q\nĐÁP: A").expect("failed to write file");

        let kb = KnowledgeBase::load(&path).expect("failed to load knowledge base");
        assert!(!kb.source_missing());
        assert_eq!(kb.get("Q"), Some("A"));
    }

    #[test]
    fn load_is_idempotent_for_unchanged_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("training.txt");
        std::fs::write(&path, "HỎI: Q1\nĐÁP: A1\nHỎI: Q2\nĐÁP: A2\n")
            .expect("failed to write file");

        let first = KnowledgeBase::load(&path).expect("first load failed");
        let second = KnowledgeBase::load(&path).expect("second load failed");
        assert_eq!(first, second);
    }
}
