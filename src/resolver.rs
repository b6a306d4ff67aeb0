//! Answer resolution: knowledge base first, completion service second.
//!
//! The resolver owns the immutable knowledge base and an optional completion
//! client. Every failure is normalized into a user-visible outcome; nothing
//! propagates past [`AnswerResolver::resolve`].

use std::sync::Arc;

use crate::chat::CompletionClient;
use crate::knowledge::KnowledgeBase;

/// The outcome of resolving a single submitted question.
///
/// Created per question and rendered once; outcomes are never cached across
/// submissions.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// Exact match against the static knowledge base.
    FromKnowledgeBase(String),
    /// Answer produced by the external completion service.
    FromCompletionService(String),
    /// A human-readable failure message, reported as the answer text itself.
    Failure(String),
}

impl AnswerOutcome {
    /// Returns the text to display for this outcome.
    pub fn text(&self) -> &str {
        match self {
            Self::FromKnowledgeBase(answer)
            | Self::FromCompletionService(answer)
            | Self::Failure(answer) => answer,
        }
    }

    /// Returns a short label naming where the answer came from.
    pub fn source_label(&self) -> &'static str {
        match self {
            Self::FromKnowledgeBase(_) => "knowledge base",
            Self::FromCompletionService(_) => "assistant",
            Self::Failure(_) => "error",
        }
    }

    /// Returns true for the failure variant.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Builder for constructing `AnswerResolver` instances.
#[derive(Default)]
pub struct AnswerResolverBuilder {
    knowledge: Option<KnowledgeBase>,
    client: Option<Arc<dyn CompletionClient>>,
}

impl AnswerResolverBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the knowledge base consulted before the completion service.
    pub fn knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Sets the completion client used for unmatched questions.
    ///
    /// When no client is set (for example because the API credential is
    /// missing), unmatched questions resolve to a `Failure` outcome instead
    /// of an external call.
    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the resolver.
    pub fn build(self) -> AnswerResolver {
        AnswerResolver {
            knowledge: self.knowledge.unwrap_or_default(),
            client: self.client,
        }
    }
}

/// Resolves questions against the knowledge base, falling back to the
/// completion service.
pub struct AnswerResolver {
    knowledge: KnowledgeBase,
    client: Option<Arc<dyn CompletionClient>>,
}

impl AnswerResolver {
    /// Returns the knowledge base this resolver consults.
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Returns true if a completion client is configured.
    pub fn has_completion_client(&self) -> bool {
        self.client.is_some()
    }

    /// Resolves a question into an answer outcome.
    ///
    /// Lookup is an exact, case-sensitive match; a hit never touches the
    /// network. On a miss, one single-turn completion request is issued and
    /// any error from it is converted into a `Failure` message carrying the
    /// underlying error's description. This method never panics.
    pub fn resolve(&self, question: &str) -> AnswerOutcome {
        if let Some(answer) = self.knowledge.get(question) {
            return AnswerOutcome::FromKnowledgeBase(answer.to_string());
        }

        let Some(client) = &self.client else {
            return AnswerOutcome::Failure(
                "Completion service unavailable: no API key configured. \
                 Set OPENAI_API_KEY to answer questions outside the knowledge base."
                    .to_string(),
            );
        };

        match client.complete(question) {
            Ok(answer) => AnswerOutcome::FromCompletionService(answer),
            Err(e) => AnswerOutcome::Failure(format!("Error: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock completion client that counts calls and returns a fixed result.
    struct MockClient {
        calls: AtomicUsize,
        result: Result<String, String>,
    }

    impl MockClient {
        fn answering(answer: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Ok(answer.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Err(message.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionClient for MockClient {
        fn complete(&self, _question: &str) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(answer) => Ok(answer.clone()),
                Err(message) => Err(ChatError::Api {
                    message: message.clone(),
                }),
            }
        }
    }

    fn knowledge_with(question: &str, answer: &str) -> KnowledgeBase {
        KnowledgeBase::parse(&format!("HỎI: {question}\nĐÁP: {answer}\n"))
    }

    #[test]
    fn knowledge_base_hit_makes_zero_external_calls() {
        let client = Arc::new(MockClient::answering("should not be used"));
        let resolver = AnswerResolverBuilder::new()
            .knowledge(knowledge_with("Q", "A"))
            .client(client.clone())
            .build();

        let outcome = resolver.resolve("Q");
        assert_eq!(outcome, AnswerOutcome::FromKnowledgeBase("A".to_string()));
        assert_eq!(client.call_count(), 0);
    }

    #[test]
    fn knowledge_base_miss_invokes_completion_once() {
        let client = Arc::new(MockClient::answering("Paris."));
        let resolver = AnswerResolverBuilder::new()
            .knowledge(KnowledgeBase::empty())
            .client(client.clone())
            .build();

        let outcome = resolver.resolve("What is the capital of France?");
        assert_eq!(
            outcome,
            AnswerOutcome::FromCompletionService("Paris.".to_string())
        );
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn completion_failure_surfaces_in_failure_message() {
        let client = Arc::new(MockClient::failing("connection refused"));
        let resolver = AnswerResolverBuilder::new()
            .client(client.clone())
            .build();

        let outcome = resolver.resolve("What is the capital of France?");
        assert!(outcome.is_failure());
        assert!(outcome.text().contains("connection refused"));
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn lookup_is_case_sensitive_and_untrimmed() {
        let client = Arc::new(MockClient::answering("fallback"));
        let resolver = AnswerResolverBuilder::new()
            .knowledge(knowledge_with("Hello", "world"))
            .client(client.clone())
            .build();

        // Differing case misses the knowledge base and goes external.
        let outcome = resolver.resolve("hello");
        assert_eq!(
            outcome,
            AnswerOutcome::FromCompletionService("fallback".to_string())
        );
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn missing_client_yields_failure_without_panic() {
        let resolver = AnswerResolverBuilder::new()
            .knowledge(knowledge_with("Q", "A"))
            .build();

        // Knowledge base still answers.
        assert_eq!(
            resolver.resolve("Q"),
            AnswerOutcome::FromKnowledgeBase("A".to_string())
        );

        // Everything else reports the disabled completion path.
        let outcome = resolver.resolve("anything else");
        assert!(outcome.is_failure());
        assert!(outcome.text().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn no_caching_across_questions() {
        let client = Arc::new(MockClient::answering("same answer"));
        let resolver = AnswerResolverBuilder::new().client(client.clone()).build();

        resolver.resolve("first question");
        resolver.resolve("second question");
        assert_eq!(client.call_count(), 2);
    }

    #[test]
    fn outcome_accessors_expose_text_and_source() {
        let kb = AnswerOutcome::FromKnowledgeBase("a".to_string());
        assert_eq!(kb.text(), "a");
        assert_eq!(kb.source_label(), "knowledge base");
        assert!(!kb.is_failure());

        let svc = AnswerOutcome::FromCompletionService("b".to_string());
        assert_eq!(svc.source_label(), "assistant");

        let fail = AnswerOutcome::Failure("oops".to_string());
        assert_eq!(fail.source_label(), "error");
        assert!(fail.is_failure());
    }
}
