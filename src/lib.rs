pub mod chat;
pub mod config;
pub mod extract;
pub mod knowledge;
pub mod resolver;
pub mod tui;

pub use chat::{ChatClient, ChatClientBuilder, ChatError, CompletionClient};
pub use config::{Config, ConfigError};
pub use extract::{DocumentFormat, ExtractError, ExtractionResult, SheetPreview};
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use resolver::{AnswerOutcome, AnswerResolver, AnswerResolverBuilder};
