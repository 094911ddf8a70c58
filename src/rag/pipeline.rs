//! Complete RAG pipeline: Validate -> Retrieve -> Assemble -> Generate

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::config::PersonaConfig;
use crate::config::RagConfig;
use crate::errors::ErrorKind;
use crate::errors::TwinRagError;
use crate::llm::prompts::PersonaPrompts;
use crate::models::ConversationTurn;
use crate::models::QueryResult;
use crate::models::SourceRef;
use crate::rag::context::AssembledContext;
use crate::rag::ContextAssembler;
use crate::rag::Generator;
use crate::rag::Retriever;
use crate::services::ServiceRegistry;

const FALLBACK_PREFIX: &str = "Here's what I know: ";

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Retrieving,
    /// Retrieval produced nothing usable; answered with a placeholder
    ContextEmpty,
    Assembling,
    Generating,
    Done,
    Errored(ErrorKind),
}

struct Answer {
    text: String,
    sources: Vec<SourceRef>,
    fallback: bool,
}

struct Failure {
    error: TwinRagError,
    sources: Option<Vec<SourceRef>>,
}

impl From<TwinRagError> for Failure {
    fn from(error: TwinRagError) -> Self {
        Self {
            error,
            sources: None,
        }
    }
}

/// Question-to-answer orchestration over the shared service handles
pub struct RagService {
    services: Arc<ServiceRegistry>,
    retriever: Retriever,
    context_assembler: ContextAssembler,
    generator: Generator,
    prompts: PersonaPrompts,
    persona: PersonaConfig,
    settings: RagConfig,
}

impl RagService {
    #[must_use]
    pub fn new(config: &AppConfig, services: Arc<ServiceRegistry>) -> Self {
        Self {
            services,
            retriever: Retriever::from_config(config),
            context_assembler: ContextAssembler::new(),
            generator: Generator::from_config(config),
            prompts: PersonaPrompts::from_config(&config.persona),
            persona: config.persona.clone(),
            settings: config.rag.clone(),
        }
    }

    #[must_use]
    pub const fn services(&self) -> &Arc<ServiceRegistry> {
        &self.services
    }

    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    #[must_use]
    pub const fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Answer a single question
    pub async fn query(&self, question: &str) -> QueryResult {
        self.query_with_history(question, &[]).await
    }

    /// Answer a question in the context of earlier turns.
    ///
    /// Never fails: every outcome, including unexpected errors, is folded
    /// into the returned [`QueryResult`].
    pub async fn query_with_history(&self, question: &str, history: &[ConversationTurn]) -> QueryResult {
        let started = Instant::now();
        let mut stage = PipelineStage::Validating;
        info!("Processing RAG query ({} prior turns)", history.len());

        let outcome = self.run(question, history, &mut stage).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(answer) => {
                advance(&mut stage, PipelineStage::Done);
                info!("RAG query completed in {}ms", duration_ms);
                let mut result = QueryResult::answered(answer.text, answer.sources, duration_ms);
                result.fallback = answer.fallback;
                result
            }
            Err(failure) => {
                let kind = failure.error.kind();
                advance(&mut stage, PipelineStage::Errored(kind));
                if kind == ErrorKind::Unknown {
                    error!("RAG query failed unexpectedly: {}", failure.error);
                } else {
                    warn!("RAG query failed ({}): {}", kind, failure.error);
                }
                QueryResult::failed(&failure.error, failure.sources, duration_ms)
            }
        }
    }

    async fn run(
        &self,
        question: &str,
        history: &[ConversationTurn],
        stage: &mut PipelineStage,
    ) -> Result<Answer, Failure> {
        let question = self.validate_question(question)?;

        advance(stage, PipelineStage::Retrieving);
        let vector = self.services.vector_client().await?;
        let records = self.retriever.retrieve(vector.as_ref(), question).await?;

        if records.is_empty() {
            advance(stage, PipelineStage::ContextEmpty);
            return Ok(self.placeholder(&self.persona.no_results_answer));
        }

        advance(stage, PipelineStage::Assembling);
        let context = self.context_assembler.assemble(&records);
        if context.is_empty() {
            advance(stage, PipelineStage::ContextEmpty);
            return Ok(self.placeholder(&self.persona.no_content_answer));
        }

        advance(stage, PipelineStage::Generating);
        let sources = context.sources.clone();
        match self.generate(question, history, &context).await {
            Ok(text) => Ok(Answer {
                text,
                sources,
                fallback: false,
            }),
            Err(error) if error.kind() == ErrorKind::GenerationFailure && self.settings.fallback_enabled => {
                warn!("Generation exhausted, answering from retrieved content: {}", error);
                Ok(Answer {
                    text: self.fallback_answer(&context),
                    sources,
                    fallback: true,
                })
            }
            Err(error) => Err(Failure {
                error,
                sources: Some(sources),
            }),
        }
    }

    fn validate_question<'a>(&self, question: &'a str) -> crate::Result<&'a str> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TwinRagError::Validation("Question cannot be empty".to_string()));
        }
        if question.chars().count() > self.settings.max_question_length {
            return Err(TwinRagError::Validation(format!(
                "Question too long (max {} characters)",
                self.settings.max_question_length
            )));
        }
        Ok(question)
    }

    async fn generate(
        &self,
        question: &str,
        history: &[ConversationTurn],
        context: &AssembledContext,
    ) -> crate::Result<String> {
        let client = self.services.generation_client().await?;
        let prompt = self
            .prompts
            .user_prompt(&context.text, question, !history.is_empty());
        let request = self.generator.request(self.prompts.system(), history, &prompt);
        self.generator.generate(client.as_ref(), &request).await
    }

    fn placeholder(&self, text: &str) -> Answer {
        Answer {
            text: text.to_string(),
            sources: Vec::new(),
            fallback: false,
        }
    }

    fn fallback_answer(&self, context: &AssembledContext) -> String {
        let joined = context.contents.join(" ");
        let limit = self.settings.fallback_max_chars;
        if joined.chars().count() > limit {
            let truncated: String = joined.chars().take(limit).collect();
            format!("{FALLBACK_PREFIX}{truncated}...")
        } else {
            format!("{FALLBACK_PREFIX}{joined}")
        }
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!("RAG stage {:?} -> {:?}", stage, next);
    *stage = next;
}
