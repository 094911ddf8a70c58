//! Orchestrator tests against stub services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::ErrorKind;
use crate::errors::ProviderFailure;
use crate::models::ConversationTurn;
use crate::tests::configured;
use crate::tests::stub_rag;
use crate::tests::StubGenerator;
use crate::tests::StubVector;

const SKILLS_ANSWER: &str = "I'm comfortable with Linux, routing, and VLANs.";

fn skills_vector() -> Arc<StubVector> {
    Arc::new(StubVector::with_records(&[(
        "Technical Skills",
        "Linux, routing, VLANs",
        0.92,
    )]))
}

#[tokio::test]
async fn test_grounded_answer() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query("What are your technical skills?").await;

    assert!(result.success);
    assert_eq!(result.answer, SKILLS_ANSWER);
    assert_eq!(result.sources().len(), 1);
    assert_eq!(result.sources()[0].title, "Technical Skills");
    assert_eq!(result.sources()[0].score, 0.92);
    assert!(!result.fallback);

    let request = generator.last_request().unwrap();
    assert!(request.prompt.contains("Technical Skills: Linux, routing, VLANs"));
    assert!(request.prompt.contains("What are your technical skills?"));
    assert_eq!(request.model, "llama-3.1-8b-instant");
    assert_eq!(request.max_tokens, 500);
    assert!(request.history.is_empty());
}

#[tokio::test]
async fn test_long_question_makes_no_calls() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query(&"a".repeat(1_001)).await;

    assert!(!result.success);
    assert!(result.answer.is_empty());
    assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    assert_eq!(result.error.as_deref(), Some("Question too long (max 1000 characters)"));
    assert_eq!(vector.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_empty_question() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query("   ").await;
    assert_eq!(result.error.as_deref(), Some("Question cannot be empty"));
    assert_eq!(vector.calls(), 0);
}

#[tokio::test]
async fn test_zero_results_placeholder() {
    let vector = Arc::new(StubVector::empty());
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query("Do you play chess?").await;

    assert!(result.success);
    assert!(result.answer.starts_with("I don't have specific information about that topic."));
    assert_eq!(result.context, Some(Vec::new()));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_no_content_placeholder() {
    let vector = Arc::new(StubVector::with_records(&[("Empty", "  ", 0.5)]));
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query("Anything?").await;

    assert!(result.success);
    assert_eq!(
        result.answer,
        "I found some information but couldn't extract meaningful details."
    );
    assert!(result.sources().is_empty());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_retrieval_failure_is_classified() {
    let vector = Arc::new(StubVector::failing(ProviderFailure::status(401, "Unauthorized")));
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&configured(), &vector, &generator);

    let first = rag.query("What are your skills?").await;
    let second = rag.query("What are your skills?").await;

    assert_eq!(first.error_kind, Some(ErrorKind::RetrievalFailure));
    assert_eq!(first.error.as_deref(), Some("Invalid vector service credentials"));
    assert_eq!(first.error, second.error);
    assert!(first.context.is_none());
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_keeps_sources() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::failing(ProviderFailure::status(500, "boom")));
    let rag = stub_rag(&configured(), &vector, &generator);

    let result = rag.query("What are your skills?").await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::GenerationFailure));
    assert_eq!(result.error.as_deref(), Some("Generation service error"));
    assert_eq!(result.sources().len(), 1);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_fallback_when_enabled() {
    let mut config = configured();
    config.rag.fallback_enabled = true;
    config.rag.fallback_max_chars = 10;

    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::failing(ProviderFailure::status(429, "rate limit")));
    let rag = stub_rag(&config, &vector, &generator);

    let result = rag.query("What are your skills?").await;

    assert!(result.success);
    assert!(result.fallback);
    assert_eq!(result.answer, "Here's what I know: Linux, rou...");
    assert_eq!(result.sources().len(), 1);
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn test_missing_configuration() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let rag = stub_rag(&AppConfig::default(), &vector, &generator);

    let result = rag.query("What are your skills?").await;

    assert_eq!(result.error_kind, Some(ErrorKind::Configuration));
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .starts_with("Missing required configuration: UPSTASH_VECTOR_REST_URL"));
    assert_eq!(vector.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_blank_placeholder_is_never_answered() {
    let vector = Arc::new(StubVector::empty());
    let generator = Arc::new(StubGenerator::answering(SKILLS_ANSWER));
    let mut config = configured();
    config.persona.no_results_answer = String::new();
    let rag = stub_rag(&config, &vector, &generator);

    let result = rag.query("Do you play chess?").await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ErrorKind::Configuration));
    assert!(result.answer.is_empty());
    assert_eq!(vector.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_history_uses_chat_prompt() {
    let vector = skills_vector();
    let generator = Arc::new(StubGenerator::answering("I also know VLANs."));
    let rag = stub_rag(&configured(), &vector, &generator);

    let history = vec![
        ConversationTurn::user("Hi"),
        ConversationTurn::assistant("Hello! Ask me anything."),
    ];
    let result = rag.query_with_history("What else do you know?", &history).await;

    assert!(result.success);
    let request = generator.last_request().unwrap();
    assert_eq!(request.history, history);
    assert!(request.prompt.contains("Visitor's question: What else do you know?"));
}
