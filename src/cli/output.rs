//! CLI output formatting utilities

use crate::config::mask_secret;
use crate::config::mask_url;
use crate::health::HealthReport;
use crate::models::QueryResult;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Returns the string with a "..." suffix if truncated, otherwise unchanged.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print a pipeline result for a human reader
pub fn print_query_result(result: &QueryResult) {
    if !result.success {
        let kind = result
            .error_kind
            .map_or_else(|| "Unknown".to_string(), |k| k.to_string());
        println!("❌ {} ({kind})", result.error.as_deref().unwrap_or("Unknown error"));
        println!("⏱️  {}ms", result.duration_ms);
        return;
    }

    println!("{}", result.answer);
    if result.fallback {
        println!();
        println!("⚠️  Generated from raw records; the generation service was unavailable");
    }

    let sources = result.sources();
    if !sources.is_empty() {
        println!();
        println!("📚 Sources:");
        for (idx, source) in sources.iter().enumerate() {
            println!(
                "  {}. {} ({})",
                idx + 1,
                truncate_str(&source.title, 60),
                source.relevance_percent()
            );
        }
    }
    println!();
    println!("⏱️  {}ms", result.duration_ms);
}

/// Print a health report
pub fn print_health_report(report: &HealthReport) {
    print!("{}", report.render());
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 Digital Twin Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  File output: {}", config.logging.file_output);
    println!("  Log dir: {}", config.logging.log_dir);
    println!();

    println!("🔎 Vector service:");
    println!("  URL: {}", mask_url(config.vector_url()));
    println!("  Token: {}", mask_secret(&config.vector.token));
    println!("  Top K: {}", config.top_k());
    println!("  Timeout: {}ms", config.vector.timeout_ms);
    println!();

    println!("🤖 Generation service:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  API key: {}", mask_secret(&config.llm.api_key));
    println!("  Model: {}", config.llm_model());
    println!(
        "  Sampling: temperature={} top_p={} max_tokens={}",
        config.llm.temperature, config.llm.top_p, config.llm.max_tokens
    );
    println!(
        "  Timeout: {}ms, attempts: {}, retry delay: {}ms",
        config.llm.timeout_ms, config.llm.max_attempts, config.llm.retry_delay_ms
    );
    println!();

    println!("🧩 RAG:");
    println!("  Max question length: {}", config.rag.max_question_length);
    println!("  Max prompt length: {}", config.rag.max_prompt_length);
    println!("  Fallback answers: {}", config.rag.fallback_enabled);
    println!("  Persona: {}", truncate_str(&config.persona.system_prompt, 70));
    println!();

    println!("🌐 Server:");
    println!("  Address: {}", config.bind_address());
    println!("  CORS: {}", config.server.enable_cors);
    println!("  Session timeout: {}s", config.server.session_timeout_secs);

    let missing = config.missing_service_settings();
    if !missing.is_empty() {
        println!();
        println!("⚠️  Missing: {}", missing.join(", "));
    }
}
