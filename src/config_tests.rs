//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, overrides and validation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use crate::config::*;
    use crate::errors::ErrorKind;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    // ====== Default Value Tests ======

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.top_k(), 3);
        assert_eq!(config.vector_timeout().as_secs(), 10);
        assert_eq!(config.llm_timeout().as_secs(), 15);
        assert_eq!(config.llm.max_attempts, 2);
        assert_eq!(config.llm_retry_delay().as_secs(), 1);
        assert_eq!(config.llm_model(), "llama-3.1-8b-instant");
        assert_eq!(config.rag.max_question_length, 1_000);
        assert_eq!(config.rag.max_prompt_length, 30_000);
        assert!(!config.rag.fallback_enabled);
    }

    #[test]
    fn test_default_persona_is_first_person() {
        let persona = PersonaConfig::default();
        assert!(persona.system_prompt.contains("first person"));
        assert!(persona.user_template.contains("{{context}}"));
        assert!(persona.user_template.contains("{{question}}"));
        assert!(persona.chat_template.contains("{{question}}"));
    }

    // ====== File Parsing Tests ======

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[vector]
url = "https://example-vector.upstash.io"
top_k = 5

[rag]
fallback_enabled = true
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.vector_url(), "https://example-vector.upstash.io");
        assert_eq!(config.top_k(), 5);
        assert_eq!(config.vector.timeout_ms, 10_000);
        assert!(config.rag.fallback_enabled);
        assert_eq!(config.llm.max_tokens, 500);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vector\nurl = ").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }

    // ====== Override Tests ======

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (ENV_VECTOR_URL, "https://vec.example.com"),
            (ENV_VECTOR_TOKEN, "token-123"),
            (ENV_LLM_API_KEY, "gsk_abc"),
            (ENV_LOG_LEVEL, "debug"),
        ]);
        let mut config = AppConfig::default();
        config.apply_overrides_from(|k| vars.get(k).cloned());

        assert_eq!(config.vector.url, "https://vec.example.com");
        assert_eq!(config.vector.token, "token-123");
        assert_eq!(config.llm.api_key, "gsk_abc");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let vars = env(&[(ENV_VECTOR_TOKEN, "   ")]);
        let mut config = AppConfig::default();
        config.vector.token = "from-file".to_string();
        config.apply_overrides_from(|k| vars.get(k).cloned());

        assert_eq!(config.vector.token, "from-file");
    }

    // ====== Validation Tests ======

    #[test]
    fn test_missing_settings_listed() {
        let config = AppConfig::default();
        assert_eq!(
            config.missing_service_settings(),
            vec![ENV_VECTOR_URL, ENV_VECTOR_TOKEN, ENV_LLM_API_KEY]
        );

        let err = config.validate_services().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains(ENV_LLM_API_KEY));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = AppConfig::default();
        config.vector.url = "not a url".to_string();
        config.vector.token = "t".to_string();
        config.llm.api_key = "k".to_string();

        let err = config.validate_services().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_complete_config_validates() {
        let mut config = AppConfig::default();
        config.vector.url = "https://vec.example.com".to_string();
        config.vector.token = "t".to_string();
        config.llm.api_key = "k".to_string();

        assert!(config.validate_services().is_ok());
    }

    #[test]
    fn test_blank_placeholder_answers_rejected() {
        let mut config = AppConfig::default();
        config.vector.url = "https://vec.example.com".to_string();
        config.vector.token = "t".to_string();
        config.llm.api_key = "k".to_string();
        config.persona.no_results_answer = "   ".to_string();

        let err = config.validate_services().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "Placeholder answers must not be blank: persona.no_results_answer"
        );
    }

    // ====== Masking Tests ======

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("gsk_1234567890"), "gsk_****");
        assert_eq!(mask_secret(""), "(not set)");
    }

    #[test]
    fn test_mask_url() {
        assert_eq!(
            mask_url("https://user:pw@vec.example.com/path?x=1"),
            "https://vec.example.com/..."
        );
        assert_eq!(mask_url("garbage"), "***");
    }
}
