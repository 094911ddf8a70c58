//! Prompt templates for persona answers

use std::collections::HashMap;

use crate::config::PersonaConfig;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template in one pass; unknown placeholders are left as
    /// written and substituted values are never rescanned
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };
            match values.get(after[..end].trim()) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Get placeholder names in order of first appearance
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            let var_name = var_name.trim().to_string();
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Compiled persona prompts
#[derive(Debug, Clone)]
pub struct PersonaPrompts {
    system: String,
    single_shot: PromptTemplate,
    chat: PromptTemplate,
}

impl PersonaPrompts {
    #[must_use]
    pub fn from_config(persona: &PersonaConfig) -> Self {
        Self {
            system: persona.system_prompt.clone(),
            single_shot: PromptTemplate::new(persona.user_template.as_str()),
            chat: PromptTemplate::new(persona.chat_template.as_str()),
        }
    }

    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Build the user prompt; the chat wording is used when prior turns exist
    #[must_use]
    pub fn user_prompt(&self, context: &str, question: &str, has_history: bool) -> String {
        let template = if has_history {
            &self.chat
        } else {
            &self.single_shot
        };
        let values = HashMap::from([("context", context), ("question", question)]);
        template.render(&values)
    }
}
