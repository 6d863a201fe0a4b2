use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::GenerationConfig;
use crate::model::{FaqEntry, FaqRecord};

pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const NO_CONTEXT: &str = "No FAQ items were retrieved.";

const SYSTEM_RULES: &str = "You are a helpful FAQ assistant for a company.\n\
- Use ONLY the provided FAQ context to answer.\n\
- If the context doesn't contain the answer, say you don't know and suggest contacting support.\n\
- Keep responses concise, with short bullet points when helpful.\n";

/// Everything a text generator needs for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub question: String,
    pub sources: Vec<FaqRecord>,
    pub text: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl PromptRequest {
    /// Messages-API request body.
    pub fn to_body(&self) -> Value {
        json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "messages": [
                {"role": "user", "content": [{"type": "text", "text": self.text}]}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }
}

pub fn format_context(entries: &[&FaqEntry]) -> String {
    if entries.is_empty() {
        return NO_CONTEXT.to_string();
    }

    entries
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            format!(
                "{}. Q: {}\n   A: {}",
                idx + 1,
                e.question().trim(),
                e.answer().trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(
    question: &str,
    entries: &[&FaqEntry],
    config: &GenerationConfig,
) -> PromptRequest {
    let user_msg = format!(
        "FAQ context:\n{}\n\nUser question: {question}\n\n\
         Answer using information from the context. If insufficient, say you don't know.",
        format_context(entries)
    );

    PromptRequest {
        question: question.to_string(),
        sources: entries.iter().map(|e| e.to_record()).collect(),
        text: format!("{SYSTEM_RULES}\n\n{user_msg}"),
        model_id: config.model_id.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}

/// Pulls the answer text out of a model response, trying the messages shape
/// first and then the single-field shapes other providers return.
pub fn extract_answer(payload: &Value) -> String {
    let first_part = payload
        .get("content")
        .and_then(Value::as_array)
        .and_then(|parts| parts.first());

    if let Some(part) = first_part {
        if part.get("type").and_then(Value::as_str) == Some("text") {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                return text.trim().to_string();
            }
        }
    }

    ["outputText", "generated_text"]
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_lists_entries_with_indices() {
        let a = FaqEntry::new("  What is your refund policy? ", "Refunds within 30 days.\n");
        let b = FaqEntry::new("How do I reset my password?", "Use the reset link.");
        assert_eq!(
            format_context(&[&a, &b]),
            "1. Q: What is your refund policy?\n   A: Refunds within 30 days.\n\
             2. Q: How do I reset my password?\n   A: Use the reset link."
        );
    }

    #[test]
    fn empty_context_uses_placeholder() {
        let prompt = build_prompt("Anything?", &[], &GenerationConfig::default());
        assert!(prompt.text.contains("FAQ context:\nNo FAQ items were retrieved.\n\n"));
        assert!(prompt.sources.is_empty());
    }

    #[test]
    fn prompt_carries_rules_question_and_settings() {
        let entry = FaqEntry::new("Q1", "A1");
        let config = GenerationConfig {
            max_tokens: 42,
            ..GenerationConfig::default()
        };
        let prompt = build_prompt("refund?", &[&entry], &config);

        assert!(prompt.text.starts_with("You are a helpful FAQ assistant"));
        assert!(prompt.text.contains("User question: refund?\n\n"));
        assert!(prompt.text.ends_with("say you don't know."));
        assert_eq!(prompt.sources, vec![FaqRecord::new("Q1", "A1")]);

        let body = prompt.to_body();
        assert_eq!(body["anthropic_version"], ANTHROPIC_VERSION);
        assert_eq!(body["max_tokens"], 42);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["text"], prompt.text.as_str());
    }

    #[test]
    fn extracts_answer_from_known_shapes() {
        let messages = json!({"content": [{"type": "text", "text": "  Hi there \n"}]});
        assert_eq!(extract_answer(&messages), "Hi there");

        assert_eq!(extract_answer(&json!({"outputText": "titan"})), "titan");
        assert_eq!(extract_answer(&json!({"generated_text": "llama"})), "llama");

        let unknown = json!({"weird": 1});
        assert_eq!(extract_answer(&unknown), r#"{"weird":1}"#);
    }
}
