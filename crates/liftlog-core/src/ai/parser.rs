//! Entry extraction via the Anthropic Messages API
//!
//! The transcript of one spoken set («присед 60 кг на 6 раз, тяжело») is
//! handed to the model with a strict JSON-only prompt; the response is then
//! reduced to a [`ParsedEntry`]. Models occasionally wrap the JSON in prose
//! or code fences, so extraction looks for the outermost braces instead of
//! parsing the response verbatim.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ParserBackend;
use crate::error::{Error, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";
const MAX_TOKENS: u32 = 512;

const PARSE_SYSTEM_PROMPT: &str = "\
Ты разбираешь надиктованное описание одного подхода силовой тренировки.\n\
Верни только JSON-объект без пояснений, с полями:\n\
- \"exercise\": название упражнения, нормализованное (нижний регистр, именительный падеж, без веса и повторений)\n\
- \"exercise_raw\": название упражнения так, как его произнесли\n\
- \"weight\": вес в килограммах числом, или null если не назван\n\
- \"reps\": число повторений, или null если не названо\n\
- \"comment\": остальной комментарий («тяжело», «широким хватом»), или null";

const NORMALIZE_SYSTEM_PROMPT: &str = "\
Нормализуй название упражнения: нижний регистр, именительный падеж.\n\
Верни только JSON-объект вида {\"exercise\": \"...\"} без пояснений.";

/// One spoken set, reduced to structured fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParsedEntry {
    pub exercise: String,
    #[serde(default)]
    pub exercise_raw: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct NormalizedName {
    exercise: String,
}

/// Entry parser backed by the Anthropic Messages API
pub struct ClaudeParser {
    http_client: Client,
    api_key: String,
    model: String,
}

impl ClaudeParser {
    pub fn new(api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Send one user message and return the model's text response
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .http_client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "Messages API returned {}: {}",
                status, body
            )));
        }

        let body: MessagesResponse = response.json().await?;
        let text = body
            .content
            .iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text.clone())
            .ok_or_else(|| Error::Api("No text block in Messages API response".to_string()))?;

        debug!(chars = text.len(), "Model response received");
        Ok(text)
    }
}

#[async_trait]
impl ParserBackend for ClaudeParser {
    async fn parse_entry(&self, text: &str) -> Result<ParsedEntry> {
        let response = self.complete(PARSE_SYSTEM_PROMPT, text).await?;
        parse_entry_response(&response)
    }

    async fn normalize_exercise(&self, raw: &str) -> Result<String> {
        let response = self.complete(NORMALIZE_SYSTEM_PROMPT, raw).await?;
        let parsed: NormalizedName = serde_json::from_str(extract_json(&response)?)?;
        let name = parsed.exercise.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidData("Empty normalized exercise name".to_string()));
        }
        Ok(name)
    }
}

/// Find the outermost JSON object in a model response
fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in model response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a model response into a [`ParsedEntry`]
pub fn parse_entry_response(response: &str) -> Result<ParsedEntry> {
    let json_str = extract_json(response)?;
    let mut parsed: ParsedEntry = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!("Invalid entry JSON from model: {} | Raw: {}", e, truncate(json_str)))
    })?;

    parsed.exercise = parsed.exercise.trim().to_string();
    if parsed.exercise.is_empty() {
        return Err(Error::InvalidData("Model returned an empty exercise name".to_string()));
    }
    parsed.exercise_raw = parsed.exercise_raw.trim().to_string();
    if parsed.exercise_raw.is_empty() {
        parsed.exercise_raw = parsed.exercise.clone();
    }
    parsed.comment = parsed
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(parsed)
}

/// Truncate long model responses for error messages
fn truncate(s: &str) -> String {
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let response = r#"{"exercise": "присед", "exercise_raw": "Присед со штангой", "weight": 60, "reps": 6, "comment": null}"#;
        let parsed = parse_entry_response(response).unwrap();
        assert_eq!(parsed.exercise, "присед");
        assert_eq!(parsed.exercise_raw, "Присед со штангой");
        assert_eq!(parsed.weight, Some(60.0));
        assert_eq!(parsed.reps, Some(6));
        assert_eq!(parsed.comment, None);
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "Вот результат:\n```json\n{\"exercise\": \"жим лёжа\", \"weight\": 80.5, \"reps\": 5, \"comment\": \"тяжело\"}\n```";
        let parsed = parse_entry_response(response).unwrap();
        assert_eq!(parsed.exercise, "жим лёжа");
        assert_eq!(parsed.weight, Some(80.5));
        assert_eq!(parsed.comment.as_deref(), Some("тяжело"));
        // Missing exercise_raw falls back to the normalized name
        assert_eq!(parsed.exercise_raw, "жим лёжа");
    }

    #[test]
    fn test_parse_bodyweight_entry() {
        let response = r#"{"exercise": "подтягивания", "exercise_raw": "подтягивания широким хватом", "weight": null, "reps": 8, "comment": "широким хватом"}"#;
        let parsed = parse_entry_response(response).unwrap();
        assert_eq!(parsed.weight, None);
        assert_eq!(parsed.reps, Some(8));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_entry_response("не удалось разобрать").is_err());
        assert!(parse_entry_response(r#"{"exercise": ""}"#).is_err());
        assert!(parse_entry_response(r#"{"weight": 60}"#).is_err());
    }

    #[test]
    fn test_blank_comment_becomes_none() {
        let response = r#"{"exercise": "присед", "comment": "  "}"#;
        let parsed = parse_entry_response(response).unwrap();
        assert_eq!(parsed.comment, None);
    }
}
