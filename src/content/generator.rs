//! Text generation backends.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::character::AttributeType;
use crate::config::ContentConfig;
use crate::error::ContentError;
use crate::quests::DifficultyTier;

const API_VERSION: &str = "2023-06-01";

/// What flavor text is being asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRequest {
    Quests {
        category: AttributeType,
        tier: DifficultyTier,
        count: usize,
    },
    GuildEvent {
        guild_name: String,
        category: AttributeType,
    },
}

impl ContentRequest {
    pub fn prompt(&self) -> String {
        match self {
            ContentRequest::Quests {
                category,
                tier,
                count,
            } => format!(
                "Write {count} short fantasy quest(s) for a fitness app. Each quest is a \
                 {tier} {activity} workout that trains {category}.\n\
                 Respond with ONLY a JSON array (no markdown), each element shaped like:\n\
                 {{\"title\": \"...\", \"description\": \"...\", \"category\": \"{category}\", \
                 \"difficulty\": \"{tier}\"}}\n\
                 Titles under 60 characters, descriptions under 300.",
                activity = category.activity(),
            ),
            ContentRequest::GuildEvent {
                guild_name,
                category,
            } => format!(
                "Write one fantasy-themed group workout event for the guild \"{guild_name}\". \
                 The event is a {activity} session that trains {category}.\n\
                 Respond with ONLY a JSON object (no markdown): \
                 {{\"title\": \"...\", \"description\": \"...\"}}",
                activity = category.activity(),
            ),
        }
    }
}

/// Source of raw flavor text. Output is validated by the caller.
pub trait ContentGenerator: Send + Sync {
    fn generate(&self, request: &ContentRequest) -> Result<String, ContentError>;
}

/// Generator that never produces text, so templates are always used.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl ContentGenerator for OfflineGenerator {
    fn generate(&self, _request: &ContentRequest) -> Result<String, ContentError> {
        Err(ContentError::Disabled)
    }
}

/// Generator that always returns the same canned text. Handy for demos and
/// tests of the validation boundary.
#[derive(Debug, Clone, Default)]
pub struct StaticGenerator {
    pub response: String,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl ContentGenerator for StaticGenerator {
    fn generate(&self, _request: &ContentRequest) -> Result<String, ContentError> {
        Ok(self.response.clone())
    }
}

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    content: Vec<ApiContentBlock>,
}

#[derive(Deserialize)]
struct ApiContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Messages-API client over blocking HTTP.
pub struct HttpGenerator {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl HttpGenerator {
    pub fn new(config: &ContentConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: api_key.into(),
        }
    }

    /// Builds a generator from config, reading the key from the configured
    /// environment variable.
    pub fn from_config(config: &ContentConfig) -> Result<Self, ContentError> {
        if !config.enabled {
            return Err(ContentError::Disabled);
        }
        let api_key = std::env::var(&config.api_key_env).map_err(|_| ContentError::NoApiKey)?;
        if api_key.trim().is_empty() {
            return Err(ContentError::NoApiKey);
        }
        Ok(Self::new(config, api_key))
    }
}

impl ContentGenerator for HttpGenerator {
    fn generate(&self, request: &ContentRequest) -> Result<String, ContentError> {
        let body = ApiRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content: request.prompt(),
            }],
        };

        let response = self
            .agent
            .post(&self.endpoint)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", API_VERSION)
            .set("content-type", "application/json")
            .send_json(&body);

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                let message = r.into_string().unwrap_or_default();
                return Err(ContentError::Api { status, message });
            }
            Err(e) => return Err(ContentError::Network(e.to_string())),
        };

        let parsed: ApiResponse = response
            .into_json()
            .map_err(|e| ContentError::Malformed(e.to_string()))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(ContentError::Malformed("empty response".to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_prompt_mentions_inputs() {
        let request = ContentRequest::Quests {
            category: AttributeType::Magic,
            tier: DifficultyTier::Hard,
            count: 2,
        };
        let prompt = request.prompt();
        assert!(prompt.contains("Write 2"));
        assert!(prompt.contains("hard yoga and mobility"));
        assert!(prompt.contains("\"category\": \"magic\""));
    }

    #[test]
    fn test_event_prompt_mentions_guild() {
        let request = ContentRequest::GuildEvent {
            guild_name: "Night Owls".to_string(),
            category: AttributeType::Speed,
        };
        assert!(request.prompt().contains("\"Night Owls\""));
    }

    #[test]
    fn test_offline_generator_always_fails() {
        let request = ContentRequest::GuildEvent {
            guild_name: "g".to_string(),
            category: AttributeType::Speed,
        };
        assert!(matches!(
            OfflineGenerator.generate(&request),
            Err(ContentError::Disabled)
        ));
    }

    #[test]
    fn test_disabled_config_refuses_http() {
        let config = ContentConfig::default();
        assert!(matches!(
            HttpGenerator::from_config(&config),
            Err(ContentError::Disabled)
        ));
    }

    #[test]
    fn test_api_response_text_blocks() {
        let json = r#"{"content": [{"type": "text", "text": "[1]"}, {"type": "tool_use", "id": "x"}]}"#;
        let parsed: ApiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.content.len(), 2);
        assert_eq!(parsed.content[0].text.as_deref(), Some("[1]"));
        assert!(parsed.content[1].text.is_none());
    }
}
