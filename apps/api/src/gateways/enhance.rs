//! Enhancement gateway implementations.
//!
//! `LlmEnhancer` talks to the Anthropic Messages API; `TemplateEnhancer`
//! is a deterministic offline rewrite used when no API key is configured.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::editor::SectionId;
use crate::gateways::prompts::{ENHANCE_PROMPT, ENHANCE_SYSTEM};
use crate::gateways::{EnhanceError, EnhancementGateway};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Hardcoded so every session gets the same rewrite behavior.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// LLM-backed enhancer with retry on 429/5xx and exponential backoff.
#[derive(Clone)]
pub struct LlmEnhancer {
    client: Client,
    api_key: String,
}

impl LlmEnhancer {
    pub fn new(api_key: String) -> Self {
        LlmEnhancer {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn call(&self, prompt: &str) -> Result<String, EnhanceError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: ENHANCE_SYSTEM,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<EnhanceError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "enhance call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EnhanceError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("enhancement API returned {}: {}", status, body);
                last_error = Some(EnhanceError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(EnhanceError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: AnthropicResponse = response.json().await?;

            debug!(
                "enhance call succeeded: input_tokens={}, output_tokens={}",
                parsed.usage.input_tokens, parsed.usage.output_tokens
            );

            let text = parsed.text().ok_or(EnhanceError::EmptyContent)?.trim();
            if text.is_empty() {
                return Err(EnhanceError::EmptyContent);
            }
            return Ok(text.to_owned());
        }

        Err(last_error.unwrap_or(EnhanceError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl EnhancementGateway for LlmEnhancer {
    async fn enhance(&self, section: SectionId, text: &str) -> Result<String, EnhanceError> {
        let prompt = ENHANCE_PROMPT
            .replace("{section}", section.as_str())
            .replace("{content}", text);
        self.call(&prompt).await
    }
}

/// Deterministic rule-based enhancer: a canned per-section opener plus a
/// tidied copy of the user's text. Keeps the service fully usable with no
/// API key.
pub struct TemplateEnhancer;

/// Uppercases the first character and lowercases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

pub(crate) fn template_rewrite(section: SectionId, content: &str) -> String {
    let content = content.trim();
    let lowered = content.to_lowercase();

    match section {
        SectionId::Summary => format!(
            "An ambitious and results-oriented professional recognized for exceptional \
             problem-solving skills, adaptability, and a relentless drive for excellence. {}",
            capitalize(content)
        ),
        SectionId::Experience => format!(
            "Successfully contributed to key projects, collaborated with teams, and applied \
             knowledge to real-world challenges. {}",
            capitalize(content)
        ),
        SectionId::Education => {
            if ["btech", "b.tech", "bachelor"].iter().any(|k| lowered.contains(k)) {
                format!(
                    "Completed my Bachelor of Technology with consistently strong academic \
                     performance and a growing CGPA each semester. {}",
                    capitalize(content)
                )
            } else {
                format!(
                    "Completed education with strong academic performance and a focus on \
                     personal and professional growth. {}",
                    capitalize(content)
                )
            }
        }
        SectionId::Skills => {
            if lowered.contains("react") {
                format!(
                    "Experienced in React and JavaScript, with a strong grasp of frontend \
                     development principles. {}",
                    capitalize(content)
                )
            } else if lowered.contains("python") {
                format!(
                    "Skilled in Python, especially with libraries like NumPy and Pandas, with \
                     strong scripting and automation abilities. {}",
                    capitalize(content)
                )
            } else {
                format!(
                    "Possess strong technical skills in modern tools and frameworks relevant \
                     to today's tech roles. {}",
                    capitalize(content)
                )
            }
        }
        SectionId::Projects => format!(
            "Demonstrated ability to lead and contribute to impactful projects, showcasing \
             technical skills and teamwork. {}",
            capitalize(content)
        ),
    }
}

#[async_trait]
impl EnhancementGateway for TemplateEnhancer {
    async fn enhance(&self, section: SectionId, text: &str) -> Result<String, EnhanceError> {
        Ok(template_rewrite(section, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_matches_sentence_case() {
        assert_eq!(capitalize("worked AT a"), "Worked at a");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_summary_rewrite_prefixes_and_keeps_content() {
        let out = template_rewrite(SectionId::Summary, "built things fast");
        assert!(out.starts_with("An ambitious and results-oriented professional"));
        assert!(out.ends_with("Built things fast"));
    }

    #[test]
    fn test_education_rewrite_recognizes_a_bachelors_degree() {
        let out = template_rewrite(SectionId::Education, "B.Tech in CS from IIT");
        assert!(out.contains("Bachelor of Technology"));

        let generic = template_rewrite(SectionId::Education, "High school diploma");
        assert!(generic.starts_with("Completed education"));
    }

    #[test]
    fn test_skills_rewrite_branches_on_stack_keywords() {
        let react = template_rewrite(SectionId::Skills, "React, CSS");
        assert!(react.contains("Experienced in React and JavaScript"));

        let python = template_rewrite(SectionId::Skills, "Python, SQL");
        assert!(python.contains("Skilled in Python"));

        let other = template_rewrite(SectionId::Skills, "Go, Kubernetes");
        assert!(other.starts_with("Possess strong technical skills"));
    }

    #[tokio::test]
    async fn test_template_enhancer_never_fails() {
        let out = TemplateEnhancer
            .enhance(SectionId::Projects, "wrote a compiler")
            .await
            .unwrap();
        assert!(out.contains("impactful projects"));
        assert!(out.contains("Wrote a compiler"));
    }
}
