//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AdviceError, AdviceProvider, SYSTEM_INSTRUCTION, build_prompt};
use crate::config::AdviceSettings;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// `None` when the settings carry no API key.
    pub fn from_settings(settings: &AdviceSettings) -> Result<Option<Self>, AdviceError> {
        let Some(api_key) = settings.api_key.clone() else {
            return Ok(None);
        };
        let http = Client::builder().timeout(settings.timeout).build()?;
        Ok(Some(Self {
            http,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
        }))
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, AdviceError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AdviceError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl AdviceProvider for GeminiClient {
    async fn advise(&self, plan_summary: &str, question: &str) -> Result<String, AdviceError> {
        let prompt = build_prompt(plan_summary, question);
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "requesting advice");
        let response = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdviceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}
