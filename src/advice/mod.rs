//! Free-text advice about a computed plan from a language model.

mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AdviceSettings;
use crate::core::{Cell, PlanResult, sheets};

pub use gemini::GeminiClient;

pub const ADVICE_UNAVAILABLE_MESSAGE: &str =
    "Sorry, I encountered an error while analyzing your plan. Please try again later.";

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful and supportive AI financial assistant for users in India. \
Your name is 'FinPal'. Analyze the user's financial plan summary provided and answer their specific question. \
Provide actionable, concise, and encouraging advice. Do not give generic financial advice that ignores the user's data. \
Format your response for clarity, using markdown-style lists with '*' for bullet points and bolding with '**' for emphasis.";

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("no advice provider configured; set GEMINI_API_KEY")]
    NotConfigured,

    #[error("advice request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("advice provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("advice provider returned no text")]
    EmptyResponse,
}

/// Port to the language model: plan digest and question in, advice out.
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    async fn advise(&self, plan_summary: &str, question: &str) -> Result<String, AdviceError>;
}

#[derive(Clone, Default)]
pub struct AdviceService {
    provider: Option<Arc<dyn AdviceProvider>>,
}

impl AdviceService {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Builds a Gemini-backed service, or a disabled one when no API key is set.
    pub fn from_settings(settings: &AdviceSettings) -> Result<Self, AdviceError> {
        match GeminiClient::from_settings(settings)? {
            Some(client) => Ok(Self::new(Arc::new(client))),
            None => {
                tracing::info!("advice disabled: no API key configured");
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn try_ask(&self, plan: &PlanResult, question: &str) -> Result<String, AdviceError> {
        let provider = self.provider.as_ref().ok_or(AdviceError::NotConfigured)?;
        let digest = plan_digest(plan);
        let answer = provider.advise(&digest, question).await?;
        if answer.trim().is_empty() {
            return Err(AdviceError::EmptyResponse);
        }
        Ok(answer)
    }

    /// Never fails: provider errors are logged and replaced by the apology text.
    pub async fn ask(&self, plan: &PlanResult, question: &str) -> String {
        match self.try_ask(plan, question).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(error = %err, "advice request failed");
                ADVICE_UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}

fn cell_text(cell: Option<&Cell>) -> String {
    cell.map(Cell::display)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Short textual summary of the plan, read from its sheets by label.
pub fn plan_digest(plan: &PlanResult) -> String {
    let mut parts = Vec::new();

    if let Some(inputs) = plan.sheet(sheets::INPUTS_SUMMARY) {
        let fields: Vec<String> = inputs
            .data_rows()
            .iter()
            .map(|row| format!("{}: {}", cell_text(row.first()), cell_text(row.get(1))))
            .collect();
        parts.push(format!("- Key Inputs: {}", fields.join(", ")));
    }

    if let Some(expenses) = plan.sheet(sheets::EXPENSES) {
        let total = expenses.rows.last().and_then(|row| row.get(1));
        parts.push(format!("- Total Monthly Expenses: {}", cell_text(total)));
    }

    if let Some(sip) = plan.sheet(sheets::SIP_PLAN) {
        let goal = cell_text(sip.value_for(sheets::SIP_PASSIVE_TARGET));
        let corpus = cell_text(sip.value_for(sheets::SIP_CORPUS_NEEDED));
        let surplus = cell_text(sip.value_for(sheets::SIP_AVAILABLE_SURPLUS));
        let required = cell_text(sip.value_for(sheets::SIP_REQUIRED));
        parts.push(format!("- Financial Goal: Achieve passive income of {goal}."));
        parts.push(format!("- Goal Details: Requires a corpus of {corpus}."));
        parts.push(format!(
            "- Cash Flow: Monthly Surplus is {surplus}. Required Monthly SIP for goal is {required}."
        ));
    }

    if let Some(recommendations) = plan.sheet(sheets::RECOMMENDATIONS) {
        let bullets: Vec<String> = recommendations
            .data_rows()
            .iter()
            .map(|row| format!("  - {}", cell_text(row.first())))
            .collect();
        parts.push(format!(
            "- Generated Recommendations:\n{}",
            bullets.join("\n")
        ));
    }

    parts.join("\n")
}

pub fn build_prompt(plan_summary: &str, question: &str) -> String {
    format!(
        "\nUser's Financial Plan Summary:\n---\n{plan_summary}\n---\n\nUser's Question: \"{question}\"\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlanInput, generate_plan};
    use std::sync::Mutex;

    struct RecordingProvider {
        reply: Result<String, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    impl RecordingProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AdviceProvider for RecordingProvider {
        async fn advise(&self, plan_summary: &str, question: &str) -> Result<String, AdviceError> {
            self.seen
                .lock()
                .expect("lock")
                .push((plan_summary.to_string(), question.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(AdviceError::Status {
                    status: 503,
                    body: "overloaded".to_string(),
                }),
            }
        }
    }

    #[test]
    fn digest_reads_named_rows_from_sheets() {
        let plan = generate_plan(&PlanInput::default());
        let digest = plan_digest(&plan);
        let lines: Vec<&str> = digest.lines().collect();

        assert!(lines[0].starts_with("- Key Inputs: Net Monthly Income: ₹50,000, Side Income: ₹0, Risk Profile: Moderate"));
        assert!(lines[0].ends_with("Current Emergency Fund: ₹50,000"));
        assert_eq!(lines[1], "- Total Monthly Expenses: ₹31,000");
        assert_eq!(lines[2], "- Financial Goal: Achieve passive income of ₹10,000.");
        assert_eq!(lines[3], "- Goal Details: Requires a corpus of ₹17,14,286.");
        assert_eq!(
            lines[4],
            "- Cash Flow: Monthly Surplus is ₹19,000. Required Monthly SIP for goal is ₹37,475."
        );
        assert_eq!(lines[5], "- Generated Recommendations:");
        assert_eq!(lines.len(), 6 + plan.recommendations.len());
        assert!(lines[6].starts_with("  - Monthly Surplus"));
    }

    #[test]
    fn digest_falls_back_to_not_available_for_missing_rows() {
        let mut plan = generate_plan(&PlanInput::default());
        plan.sheets.retain(|s| s.name != sheets::INPUTS_SUMMARY);
        if let Some(sip) = plan.sheets.iter_mut().find(|s| s.name == sheets::SIP_PLAN) {
            sip.rows.truncate(1);
        }
        let digest = plan_digest(&plan);
        assert!(!digest.contains("Key Inputs"));
        assert!(digest.contains("Achieve passive income of N/A."));
        assert!(digest.contains("Monthly Surplus is N/A."));
    }

    #[test]
    fn prompt_wraps_summary_and_quotes_question() {
        let prompt = build_prompt("- a", "How do I save more?");
        assert!(prompt.contains("---\n- a\n---"));
        assert!(prompt.contains("User's Question: \"How do I save more?\""));
    }

    #[tokio::test]
    async fn ask_passes_digest_and_question_to_provider() {
        let provider = Arc::new(RecordingProvider::replying("* **Invest** more"));
        let service = AdviceService::new(provider.clone());
        let plan = generate_plan(&PlanInput::default());

        let answer = service.ask(&plan, "What next?").await;
        assert_eq!(answer, "* **Invest** more");

        let seen = provider.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, plan_digest(&plan));
        assert_eq!(seen[0].1, "What next?");
    }

    #[tokio::test]
    async fn provider_failure_becomes_apology() {
        let service = AdviceService::new(Arc::new(RecordingProvider::failing()));
        let plan = generate_plan(&PlanInput::default());
        assert_eq!(service.ask(&plan, "Hi").await, ADVICE_UNAVAILABLE_MESSAGE);

        let err = service.try_ask(&plan, "Hi").await.expect_err("must fail");
        assert!(matches!(err, AdviceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn blank_answer_counts_as_failure() {
        let service = AdviceService::new(Arc::new(RecordingProvider::replying("  \n")));
        let plan = generate_plan(&PlanInput::default());
        let err = service.try_ask(&plan, "Hi").await.expect_err("blank");
        assert!(matches!(err, AdviceError::EmptyResponse));
    }

    #[tokio::test]
    async fn disabled_service_apologises() {
        let service = AdviceService::disabled();
        assert!(!service.is_enabled());
        let plan = generate_plan(&PlanInput::default());
        assert_eq!(service.ask(&plan, "Hi").await, ADVICE_UNAVAILABLE_MESSAGE);
        assert!(matches!(
            service.try_ask(&plan, "Hi").await,
            Err(AdviceError::NotConfigured)
        ));
    }

    #[test]
    fn settings_without_key_build_disabled_service() {
        let service = AdviceService::from_settings(&AdviceSettings::default()).expect("service");
        assert!(!service.is_enabled());
    }
}
