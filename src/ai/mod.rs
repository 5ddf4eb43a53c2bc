use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;

use crate::config::AiConfig;

/// Externally supplied fraud assessment for a block of job-posting text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AiAssessment {
    pub score: u8,
    pub confidence: u8,
    pub red_flags: Vec<String>,
}

impl AiAssessment {
    /// Placeholder for paths where the collaborator is never consulted.
    pub fn none() -> Self {
        Self::default()
    }
}

/// External AI job-text scorer.
///
/// Total contract: implementations never surface failure; they substitute a
/// deterministic fallback result instead, so the engine never observes an
/// error from this collaborator.
#[async_trait]
pub trait AiAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> AiAssessment;
}

/// Deterministic lexical analyzer. Used directly when no AI endpoint is
/// configured and as the fallback when the remote call fails.
pub struct HeuristicAnalyzer;

impl HeuristicAnalyzer {
    pub fn assess(text: &str) -> AiAssessment {
        let lower = text.to_lowercase();
        let mut score: u32 = 30;
        let mut red_flags: Vec<String> = Vec::new();

        if lower.contains("fee") || lower.contains("payment") || lower.contains("deposit") {
            score += 35;
            red_flags
                .push("Mentions payment or fees which is unusual for legitimate jobs".to_string());
        }
        if lower.contains("whatsapp") || lower.contains("telegram") {
            score += 25;
            red_flags.push(
                "Uses informal messaging apps instead of professional communication".to_string(),
            );
        }
        if lower.contains("gmail") || lower.contains("yahoo") {
            score += 15;
            red_flags.push("Uses personal email domain instead of company domain".to_string());
        }
        if lower.contains("earn") && (lower.contains('$') || lower.contains("money")) {
            score += 20;
            red_flags.push("Makes unrealistic income promises".to_string());
        }
        if text.chars().count() < 100 {
            score += 10;
            red_flags
                .push("Job description is unusually brief and lacks important details".to_string());
        }

        if red_flags.is_empty() {
            red_flags.push("No major red flags detected by AI analysis".to_string());
            red_flags.push("Job posting appears to follow professional standards".to_string());
        }

        let score = score.min(100) as u8;
        AiAssessment {
            score,
            confidence: (u32::from(score) + 10).min(95) as u8,
            red_flags,
        }
    }
}

#[async_trait]
impl AiAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, text: &str) -> AiAssessment {
        Self::assess(text)
    }
}

/// Chat-completion client for an OpenAI-compatible endpoint.
pub struct OpenAiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

const SYSTEM_PROMPT: &str = "You are an AI fraud detection assistant specializing in \
     identifying fake job postings. Provide structured, accurate analysis.";

impl OpenAiClient {
    pub fn new(config: &AiConfig, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            client,
        }
    }

    async fn request(&self, text: &str) -> Result<AiAssessment, AiError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(text) },
            ],
            "temperature": 0.3,
            "max_tokens": 500,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AiError::Http)?;

        let json: Value = resp.json().await.map_err(AiError::Http)?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(AiError::MalformedResponse)?;

        Ok(parse_assessment(content))
    }
}

#[async_trait]
impl AiAnalyzer for OpenAiClient {
    async fn analyze(&self, text: &str) -> AiAssessment {
        match self.request(text).await {
            Ok(assessment) => assessment,
            Err(e) => {
                tracing::warn!("AI analysis failed, using heuristic fallback: {e}");
                HeuristicAnalyzer::assess(text)
            }
        }
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "You are an AI fraud detection assistant. Analyze the following job description \
         and determine whether it is Legit, Suspicious, or Fake.\n\n\
         Identify red flags such as:\n\
         - Payment or fee requests\n\
         - Vague company details\n\
         - Unrealistic salaries or promises\n\
         - Suspicious contact methods (WhatsApp, Telegram, personal emails)\n\
         - Poor grammar or unprofessional language\n\
         - Urgency tactics or pressure\n\
         - Too-good-to-be-true claims\n\n\
         Job Description:\n\"\"\"\n{text}\n\"\"\"\n\n\
         Provide your analysis in the following format:\n\
         Classification: [Legit/Suspicious/Fake]\n\
         Confidence: [0-100]\n\
         Red Flags:\n\
         - [List each red flag on a new line with a dash]\n\n\
         Be specific and reference actual content from the job description."
    )
}

/// Parse the plain-text reply into a structured assessment. Lenient: missing
/// fields fall back to a Suspicious/50 default.
fn parse_assessment(response: &str) -> AiAssessment {
    let mut score: u8 = 55;
    let mut confidence: u8 = 50;
    let mut red_flags: Vec<String> = Vec::new();

    for line in response.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let lower = line.to_lowercase();

        if let Some(idx) = lower.find("classification:") {
            let value = lower[idx + "classification:".len()..].trim_start();
            if value.starts_with("legit") {
                score = 20;
            } else if value.starts_with("fake") {
                score = 90;
            } else if value.starts_with("suspicious") {
                score = 55;
            }
        }

        if let Some(idx) = lower.find("confidence:") {
            let digits: String = lower[idx + "confidence:".len()..]
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(value) = digits.parse::<u32>() {
                confidence = value.min(100) as u8;
            }
        }

        if let Some(flag) = line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
            let flag = flag.trim();
            if !flag.is_empty() {
                red_flags.push(flag.to_string());
            }
        }
    }

    if red_flags.is_empty() {
        red_flags.push("AI analysis completed".to_string());
    }

    AiAssessment {
        score,
        confidence,
        red_flags,
    }
}

/// AI collaborator failure, absorbed before it reaches the engine.
#[derive(Debug)]
pub enum AiError {
    Http(reqwest::Error),
    MalformedResponse,
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiError::Http(e) => write!(f, "HTTP error: {e}"),
            AiError::MalformedResponse => write!(f, "malformed completion response"),
        }
    }
}

impl std::error::Error for AiError {}
