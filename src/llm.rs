//! Client for the remote grading/hint/distractor collaborator.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. The contract is
//! deliberately narrow: grade an answer out of 10, produce a non-revealing
//! hint, or fabricate plausible wrong answers for multiple choice.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Per-request timeout; a hung remote call must not stall a handler forever
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, TLS)
    Http(reqwest::Error),
    /// Non-2xx response from the API
    Api { status: u16, body: String },
    /// 2xx response whose body could not be used (malformed JSON, no
    /// choices, or no parsable grade)
    InvalidResponse(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::Http(e) => write!(f, "request to grading service failed: {}", e),
            LlmError::Api { status, body } => {
                write!(f, "grading service returned HTTP {}: {}", status, body)
            }
            LlmError::InvalidResponse(body) => {
                write!(f, "grading service returned an unusable response: {}", body)
            }
        }
    }
}

impl std::error::Error for LlmError {}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            model,
        }
    }

    /// Build a client from config.toml / environment, or None when no
    /// credential is configured.
    pub fn from_env() -> Option<Self> {
        let settings = config::load_llm_settings()?;
        Some(Self::new(settings.api_key, settings.model))
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|_| LlmError::InvalidResponse(body.clone()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::InvalidResponse(body))
    }

    /// Grade a free-text answer out of 10. A response with no parsable
    /// integer is an InvalidResponse; callers treat that as "ungraded"
    /// rather than a wrong answer.
    pub async fn grade(
        &self,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> Result<u8, LlmError> {
        let text = self
            .chat(
                "You grade flashcard answers. Reply with ONLY an integer from 0 to 10, \
                 where 10 means the answer is fully correct. No words, no punctuation.",
                &format!(
                    "Question: {}\nCorrect answer: {}\nStudent answer: {}",
                    question, correct_answer, user_answer
                ),
            )
            .await?;
        tracing::debug!("remote grade response: {:?}", text);
        parse_grade(&text).ok_or(LlmError::InvalidResponse(text))
    }

    /// Ask for a clue that does not reveal the answer.
    pub async fn hint(&self, question: &str, correct_answer: &str) -> Result<String, LlmError> {
        let text = self
            .chat(
                "You help flashcard students with hints. Give one short clue that points \
                 toward the answer without revealing it or any of its words.",
                &format!("Question: {}\nAnswer: {}", question, correct_answer),
            )
            .await?;
        Ok(text.trim().to_string())
    }

    /// Fabricate plausible wrong answers for multiple choice.
    pub async fn distractors(
        &self,
        question: &str,
        correct_answer: &str,
    ) -> Result<Vec<String>, LlmError> {
        let text = self
            .chat(
                "You write multiple-choice distractors. Reply with exactly three plausible \
                 but wrong answers, one per line, no numbering and no other text.",
                &format!("Question: {}\nCorrect answer: {}", question, correct_answer),
            )
            .await?;
        Ok(split_distractors(&text, correct_answer))
    }
}

/// Pull the first integer out of the model's reply and clamp to the scale.
fn parse_grade(text: &str) -> Option<u8> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: u32 = digits.parse().ok()?;
    Some(value.min(config::REMOTE_GRADE_MAX as u32) as u8)
}

/// Newline-split the model's reply into distractor candidates. The model is
/// not trusted to return exactly three distinct options; empty lines, list
/// markers and accidental copies of the correct answer are dropped.
fn split_distractors(text: &str, correct_answer: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for line in text.lines() {
        let cleaned = line
            .trim()
            .trim_start_matches(['-', '*'])
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .trim_start_matches(['.', ')'])
            .trim();
        if cleaned.is_empty() || cleaned == correct_answer {
            continue;
        }
        if !seen.iter().any(|s: &String| s == cleaned) {
            seen.push(cleaned.to_string());
        }
        if seen.len() == config::DISTRACTOR_COUNT {
            break;
        }
    }
    seen
}
