//! Application configuration constants.
//!
//! Centralizes the values shared by the console and web variants, plus the
//! loaders for file paths and the remote-model credential.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== File Locations ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<PathConfig>,
    store: Option<PathConfig>,
    openai: Option<OpenAiConfig>,
}

#[derive(Debug, Deserialize)]
struct PathConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiConfig {
    api_key: Option<String>,
    model: Option<String>,
}

fn read_config() -> Option<AppConfig> {
    let contents = std::fs::read_to_string("config.toml").ok()?;
    toml::from_str(&contents).ok()
}

/// Load the SQLite path for the web variant.
/// Priority: config.toml > DATABASE_PATH env > default.
pub fn load_database_path() -> PathBuf {
    let _ = dotenvy::dotenv();

    if let Some(path) = read_config()
        .and_then(|c| c.database)
        .and_then(|db| db.path)
    {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from("data/flashdeck.db");
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load the JSON document path for the console variant.
/// Priority: config.toml > DATA_FILE env > default.
pub fn load_data_file_path() -> PathBuf {
    let _ = dotenvy::dotenv();

    if let Some(path) = read_config().and_then(|c| c.store).and_then(|s| s.path) {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("DATA_FILE") {
        return PathBuf::from(path);
    }

    PathBuf::from("learning_data.json")
}

// ==================== Remote Model Configuration ====================

/// Default chat model when OPENAI_MODEL is not set
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Remote-model credentials resolved from config.toml or the environment.
pub struct LlmSettings {
    pub api_key: String,
    pub model: String,
}

/// Load the remote-model credential. Returns None when no key is configured,
/// in which case grading, hints and fabricated distractors are unavailable.
pub fn load_llm_settings() -> Option<LlmSettings> {
    let _ = dotenvy::dotenv();

    let config = read_config().and_then(|c| c.openai);
    let api_key = config
        .as_ref()
        .and_then(|c| c.api_key.clone())
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .filter(|k| !k.is_empty())?;
    let model = config
        .and_then(|c| c.model)
        .or_else(|| std::env::var("OPENAI_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

    Some(LlmSettings { api_key, model })
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Quiz Session Configuration ====================

/// In-memory quiz session expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 1;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Quiz Configuration ====================

/// Number of distractor choices in multiple choice mode
pub const DISTRACTOR_COUNT: usize = 3;

/// Filler options shown when the deck is too small to supply real
/// distractors and no remote model is configured
pub const PLACEHOLDER_OPTIONS: [&str; 3] = ["Not sure", "None of these", "It depends"];

/// Daily challenge attempts allowed per calendar date (console variant)
pub const DAILY_ATTEMPT_CAP: u32 = 3;

/// Cumulative penalty that aborts a console challenge run
pub const PENALTY_LIMIT: u32 = 10;

/// Starting lives in a web challenge run
pub const CHALLENGE_LIVES: u8 = 5;

/// Hint requests allowed per web challenge run
pub const CHALLENGE_HINTS: u8 = 3;

/// Correct-answer streak that restores one life
pub const CHALLENGE_STREAK_BONUS: u8 = 3;

/// Minimum remote grade counted as a pass
pub const CHALLENGE_PASS_GRADE: u8 = 5;

/// Upper bound of the remote grading scale
pub const REMOTE_GRADE_MAX: u8 = 10;
