//! Flat-file JSON store for the console variant.
//!
//! One document holds the whole state: flashcards, the per-date daily
//! challenge counters and a legacy `scores` map kept for file compatibility.
//! Every mutation rewrites the document; the write goes through a temp file
//! and rename so a crash mid-save cannot truncate the data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config;
use crate::domain::Flashcard;

#[derive(Debug)]
pub enum StoreError {
  Io(io::Error),
  Parse(serde_json::Error),
}

impl fmt::Display for StoreError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoreError::Io(e) => write!(f, "data file I/O error: {}", e),
      StoreError::Parse(e) => write!(f, "data file is not valid JSON: {}", e),
    }
  }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
  fn from(e: io::Error) -> Self {
    StoreError::Io(e)
  }
}

impl From<serde_json::Error> for StoreError {
  fn from(e: serde_json::Error) -> Self {
    StoreError::Parse(e)
  }
}

/// The persisted document. Field names match the original file format.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StudyData {
  #[serde(default)]
  pub flashcards: Vec<Flashcard>,
  #[serde(default)]
  pub daily_challenge_count: BTreeMap<String, u32>,
  /// Declared by the file format; nothing reads or writes it.
  #[serde(default)]
  pub scores: BTreeMap<String, u32>,
}

pub struct JsonStore {
  path: PathBuf,
  pub data: StudyData,
}

impl JsonStore {
  /// Open the store, starting from an empty document if the file is missing.
  pub fn open(path: &Path) -> Result<Self, StoreError> {
    let data = if path.exists() {
      let contents = fs::read_to_string(path)?;
      serde_json::from_str(&contents)?
    } else {
      StudyData::default()
    };
    Ok(Self {
      path: path.to_path_buf(),
      data,
    })
  }

  /// Rewrite the whole document, pretty-printed with 4-space indent.
  pub fn save(&self) -> Result<(), StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    self.data.serialize(&mut ser)?;

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }

    // Temp file + rename so an interrupted save leaves the old document intact
    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, &buf)?;
    fs::rename(&tmp, &self.path)?;
    Ok(())
  }

  /// Append a flashcard and persist immediately. No validation: any
  /// non-error input is accepted, duplicates included.
  pub fn add_flashcard(&mut self, question: String, answer: String) -> Result<(), StoreError> {
    self.data.flashcards.push(Flashcard::new(question, answer));
    self.save()
  }

  /// Attempts already recorded for the given ISO date.
  pub fn attempts_on(&self, date: &str) -> u32 {
    self.data.daily_challenge_count.get(date).copied().unwrap_or(0)
  }

  /// Whether another challenge run may start on the given date.
  pub fn can_attempt(&self, date: &str) -> bool {
    self.attempts_on(date) < config::DAILY_ATTEMPT_CAP
  }

  /// Count one challenge run for the given date and persist.
  pub fn record_attempt(&mut self, date: &str) -> Result<(), StoreError> {
    *self
      .data
      .daily_challenge_count
      .entry(date.to_string())
      .or_insert(0) += 1;
    self.save()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn store_in(temp: &TempDir) -> JsonStore {
    JsonStore::open(&temp.path().join("learning_data.json")).unwrap()
  }

  #[test]
  fn test_open_missing_file_starts_empty() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    assert!(store.data.flashcards.is_empty());
    assert!(store.data.daily_challenge_count.is_empty());
  }

  #[test]
  fn test_add_flashcard_round_trips() {
    let temp = TempDir::new().unwrap();
    let mut store = store_in(&temp);
    store
      .add_flashcard("capital of France?".to_string(), "Paris".to_string())
      .unwrap();

    let reopened = store_in(&temp);
    assert_eq!(reopened.data.flashcards.len(), 1);
    assert_eq!(reopened.data.flashcards[0].answer, "Paris");
  }

  #[test]
  fn test_attempt_counter_increments_per_date() {
    let temp = TempDir::new().unwrap();
    let mut store = store_in(&temp);
    store.record_attempt("2026-08-30").unwrap();
    store.record_attempt("2026-08-30").unwrap();
    store.record_attempt("2026-08-31").unwrap();

    let reopened = store_in(&temp);
    assert_eq!(reopened.attempts_on("2026-08-30"), 2);
    assert_eq!(reopened.attempts_on("2026-08-31"), 1);
    assert_eq!(reopened.attempts_on("2026-09-01"), 0);
  }

  #[test]
  fn test_fourth_same_date_run_is_gated() {
    let temp = TempDir::new().unwrap();
    let mut store = store_in(&temp);

    for _ in 0..config::DAILY_ATTEMPT_CAP {
      assert!(store.can_attempt("2026-08-30"));
      store.record_attempt("2026-08-30").unwrap();
    }

    // The gate holds and the counter stays at the cap
    assert!(!store.can_attempt("2026-08-30"));
    assert_eq!(store.attempts_on("2026-08-30"), config::DAILY_ATTEMPT_CAP);
    // A new date starts fresh
    assert!(store.can_attempt("2026-08-31"));
  }

  #[test]
  fn test_document_uses_four_space_indent() {
    let temp = TempDir::new().unwrap();
    let mut store = store_in(&temp);
    store.add_flashcard("q".to_string(), "a".to_string()).unwrap();

    let raw = fs::read_to_string(temp.path().join("learning_data.json")).unwrap();
    assert!(raw.contains("    \"flashcards\""));
  }

  #[test]
  fn test_loads_legacy_document_shape() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("learning_data.json");
    fs::write(
      &path,
      r#"{"flashcards": [{"question": "q", "answer": "a"}], "daily_challenge_count": {"2026-01-01": 3}, "scores": {}}"#,
    )
    .unwrap();

    let store = JsonStore::open(&path).unwrap();
    assert_eq!(store.data.flashcards.len(), 1);
    assert_eq!(store.attempts_on("2026-01-01"), 3);
  }
}
