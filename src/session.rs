//! Simple in-memory session storage for quiz runs.
//!
//! Stores per-browser-session quiz state keyed by a session ID carried in the
//! quiz forms. State exists only for the duration of a run and auto-expires
//! after a period of inactivity; nothing here is persisted.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use crate::config;
use crate::quiz::{ChallengeRun, ReviewRun};

/// Active review run plus the option set for the card on screen.
#[derive(Clone)]
pub struct ReviewState {
  pub run: ReviewRun,
  pub options: Vec<String>,
}

/// Active challenge run plus the shuffled card order.
#[derive(Clone)]
pub struct ChallengeState {
  pub order: Vec<i64>,
  pub index: usize,
  pub run: ChallengeRun,
}

/// Everything one browser session may have in flight.
#[derive(Clone, Default)]
pub struct QuizSession {
  pub review: Option<ReviewState>,
  pub challenge: Option<ChallengeState>,
}

/// Session entry with last access time for expiration
struct SessionEntry {
  session: QuizSession,
  last_access: DateTime<Utc>,
}

/// Global session store
static SESSIONS: LazyLock<Mutex<HashMap<String, SessionEntry>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

/// Get or create a session for the given ID
pub fn get_session(session_id: &str) -> QuizSession {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  if let Some(entry) = sessions.get_mut(session_id) {
    entry.last_access = Utc::now();
    entry.session.clone()
  } else {
    let session = QuizSession::default();
    sessions.insert(
      session_id.to_string(),
      SessionEntry {
        session: session.clone(),
        last_access: Utc::now(),
      },
    );
    session
  }
}

/// Update a session
pub fn update_session(session_id: &str, session: QuizSession) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.insert(
    session_id.to_string(),
    SessionEntry {
      session,
      last_access: Utc::now(),
    },
  );
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
