use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A question/answer pair the user studies against.
///
/// Cards are never deleted; `review_count` and `last_review_date` are bumped
/// each time the card is answered in review mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
  /// Row id in the web variant; 0 for cards loaded from the JSON store.
  #[serde(default)]
  pub id: i64,
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub last_review_date: Option<NaiveDate>,
  #[serde(default)]
  pub review_count: u32,
}

impl Flashcard {
  pub fn new(question: String, answer: String) -> Self {
    Self {
      id: 0,
      question,
      answer,
      last_review_date: None,
      review_count: 0,
    }
  }

  /// Record that this card was shown and answered in review mode.
  pub fn mark_reviewed(&mut self, today: NaiveDate) {
    self.review_count += 1;
    self.last_review_date = Some(today);
  }
}
