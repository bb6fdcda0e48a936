//! Review mode state machine: multiple choice over a shuffled card order.

use rand::seq::SliceRandom;

/// One pass through the deck in random order. Runs from the first card to the
/// last; every answer (right, wrong or invalid) consumes the current card.
#[derive(Debug, Clone)]
pub struct ReviewRun {
  /// Card ids in presentation order
  pub order: Vec<i64>,
  pub index: usize,
  pub correct: u32,
}

impl ReviewRun {
  pub fn new(mut card_ids: Vec<i64>) -> Self {
    card_ids.shuffle(&mut rand::rng());
    Self {
      order: card_ids,
      index: 0,
      correct: 0,
    }
  }

  /// Id of the card currently being asked, or None once complete.
  pub fn current(&self) -> Option<i64> {
    self.order.get(self.index).copied()
  }

  pub fn total(&self) -> usize {
    self.order.len()
  }

  /// Score the current card and advance to the next one.
  pub fn record_answer(&mut self, was_correct: bool) {
    if was_correct {
      self.correct += 1;
    }
    self.index += 1;
  }

  pub fn is_complete(&self) -> bool {
    self.index >= self.order.len()
  }
}
