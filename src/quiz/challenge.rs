//! Daily challenge state machines.
//!
//! The two variants keep their historical reward models: the console variant
//! accumulates a penalty and aborts early, the web variant plays out lives
//! with a streak bonus.

use crate::config;
use crate::quiz::grading::LOCAL_GRADE_MAX;

/// Console challenge run: every question costs `5 - grade` penalty points and
/// the run aborts once the cumulative penalty reaches the limit.
#[derive(Debug, Clone, Default)]
pub struct PenaltyRun {
  pub score: u32,
  pub penalty: u32,
}

impl PenaltyRun {
  pub fn new() -> Self {
    Self::default()
  }

  /// Apply a local grade in [0, 5]. Returns false once the run is over.
  pub fn apply_grade(&mut self, grade: u32) -> bool {
    let grade = grade.min(LOCAL_GRADE_MAX);
    self.score += grade;
    self.penalty += LOCAL_GRADE_MAX - grade;
    !self.is_over()
  }

  pub fn is_over(&self) -> bool {
    self.penalty >= config::PENALTY_LIMIT
  }
}

/// Result of grading one web challenge answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOutcome {
  Passed { life_restored: bool },
  Failed,
}

/// Web challenge run: 5 lives, 3 hints, streak bonus. A grade below the pass
/// threshold costs a life and resets the streak; a streak of three passes
/// restores a life (capped) and resets the streak.
#[derive(Debug, Clone)]
pub struct ChallengeRun {
  pub score: u32,
  pub lives: u8,
  pub hints_left: u8,
  pub streak: u8,
}

impl Default for ChallengeRun {
  fn default() -> Self {
    Self::new()
  }
}

impl ChallengeRun {
  pub fn new() -> Self {
    Self {
      score: 0,
      lives: config::CHALLENGE_LIVES,
      hints_left: config::CHALLENGE_HINTS,
      streak: 0,
    }
  }

  /// Apply a remote grade in [0, 10].
  pub fn apply_grade(&mut self, grade: u8) -> GradeOutcome {
    if grade < config::CHALLENGE_PASS_GRADE {
      self.lives = self.lives.saturating_sub(1);
      self.streak = 0;
      return GradeOutcome::Failed;
    }

    self.score += grade.min(config::REMOTE_GRADE_MAX) as u32;
    self.streak += 1;

    let mut life_restored = false;
    if self.streak >= config::CHALLENGE_STREAK_BONUS {
      if self.lives < config::CHALLENGE_LIVES {
        self.lives += 1;
        life_restored = true;
      }
      self.streak = 0;
    }
    GradeOutcome::Passed { life_restored }
  }

  /// Consume a hint if any remain.
  pub fn use_hint(&mut self) -> bool {
    if self.hints_left == 0 {
      return false;
    }
    self.hints_left -= 1;
    true
  }

  pub fn is_defeated(&self) -> bool {
    self.lives == 0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_penalty_run_survives_under_limit() {
    let mut run = PenaltyRun::new();
    // grade 3 -> penalty 2, four times = 8 < 10
    for _ in 0..4 {
      assert!(run.apply_grade(3));
    }
    assert_eq!(run.penalty, 8);
    assert_eq!(run.score, 12);
    assert!(!run.is_over());
  }

  #[test]
  fn test_penalty_run_aborts_at_limit() {
    let mut run = PenaltyRun::new();
    assert!(run.apply_grade(0)); // penalty 5
    assert!(!run.apply_grade(0)); // penalty 10 -> game over
    assert!(run.is_over());
  }

  #[test]
  fn test_penalty_run_perfect_grades_never_end() {
    let mut run = PenaltyRun::new();
    for _ in 0..100 {
      assert!(run.apply_grade(5));
    }
    assert_eq!(run.penalty, 0);
  }

  #[test]
  fn test_failed_grade_costs_life_and_resets_streak() {
    let mut run = ChallengeRun::new();
    run.apply_grade(8);
    run.apply_grade(8);
    assert_eq!(run.streak, 2);

    assert_eq!(run.apply_grade(4), GradeOutcome::Failed);
    assert_eq!(run.lives, 4);
    assert_eq!(run.streak, 0);
  }

  #[test]
  fn test_streak_of_three_restores_a_life() {
    let mut run = ChallengeRun::new();
    run.apply_grade(2); // lose a life -> 4
    assert_eq!(run.lives, 4);

    run.apply_grade(7);
    run.apply_grade(7);
    let outcome = run.apply_grade(7);
    assert_eq!(outcome, GradeOutcome::Passed { life_restored: true });
    assert_eq!(run.lives, 5);
    assert_eq!(run.streak, 0);
  }

  #[test]
  fn test_life_restore_is_capped_at_five() {
    let mut run = ChallengeRun::new();
    run.apply_grade(10);
    run.apply_grade(10);
    let outcome = run.apply_grade(10);
    // Streak still resets even when no life can be restored
    assert_eq!(outcome, GradeOutcome::Passed { life_restored: false });
    assert_eq!(run.lives, 5);
    assert_eq!(run.streak, 0);
  }

  #[test]
  fn test_passing_grades_accumulate_score() {
    let mut run = ChallengeRun::new();
    run.apply_grade(10);
    run.apply_grade(6);
    run.apply_grade(3); // failed, no score
    assert_eq!(run.score, 16);
  }

  #[test]
  fn test_defeat_after_five_failures() {
    let mut run = ChallengeRun::new();
    for _ in 0..5 {
      assert!(!run.is_defeated());
      run.apply_grade(0);
    }
    assert!(run.is_defeated());
    // Lives never go negative
    run.apply_grade(0);
    assert_eq!(run.lives, 0);
  }

  #[test]
  fn test_hints_run_out_after_three() {
    let mut run = ChallengeRun::new();
    assert!(run.use_hint());
    assert!(run.use_hint());
    assert!(run.use_hint());
    assert!(!run.use_hint());
    assert_eq!(run.hints_left, 0);
  }
}
