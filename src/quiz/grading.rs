//! Local word-overlap grading for free-text answers.

use std::collections::HashSet;

/// Upper bound of the local grading scale
pub const LOCAL_GRADE_MAX: u32 = 5;

fn tokens(text: &str) -> HashSet<String> {
  text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Heuristic grade in [0, LOCAL_GRADE_MAX]: the fraction of the correct
/// answer's tokens present in the user's answer, scaled and floored.
/// Token order and synonyms are ignored.
pub fn word_overlap_grade(user_answer: &str, correct_answer: &str) -> u32 {
  let correct = tokens(correct_answer);
  let user = tokens(user_answer);
  let overlap = user.intersection(&correct).count();
  let score = (overlap as f64 / correct.len().max(1) as f64 * LOCAL_GRADE_MAX as f64) as u32;
  score.min(LOCAL_GRADE_MAX)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exact_match_scores_max() {
    assert_eq!(word_overlap_grade("the cat sat", "the cat sat"), 5);
  }

  #[test]
  fn test_symmetric_under_token_permutation() {
    assert_eq!(word_overlap_grade("sat the cat", "the cat sat"), 5);
    assert_eq!(word_overlap_grade("cat sat the", "the cat sat"), 5);
  }

  #[test]
  fn test_no_overlap_scores_zero() {
    assert_eq!(word_overlap_grade("dog", "the cat sat"), 0);
  }

  #[test]
  fn test_partial_overlap_floors() {
    // 1 of 3 tokens -> floor(5/3) = 1
    assert_eq!(word_overlap_grade("cat", "the cat sat"), 1);
    // 2 of 3 tokens -> floor(10/3) = 3
    assert_eq!(word_overlap_grade("the cat", "the cat sat"), 3);
  }

  #[test]
  fn test_case_insensitive() {
    assert_eq!(word_overlap_grade("PARIS", "paris"), 5);
  }

  #[test]
  fn test_empty_correct_answer_does_not_divide_by_zero() {
    assert_eq!(word_overlap_grade("anything", ""), 0);
  }

  #[test]
  fn test_extra_user_tokens_do_not_exceed_max() {
    assert_eq!(
      word_overlap_grade("the cat sat on the mat all day long", "the cat sat"),
      5
    );
  }

  #[test]
  fn test_duplicate_tokens_count_once() {
    // "cat cat cat" still only covers one of three correct tokens
    assert_eq!(word_overlap_grade("cat cat cat", "the cat sat"), 1);
  }
}
