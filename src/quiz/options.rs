//! Multiple-choice option generation.

use rand::seq::SliceRandom;

use crate::config;

/// Build the option set for a card: up to three distinct answers sampled from
/// the rest of the deck, plus the correct answer, shuffled. With an empty
/// pool this yields a single-option "choice".
pub fn build_options(correct: &str, answer_pool: &[String]) -> Vec<String> {
  let mut rng = rand::rng();

  let mut distractors: Vec<String> = answer_pool
    .iter()
    .filter(|a| a.as_str() != correct)
    .cloned()
    .collect();
  distractors.sort();
  distractors.dedup();
  distractors.shuffle(&mut rng);
  distractors.truncate(config::DISTRACTOR_COUNT);

  let mut options = distractors;
  options.push(correct.to_string());
  options.shuffle(&mut rng);
  options
}

/// Pad an option set up to the full four entries with placeholder strings
/// and reshuffle. Used by the web variant when the deck is too small and no
/// model-authored distractors are available.
pub fn pad_with_placeholders(options: &mut Vec<String>) {
  let mut placeholders = config::PLACEHOLDER_OPTIONS.iter();
  while options.len() < config::DISTRACTOR_COUNT + 1 {
    match placeholders.next() {
      Some(p) => options.push(p.to_string()),
      None => break,
    }
  }
  options.shuffle(&mut rand::rng());
}

/// Resolve a 1-based menu selection against an option list. Non-numeric or
/// out-of-range input yields None; callers count that as a miss.
pub fn parse_choice<'a>(input: &str, options: &'a [String]) -> Option<&'a str> {
  input
    .trim()
    .parse::<usize>()
    .ok()
    .and_then(|n| n.checked_sub(1))
    .and_then(|i| options.get(i))
    .map(String::as_str)
}
