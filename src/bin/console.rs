//! Console variant: a terminal menu over a flat JSON data file, with
//! multiple-choice review and a word-overlap-graded daily challenge.

use chrono::Local;
use rand::seq::SliceRandom;
use std::io::{self, Write};

use flashdeck::config;
use flashdeck::quiz::{self, PenaltyRun, LOCAL_GRADE_MAX};
use flashdeck::store::JsonStore;

fn main() {
  let path = config::load_data_file_path();
  let mut store = match JsonStore::open(&path) {
    Ok(store) => store,
    Err(e) => {
      eprintln!("Could not open {}: {}", path.display(), e);
      std::process::exit(1);
    }
  };

  loop {
    println!();
    println!("=== Flashdeck ===");
    println!("1. Add a flashcard");
    println!("2. Review flashcards");
    println!("3. Daily challenge");
    println!("4. Exit");

    match prompt("Choose an option: ").as_str() {
      "1" => add_flashcard(&mut store),
      "2" => review_game(&mut store),
      "3" => daily_challenge(&mut store),
      "4" => break,
      other => println!("Unknown option: {}", other),
    }
  }
}

/// Print a prompt and read one trimmed line from stdin.
fn prompt(message: &str) -> String {
  print!("{}", message);
  let _ = io::stdout().flush();
  let mut line = String::new();
  if io::stdin().read_line(&mut line).is_err() {
    return String::new();
  }
  line.trim().to_string()
}

fn add_flashcard(store: &mut JsonStore) {
  let question = prompt("Question: ");
  let answer = prompt("Answer: ");
  match store.add_flashcard(question, answer) {
    Ok(()) => println!("Flashcard added."),
    Err(e) => eprintln!("Failed to save: {}", e),
  }
}

/// Multiple choice over the whole deck in random order. An unparsable or
/// out-of-range choice counts as a miss and still consumes the card.
fn review_game(store: &mut JsonStore) {
  if store.data.flashcards.is_empty() {
    println!("No flashcards yet. Add some first.");
    return;
  }

  let answer_pool: Vec<String> = store
    .data
    .flashcards
    .iter()
    .map(|c| c.answer.clone())
    .collect();
  let mut order: Vec<usize> = (0..store.data.flashcards.len()).collect();
  order.shuffle(&mut rand::rng());

  let today = Local::now().date_naive();
  let total = order.len();
  let mut correct = 0;

  for (asked, &card_index) in order.iter().enumerate() {
    let (question, answer) = {
      let card = &store.data.flashcards[card_index];
      (card.question.clone(), card.answer.clone())
    };

    println!();
    println!("Card {} of {}: {}", asked + 1, total, question);

    let options = quiz::build_options(&answer, &answer_pool);
    for (i, option) in options.iter().enumerate() {
      println!("  {}. {}", i + 1, option);
    }

    let choice = prompt("Your choice: ");
    match quiz::parse_choice(&choice, &options) {
      Some(option) if option == answer => {
        println!("Correct!");
        correct += 1;
      }
      _ => println!("Wrong! The correct answer is: {}", answer),
    }

    store.data.flashcards[card_index].mark_reviewed(today);
  }

  if let Err(e) = store.save() {
    eprintln!("Failed to save review progress: {}", e);
  }
  println!();
  println!("Review complete! You got {} of {} right.", correct, total);
}

/// Free-text answers graded by word overlap, capped at three runs per day.
/// Every question costs penalty points; too many aborts the run.
fn daily_challenge(store: &mut JsonStore) {
  if store.data.flashcards.is_empty() {
    println!("No flashcards yet. Add some first.");
    return;
  }

  let today = Local::now().date_naive().to_string();
  if !store.can_attempt(&today) {
    println!(
      "You have reached the maximum of {} challenge attempts today. Try again tomorrow!",
      config::DAILY_ATTEMPT_CAP
    );
    return;
  }

  let mut order: Vec<usize> = (0..store.data.flashcards.len()).collect();
  order.shuffle(&mut rand::rng());

  let mut run = PenaltyRun::new();
  let mut aborted = false;

  for &card_index in &order {
    let (question, answer) = {
      let card = &store.data.flashcards[card_index];
      (card.question.clone(), card.answer.clone())
    };

    println!();
    println!("Question: {}", question);
    let user_answer = prompt("Your answer: ");

    let grade = quiz::word_overlap_grade(&user_answer, &answer);
    println!("Grading Result: {}/{}", grade, LOCAL_GRADE_MAX);
    if grade < LOCAL_GRADE_MAX {
      println!("The expected answer was: {}", answer);
    }

    if !run.apply_grade(grade) {
      aborted = true;
      break;
    }
  }

  if aborted {
    println!();
    println!("Game Over! Too many incorrect answers.");
  }
  println!("Challenge score: {}", run.score);

  if let Err(e) = store.record_attempt(&today) {
    eprintln!("Failed to record the attempt: {}", e);
  }
}
