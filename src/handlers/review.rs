//! Review mode: multiple choice over the whole deck, graded locally.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::config;
use crate::db;
use crate::domain::Flashcard;
use crate::llm::LlmClient;
use crate::quiz::{self, ReviewRun};
use crate::session::{self, ReviewState};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "review.html")]
pub struct ReviewTemplate {
  pub no_cards: bool,
  pub complete: bool,
  pub question: String,
  pub options: Vec<String>,
  pub session_id: String,
  pub feedback: String,
  pub position: usize,
  pub total: usize,
  pub correct: u32,
  pub error: String,
}

impl ReviewTemplate {
  fn blank() -> Self {
    Self {
      no_cards: false,
      complete: false,
      question: String::new(),
      options: vec![],
      session_id: String::new(),
      feedback: String::new(),
      position: 0,
      total: 0,
      correct: 0,
      error: String::new(),
    }
  }

  fn error(message: &str) -> Self {
    Self {
      error: message.to_string(),
      ..Self::blank()
    }
  }

  fn render_html(self) -> Html<String> {
    Html(self.render().unwrap_or_default())
  }
}

#[derive(Deserialize)]
pub struct ReviewForm {
  pub session_id: String,
  pub choice: String,
}

/// Assemble the option set for one card: deck answers first, remote
/// distractors when the deck is too small, placeholders as a last resort.
async fn options_for(
  card: &Flashcard,
  deck: &[Flashcard],
  llm: Option<&LlmClient>,
) -> Vec<String> {
  let pool: Vec<String> = deck.iter().map(|c| c.answer.clone()).collect();
  let mut options = quiz::build_options(&card.answer, &pool);

  if options.len() < config::DISTRACTOR_COUNT + 1 {
    if let Some(llm) = llm {
      match llm.distractors(&card.question, &card.answer).await {
        Ok(extra) => {
          for distractor in extra {
            if options.len() >= config::DISTRACTOR_COUNT + 1 {
              break;
            }
            if !options.contains(&distractor) {
              options.push(distractor);
            }
          }
        }
        Err(e) => tracing::warn!("Distractor generation failed: {}", e),
      }
    }
    quiz::pad_with_placeholders(&mut options);
  }

  options
}

/// GET /review - start a fresh run over the whole deck
pub async fn review_start(State(state): State<AppState>, auth: AuthContext) -> Html<String> {
  let cards = {
    let conn = match state.db.lock() {
      Ok(conn) => conn,
      Err(_) => return ReviewTemplate::error("Database error").render_html(),
    };
    match db::get_flashcards(&conn, auth.user_id) {
      Ok(cards) => cards,
      Err(e) => {
        tracing::warn!("Failed to load flashcards: {}", e);
        return ReviewTemplate::error("Failed to load flashcards").render_html();
      }
    }
  };

  if cards.is_empty() {
    return ReviewTemplate {
      no_cards: true,
      ..ReviewTemplate::blank()
    }
    .render_html();
  }

  let run = ReviewRun::new(cards.iter().map(|c| c.id).collect());
  let Some(card) = run.current().and_then(|id| cards.iter().find(|c| c.id == id)) else {
    return ReviewTemplate::error("Failed to start review").render_html();
  };

  let options = options_for(card, &cards, state.llm.as_deref()).await;

  let session_id = session::generate_session_id();
  let mut quiz_session = session::get_session(&session_id);
  quiz_session.review = Some(ReviewState {
    run,
    options: options.clone(),
  });
  let total = cards.len();
  session::update_session(&session_id, quiz_session);

  ReviewTemplate {
    question: card.question.clone(),
    options,
    session_id,
    position: 1,
    total,
    ..ReviewTemplate::blank()
  }
  .render_html()
}

/// POST /review - check the chosen option, record the review, advance
pub async fn review_answer(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<ReviewForm>,
) -> Html<String> {
  let mut quiz_session = session::get_session(&form.session_id);
  let Some(mut review) = quiz_session.review.take() else {
    return ReviewTemplate::error("No review in progress. Start a new one.").render_html();
  };
  let Some(card_id) = review.run.current() else {
    return ReviewTemplate::error("No review in progress. Start a new one.").render_html();
  };

  // All database work happens before any remote call so the connection
  // lock never spans an await.
  let (card, cards) = {
    let conn = match state.db.lock() {
      Ok(conn) => conn,
      Err(_) => return ReviewTemplate::error("Database error").render_html(),
    };
    let card = match db::get_flashcard_by_id(&conn, auth.user_id, card_id) {
      Ok(Some(card)) => card,
      _ => return ReviewTemplate::error("Card not found. Start a new review.").render_html(),
    };
    if let Err(e) = db::mark_reviewed(&conn, card_id) {
      tracing::warn!("Failed to record review of card {}: {}", card_id, e);
    }
    let cards = db::get_flashcards(&conn, auth.user_id).unwrap_or_default();
    (card, cards)
  };

  // A submitted choice outside the offered option set counts as a miss,
  // the same as invalid input on the console
  let was_correct = review.options.contains(&form.choice) && form.choice == card.answer;
  review.run.record_answer(was_correct);

  let feedback = if was_correct {
    "Correct!".to_string()
  } else {
    format!("Wrong! The correct answer is: {}", card.answer)
  };

  if review.run.is_complete() {
    let template = ReviewTemplate {
      complete: true,
      feedback,
      total: review.run.total(),
      correct: review.run.correct,
      ..ReviewTemplate::blank()
    };
    session::update_session(&form.session_id, quiz_session);
    return template.render_html();
  }

  let Some(next) = review
    .run
    .current()
    .and_then(|id| cards.iter().find(|c| c.id == id))
  else {
    return ReviewTemplate::error("Card not found. Start a new review.").render_html();
  };

  let options = options_for(next, &cards, state.llm.as_deref()).await;
  review.options = options.clone();

  let template = ReviewTemplate {
    question: next.question.clone(),
    options,
    session_id: form.session_id.clone(),
    feedback,
    position: review.run.index + 1,
    total: review.run.total(),
    correct: review.run.correct,
    ..ReviewTemplate::blank()
  };

  quiz_session.review = Some(review);
  session::update_session(&form.session_id, quiz_session);
  template.render_html()
}
