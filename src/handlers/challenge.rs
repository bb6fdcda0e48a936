//! Daily challenge: free-text answers graded by the remote collaborator,
//! with lives, hints and a streak bonus.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::db;
use crate::llm::LlmError;
use crate::quiz::{ChallengeRun, GradeOutcome};
use crate::session::{self, ChallengeState};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "challenge.html")]
pub struct ChallengeTemplate {
  pub no_cards: bool,
  pub finished: bool,
  pub defeated: bool,
  pub question: String,
  pub session_id: String,
  pub lives: u8,
  pub hints_left: u8,
  pub score: u32,
  pub position: usize,
  pub total: usize,
  pub feedback: String,
  pub hint: String,
  pub error: String,
}

impl ChallengeTemplate {
  fn blank() -> Self {
    Self {
      no_cards: false,
      finished: false,
      defeated: false,
      question: String::new(),
      session_id: String::new(),
      lives: 0,
      hints_left: 0,
      score: 0,
      position: 0,
      total: 0,
      feedback: String::new(),
      hint: String::new(),
      error: String::new(),
    }
  }

  fn error(message: &str) -> Self {
    Self {
      error: message.to_string(),
      ..Self::blank()
    }
  }

  /// Fill in the fields every in-progress screen shows.
  fn in_progress(question: String, session_id: String, state: &ChallengeState) -> Self {
    Self {
      question,
      session_id,
      lives: state.run.lives,
      hints_left: state.run.hints_left,
      score: state.run.score,
      position: state.index + 1,
      total: state.order.len(),
      ..Self::blank()
    }
  }

  fn render_html(self) -> Html<String> {
    Html(self.render().unwrap_or_default())
  }
}

#[derive(Deserialize)]
pub struct ChallengeForm {
  pub session_id: String,
  pub answer: String,
}

#[derive(Deserialize)]
pub struct HintForm {
  pub session_id: String,
}

fn load_card(
  state: &AppState,
  user_id: i64,
  card_id: i64,
) -> Result<(String, String), ChallengeTemplate> {
  let conn = state
    .db
    .lock()
    .map_err(|_| ChallengeTemplate::error("Database error"))?;
  match db::get_flashcard_by_id(&conn, user_id, card_id) {
    Ok(Some(card)) => Ok((card.question, card.answer)),
    _ => Err(ChallengeTemplate::error(
      "Card not found. Start a new challenge.",
    )),
  }
}

/// GET /challenge - start a run over the deck in random order
pub async fn challenge_start(State(state): State<AppState>, auth: AuthContext) -> Html<String> {
  if state.llm.is_none() {
    return ChallengeTemplate::error(
      "The daily challenge needs a grading service. Set OPENAI_API_KEY and restart.",
    )
    .render_html();
  }

  let mut order: Vec<i64> = {
    let conn = match state.db.lock() {
      Ok(conn) => conn,
      Err(_) => return ChallengeTemplate::error("Database error").render_html(),
    };
    match db::get_flashcards(&conn, auth.user_id) {
      Ok(cards) => cards.iter().map(|c| c.id).collect(),
      Err(e) => {
        tracing::warn!("Failed to load flashcards: {}", e);
        return ChallengeTemplate::error("Failed to load flashcards").render_html();
      }
    }
  };

  if order.is_empty() {
    return ChallengeTemplate {
      no_cards: true,
      ..ChallengeTemplate::blank()
    }
    .render_html();
  }

  order.shuffle(&mut rand::rng());
  let challenge = ChallengeState {
    order,
    index: 0,
    run: ChallengeRun::new(),
  };

  let (question, _) = match load_card(&state, auth.user_id, challenge.order[0]) {
    Ok(card) => card,
    Err(template) => return template.render_html(),
  };

  let session_id = session::generate_session_id();
  let mut quiz_session = session::get_session(&session_id);
  let template = ChallengeTemplate::in_progress(question, session_id.clone(), &challenge);
  quiz_session.challenge = Some(challenge);
  session::update_session(&session_id, quiz_session);

  template.render_html()
}

/// POST /challenge - grade a free-text answer and advance
pub async fn challenge_answer(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<ChallengeForm>,
) -> Html<String> {
  let Some(llm) = state.llm.clone() else {
    return ChallengeTemplate::error(
      "The daily challenge needs a grading service. Set OPENAI_API_KEY and restart.",
    )
    .render_html();
  };

  let mut quiz_session = session::get_session(&form.session_id);
  let Some(mut challenge) = quiz_session.challenge.take() else {
    return ChallengeTemplate::error("No challenge in progress. Start a new one.").render_html();
  };
  let Some(&card_id) = challenge.order.get(challenge.index) else {
    return ChallengeTemplate::error("No challenge in progress. Start a new one.").render_html();
  };

  let (question, answer) = match load_card(&state, auth.user_id, card_id) {
    Ok(card) => card,
    Err(template) => return template.render_html(),
  };

  let grade = match llm.grade(&question, &form.answer, &answer).await {
    Ok(grade) => grade,
    Err(LlmError::InvalidResponse(body)) => {
      // Ungraded: the card is not consumed and no life is lost
      tracing::warn!("Unparsable grade response: {:?}", body);
      let mut template =
        ChallengeTemplate::in_progress(question, form.session_id.clone(), &challenge);
      template.feedback =
        "Your answer could not be graded. Please submit it again.".to_string();
      quiz_session.challenge = Some(challenge);
      session::update_session(&form.session_id, quiz_session);
      return template.render_html();
    }
    Err(e) => {
      tracing::error!("Grading failed: {}", e);
      quiz_session.challenge = Some(challenge);
      session::update_session(&form.session_id, quiz_session);
      return ChallengeTemplate::error("The grading service is unavailable. Try again shortly.")
        .render_html();
    }
  };

  let outcome = challenge.run.apply_grade(grade);
  challenge.index += 1;

  let feedback = match outcome {
    GradeOutcome::Passed { life_restored: true } => {
      format!("Scored {}/10. Three in a row: +1 life!", grade)
    }
    GradeOutcome::Passed { life_restored: false } => format!("Scored {}/10.", grade),
    GradeOutcome::Failed => format!(
      "Scored {}/10. The correct answer was: {}. You lose a life.",
      grade, answer
    ),
  };

  if challenge.run.is_defeated() {
    let template = ChallengeTemplate {
      defeated: true,
      feedback,
      score: challenge.run.score,
      ..ChallengeTemplate::blank()
    };
    session::update_session(&form.session_id, quiz_session);
    return template.render_html();
  }

  if challenge.index >= challenge.order.len() {
    let template = ChallengeTemplate {
      finished: true,
      feedback,
      score: challenge.run.score,
      lives: challenge.run.lives,
      total: challenge.order.len(),
      ..ChallengeTemplate::blank()
    };
    session::update_session(&form.session_id, quiz_session);
    return template.render_html();
  }

  let next_id = challenge.order[challenge.index];
  let (next_question, _) = match load_card(&state, auth.user_id, next_id) {
    Ok(card) => card,
    Err(template) => return template.render_html(),
  };

  let mut template =
    ChallengeTemplate::in_progress(next_question, form.session_id.clone(), &challenge);
  template.feedback = feedback;
  quiz_session.challenge = Some(challenge);
  session::update_session(&form.session_id, quiz_session);
  template.render_html()
}

/// POST /challenge/hint - spend a hint on the current card
pub async fn challenge_hint(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<HintForm>,
) -> Html<String> {
  let Some(llm) = state.llm.clone() else {
    return ChallengeTemplate::error(
      "The daily challenge needs a grading service. Set OPENAI_API_KEY and restart.",
    )
    .render_html();
  };

  let mut quiz_session = session::get_session(&form.session_id);
  let Some(mut challenge) = quiz_session.challenge.take() else {
    return ChallengeTemplate::error("No challenge in progress. Start a new one.").render_html();
  };
  let Some(&card_id) = challenge.order.get(challenge.index) else {
    return ChallengeTemplate::error("No challenge in progress. Start a new one.").render_html();
  };

  let (question, answer) = match load_card(&state, auth.user_id, card_id) {
    Ok(card) => card,
    Err(template) => return template.render_html(),
  };

  if challenge.run.hints_left == 0 {
    let mut template =
      ChallengeTemplate::in_progress(question, form.session_id.clone(), &challenge);
    template.feedback = "No hints left.".to_string();
    quiz_session.challenge = Some(challenge);
    session::update_session(&form.session_id, quiz_session);
    return template.render_html();
  }

  // The hint is only charged once the remote call has succeeded
  match llm.hint(&question, &answer).await {
    Ok(hint) => {
      challenge.run.use_hint();
      let mut template =
        ChallengeTemplate::in_progress(question, form.session_id.clone(), &challenge);
      template.hint = hint;
      quiz_session.challenge = Some(challenge);
      session::update_session(&form.session_id, quiz_session);
      template.render_html()
    }
    Err(e) => {
      tracing::error!("Hint request failed: {}", e);
      let mut template =
        ChallengeTemplate::in_progress(question, form.session_id.clone(), &challenge);
      template.feedback = "The hint service is unavailable. Try again shortly.".to_string();
      quiz_session.challenge = Some(challenge);
      session::update_session(&form.session_id, quiz_session);
      template.render_html()
    }
  }
}
