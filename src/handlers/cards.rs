//! Flashcard authoring: list the deck and add new cards.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::AuthContext;
use crate::db;
use crate::domain::Flashcard;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "cards.html")]
pub struct CardsTemplate {
  pub username: String,
  pub cards: Vec<Flashcard>,
  pub error: String,
}

#[derive(Deserialize)]
pub struct AddCardForm {
  pub question: String,
  pub answer: String,
}

/// GET /cards - deck listing plus the add form
pub async fn cards_page(State(state): State<AppState>, auth: AuthContext) -> Html<String> {
  let (cards, error) = match state.db.lock() {
    Ok(conn) => match db::get_flashcards(&conn, auth.user_id) {
      Ok(cards) => (cards, String::new()),
      Err(e) => {
        tracing::warn!("Failed to load flashcards: {}", e);
        (vec![], "Failed to load flashcards".to_string())
      }
    },
    Err(_) => (vec![], "Database error".to_string()),
  };

  let template = CardsTemplate {
    username: auth.username,
    cards,
    error,
  };
  Html(template.render().unwrap_or_default())
}

/// POST /cards - insert a card and persist immediately.
/// No validation of emptiness or duplicates: any non-error input is accepted.
pub async fn add_card(
  State(state): State<AppState>,
  auth: AuthContext,
  Form(form): Form<AddCardForm>,
) -> Response {
  let conn = match state.db.lock() {
    Ok(conn) => conn,
    Err(_) => return Html("<h1>Database error</h1>".to_string()).into_response(),
  };

  if let Err(e) = db::insert_flashcard(&conn, auth.user_id, &form.question, &form.answer) {
    tracing::warn!("Failed to insert flashcard: {}", e);
    return Html("<h1>Failed to save flashcard</h1>".to_string()).into_response();
  }

  Redirect::to("/cards").into_response()
}
