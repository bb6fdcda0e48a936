pub mod cards;
pub mod challenge;
pub mod review;

use askama::Template;
use axum::{extract::State, response::Html, routing::get, routing::post, Router};

use crate::auth::{self, AuthContext};
use crate::db;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub username: String,
  pub total_cards: i64,
}

pub async fn index(State(state): State<AppState>, auth: AuthContext) -> Html<String> {
  let total_cards = match state.db.lock() {
    Ok(conn) => db::count_flashcards(&conn, auth.user_id).unwrap_or(0),
    Err(_) => 0,
  };

  let template = IndexTemplate {
    username: auth.username,
    total_cards,
  };
  Html(template.render().unwrap_or_default())
}

pub use cards::{add_card, cards_page};
pub use challenge::{challenge_answer, challenge_hint, challenge_start};
pub use review::{review_answer, review_start};

/// Build the application router. Lives here so integration tests mount the
/// same routes as main().
pub fn build_router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/login", get(auth::login_page).post(auth::login_submit))
    .route("/register", get(auth::register_page).post(auth::register_submit))
    .route("/logout", get(auth::logout))
    .route("/cards", get(cards_page).post(add_card))
    .route("/review", get(review_start).post(review_answer))
    .route("/challenge", get(challenge_start).post(challenge_answer))
    .route("/challenge/hint", post(challenge_hint))
    .with_state(state)
}
