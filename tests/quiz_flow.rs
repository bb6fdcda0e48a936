//! End-to-end tests for card management, review runs and the challenge
//! mode's behavior when no grading service is configured.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use flashdeck::handlers::build_router;
use flashdeck::{db, state::AppState};

fn test_server(temp: &TempDir) -> TestServer {
  let pool = db::init_db(&temp.path().join("test.db")).unwrap();
  let state = AppState::new(pool, None);
  TestServer::builder()
    .save_cookies()
    .build(build_router(state))
    .unwrap()
}

async fn login_as(server: &TestServer, username: &str) {
  server
    .post("/register")
    .form(&json!({ "username": username, "password": "pw" }))
    .await
    .assert_status(StatusCode::SEE_OTHER);
  server
    .post("/login")
    .form(&json!({ "username": username, "password": "pw" }))
    .await
    .assert_status(StatusCode::SEE_OTHER);
}

async fn add_card(server: &TestServer, question: &str, answer: &str) {
  let response = server
    .post("/cards")
    .form(&json!({ "question": question, "answer": answer }))
    .await;
  response.assert_status(StatusCode::SEE_OTHER);
}

/// Pull the hidden session id out of a rendered quiz page.
fn extract_session_id(html: &str) -> String {
  let marker = "name=\"session_id\" value=\"";
  let start = html.find(marker).expect("page has no session id") + marker.len();
  let end = html[start..].find('"').unwrap() + start;
  html[start..end].to_string()
}

#[tokio::test]
async fn test_added_cards_show_in_the_list() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "alice").await;

  add_card(&server, "capital of France?", "Paris").await;
  add_card(&server, "capital of Italy?", "Rome").await;

  let response = server.get("/cards").await;
  response.assert_status_ok();
  let body = response.text();
  assert!(body.contains("capital of France?"));
  assert!(body.contains("Rome"));
}

#[tokio::test]
async fn test_review_with_empty_deck_points_at_card_entry() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "bob").await;

  let response = server.get("/review").await;
  response.assert_status_ok();
  assert!(response.text().contains("No flashcards to review yet"));
}

#[tokio::test]
async fn test_review_single_card_run_to_completion() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "carol").await;
  add_card(&server, "capital of France?", "Paris").await;

  let response = server.get("/review").await;
  response.assert_status_ok();
  let body = response.text();
  assert!(body.contains("capital of France?"));
  // A one-card deck is padded with filler options up to four
  assert!(body.contains("Paris"));
  assert!(body.matches("type=\"radio\"").count() == 4);

  let session_id = extract_session_id(&body);
  let response = server
    .post("/review")
    .form(&json!({ "session_id": session_id, "choice": "Paris" }))
    .await;
  response.assert_status_ok();
  let body = response.text();
  assert!(body.contains("Correct!"));
  assert!(body.contains("You got 1 of 1 right"));
}

#[tokio::test]
async fn test_wrong_choice_reveals_the_answer() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "dave").await;
  add_card(&server, "capital of France?", "Paris").await;

  let body = server.get("/review").await.text();
  let session_id = extract_session_id(&body);

  let response = server
    .post("/review")
    .form(&json!({ "session_id": session_id, "choice": "Not sure" }))
    .await;
  response.assert_status_ok();
  let body = response.text();
  assert!(body.contains("The correct answer is: Paris"));
  assert!(body.contains("You got 0 of 1 right"));
}

#[tokio::test]
async fn test_forged_choice_outside_option_set_is_a_miss() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "mallory").await;
  add_card(&server, "capital of France?", "Paris").await;

  let body = server.get("/review").await.text();
  let session_id = extract_session_id(&body);

  // A hand-crafted POST can carry any string; only offered options count
  let response = server
    .post("/review")
    .form(&json!({ "session_id": session_id, "choice": "never-offered" }))
    .await;
  response.assert_status_ok();
  assert!(response.text().contains("You got 0 of 1 right"));
}

#[tokio::test]
async fn test_review_records_review_metadata() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "erin").await;
  add_card(&server, "q", "a").await;

  let body = server.get("/review").await.text();
  let session_id = extract_session_id(&body);
  server
    .post("/review")
    .form(&json!({ "session_id": session_id, "choice": "a" }))
    .await
    .assert_status_ok();

  // The deck listing shows the bumped review count
  let body = server.get("/cards").await.text();
  assert!(body.contains("<td>1</td>"));
}

#[tokio::test]
async fn test_stale_session_id_is_rejected() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "frank").await;
  add_card(&server, "q", "a").await;

  let response = server
    .post("/review")
    .form(&json!({ "session_id": "nosuchsessionnosuchsessionnosuch", "choice": "a" }))
    .await;
  response.assert_status_ok();
  assert!(response.text().contains("No review in progress"));
}

#[tokio::test]
async fn test_challenge_requires_a_grading_service() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);
  login_as(&server, "grace").await;
  add_card(&server, "q", "a").await;

  let response = server.get("/challenge").await;
  response.assert_status_ok();
  assert!(response.text().contains("needs a grading service"));
}

#[tokio::test]
async fn test_users_only_see_their_own_cards() {
  let temp = TempDir::new().unwrap();
  let server = test_server(&temp);

  login_as(&server, "heidi").await;
  add_card(&server, "heidi's question", "x").await;
  server.get("/logout").await.assert_status(StatusCode::SEE_OTHER);

  login_as(&server, "ivan").await;
  let body = server.get("/cards").await.text();
  assert!(!body.contains("heidi's question"));
  assert!(body.contains("No flashcards yet"));
}
