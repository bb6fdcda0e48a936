//! Authentication handlers for login, register, and logout.

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::db as auth_db;
use super::middleware::SESSION_COOKIE_NAME;
use super::password;
use crate::session::generate_session_id;
use crate::state::AppState;

/// Session duration in hours (1 week)
const SESSION_DURATION_HOURS: i64 = 24 * 7;

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: String,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
}

fn login_error(jar: CookieJar, message: &str) -> axum::response::Response {
    let template = LoginTemplate {
        error: message.to_string(),
    };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

fn register_error(message: &str) -> axum::response::Response {
    let template = RegisterTemplate {
        error: message.to_string(),
    };
    Html(template.render().unwrap_or_default()).into_response()
}

/// GET /login - Show login page
pub async fn login_page() -> Html<String> {
    let template = LoginTemplate {
        error: String::new(),
    };
    Html(template.render().unwrap_or_default())
}

/// POST /login - Process login
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if form.username.is_empty() || form.password.is_empty() {
        return login_error(jar, "Username and password are required");
    }

    let conn = match state.db.lock() {
        Ok(conn) => conn,
        Err(_) => return login_error(jar, "Database error"),
    };

    // Opportunistic cleanup of stale sessions
    if rand::random::<u8>() < crate::config::SESSION_CLEANUP_THRESHOLD {
        let _ = auth_db::cleanup_expired_sessions(&conn);
    }

    let (user_id, password_hash) = match auth_db::get_user_by_username(&conn, &form.username) {
        Ok(Some(user)) => user,
        Ok(None) => return login_error(jar, "Invalid username or password"),
        Err(_) => return login_error(jar, "Database error"),
    };

    if !password::verify_password(&form.password, &password_hash) {
        return login_error(jar, "Invalid username or password");
    }

    if let Err(e) = auth_db::update_last_login(&conn, user_id) {
        tracing::warn!("Failed to update last login for user {}: {}", user_id, e);
    }

    let session_id = generate_session_id();
    if auth_db::create_session(&conn, user_id, &session_id, SESSION_DURATION_HOURS).is_err() {
        return login_error(jar, "Failed to create session");
    }

    drop(conn);

    let session_cookie = Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::hours(SESSION_DURATION_HOURS))
        .build();

    (jar.add(session_cookie), Redirect::to("/")).into_response()
}

/// GET /register - Show registration page
pub async fn register_page() -> Html<String> {
    let template = RegisterTemplate {
        error: String::new(),
    };
    Html(template.render().unwrap_or_default())
}

/// POST /register - Process registration
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> impl IntoResponse {
    if !is_valid_username(&form.username) {
        return register_error("Username must be 3-32 alphanumeric characters or underscores");
    }

    if form.password.is_empty() {
        return register_error("Password is required");
    }

    let password_hash = match password::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(_) => return register_error("Failed to process password"),
    };

    let conn = match state.db.lock() {
        Ok(conn) => conn,
        Err(_) => return register_error("Database error"),
    };

    // The UNIQUE constraint is the source of truth; any insert failure is
    // reported the same way without distinguishing causes.
    match auth_db::create_user(&conn, &form.username, &password_hash) {
        Ok(user_id) => {
            tracing::info!("Registered user {} ({})", form.username, user_id);
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            tracing::debug!("Registration failed for {}: {}", form.username, e);
            register_error("Username already exists")
        }
    }
}

/// GET /logout - Delete session and redirect to login
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME)
        && let Ok(conn) = state.db.lock()
    {
        let _ = auth_db::delete_session(&conn, cookie.value());
    }

    let removal = Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build();
    (jar.remove(removal), Redirect::to("/login")).into_response()
}

fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (3..=32).contains(&len)
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
