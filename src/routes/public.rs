use crate::{
    AppState,
    handlers::{auth, category},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Registration, login and the read-only listings the signup and catalogue pages need
/// before a user has a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // POST /auth/local/register
        // Creates a local account with an existing role and returns a JWT.
        .route("/auth/local/register", post(auth::register))
        // POST /auth/local
        // Email-or-username login.
        .route("/auth/local", post(auth::login))
        // GET /users
        // Sanitized profiles of every user.
        .route("/users", get(auth::list_users))
        // GET /categories
        .route("/categories", get(category::list_categories))
}
