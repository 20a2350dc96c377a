use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use super::non_empty;
use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ErrorResponse},
    models::{AuthResponse, LoginRequest, LoginResponse, NewUser, RegisterRequest, User, UserProfile},
};

const LOCAL_PROVIDER: &str = "local";

/// register
///
/// [Public Route] Creates a local, pre-confirmed account with the named role and returns a
/// token for it.
///
/// The role must already exist; it is matched by exact name. Duplicate emails are caught
/// by the store's unique constraint rather than a pre-check, so concurrent registrations
/// cannot both win.
#[utoipa::path(
    post,
    path = "/api/auth/local/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = AuthResponse),
        (status = 400, description = "Validation error or email taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(payload) = payload?;
    tracing::debug!(
        username = ?payload.username,
        email = ?payload.email,
        role = ?payload.role,
        "Registration request received"
    );

    let (Some(username), Some(email), Some(password), Some(role)) = (
        non_empty(payload.username),
        non_empty(payload.email),
        non_empty(payload.password),
        non_empty(payload.role),
    ) else {
        tracing::warn!("Registration rejected: missing required fields");
        return Err(ApiError::validation("All fields are required"));
    };

    let role_entity = state.repo.find_role_by_name(&role).await?.ok_or_else(|| {
        tracing::warn!("Registration rejected: role {} not found", role);
        ApiError::validation(format!(
            "Invalid role: {role}. Please ensure the role exists in the system."
        ))
    })?;

    let password_hash = state.credentials.hash_password(&password)?;

    let user = state
        .repo
        .create_user(NewUser {
            username,
            email,
            password_hash,
            provider: LOCAL_PROVIDER.to_string(),
            confirmed: true,
            role_id: role_entity.id,
        })
        .await?;

    let jwt = state.credentials.issue_token(user.id)?;
    tracing::info!("Registered user {} with role {}", user.id, role_entity.name);

    Ok((StatusCode::CREATED, Json(AuthResponse { jwt, user })))
}

/// login
///
/// [Public Route] Exchanges an email-or-username plus password for a token.
///
/// An unknown identifier, a non-local account and a wrong password all produce the same
/// `Invalid credentials` error so the endpoint cannot be used to probe for accounts.
#[utoipa::path(
    post,
    path = "/api/auth/local",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(identifier), Some(password)) =
        (non_empty(payload.identifier), non_empty(payload.password))
    else {
        return Err(ApiError::validation("Identifier and password are required"));
    };

    let stored = state
        .repo
        .find_user_by_identifier(&identifier)
        .await?
        .filter(|user| user.provider == LOCAL_PROVIDER);

    let Some(stored) = stored else {
        tracing::warn!("Login failed: no local account matches identifier");
        return Err(ApiError::InvalidCredentials);
    };

    if !state
        .credentials
        .validate_password(&password, &stored.password_hash)?
    {
        tracing::warn!("Login failed: bad password for user {}", stored.id);
        return Err(ApiError::InvalidCredentials);
    }

    let jwt = state.credentials.issue_token(stored.id)?;

    let role = match stored.role_id {
        Some(role_id) => state.repo.get_role(role_id).await?,
        None => None,
    };
    let role_name = role.as_ref().map(|r| r.name.clone());

    Ok(Json(LoginResponse {
        jwt,
        user: User::from_stored(stored, role),
        role: role_name,
    }))
}

/// get_profile
///
/// [Authenticated Route] The caller's own profile with the role populated.
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User vanished", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    caller: Option<AuthUser>,
) -> Result<Json<UserProfile>, ApiError> {
    let Some(caller) = caller else {
        return Err(ApiError::unauthorized("User not authenticated"));
    };

    let user = state
        .repo
        .get_user(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

/// list_users
///
/// [Public Route] Every user as a sanitized profile. No pagination or filtering.
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = [UserProfile]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}
