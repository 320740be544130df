use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{jwt, password};
use crate::dto::{AuthResponse, UserResponse};
use crate::entities::{NotificationKind, user};
use crate::error::AppError;
use crate::services::is_unique_violation;
use crate::services::notifications::NotificationService;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SignupRequest {
    email: String,
    username: String,
    password: String,
}

/// `login` accepts either the email address or the username.
#[derive(Deserialize)]
struct SigninRequest {
    login: String,
    password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /auth/signup`: create an account and return it with an access token.
async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = body.email.trim().to_lowercase();
    let username = body.username.trim().to_string();

    password::validate_email(&email).map_err(AppError::BadRequest)?;
    password::validate_username(&username).map_err(AppError::BadRequest)?;
    password::validate_password(&body.password).map_err(AppError::BadRequest)?;

    let existing_email = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if existing_email.is_some() {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let existing_username = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;
    if existing_username.is_some() {
        return Err(AppError::Conflict("Username already taken.".to_string()));
    }

    let password_hash = password::hash_password(&body.password)?;
    let now = Utc::now().fixed_offset();

    let user_model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        bio: Set(String::new()),
        steam_profile: Set(None),
        is_staff: Set(false),
        is_premium: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email or username already registered.".to_string())
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = %user_model.id, username = %user_model.username, "user signed up");

    NotificationService::notify_best_effort(
        &state.db,
        user_model.id,
        NotificationKind::System,
        "Welcome",
        "Your account is ready. Start by adding games to your library.",
    )
    .await;

    let token = jwt::generate_access_token(user_model.id, &state.config)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(user_model),
            token,
        }),
    ))
}

/// `POST /auth/signin`: exchange credentials for an access token.
async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let login = body.login.trim();

    let user_model = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Email.eq(login.to_lowercase()))
                .add(user::Column::Username.eq(login)),
        )
        .one(&state.db)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !password::verify_password(&body.password, &user_model.password_hash)? {
        return Err(invalid_credentials());
    }

    let token = jwt::generate_access_token(user_model.id, &state.config)?;
    tracing::info!(user_id = %user_model.id, "user signed in");

    Ok(Json(AuthResponse {
        user: UserResponse::from(user_model),
        token,
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials.".to_string())
}
