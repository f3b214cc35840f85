use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Existence check and insert are not atomic; a concurrent duplicate is
    // only stopped by the unique index and surfaces as a 500.
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(ApiError::BadRequest("Username already exists".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.username, &hash).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(Json(MessageResponse {
        message: "User registered successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Unknown user and wrong password share one message on purpose.
    let user = match User::find_by_username(&state.db, &payload.username).await? {
        Some(u) => u,
        None => {
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::BadRequest("Invalid username or password".into()));
        }
    };

    if !verify_password(&payload.password, &user.password)? {
        warn!(username = %payload.username, "login invalid password");
        return Err(ApiError::BadRequest("Invalid username or password".into()));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_echoes_the_username() {
        let response = LoginResponse {
            message: "Login successful".into(),
            username: "alice".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["message"], "Login successful");
    }

    #[test]
    fn register_request_needs_both_fields() {
        let err = serde_json::from_str::<RegisterRequest>(r#"{"username":"alice"}"#).unwrap_err();
        assert!(err.to_string().contains("password"));
    }
}
