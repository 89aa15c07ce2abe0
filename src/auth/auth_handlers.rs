use crate::{
    auth::{create_access_token, hash_password, verify_password},
    error::{AppError, Result},
    state::AppState,
};
use super::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, ROLES};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

/// Register a new marketplace account (client or freelancer)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if !ROLES.contains(&payload.role.as_str()) {
        return Err(AppError::Validation(
            "role must be 'client' or 'freelancer'".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = state
        .user_repository
        .create(&payload.username, &payload.email, &password_hash, &payload.role)
        .await
        .map_err(|e| {
            if let AppError::Database(ref db_err) = e {
                if db_err.to_string().contains("duplicate key") {
                    return AppError::BadRequest("User already exists".to_string());
                }
            }
            e
        })?;

    let access_token = create_access_token(
        user.id,
        &user.email,
        &user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = create_access_token(
        user.id,
        &user.email,
        &user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        access_token,
        user: user.into(),
    }))
}
