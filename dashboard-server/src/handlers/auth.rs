//! Authentication handlers

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::middleware::auth::UserContext;
use crate::models::{CreateUser, LoginRequest, LoginResponse, RegisterRequest, User};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID
    pub username: String, // Display name
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub status: &'static str,
    pub username: String,
}

/// Register a new dashboard user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError("missing fields".to_string()));
    }

    let conn = state.db.lock();
    if User::find_by_username(&conn, &req.username)?.is_some() {
        return Err(AppError::AlreadyExists("username exists".to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .to_string();

    let user = User::create(
        &conn,
        CreateUser {
            username: req.username,
            email: req.email,
        },
        password_hash,
    )?;

    tracing::info!("New user registered: {}", user.username);

    Ok(Json(RegisterResponse {
        status: "ok",
        username: user.username,
    }))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError("missing fields".to_string()));
    }

    let conn = state.db.lock();
    let user = User::find_by_username(&conn, &req.username)?
        .ok_or(AppError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    User::update_last_login(&conn, user.id)?;

    // Generate JWT
    let token = generate_jwt(&user, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(LoginResponse {
        token,
        user: user.to_info(),
    }))
}

/// Logout acknowledgement. Sessions are JWT-based, so the server keeps no
/// state to drop; the client discards its token.
pub async fn logout(user: UserContext) -> AppResult<Json<serde_json::Value>> {
    tracing::info!("User logged out: {}", user.username);
    Ok(Json(json!({ "status": "ok" })))
}

/// Generate JWT token
pub fn generate_jwt(user: &User, secret: &str, expiration_hours: u64) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours as i64);

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    fn test_user() -> User {
        User {
            id: uuid::Uuid::new_v4(),
            username: "pilot".to_string(),
            email: "pilot@example.com".to_string(),
            password_hash: "hash".to_string(),
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = test_user();
        let token = generate_jwt(&user, "secret", 1).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, user.id.to_string());
        assert_eq!(data.claims.username, "pilot");
    }

    #[test]
    fn test_expired_jwt_rejected() {
        let user = test_user();
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: (now - Duration::hours(2)).timestamp() as usize,
            iat: (now - Duration::hours(3)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
