use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::auth::jwt::{self, Claims};
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::models::{ApprovalStatus, User, UserRole};
use crate::state::SharedState;
use crate::validation::ValidatedJson;

const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Login failures for unknown emails and wrong passwords are
/// indistinguishable.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// The forgot-password acknowledgement, identical whether or not the
/// email is registered.
const RESET_ACK: &str = "If that email is registered, a reset link has been sent.";

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    pub role: UserRole,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub new_password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Session cookie: HttpOnly, Lax, lifetime matching the token's own
/// seven-day expiry.
fn auth_cookie(token: &str) -> CookieJar {
    let cookie = Cookie::build(("token", token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(jwt::TOKEN_TTL_DAYS))
        .build();
    CookieJar::new().add(cookie)
}

fn clear_auth_cookie() -> CookieJar {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}

fn generate_reset_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub async fn register(
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    // Advisory lock prevents two concurrent first registrations
    let mut tx = state.pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock(1)")
        .execute(&mut *tx)
        .await?;

    let count = db::users::count_all(&mut *tx).await?;

    // The very first account becomes the portal administrator.
    let (role, approval_status) = if count == 0 {
        (UserRole::Admin, None)
    } else {
        match req.role {
            UserRole::Candidate => (UserRole::Candidate, None),
            UserRole::Recruiter => (UserRole::Recruiter, Some(ApprovalStatus::Pending)),
            UserRole::Admin => {
                return Err(AppError::BadRequest(
                    "Role must be candidate or recruiter".to_string(),
                ));
            }
        }
    };

    let user = db::users::create(&mut *tx, &email, &pw_hash, &req.name, role, approval_status)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("An account with this email already exists".to_string())
            }
            _ => AppError::Database(e),
        })?;

    tx.commit().await?;

    let message = match user.approval_status {
        Some(ApprovalStatus::Pending) => {
            "Account created. Recruiter accounts must be approved by an administrator before login."
                .to_string()
        }
        _ => "Account created".to_string(),
    };

    Ok(Json(RegisterResponse { message, user }))
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    // Approval is checked only after the credentials verify.
    if user.role == UserRole::Recruiter {
        let status = user.approval_status.unwrap_or(ApprovalStatus::Pending);
        if status != ApprovalStatus::Approved {
            return Err(AppError::Forbidden(format!("Recruiter account is {status}")));
        }
    }

    let claims = Claims::new(user.id, user.email.clone(), user.role);
    let token = jwt::issue(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    let jar = auth_cookie(&token);
    Ok((jar, Json(LoginResponse { token, user })))
}

pub async fn logout() -> (CookieJar, Json<MessageResponse>) {
    (
        clear_auth_cookie(),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    // Always return the same 200 so the endpoint cannot be used to
    // probe which emails exist.
    let response = Json(MessageResponse {
        message: RESET_ACK.to_string(),
    });

    // Token generation and delivery happen off the request path.
    let pool = state.pool.clone();
    let mailer = state.mailer.clone();
    let base_url = state.config.base_url.clone();
    let email = req.email.trim().to_lowercase();

    tokio::spawn(async move {
        match db::users::find_by_email(&pool, &email).await {
            Ok(Some(user)) => {
                let token = generate_reset_token();
                let token_hash = hash_token(&token);
                let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

                if let Err(e) =
                    db::users::set_reset_token(&pool, user.id, &token_hash, expires_at).await
                {
                    tracing::error!("Failed to store reset token: {e}");
                    return;
                }

                if let Some(mailer) = mailer {
                    let reset_url = format!("{base_url}/reset-password?token={token}");
                    if let Err(e) = mailer.send_password_reset(&user.email, &reset_url).await {
                        tracing::error!("Failed to send password reset email: {e}");
                    }
                } else {
                    tracing::warn!("SMTP not configured. Password reset token: {token}");
                }
            }
            Ok(None) => {}
            Err(e) => tracing::error!("Password reset lookup failed: {e}"),
        }
    });

    Ok(response)
}

pub async fn reset_password(
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let token_hash = hash_token(&req.token);
    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    db::users::consume_reset_token(&state.pool, &token_hash, &pw_hash)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

pub async fn change_password(
    State(state): State<SharedState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let valid =
        password::verify(&req.current_password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let pw_hash = password::hash(&req.new_password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &pw_hash).await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
