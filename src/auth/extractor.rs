use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::auth::jwt;
use crate::error::AppError;
use crate::models::UserRole;
use crate::state::SharedState;

/// Missing and invalid credentials get the same rejection, so a caller
/// cannot tell which one it hit.
const AUTH_REQUIRED: &str = "Invalid or missing authentication token";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn require(&self, allowed: &[UserRole]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            let roles = allowed
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            Err(AppError::Forbidden(format!("{roles} access required")))
        }
    }

    pub fn require_candidate(&self) -> Result<(), AppError> {
        self.require(&[UserRole::Candidate])
    }

    pub fn require_recruiter(&self) -> Result<(), AppError> {
        self.require(&[UserRole::Recruiter])
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require(&[UserRole::Admin])
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Try Bearer token from Authorization header first
        if let Some(auth_header) = parts.headers.get("authorization") {
            let auth_str = auth_header
                .to_str()
                .map_err(|_| AppError::Unauthorized(AUTH_REQUIRED.to_string()))?;

            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let claims = jwt::verify(token, &state.config.jwt_secret)
                    .ok_or_else(|| AppError::Unauthorized(AUTH_REQUIRED.to_string()))?;

                return Ok(AuthUser {
                    user_id: claims.sub,
                    email: claims.email,
                    role: claims.role,
                });
            }
        }

        // Fall back to the session cookie
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get("token") {
            let claims = jwt::verify(cookie.value(), &state.config.jwt_secret)
                .ok_or_else(|| AppError::Unauthorized(AUTH_REQUIRED.to_string()))?;

            return Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            });
        }

        Err(AppError::Unauthorized(AUTH_REQUIRED.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_user(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: Uuid::now_v7(),
            email: "u@example.com".into(),
            role,
        }
    }

    #[test]
    fn role_checks_allow_matching_roles() {
        assert!(auth_user(UserRole::Candidate).require_candidate().is_ok());
        assert!(auth_user(UserRole::Recruiter).require_recruiter().is_ok());
        assert!(auth_user(UserRole::Admin).require_admin().is_ok());
    }

    #[test]
    fn role_checks_reject_other_roles() {
        assert!(matches!(
            auth_user(UserRole::Candidate).require_admin(),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            auth_user(UserRole::Admin).require_candidate(),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn require_accepts_any_listed_role() {
        let user = auth_user(UserRole::Admin);
        assert!(user.require(&[UserRole::Recruiter, UserRole::Admin]).is_ok());
    }
}
