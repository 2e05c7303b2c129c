pub mod admin;
pub mod applications;
pub mod auth;
pub mod candidates;
pub mod jobs;
pub mod recruiters;
pub mod uploads;
pub mod users;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Users
        .route("/api/v1/users/me", get(users::me))
        // Candidates
        .route(
            "/api/v1/candidates/me/profile",
            get(candidates::get_my_profile).put(candidates::update_my_profile),
        )
        .route(
            "/api/v1/candidates/me/applications",
            get(candidates::my_applications),
        )
        .route("/api/v1/candidates/{id}/profile", get(candidates::get_profile))
        // Recruiters
        .route(
            "/api/v1/recruiters/me/profile",
            get(recruiters::get_my_profile).put(recruiters::update_my_profile),
        )
        .route("/api/v1/recruiters/me/jobs", get(recruiters::my_jobs))
        // Jobs
        .route("/api/v1/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/api/v1/jobs/{id}",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route(
            "/api/v1/jobs/{id}/applications",
            get(jobs::list_applications).post(jobs::apply),
        )
        .route(
            "/api/v1/jobs/{id}/applications/export",
            get(jobs::export_applications),
        )
        // Applications
        .route("/api/v1/applications/{id}", delete(applications::withdraw))
        .route(
            "/api/v1/applications/{id}/status",
            put(applications::update_status),
        )
        .route(
            "/api/v1/applications/{id}/resume-url",
            get(applications::resume_url),
        )
        // Uploads
        .route("/api/v1/uploads/resume", post(uploads::resume_upload_url))
        // Admin
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/users/{id}", delete(admin::delete_user))
        .route("/api/v1/admin/recruiters", get(admin::list_recruiters))
        .route(
            "/api/v1/admin/recruiters/{id}/approval",
            put(admin::set_recruiter_approval),
        )
        .route("/api/v1/admin/analytics", get(admin::analytics))
        .route(
            "/api/v1/admin/analytics/export",
            get(admin::export_placements),
        )
}

pub(crate) fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
