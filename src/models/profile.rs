use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CandidateProfile {
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub resume_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RecruiterProfile {
    pub user_id: Uuid,
    pub company_name: String,
    pub website: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}
