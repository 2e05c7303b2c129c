use sqlx::PgPool;
use uuid::Uuid;

use crate::models::CandidateProfile;

pub struct CandidateProfileParams {
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
    pub education: Option<String>,
    pub location: Option<String>,
    pub resume_key: Option<String>,
}

pub async fn find_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CandidateProfile>, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfile>("SELECT * FROM candidate_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    params: &CandidateProfileParams,
) -> Result<CandidateProfile, sqlx::Error> {
    sqlx::query_as::<_, CandidateProfile>(
        "INSERT INTO candidate_profiles
             (user_id, headline, summary, skills, experience_years, education, location, resume_key)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (user_id) DO UPDATE SET
             headline = EXCLUDED.headline,
             summary = EXCLUDED.summary,
             skills = EXCLUDED.skills,
             experience_years = EXCLUDED.experience_years,
             education = EXCLUDED.education,
             location = EXCLUDED.location,
             resume_key = EXCLUDED.resume_key,
             updated_at = now()
         RETURNING *",
    )
    .bind(user_id)
    .bind(&params.headline)
    .bind(&params.summary)
    .bind(&params.skills)
    .bind(params.experience_years)
    .bind(&params.education)
    .bind(&params.location)
    .bind(&params.resume_key)
    .fetch_one(pool)
    .await
}
