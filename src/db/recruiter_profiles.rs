use sqlx::PgPool;
use uuid::Uuid;

use crate::models::RecruiterProfile;

pub struct RecruiterProfileParams {
    pub company_name: String,
    pub website: Option<String>,
    pub about: Option<String>,
    pub location: Option<String>,
}

pub async fn find_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<RecruiterProfile>, sqlx::Error> {
    sqlx::query_as::<_, RecruiterProfile>("SELECT * FROM recruiter_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert(
    pool: &PgPool,
    user_id: Uuid,
    params: &RecruiterProfileParams,
) -> Result<RecruiterProfile, sqlx::Error> {
    sqlx::query_as::<_, RecruiterProfile>(
        "INSERT INTO recruiter_profiles (user_id, company_name, website, about, location)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id) DO UPDATE SET
             company_name = EXCLUDED.company_name,
             website = EXCLUDED.website,
             about = EXCLUDED.about,
             location = EXCLUDED.location,
             updated_at = now()
         RETURNING *",
    )
    .bind(user_id)
    .bind(&params.company_name)
    .bind(&params.website)
    .bind(&params.about)
    .bind(&params.location)
    .fetch_one(pool)
    .await
}
