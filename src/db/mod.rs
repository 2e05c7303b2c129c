pub mod analytics;
pub mod applications;
pub mod candidate_profiles;
pub mod jobs;
pub mod recruiter_profiles;
pub mod users;
