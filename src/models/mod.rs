pub mod application;
pub mod job;
pub mod profile;
pub mod user;

pub use application::{Application, ApplicationStatus, ApplicationWithCandidate, CandidateApplication};
pub use job::{Job, JobDetail, JobListing, JobStatus, JobType};
pub use profile::{CandidateProfile, RecruiterProfile};
pub use user::{ApprovalStatus, User, UserRole};
