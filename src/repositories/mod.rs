pub mod supabase_repo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Assignment, Profile, RawProfile, ScheduledClass};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Where the profile directory reads from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Aggregate view `get_user_profiles_for_admin`. `Ok(None)` when it answers with `null`.
    async fn fetch_admin_profiles(&self) -> Result<Option<Vec<Profile>>, RepoError>;

    /// `profiles` joined with role names, newest first.
    async fn fetch_raw_profiles(&self) -> Result<Vec<RawProfile>, RepoError>;
}

/// Where the assignment reconciler reads from.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Classes with status `scheduled`, `class_type` embedded, by start time ascending.
    async fn fetch_scheduled_classes(&self) -> Result<Vec<ScheduledClass>, RepoError>;

    async fn fetch_class_assignments(&self) -> Result<Vec<Assignment>, RepoError>;
}
