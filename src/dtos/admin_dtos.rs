use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{EnrichedAssignment, Profile};
use crate::services::fetch_state::Snapshot;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: &str, data: Option<T>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
            data,
        }
    }
}

/// Profile directory state as handed to the admin UI.
#[derive(Serialize, Debug)]
pub struct ProfilesOut {
    pub profiles: Vec<Profile>,
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl From<Snapshot<Profile>> for ProfilesOut {
    fn from(snap: Snapshot<Profile>) -> Self {
        Self {
            profiles: Arc::unwrap_or_clone(snap.items),
            loading: snap.loading,
            error: snap.error,
            fetched_at: snap.fetched_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct AssignmentsOut {
    pub assignments: Vec<EnrichedAssignment>,
    pub loading: bool,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl From<Snapshot<EnrichedAssignment>> for AssignmentsOut {
    fn from(snap: Snapshot<EnrichedAssignment>) -> Self {
        Self {
            assignments: Arc::unwrap_or_clone(snap.items),
            loading: snap.loading,
            error: snap.error,
            fetched_at: snap.fetched_at,
        }
    }
}
