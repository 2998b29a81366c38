// src/services/profile_directory.rs
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::watch;

use super::fetch_state::{FetchState, Snapshot};
use crate::models::Profile;
use crate::repositories::{ProfileSource, RepoError};

/// Admin list of user profiles with their role names.
///
/// Prefers the `get_user_profiles_for_admin` view and falls back to reading
/// `profiles` joined with roles when the view errors or answers `null`.
pub struct ProfileDirectory {
    source: Arc<dyn ProfileSource>,
    state: FetchState<Profile>,
}

impl ProfileDirectory {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self {
            source,
            state: FetchState::new("profiles"),
        }
    }

    /// Loads the list and swaps it in whole. Failures leave an empty list and an error message.
    pub async fn fetch_profiles(&self) -> Snapshot<Profile> {
        let token = self.state.begin().await;

        let outcome = self.load().await.map_err(|e| {
            error!("Error fetching user profiles: {}", e);
            describe_failure(&e)
        });

        self.state.finish(token, outcome).await;
        self.state.snapshot().await
    }

    pub async fn refetch(&self) -> Snapshot<Profile> {
        self.fetch_profiles().await
    }

    pub async fn snapshot(&self) -> Snapshot<Profile> {
        self.state.snapshot().await
    }

    /// Latest complete list, replaced after every finished fetch.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Profile>>> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Arc<Vec<Profile>> {
        self.state.current()
    }

    async fn load(&self) -> Result<Vec<Profile>, RepoError> {
        match self.source.fetch_admin_profiles().await {
            Ok(Some(profiles)) => {
                info!("Loaded {} profiles from admin view", profiles.len());
                return Ok(profiles);
            }
            Ok(None) => warn!("Admin profile view returned no data, reading profiles directly"),
            Err(e) => warn!("Admin profile view failed ({}), reading profiles directly", e),
        }

        let rows = self.source.fetch_raw_profiles().await?;
        let profiles: Vec<Profile> = rows.into_iter().map(Profile::from).collect();
        info!("Loaded {} profiles from profiles table", profiles.len());
        Ok(profiles)
    }
}

fn describe_failure(e: &RepoError) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        "Failed to load user profiles".to_string()
    } else {
        message
    }
}
