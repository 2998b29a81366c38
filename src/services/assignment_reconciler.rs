// src/services/assignment_reconciler.rs
use std::sync::Arc;

use log::{error, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::fetch_state::{FetchState, Snapshot};
use crate::models::{
    Assignment, EnrichedAssignment, EnrichedClass, InstructorLabel, Profile, ScheduledClass,
};
use crate::repositories::{RepoError, ScheduleSource};

/// Joins class assignments with their scheduled class and the class's instructor name.
pub struct AssignmentReconciler {
    source: Arc<dyn ScheduleSource>,
    state: FetchState<EnrichedAssignment>,
}

impl AssignmentReconciler {
    pub fn new(source: Arc<dyn ScheduleSource>) -> Self {
        Self {
            source,
            state: FetchState::new("class assignments"),
        }
    }

    /// Fetches classes and assignments and rebuilds the enriched list against `profiles`.
    /// Either fetch failing leaves the list empty with the error recorded.
    pub async fn fetch_and_reconcile(&self, profiles: Arc<Vec<Profile>>) -> Snapshot<EnrichedAssignment> {
        let token = self.state.begin().await;
        self.run(token, profiles).await
    }

    /// Loads and writes under an already issued `token`.
    async fn run(&self, token: u64, profiles: Arc<Vec<Profile>>) -> Snapshot<EnrichedAssignment> {
        let outcome = self.load(&profiles).await.map_err(|e| {
            error!("Error fetching class assignments: {}", e);
            format!("Failed to load class assignments: {}", e)
        });

        self.state.finish(token, outcome).await;
        self.state.snapshot().await
    }

    pub async fn snapshot(&self) -> Snapshot<EnrichedAssignment> {
        self.state.snapshot().await
    }

    /// Runs once for the current list, then again whenever a new list is published.
    /// Tokens are taken here, in publish order, so a run for an older list can
    /// never outrank a run for a newer one however the tasks get scheduled.
    pub fn follow_profiles(self: Arc<Self>, mut profiles: watch::Receiver<Arc<Vec<Profile>>>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let current = Arc::clone(&profiles.borrow_and_update());
                let token = self.state.begin().await;
                let reconciler = Arc::clone(&self);
                tokio::spawn(async move {
                    reconciler.run(token, current).await;
                });

                if profiles.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn load(&self, profiles: &[Profile]) -> Result<Vec<EnrichedAssignment>, RepoError> {
        let classes = self.source.fetch_scheduled_classes().await?;
        let assignments = self.source.fetch_class_assignments().await?;

        let enriched = reconcile(&classes, assignments, profiles);
        info!(
            "Reconciled {} assignments against {} scheduled classes",
            enriched.len(),
            classes.len()
        );
        Ok(enriched)
    }
}

/// Attaches to each assignment a fresh copy of its class (first id match) labelled
/// with the instructor's name. Only profiles holding the `instructor` role count.
pub fn reconcile(
    classes: &[ScheduledClass],
    assignments: Vec<Assignment>,
    profiles: &[Profile],
) -> Vec<EnrichedAssignment> {
    let instructors: Vec<&Profile> = profiles.iter().filter(|p| p.is_instructor()).collect();

    assignments
        .into_iter()
        .map(|assignment| {
            let scheduled_class = assignment
                .scheduled_class_id
                .as_deref()
                .and_then(|id| classes.iter().find(|c| c.id == id))
                .map(|class| EnrichedClass {
                    class: class.clone(),
                    instructor: instructor_label(class, &instructors),
                });

            EnrichedAssignment { assignment, scheduled_class }
        })
        .collect()
}

fn instructor_label(class: &ScheduledClass, instructors: &[&Profile]) -> InstructorLabel {
    class
        .instructor_id
        .as_deref()
        .and_then(|id| instructors.iter().find(|p| p.user_id == id))
        .and_then(|p| p.full_name.clone())
        .filter(|name| !name.is_empty())
        .map(|full_name| InstructorLabel { full_name })
        .unwrap_or_else(InstructorLabel::unknown)
}
