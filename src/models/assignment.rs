// src/models/assignment.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::scheduled_class::{InstructorLabel, ScheduledClass};

/// Row of `class_assignments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: String,
    pub scheduled_class_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A scheduled class annotated with its instructor's display name.
/// View-time only, never written back.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedClass {
    #[serde(flatten)]
    pub class: ScheduledClass,
    pub instructor: InstructorLabel,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedAssignment {
    #[serde(flatten)]
    pub assignment: Assignment,
    /// `None` when no fetched class matches `scheduled_class_id`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_class: Option<EnrichedClass>,
}
