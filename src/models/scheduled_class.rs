// src/models/scheduled_class.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const UNKNOWN_INSTRUCTOR: &str = "Unknown";

/// Row of `scheduled_classes` with the `class_type` embed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledClass {
    pub id: String,
    pub instructor_id: Option<String>,
    pub class_type_id: Option<String>,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub class_type: Option<ClassTypeDescriptor>,
    /// Any other columns from `select=*`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassTypeDescriptor {
    pub name: Option<String>,
    pub difficulty_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstructorLabel {
    pub full_name: String,
}

impl InstructorLabel {
    pub fn unknown() -> Self {
        Self { full_name: UNKNOWN_INSTRUCTOR.to_string() }
    }
}
