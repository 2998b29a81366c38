pub mod assignment;
pub mod profile;
pub mod scheduled_class;

pub use assignment::{Assignment, EnrichedAssignment, EnrichedClass};
pub use profile::{Profile, RawProfile};
pub use scheduled_class::{InstructorLabel, ScheduledClass};
