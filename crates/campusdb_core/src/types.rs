//! Core type definitions for CampusDB.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a professor.
///
/// Professor IDs are allocated sequentially starting at 1 and never
/// reused. 0 is reserved as the "no professor" sentinel and is never
/// allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfessorId(pub u64);

impl ProfessorId {
    /// Creates a professor ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProfessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prof:{}", self.0)
    }
}

/// Unique identifier for a student.
///
/// Allocated sequentially starting at 1, never reused, 0 reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub u64);

impl StudentId {
    /// Creates a student ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "student:{}", self.0)
    }
}

/// Caller-chosen identifier for a course, e.g. `"CS101"`.
///
/// Course codes are chosen by the caller at creation time and are never
/// reused, even after the course is removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseCode(String);

impl CourseCode {
    /// Creates a course code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for CourseCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// Identity of a caller, as seen by the authorization gate.
///
/// The registry does not verify identities; it only compares them
/// against the injected role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Creates an actor ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// The kind of entity an operation targeted, used in error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A professor record.
    Professor,
    /// A student record.
    Student,
    /// A course record.
    Course,
    /// An enrollment record.
    Enrollment,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Professor => "professor",
            Self::Student => "student",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn professor_id_ordering() {
        let p1 = ProfessorId::new(1);
        let p2 = ProfessorId::new(2);
        assert!(p1 < p2);
    }

    #[test]
    fn course_code_display() {
        let code = CourseCode::new("CS101");
        assert_eq!(format!("{code}"), "CS101");
        assert_eq!(code.as_str(), "CS101");
    }

    #[test]
    fn actor_id_display() {
        let actor = ActorId::new(42);
        assert_eq!(format!("{actor}"), "actor:42");
    }

    #[test]
    fn entity_kind_display() {
        assert_eq!(format!("{}", EntityKind::Course), "course");
        assert_eq!(format!("{}", EntityKind::Enrollment), "enrollment");
    }
}
