//! Error types for CampusDB core.

use crate::types::{ActorId, CourseCode, EntityKind, StudentId};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur in CampusDB registry operations.
///
/// Every failure is surfaced before any store is mutated, so a returned
/// error always means the registry is unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The target entity is absent or logically deleted.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of entity looked up.
        kind: EntityKind,
        /// Identifier that was not found.
        id: String,
    },

    /// A create targeted a key that is already occupied.
    ///
    /// Keys are never reused, so this also fires when re-creating an
    /// entity under the key of a logically deleted one.
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// Kind of entity being created.
        kind: EntityKind,
        /// Identifier that is already taken.
        id: String,
    },

    /// The student already has a live enrollment in the course.
    #[error("student {student} is already enrolled in {course}")]
    AlreadyEnrolled {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },

    /// No live enrollment links the student and the course.
    #[error("student {student} is not enrolled in {course}")]
    NotEnrolled {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },

    /// A mark outside the 0–100 range was supplied.
    #[error("invalid mark {mark}: must be at most {max}")]
    InvalidMark {
        /// The rejected mark.
        mark: u8,
        /// The maximum accepted mark.
        max: u8,
    },

    /// The caller lacks the role required by the operation.
    #[error("caller {caller} is not authorized for this operation")]
    Unauthorized {
        /// The rejected caller.
        caller: ActorId,
    },

    /// A foreign-key target is absent or logically deleted.
    #[error("invalid {kind} reference: {id}")]
    InvalidReference {
        /// Kind of the referenced entity.
        kind: EntityKind,
        /// Identifier of the referenced entity.
        id: String,
    },
}

impl RegistryError {
    /// Creates a not-found error.
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an already-exists error.
    pub fn already_exists(kind: EntityKind, id: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an invalid-reference error.
    pub fn invalid_reference(kind: EntityKind, id: impl ToString) -> Self {
        Self::InvalidReference {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(caller: ActorId) -> Self {
        Self::Unauthorized { caller }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = RegistryError::not_found(EntityKind::Course, CourseCode::new("CS101"));
        assert_eq!(err.to_string(), "course not found: CS101");
    }

    #[test]
    fn unauthorized_message() {
        let err = RegistryError::unauthorized(ActorId::new(7));
        assert_eq!(
            err.to_string(),
            "caller actor:7 is not authorized for this operation"
        );
    }

    #[test]
    fn invalid_mark_message() {
        let err = RegistryError::InvalidMark { mark: 101, max: 100 };
        assert_eq!(err.to_string(), "invalid mark 101: must be at most 100");
    }
}
