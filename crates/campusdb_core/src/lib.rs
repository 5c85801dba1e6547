//! # CampusDB Core
//!
//! In-memory relational registry engine for a small academic domain:
//! professors, students, courses and enrollments, with bidirectional
//! links that stay consistent under insertion, update and deletion.
//!
//! This crate provides:
//! - A parametric dense ID index with O(1) swap-based removal
//! - Generic keyed entity stores with logical deletion
//! - An enrollment registry for the student ↔ course relation
//! - A facade ([`University`]) that cascades deletes and reassignments
//!   across every dependent collection
//! - A role-based authorization gate on every mutating operation
//! - An event feed for external observers

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod entity;
mod enrollment;
mod error;
mod events;
mod index;
mod types;
mod university;

pub use auth::RoleTable;
pub use config::Config;
pub use entity::{
    Course, CoursePatch, EntityStore, IdAllocator, Professor, ProfessorPatch, Record, Student,
    StudentPatch,
};
pub use enrollment::{Enrollment, EnrollmentKey, EnrollmentRegistry, MAX_MARK};
pub use error::{RegistryError, RegistryResult};
pub use events::{EventFeed, EventRecord, RegistryEvent};
pub use index::{DenseIndex, IndexKey};
pub use types::{ActorId, CourseCode, EntityKind, ProfessorId, StudentId};
pub use university::{EnrollmentView, University};
