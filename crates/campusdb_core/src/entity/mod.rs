//! Entity records and the generic keyed store.

mod records;
mod store;

pub use records::{Course, CoursePatch, Professor, ProfessorPatch, Record, Student, StudentPatch};
pub use store::{EntityStore, IdAllocator};
