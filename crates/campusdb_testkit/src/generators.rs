//! Property-based test generators using proptest.
//!
//! Provides strategies for generating registry data that respects the
//! domain's shape (course code format, mark bounds, graduation years).

use campusdb_core::{CourseCode, StudentId};
use proptest::prelude::*;

/// Strategy for generating person names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,11}").expect("valid regex")
}

/// Strategy for generating department or major names.
pub fn department_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Computer Science".to_string()),
        Just("Mathematics".to_string()),
        Just("Physics".to_string()),
        Just("History".to_string()),
        Just("Biology".to_string()),
    ]
}

/// Strategy for generating course codes like `CS101`.
pub fn course_code_strategy() -> impl Strategy<Value = CourseCode> {
    prop::string::string_regex("[A-Z]{2,4}[0-9]{3}")
        .expect("valid regex")
        .prop_map(CourseCode::new)
}

/// Strategy for generating graduation years.
pub fn year_strategy() -> impl Strategy<Value = u16> {
    2020u16..2040
}

/// Strategy for generating valid marks (0–100 inclusive).
pub fn mark_strategy() -> impl Strategy<Value = u8> {
    0u8..=100
}

/// Strategy for generating student IDs in a small range, so random
/// operation sequences collide often enough to be interesting.
pub fn student_id_strategy() -> impl Strategy<Value = StudentId> {
    (1u64..=16).prop_map(StudentId::new)
}

/// A single step in a random enrollment workload.
#[derive(Debug, Clone)]
pub enum EnrollmentOp {
    /// Enroll the student in the course.
    Enroll(StudentId, CourseCode),
    /// Unenroll the student from the course.
    Unenroll(StudentId, CourseCode),
}

/// Strategy for generating enrollment workloads over a fixed pool of
/// students and courses.
pub fn enrollment_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<EnrollmentOp>> {
    let course_pool = ["CS101", "CS202", "MATH200"];
    let op = (any::<bool>(), 1u64..=8, 0usize..course_pool.len()).prop_map(
        move |(enroll, student, course)| {
            let student = StudentId::new(student);
            let course = CourseCode::new(course_pool[course]);
            if enroll {
                EnrollmentOp::Enroll(student, course)
            } else {
                EnrollmentOp::Unenroll(student, course)
            }
        },
    );
    prop::collection::vec(op, 0..max_len)
}
