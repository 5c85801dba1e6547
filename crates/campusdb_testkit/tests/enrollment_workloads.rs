//! Randomized enrollment workloads checked against a model relation.

use campusdb_core::{CourseCode, RegistryError, StudentId, University};
use campusdb_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

/// Builds a registry with 8 students and the three workload courses.
fn workload_university() -> University {
    let mut fixture = TestUniversity::new();
    let prof = fixture.uni.add_professor(ADMIN, "Alice", "CS").unwrap();
    for code in ["CS101", "CS202", "MATH200"] {
        fixture
            .uni
            .create_course(ADMIN, CourseCode::new(code), code, prof)
            .unwrap();
    }
    for i in 0..8 {
        fixture
            .uni
            .add_student(ADMIN, format!("Student {i}"), "CS", 2025, Some(prof))
            .unwrap();
    }
    fixture.uni
}

proptest! {
    /// The registry's relation agrees with a model set after any
    /// interleaving of enrolls and unenrolls, and every operation's
    /// outcome matches what the model predicts.
    #[test]
    fn relation_matches_model(ops in enrollment_ops_strategy(120)) {
        let mut uni = workload_university();
        let mut model: HashSet<(StudentId, CourseCode)> = HashSet::new();

        for op in ops {
            match op {
                EnrollmentOp::Enroll(student, course) => {
                    let result = uni.enroll_student_in_course(ADMIN, student, course.clone());
                    if model.insert((student, course)) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(
                            matches!(result, Err(RegistryError::AlreadyEnrolled { .. })),
                            "expected AlreadyEnrolled, got {:?}",
                            result
                        );
                    }
                }
                EnrollmentOp::Unenroll(student, course) => {
                    let result = uni.remove_course_from_student(ADMIN, student, course.clone());
                    if model.remove(&(student, course)) {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(
                            matches!(result, Err(RegistryError::NotEnrolled { .. })),
                            "expected NotEnrolled, got {:?}",
                            result
                        );
                    }
                }
            }
        }

        // Final state: both directions of the relation agree with the model.
        for code in ["CS101", "CS202", "MATH200"].map(CourseCode::from) {
            let expected: HashSet<StudentId> = model
                .iter()
                .filter(|(_, c)| *c == code)
                .map(|(s, _)| *s)
                .collect();
            let actual: HashSet<StudentId> = uni
                .student_enrollments_in(&code);
            prop_assert_eq!(actual, expected);
            prop_assert_eq!(uni.student_count(&code).unwrap(), model.iter().filter(|(_, c)| *c == code).count());
        }
        for student in (1u64..=8).map(StudentId::new) {
            let expected = model.iter().filter(|(s, _)| *s == student).count();
            prop_assert_eq!(uni.student_enrollments(student).unwrap().len(), expected);
        }
    }
}

/// Helper extension used by the workload test.
trait RelationExt {
    fn student_enrollments_in(&self, code: &CourseCode) -> HashSet<StudentId>;
}

impl RelationExt for University {
    fn student_enrollments_in(&self, code: &CourseCode) -> HashSet<StudentId> {
        (1u64..=8)
            .map(StudentId::new)
            .filter(|&s| self.get_enrollment(s, code).is_ok())
            .collect()
    }
}
