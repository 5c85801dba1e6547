//! Registry fixtures and scenario helpers.
//!
//! Provides convenience constructors for registries with a known cast
//! of actors, and populated scenarios for cascade tests.

use campusdb_core::{ActorId, CourseCode, ProfessorId, StudentId, University};

/// The designated admin in every fixture registry.
pub const ADMIN: ActorId = ActorId::new(1);

/// An actor holding the instructor role in every fixture registry.
pub const INSTRUCTOR: ActorId = ActorId::new(2);

/// An actor holding no role at all.
pub const OUTSIDER: ActorId = ActorId::new(99);

/// A registry pre-wired with the fixture actors.
pub struct TestUniversity {
    /// The registry instance.
    pub uni: University,
}

impl TestUniversity {
    /// Creates a registry where [`ADMIN`] is admin and [`INSTRUCTOR`]
    /// already holds the instructor role.
    pub fn new() -> Self {
        let mut uni = University::new(ADMIN);
        uni.grant_instructor(ADMIN, INSTRUCTOR)
            .expect("admin grant cannot fail");
        Self { uni }
    }
}

impl Default for TestUniversity {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestUniversity {
    type Target = University;

    fn deref(&self) -> &Self::Target {
        &self.uni
    }
}

impl std::ops::DerefMut for TestUniversity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.uni
    }
}

/// Runs a test against a freshly wired registry.
///
/// # Example
///
/// ```rust,ignore
/// use campusdb_testkit::{with_university, ADMIN};
///
/// #[test]
/// fn my_test() {
///     with_university(|uni| {
///         uni.add_professor(ADMIN, "Alice", "CS").unwrap();
///     });
/// }
/// ```
pub fn with_university<F, R>(f: F) -> R
where
    F: FnOnce(&mut University) -> R,
{
    let mut fixture = TestUniversity::new();
    f(&mut fixture.uni)
}

/// Populated scenario builders.
pub mod scenarios {
    use super::*;

    /// A populated registry plus the IDs it handed out.
    pub struct Campus {
        /// The registry.
        pub uni: University,
        /// Professors, in creation order.
        pub professors: Vec<ProfessorId>,
        /// Students, in creation order.
        pub students: Vec<StudentId>,
        /// Courses, in creation order.
        pub courses: Vec<CourseCode>,
    }

    /// Builds a registry with `professor_count` professors, each owning
    /// `courses_per_professor` courses, and `student_count` students
    /// enrolled in every course.
    ///
    /// Course codes follow the pattern `C<professor>_<n>`.
    pub fn populated_campus(
        professor_count: usize,
        courses_per_professor: usize,
        student_count: usize,
    ) -> Campus {
        let mut fixture = TestUniversity::new();

        let professors: Vec<ProfessorId> = (0..professor_count)
            .map(|i| {
                fixture
                    .uni
                    .add_professor(ADMIN, format!("Professor {i}"), "CS")
                    .expect("fixture professor")
            })
            .collect();

        let mut courses = Vec::new();
        for (i, &prof) in professors.iter().enumerate() {
            for n in 0..courses_per_professor {
                let code = CourseCode::new(format!("C{i}_{n}"));
                fixture
                    .uni
                    .create_course(ADMIN, code.clone(), format!("Course {i}.{n}"), prof)
                    .expect("fixture course");
                courses.push(code);
            }
        }

        let students: Vec<StudentId> = (0..student_count)
            .map(|i| {
                fixture
                    .uni
                    .add_student(ADMIN, format!("Student {i}"), "CS", 2025, professors.first().copied())
                    .expect("fixture student")
            })
            .collect();

        for code in &courses {
            fixture
                .uni
                .batch_enroll(ADMIN, &students, code.clone())
                .expect("fixture enrollment");
        }

        Campus {
            uni: fixture.uni,
            professors,
            students,
            courses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_actors_have_expected_roles() {
        let fixture = TestUniversity::new();
        assert!(fixture.roles().is_admin(ADMIN));
        assert!(fixture.roles().is_authorized(INSTRUCTOR));
        assert!(!fixture.roles().is_authorized(OUTSIDER));
    }

    #[test]
    fn populated_campus_counts() {
        let campus = scenarios::populated_campus(2, 3, 4);

        assert_eq!(campus.professors.len(), 2);
        assert_eq!(campus.courses.len(), 6);
        assert_eq!(campus.students.len(), 4);
        for code in &campus.courses {
            assert_eq!(campus.uni.student_count(code).unwrap(), 4);
        }
    }
}
