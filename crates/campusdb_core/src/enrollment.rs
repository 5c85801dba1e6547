//! Enrollment registry: the student ↔ course relation.

use crate::error::{RegistryError, RegistryResult};
use crate::index::DenseIndex;
use crate::types::{CourseCode, EntityKind, StudentId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Highest mark an enrollment can carry.
pub const MAX_MARK: u8 = 100;

/// Deterministic composite key for a (student, course) pair.
///
/// The key is the SHA-256 digest of the student ID and course code with
/// a separator byte between the fields, so `(1, "2X")` and `(12, "X")`
/// cannot collide. Computing a key is pure and has no lifecycle; the
/// same pair always yields the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnrollmentKey([u8; 32]);

impl EnrollmentKey {
    /// Computes the key for a (student, course) pair.
    #[must_use]
    pub fn compute(student: StudentId, course: &CourseCode) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(student.as_u64().to_be_bytes());
        hasher.update([0x1f]);
        hasher.update(course.as_str().as_bytes());
        Self(hasher.finalize().into())
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight digest bytes are plenty for error context.
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A single enrollment of a student in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// The enrolled student.
    pub student: StudentId,
    /// The course enrolled in.
    pub course: CourseCode,
    /// Mark awarded so far, 0 until updated.
    pub mark: u8,
    /// Whether the enrollment is live.
    pub active: bool,
}

/// Bipartite relation between students and courses.
///
/// Each enrollment record is reachable through two dense indexes: the
/// per-student list and the per-course list, both keyed by the same
/// [`EnrollmentKey`]. Positions live solely inside the indexes'
/// reverse maps; the record itself carries none, so a swap during
/// removal has exactly one bookkeeping site to keep consistent.
///
/// The registry stores relationships only. Validating that the student
/// and course are live is the orchestrator's job.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentRegistry {
    /// Key to record mapping. Holds live and unenrolled records.
    records: HashMap<EnrollmentKey, Enrollment>,
    /// Per-student indexes of live enrollment keys.
    by_student: HashMap<StudentId, DenseIndex<EnrollmentKey>>,
    /// Per-course indexes of live enrollment keys.
    by_course: HashMap<CourseCode, DenseIndex<EnrollmentKey>>,
}

impl EnrollmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the student has a live enrollment in the course.
    #[must_use]
    pub fn is_enrolled(&self, student: StudentId, course: &CourseCode) -> bool {
        let key = EnrollmentKey::compute(student, course);
        self.records.get(&key).is_some_and(|e| e.active)
    }

    /// Records a new enrollment with mark 0.
    ///
    /// Re-enrollment after unenrollment is permitted; the record is
    /// recreated and appended to both indexes at fresh positions.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyEnrolled` if a live enrollment exists.
    pub fn enroll(
        &mut self,
        student: StudentId,
        course: CourseCode,
    ) -> RegistryResult<EnrollmentKey> {
        let key = EnrollmentKey::compute(student, &course);
        if self.records.get(&key).is_some_and(|e| e.active) {
            return Err(RegistryError::AlreadyEnrolled { student, course });
        }

        self.by_student
            .entry(student)
            .or_insert_with(|| DenseIndex::new(EntityKind::Enrollment))
            .add(key)?;
        self.by_course
            .entry(course.clone())
            .or_insert_with(|| DenseIndex::new(EntityKind::Enrollment))
            .add(key)?;
        self.records.insert(
            key,
            Enrollment {
                student,
                course,
                mark: 0,
                active: true,
            },
        );
        Ok(key)
    }

    /// Removes a live enrollment from both indexes and deactivates it.
    ///
    /// # Errors
    ///
    /// Returns `NotEnrolled` if no live enrollment exists.
    pub fn unenroll(&mut self, student: StudentId, course: &CourseCode) -> RegistryResult<()> {
        let key = EnrollmentKey::compute(student, course);
        let record = self
            .records
            .get_mut(&key)
            .filter(|e| e.active)
            .ok_or_else(|| RegistryError::NotEnrolled {
                student,
                course: course.clone(),
            })?;
        record.active = false;

        // Both indexes are guaranteed to hold the key while the record
        // is live, so these removals cannot fail.
        if let Some(index) = self.by_student.get_mut(&student) {
            index.remove(&key)?;
        }
        if let Some(index) = self.by_course.get_mut(course) {
            index.remove(&key)?;
        }
        Ok(())
    }

    /// Updates the mark of a live enrollment.
    ///
    /// # Errors
    ///
    /// Returns `NotEnrolled` if no live enrollment exists, or
    /// `InvalidMark` if the mark exceeds [`MAX_MARK`].
    pub fn update_mark(
        &mut self,
        student: StudentId,
        course: &CourseCode,
        mark: u8,
    ) -> RegistryResult<()> {
        if mark > MAX_MARK {
            return Err(RegistryError::InvalidMark {
                mark,
                max: MAX_MARK,
            });
        }
        let key = EnrollmentKey::compute(student, course);
        let record = self
            .records
            .get_mut(&key)
            .filter(|e| e.active)
            .ok_or_else(|| RegistryError::NotEnrolled {
                student,
                course: course.clone(),
            })?;
        record.mark = mark;
        Ok(())
    }

    /// Returns a copy of a live enrollment.
    ///
    /// # Errors
    ///
    /// Returns `NotEnrolled` if no live enrollment exists.
    pub fn get(&self, student: StudentId, course: &CourseCode) -> RegistryResult<Enrollment> {
        let key = EnrollmentKey::compute(student, course);
        self.records
            .get(&key)
            .filter(|e| e.active)
            .cloned()
            .ok_or_else(|| RegistryError::NotEnrolled {
                student,
                course: course.clone(),
            })
    }

    /// Returns copies of every live enrollment of a student.
    #[must_use]
    pub fn list_by_student(&self, student: StudentId) -> Vec<Enrollment> {
        self.materialize(self.by_student.get(&student))
    }

    /// Returns copies of every live enrollment in a course.
    #[must_use]
    pub fn list_by_course(&self, course: &CourseCode) -> Vec<Enrollment> {
        self.materialize(self.by_course.get(course))
    }

    /// Returns the codes of every course a student is enrolled in.
    ///
    /// Cascades snapshot this before unenrolling.
    #[must_use]
    pub fn courses_of_student(&self, student: StudentId) -> Vec<CourseCode> {
        self.list_by_student(student)
            .into_iter()
            .map(|e| e.course)
            .collect()
    }

    /// Returns the IDs of every student enrolled in a course.
    ///
    /// Cascades snapshot this before unenrolling.
    #[must_use]
    pub fn students_in_course(&self, course: &CourseCode) -> Vec<StudentId> {
        self.list_by_course(course)
            .into_iter()
            .map(|e| e.student)
            .collect()
    }

    /// Returns the number of live enrollments in a course.
    #[must_use]
    pub fn student_count(&self, course: &CourseCode) -> usize {
        self.by_course.get(course).map_or(0, DenseIndex::len)
    }

    fn materialize(&self, index: Option<&DenseIndex<EnrollmentKey>>) -> Vec<Enrollment> {
        let Some(index) = index else {
            return Vec::new();
        };
        index
            .iter()
            .filter_map(|key| self.records.get(key))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs101() -> CourseCode {
        CourseCode::new("CS101")
    }

    #[test]
    fn key_is_deterministic() {
        let a = EnrollmentKey::compute(StudentId::new(1), &cs101());
        let b = EnrollmentKey::compute(StudentId::new(1), &cs101());
        assert_eq!(a, b);
    }

    #[test]
    fn key_separates_fields() {
        // Without the separator these two pairs would concatenate to
        // the same bytes.
        let a = EnrollmentKey::compute(StudentId::new(1), &CourseCode::new("2X"));
        let b = EnrollmentKey::compute(StudentId::new(1), &CourseCode::new("X"));
        assert_ne!(a, b);
    }

    #[test]
    fn enroll_and_lookup() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();

        assert!(reg.is_enrolled(student, &cs101()));
        let record = reg.get(student, &cs101()).unwrap();
        assert_eq!(record.mark, 0);
        assert_eq!(reg.student_count(&cs101()), 1);
    }

    #[test]
    fn double_enroll_rejected() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();

        let err = reg.enroll(student, cs101()).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyEnrolled { .. }));
    }

    #[test]
    fn unenroll_clears_both_sides() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();

        reg.unenroll(student, &cs101()).unwrap();

        assert!(!reg.is_enrolled(student, &cs101()));
        assert!(reg.list_by_student(student).is_empty());
        assert!(reg.list_by_course(&cs101()).is_empty());
        assert_eq!(reg.student_count(&cs101()), 0);
    }

    #[test]
    fn unenroll_missing_rejected() {
        let mut reg = EnrollmentRegistry::new();
        let err = reg.unenroll(StudentId::new(1), &cs101()).unwrap_err();
        assert!(matches!(err, RegistryError::NotEnrolled { .. }));
    }

    #[test]
    fn reenroll_after_unenroll_gets_fresh_record() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();
        reg.update_mark(student, &cs101(), 95).unwrap();
        reg.unenroll(student, &cs101()).unwrap();

        reg.enroll(student, cs101()).unwrap();

        // The recreated enrollment starts over at mark 0.
        assert_eq!(reg.get(student, &cs101()).unwrap().mark, 0);
        assert_eq!(reg.student_count(&cs101()), 1);
    }

    #[test]
    fn update_mark_bounds() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();

        reg.update_mark(student, &cs101(), 100).unwrap();
        assert_eq!(reg.get(student, &cs101()).unwrap().mark, 100);

        let err = reg.update_mark(student, &cs101(), 101).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidMark { .. }));
    }

    #[test]
    fn update_mark_requires_live_enrollment() {
        let mut reg = EnrollmentRegistry::new();
        let student = StudentId::new(1);
        reg.enroll(student, cs101()).unwrap();
        reg.unenroll(student, &cs101()).unwrap();

        let err = reg.update_mark(student, &cs101(), 50).unwrap_err();
        assert!(matches!(err, RegistryError::NotEnrolled { .. }));
    }

    #[test]
    fn many_to_many_listing() {
        let mut reg = EnrollmentRegistry::new();
        let math = CourseCode::new("MATH200");
        for id in 1..=3 {
            reg.enroll(StudentId::new(id), cs101()).unwrap();
        }
        reg.enroll(StudentId::new(1), math.clone()).unwrap();

        assert_eq!(reg.list_by_course(&cs101()).len(), 3);
        assert_eq!(reg.list_by_student(StudentId::new(1)).len(), 2);
        assert_eq!(reg.courses_of_student(StudentId::new(1)).len(), 2);
        assert_eq!(reg.students_in_course(&math), vec![StudentId::new(1)]);
    }

    #[test]
    fn interleaved_unenrolls_keep_indexes_consistent() {
        let mut reg = EnrollmentRegistry::new();
        for id in 1..=5 {
            reg.enroll(StudentId::new(id), cs101()).unwrap();
        }

        // Remove from the middle, then the swapped-in tail, then the head.
        reg.unenroll(StudentId::new(3), &cs101()).unwrap();
        reg.unenroll(StudentId::new(5), &cs101()).unwrap();
        reg.unenroll(StudentId::new(1), &cs101()).unwrap();

        let mut left: Vec<u64> = reg
            .students_in_course(&cs101())
            .into_iter()
            .map(StudentId::as_u64)
            .collect();
        left.sort_unstable();
        assert_eq!(left, vec![2, 4]);
    }
}
