//! Entity record types and partial-update patches.

use crate::index::IndexKey;
use crate::types::{CourseCode, EntityKind, ProfessorId, StudentId};
use serde::{Deserialize, Serialize};

/// Common shape shared by every entity record.
///
/// A record owns its key and an active flag. Deletion is logical: the
/// flag flips, the slot is retained, and the key is never reused.
pub trait Record: Clone {
    /// The key type this record is stored under.
    type Key: IndexKey;

    /// Returns the record's key.
    fn key(&self) -> Self::Key;

    /// The entity kind, for error context.
    fn kind() -> EntityKind;

    /// Whether the record is live.
    fn is_active(&self) -> bool;

    /// Marks the record as logically deleted.
    fn deactivate(&mut self);
}

/// A professor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    /// Stable identifier, never reused.
    pub id: ProfessorId,
    /// Display name.
    pub name: String,
    /// Department the professor belongs to.
    pub department: String,
    /// Whether the record is live.
    pub active: bool,
}

impl Record for Professor {
    type Key = ProfessorId;

    fn key(&self) -> ProfessorId {
        self.id
    }

    fn kind() -> EntityKind {
        EntityKind::Professor
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Partial update for a professor.
///
/// `None` fields are left unchanged. Absence is explicit here; the
/// original wire convention of "empty string means keep" is reproduced
/// by [`ProfessorPatch::from_sentinels`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorPatch {
    /// New name, if any.
    pub name: Option<String>,
    /// New department, if any.
    pub department: Option<String>,
}

impl ProfessorPatch {
    /// Decodes the sentinel update convention: an empty string keeps
    /// the current value.
    #[must_use]
    pub fn from_sentinels(name: &str, department: &str) -> Self {
        Self {
            name: non_empty(name),
            department: non_empty(department),
        }
    }

    /// Sets the name field.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the department field.
    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Applies the patch to a record.
    pub fn apply(self, professor: &mut Professor) {
        if let Some(name) = self.name {
            professor.name = name;
        }
        if let Some(department) = self.department {
            professor.department = department;
        }
    }
}

/// A student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Stable identifier, never reused.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Declared major.
    pub major: String,
    /// Expected graduation year.
    pub year: u16,
    /// Supervising professor, if assigned.
    ///
    /// The ID is not cleared when the professor is removed, so it may
    /// name a logically deleted record. Callers needing a live advisor
    /// must resolve the ID through the professor store.
    pub advisor: Option<ProfessorId>,
    /// Whether the record is live.
    pub active: bool,
}

impl Record for Student {
    type Key = StudentId;

    fn key(&self) -> StudentId {
        self.id
    }

    fn kind() -> EntityKind {
        EntityKind::Student
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Partial update for a student.
///
/// `None` fields are left unchanged. The advisor can be changed but not
/// cleared through a patch, matching the source convention where the
/// zero sentinel means "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    /// New name, if any.
    pub name: Option<String>,
    /// New major, if any.
    pub major: Option<String>,
    /// New graduation year, if any.
    pub year: Option<u16>,
    /// New advisor, if any.
    pub advisor: Option<ProfessorId>,
}

impl StudentPatch {
    /// Decodes the sentinel update convention: empty strings and zero
    /// values keep the current field.
    #[must_use]
    pub fn from_sentinels(name: &str, major: &str, year: u16, advisor: u64) -> Self {
        Self {
            name: non_empty(name),
            major: non_empty(major),
            year: (year != 0).then_some(year),
            advisor: (advisor != 0).then_some(ProfessorId::new(advisor)),
        }
    }

    /// Sets the name field.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the major field.
    #[must_use]
    pub fn major(mut self, major: impl Into<String>) -> Self {
        self.major = Some(major.into());
        self
    }

    /// Sets the graduation year field.
    #[must_use]
    pub fn year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the advisor field.
    #[must_use]
    pub fn advisor(mut self, advisor: ProfessorId) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Applies the patch to a record.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(major) = self.major {
            student.major = major;
        }
        if let Some(year) = self.year {
            student.year = year;
        }
        if let Some(advisor) = self.advisor {
            student.advisor = Some(advisor);
        }
    }
}

/// A course record.
///
/// A course is owned by exactly one professor at a time; ownership
/// changes only through reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Caller-chosen code, never reused.
    pub code: CourseCode,
    /// Display name.
    pub name: String,
    /// The owning professor.
    pub professor: ProfessorId,
    /// Whether the record is live.
    pub active: bool,
}

impl Record for Course {
    type Key = CourseCode;

    fn key(&self) -> CourseCode {
        self.code.clone()
    }

    fn kind() -> EntityKind {
        EntityKind::Course
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Partial update for a course.
///
/// Ownership is not patchable; use reassignment, which also maintains
/// the per-professor course indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePatch {
    /// New name, if any.
    pub name: Option<String>,
}

impl CoursePatch {
    /// Decodes the sentinel update convention: an empty string keeps
    /// the current name.
    #[must_use]
    pub fn from_sentinels(name: &str) -> Self {
        Self {
            name: non_empty(name),
        }
    }

    /// Sets the name field.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Applies the patch to a record.
    pub fn apply(self, course: &mut Course) {
        if let Some(name) = self.name {
            course.name = name;
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student {
            id: StudentId::new(1),
            name: "Bob".to_string(),
            major: "CS".to_string(),
            year: 2025,
            advisor: Some(ProfessorId::new(1)),
            active: true,
        }
    }

    #[test]
    fn sentinel_fields_keep_current_values() {
        let mut s = student();
        StudentPatch::from_sentinels("", "", 0, 0).apply(&mut s);

        assert_eq!(s.name, "Bob");
        assert_eq!(s.major, "CS");
        assert_eq!(s.year, 2025);
        assert_eq!(s.advisor, Some(ProfessorId::new(1)));
    }

    #[test]
    fn present_fields_apply() {
        let mut s = student();
        StudentPatch::from_sentinels("Robert", "", 2026, 2).apply(&mut s);

        assert_eq!(s.name, "Robert");
        assert_eq!(s.major, "CS");
        assert_eq!(s.year, 2026);
        assert_eq!(s.advisor, Some(ProfessorId::new(2)));
    }

    #[test]
    fn builder_patch() {
        let mut s = student();
        StudentPatch::default().major("Math").apply(&mut s);

        assert_eq!(s.major, "Math");
        assert_eq!(s.name, "Bob");
    }

    #[test]
    fn professor_sentinels() {
        let mut p = Professor {
            id: ProfessorId::new(1),
            name: "Alice".to_string(),
            department: "CS".to_string(),
            active: true,
        };

        ProfessorPatch::from_sentinels("", "Math").apply(&mut p);
        assert_eq!(p.name, "Alice");
        assert_eq!(p.department, "Math");
    }

    #[test]
    fn patch_serde_roundtrip() {
        let patch = StudentPatch::default().name("Eve").year(2027);
        let json = serde_json::to_string(&patch).unwrap();
        let back: StudentPatch = serde_json::from_str(&json).unwrap();
        assert_eq!(patch, back);
    }
}
