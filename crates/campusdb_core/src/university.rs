//! University facade: entity stores, cascades and the authorization gate.

use crate::auth::RoleTable;
use crate::config::Config;
use crate::entity::{
    Course, CoursePatch, EntityStore, IdAllocator, Professor, ProfessorPatch, Student, StudentPatch,
};
use crate::enrollment::{Enrollment, EnrollmentRegistry};
use crate::error::{RegistryError, RegistryResult};
use crate::events::{EventFeed, EventRecord, RegistryEvent};
use crate::index::DenseIndex;
use crate::types::{ActorId, CourseCode, EntityKind, ProfessorId, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use tracing::debug;

/// One row of the joined per-student enrollment view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentView {
    /// The course code.
    pub course: CourseCode,
    /// The course name.
    pub course_name: String,
    /// Name of the professor teaching the course.
    pub professor_name: String,
    /// Department of that professor.
    pub department: String,
    /// The student's mark in the course.
    pub mark: u8,
}

/// The registry facade and relationship orchestrator.
///
/// `University` exclusively owns every store and index; callers only
/// ever receive copies of records. All operations run to completion
/// synchronously, and every precondition (authorization included) is
/// validated before the first store is touched, so a returned error
/// always means nothing changed.
///
/// Cross-entity links are identifiers, never references: a course
/// names its professor by ID and is resolved through a lookup, which
/// is what lets deletion cascade without dangling anything.
///
/// # Example
///
/// ```rust,ignore
/// use campusdb_core::{ActorId, University};
///
/// let admin = ActorId::new(1);
/// let mut uni = University::new(admin);
///
/// let alice = uni.add_professor(admin, "Alice", "CS")?;
/// uni.create_course(admin, "CS101".into(), "Intro", alice)?;
/// let bob = uni.add_student(admin, "Bob", "CS", 2025, Some(alice))?;
/// uni.enroll_student_in_course(admin, bob, "CS101".into())?;
/// ```
pub struct University {
    /// Professor store.
    professors: EntityStore<Professor>,
    /// Student store.
    students: EntityStore<Student>,
    /// Course store.
    courses: EntityStore<Course>,
    /// Professor ID allocator.
    professor_ids: IdAllocator,
    /// Student ID allocator.
    student_ids: IdAllocator,
    /// Per-professor index of owned course codes.
    owned_courses: HashMap<ProfessorId, DenseIndex<CourseCode>>,
    /// The student ↔ course relation.
    enrollments: EnrollmentRegistry,
    /// Role table backing the authorization gate.
    roles: RoleTable,
    /// Event feed for external observers.
    feed: EventFeed,
}

impl University {
    /// Creates a registry with the given admin and default configuration.
    #[must_use]
    pub fn new(admin: ActorId) -> Self {
        Self::with_config(RoleTable::new(admin), Config::default())
    }

    /// Creates a registry with an explicit role table and configuration.
    #[must_use]
    pub fn with_config(roles: RoleTable, config: Config) -> Self {
        Self {
            professors: EntityStore::new(),
            students: EntityStore::new(),
            courses: EntityStore::new(),
            professor_ids: IdAllocator::new(),
            student_ids: IdAllocator::new(),
            owned_courses: HashMap::new(),
            enrollments: EnrollmentRegistry::new(),
            roles,
            feed: EventFeed::with_max_history(config.event_history),
        }
    }

    // ---- authorization gate ----

    fn require_admin(&self, caller: ActorId) -> RegistryResult<()> {
        if self.roles.is_admin(caller) {
            Ok(())
        } else {
            Err(RegistryError::unauthorized(caller))
        }
    }

    fn require_authorized(&self, caller: ActorId) -> RegistryResult<()> {
        if self.roles.is_authorized(caller) {
            Ok(())
        } else {
            Err(RegistryError::unauthorized(caller))
        }
    }

    /// Grants the instructor role to an actor. Admin only.
    pub fn grant_instructor(&mut self, caller: ActorId, actor: ActorId) -> RegistryResult<()> {
        self.require_admin(caller)?;
        if self.roles.grant(actor) {
            self.feed.emit(RegistryEvent::InstructorGranted { actor });
        }
        Ok(())
    }

    /// Revokes the instructor role from an actor. Admin only.
    pub fn revoke_instructor(&mut self, caller: ActorId, actor: ActorId) -> RegistryResult<()> {
        self.require_admin(caller)?;
        if self.roles.revoke(actor) {
            self.feed.emit(RegistryEvent::InstructorRevoked { actor });
        }
        Ok(())
    }

    /// Returns the role table.
    #[must_use]
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    // ---- professors ----

    /// Adds a professor and returns the allocated ID.
    pub fn add_professor(
        &mut self,
        caller: ActorId,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> RegistryResult<ProfessorId> {
        self.require_authorized(caller)?;
        let id = ProfessorId::new(self.professor_ids.allocate());
        self.professors.insert(Professor {
            id,
            name: name.into(),
            department: department.into(),
            active: true,
        })?;
        self.owned_courses
            .insert(id, DenseIndex::new(EntityKind::Course));
        self.feed.emit(RegistryEvent::ProfessorAdded { id });
        Ok(id)
    }

    /// Applies a partial update to a professor.
    pub fn update_professor(
        &mut self,
        caller: ActorId,
        id: ProfessorId,
        patch: ProfessorPatch,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        self.professors.update_with(&id, |p| patch.apply(p))?;
        self.feed.emit(RegistryEvent::ProfessorUpdated { id });
        Ok(())
    }

    /// Removes a professor, cascading to every course they own.
    ///
    /// Admin only. Each owned course is deleted exactly as
    /// [`University::delete_course`] would, unenrolling its students.
    pub fn remove_professor(&mut self, caller: ActorId, id: ProfessorId) -> RegistryResult<()> {
        self.require_admin(caller)?;
        // Validate before the cascade starts; a missing professor must
        // not leave half a cascade behind.
        if !self.professors.contains_active(&id) {
            return Err(RegistryError::not_found(EntityKind::Professor, id));
        }

        // Snapshot: course deletion shrinks the index being walked.
        let owned: Vec<CourseCode> = self
            .owned_courses
            .get(&id)
            .map(DenseIndex::all)
            .unwrap_or_default();
        debug!(professor = %id, courses = owned.len(), "removing professor");
        for code in owned {
            self.delete_course_inner(&code)?;
        }

        self.owned_courses.remove(&id);
        self.professors.deactivate(&id)?;
        self.feed.emit(RegistryEvent::ProfessorRemoved { id });
        Ok(())
    }

    /// Returns a copy of a live professor record.
    pub fn get_professor(&self, id: ProfessorId) -> RegistryResult<Professor> {
        self.professors.get(&id)
    }

    /// Returns the IDs of all live professors.
    #[must_use]
    pub fn list_professors(&self) -> Vec<ProfessorId> {
        self.professors.live_keys()
    }

    // ---- students ----

    /// Adds a student and returns the allocated ID.
    ///
    /// The advisor, if given, must be a live professor.
    pub fn add_student(
        &mut self,
        caller: ActorId,
        name: impl Into<String>,
        major: impl Into<String>,
        year: u16,
        advisor: Option<ProfessorId>,
    ) -> RegistryResult<StudentId> {
        self.require_authorized(caller)?;
        if let Some(professor) = advisor {
            if !self.professors.contains_active(&professor) {
                return Err(RegistryError::invalid_reference(
                    EntityKind::Professor,
                    professor,
                ));
            }
        }
        let id = StudentId::new(self.student_ids.allocate());
        self.students.insert(Student {
            id,
            name: name.into(),
            major: major.into(),
            year,
            advisor,
            active: true,
        })?;
        self.feed.emit(RegistryEvent::StudentAdded { id });
        Ok(id)
    }

    /// Applies a partial update to a student.
    ///
    /// A new advisor in the patch must be a live professor.
    pub fn update_student(
        &mut self,
        caller: ActorId,
        id: StudentId,
        patch: StudentPatch,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        if let Some(professor) = patch.advisor {
            if !self.professors.contains_active(&professor) {
                return Err(RegistryError::invalid_reference(
                    EntityKind::Professor,
                    professor,
                ));
            }
        }
        self.students.update_with(&id, |s| patch.apply(s))?;
        self.feed.emit(RegistryEvent::StudentUpdated { id });
        Ok(())
    }

    /// Deletes a student, cascading to every enrollment they hold.
    pub fn delete_student(&mut self, caller: ActorId, id: StudentId) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        if !self.students.contains_active(&id) {
            return Err(RegistryError::not_found(EntityKind::Student, id));
        }

        // Snapshot: unenrollment shrinks the index being walked.
        let enrolled = self.enrollments.courses_of_student(id);
        debug!(student = %id, enrollments = enrolled.len(), "deleting student");
        for course in enrolled {
            self.enrollments.unenroll(id, &course)?;
            self.feed.emit(RegistryEvent::StudentUnenrolled {
                student: id,
                course,
            });
        }

        self.students.deactivate(&id)?;
        self.feed.emit(RegistryEvent::StudentRemoved { id });
        Ok(())
    }

    /// Returns a copy of a live student record.
    pub fn get_student(&self, id: StudentId) -> RegistryResult<Student> {
        self.students.get(&id)
    }

    /// Returns the IDs of all live students.
    #[must_use]
    pub fn list_students(&self) -> Vec<StudentId> {
        self.students.live_keys()
    }

    /// Returns the joined enrollment view for a student: course code
    /// and name, plus the teaching professor's name and department.
    pub fn student_enrollments(&self, id: StudentId) -> RegistryResult<Vec<EnrollmentView>> {
        if !self.students.contains_active(&id) {
            return Err(RegistryError::not_found(EntityKind::Student, id));
        }
        let mut rows = Vec::new();
        for enrollment in self.enrollments.list_by_student(id) {
            // A live enrollment can only reference a live course, and a
            // live course a live professor; the cascades guarantee it.
            let course = self.courses.get(&enrollment.course)?;
            let professor = self.professors.get(&course.professor)?;
            rows.push(EnrollmentView {
                course: course.code,
                course_name: course.name,
                professor_name: professor.name,
                department: professor.department,
                mark: enrollment.mark,
            });
        }
        Ok(rows)
    }

    // ---- courses ----

    /// Creates a course under a live professor.
    ///
    /// The code must be unused; codes are never reused, even after
    /// deletion.
    pub fn create_course(
        &mut self,
        caller: ActorId,
        code: CourseCode,
        name: impl Into<String>,
        professor: ProfessorId,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        if !self.professors.contains_active(&professor) {
            return Err(RegistryError::invalid_reference(
                EntityKind::Professor,
                professor,
            ));
        }
        self.courses.insert(Course {
            code: code.clone(),
            name: name.into(),
            professor,
            active: true,
        })?;
        self.owned_courses
            .entry(professor)
            .or_insert_with(|| DenseIndex::new(EntityKind::Course))
            .add(code.clone())?;
        self.feed
            .emit(RegistryEvent::CourseCreated { code, professor });
        Ok(())
    }

    /// Applies a partial update to a course.
    pub fn update_course(
        &mut self,
        caller: ActorId,
        code: CourseCode,
        patch: CoursePatch,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        self.courses.update_with(&code, |c| patch.apply(c))?;
        self.feed.emit(RegistryEvent::CourseUpdated { code });
        Ok(())
    }

    /// Moves a course to a new professor. Admin only.
    ///
    /// Reassigning a course to its current owner is a complete no-op:
    /// no index is touched and no event is emitted.
    pub fn reassign_course(
        &mut self,
        caller: ActorId,
        code: CourseCode,
        new_professor: ProfessorId,
    ) -> RegistryResult<()> {
        self.require_admin(caller)?;
        let course = self.courses.get(&code)?;
        let old_professor = course.professor;
        if old_professor == new_professor {
            return Ok(());
        }
        if !self.professors.contains_active(&new_professor) {
            return Err(RegistryError::invalid_reference(
                EntityKind::Professor,
                new_professor,
            ));
        }

        if let Some(index) = self.owned_courses.get_mut(&old_professor) {
            index.remove(&code)?;
        }
        self.owned_courses
            .entry(new_professor)
            .or_insert_with(|| DenseIndex::new(EntityKind::Course))
            .add(code.clone())?;
        self.courses
            .update_with(&code, |c| c.professor = new_professor)?;

        debug!(course = %code, from = %old_professor, to = %new_professor, "reassigned course");
        self.feed.emit(RegistryEvent::CourseReassigned {
            code,
            from: old_professor,
            to: new_professor,
        });
        Ok(())
    }

    /// Deletes a course, unenrolling every student in it. Admin only.
    pub fn delete_course(&mut self, caller: ActorId, code: CourseCode) -> RegistryResult<()> {
        self.require_admin(caller)?;
        if !self.courses.contains_active(&code) {
            return Err(RegistryError::not_found(EntityKind::Course, &code));
        }
        self.delete_course_inner(&code)
    }

    /// Cascade body shared by `delete_course` and `remove_professor`.
    ///
    /// Callers have already validated that the course is live.
    fn delete_course_inner(&mut self, code: &CourseCode) -> RegistryResult<()> {
        let course = self.courses.get(code)?;

        // Snapshot: unenrollment shrinks the index being walked.
        let enrolled = self.enrollments.students_in_course(code);
        debug!(course = %code, students = enrolled.len(), "deleting course");
        for student in enrolled {
            self.enrollments.unenroll(student, code)?;
            self.feed.emit(RegistryEvent::StudentUnenrolled {
                student,
                course: code.clone(),
            });
        }

        if let Some(index) = self.owned_courses.get_mut(&course.professor) {
            index.remove(code)?;
        }
        self.courses.deactivate(code)?;
        self.feed
            .emit(RegistryEvent::CourseRemoved { code: code.clone() });
        Ok(())
    }

    /// Returns a copy of a live course record.
    pub fn get_course(&self, code: &CourseCode) -> RegistryResult<Course> {
        self.courses.get(code)
    }

    /// Returns the codes of all live courses.
    #[must_use]
    pub fn list_courses(&self) -> Vec<CourseCode> {
        self.courses.live_keys()
    }

    /// Returns the codes of every live course a professor owns.
    pub fn courses_by_professor(&self, id: ProfessorId) -> RegistryResult<Vec<CourseCode>> {
        if !self.professors.contains_active(&id) {
            return Err(RegistryError::not_found(EntityKind::Professor, id));
        }
        Ok(self
            .owned_courses
            .get(&id)
            .map(DenseIndex::all)
            .unwrap_or_default())
    }

    /// Returns the number of students enrolled in a course.
    pub fn student_count(&self, code: &CourseCode) -> RegistryResult<usize> {
        if !self.courses.contains_active(code) {
            return Err(RegistryError::not_found(EntityKind::Course, code));
        }
        Ok(self.enrollments.student_count(code))
    }

    // ---- enrollment ----

    /// Enrolls a student in a course.
    ///
    /// Both must be live; the student must not already be enrolled.
    pub fn enroll_student_in_course(
        &mut self,
        caller: ActorId,
        student: StudentId,
        course: CourseCode,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        if !self.students.contains_active(&student) {
            return Err(RegistryError::not_found(EntityKind::Student, student));
        }
        if !self.courses.contains_active(&course) {
            return Err(RegistryError::not_found(EntityKind::Course, &course));
        }
        self.enrollments.enroll(student, course.clone())?;
        self.feed
            .emit(RegistryEvent::StudentEnrolled { student, course });
        Ok(())
    }

    /// Unenrolls a student from a course.
    pub fn remove_course_from_student(
        &mut self,
        caller: ActorId,
        student: StudentId,
        course: CourseCode,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        self.enrollments.unenroll(student, &course)?;
        self.feed
            .emit(RegistryEvent::StudentUnenrolled { student, course });
        Ok(())
    }

    /// Unenrolls a student from every course they are enrolled in.
    pub fn clear_all_courses_for_student(
        &mut self,
        caller: ActorId,
        student: StudentId,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        if !self.students.contains_active(&student) {
            return Err(RegistryError::not_found(EntityKind::Student, student));
        }

        // Snapshot: unenrollment shrinks the index being walked.
        for course in self.enrollments.courses_of_student(student) {
            self.enrollments.unenroll(student, &course)?;
            self.feed
                .emit(RegistryEvent::StudentUnenrolled { student, course });
        }
        Ok(())
    }

    /// Updates the mark of a live enrollment.
    pub fn update_mark(
        &mut self,
        caller: ActorId,
        student: StudentId,
        course: CourseCode,
        mark: u8,
    ) -> RegistryResult<()> {
        self.require_authorized(caller)?;
        self.enrollments.update_mark(student, &course, mark)?;
        self.feed.emit(RegistryEvent::MarkUpdated {
            student,
            course,
            mark,
        });
        Ok(())
    }

    /// Enrolls every eligible student from the list into the course.
    ///
    /// Students that are inactive or already enrolled are skipped, not
    /// failed — a deliberate business rule, not error suppression. One
    /// aggregate event reports who was actually enrolled.
    pub fn batch_enroll(
        &mut self,
        caller: ActorId,
        students: &[StudentId],
        course: CourseCode,
    ) -> RegistryResult<Vec<StudentId>> {
        self.require_authorized(caller)?;
        if !self.courses.contains_active(&course) {
            return Err(RegistryError::not_found(EntityKind::Course, &course));
        }

        let mut enrolled = Vec::new();
        for &student in students {
            if !self.students.contains_active(&student)
                || self.enrollments.is_enrolled(student, &course)
            {
                continue;
            }
            self.enrollments.enroll(student, course.clone())?;
            enrolled.push(student);
        }

        debug!(course = %course, enrolled = enrolled.len(), requested = students.len(), "batch enrollment");
        self.feed.emit(RegistryEvent::BatchEnrollmentCompleted {
            course,
            enrolled: enrolled.clone(),
        });
        Ok(enrolled)
    }

    /// Returns a copy of a live enrollment record.
    pub fn get_enrollment(
        &self,
        student: StudentId,
        course: &CourseCode,
    ) -> RegistryResult<Enrollment> {
        self.enrollments.get(student, course)
    }

    // ---- events ----

    /// Subscribes to the event feed.
    pub fn subscribe(&self) -> Receiver<EventRecord> {
        self.feed.subscribe()
    }

    /// Returns events with sequence greater than `cursor`, up to `limit`.
    #[must_use]
    pub fn poll_events(&self, cursor: u64, limit: usize) -> Vec<EventRecord> {
        self.feed.poll(cursor, limit)
    }

    /// Returns the sequence number of the most recent event.
    #[must_use]
    pub fn latest_sequence(&self) -> u64 {
        self.feed.latest_sequence()
    }
}

impl std::fmt::Debug for University {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("University")
            .field("professors", &self.professors.len())
            .field("students", &self.students.len())
            .field("courses", &self.courses.len())
            .finish_non_exhaustive()
    }
}
