//! Event feed for observing committed registry mutations.
//!
//! Every successful mutating operation emits one event (cascades emit
//! one per sub-step plus one for the whole). Events are for external
//! observers; nothing inside the registry depends on them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use campusdb_core::University;
//!
//! let mut uni = University::new(admin);
//! let receiver = uni.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(record) = receiver.recv() {
//!         println!("event #{}: {:?}", record.sequence, record.event);
//!     }
//! });
//! ```

use crate::types::{ActorId, CourseCode, ProfessorId, StudentId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// A registry mutation, carrying the identifiers it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A professor was added.
    ProfessorAdded {
        /// The new professor.
        id: ProfessorId,
    },
    /// A professor's fields were updated.
    ProfessorUpdated {
        /// The updated professor.
        id: ProfessorId,
    },
    /// A professor was removed, after their courses were cascaded away.
    ProfessorRemoved {
        /// The removed professor.
        id: ProfessorId,
    },
    /// A student was added.
    StudentAdded {
        /// The new student.
        id: StudentId,
    },
    /// A student's fields were updated.
    StudentUpdated {
        /// The updated student.
        id: StudentId,
    },
    /// A student was removed, after their enrollments were cascaded away.
    StudentRemoved {
        /// The removed student.
        id: StudentId,
    },
    /// A course was created under a professor.
    CourseCreated {
        /// The new course.
        code: CourseCode,
        /// The owning professor.
        professor: ProfessorId,
    },
    /// A course's fields were updated.
    CourseUpdated {
        /// The updated course.
        code: CourseCode,
    },
    /// A course was removed, after its enrollments were cascaded away.
    CourseRemoved {
        /// The removed course.
        code: CourseCode,
    },
    /// A course changed owners.
    CourseReassigned {
        /// The course.
        code: CourseCode,
        /// The previous owner.
        from: ProfessorId,
        /// The new owner.
        to: ProfessorId,
    },
    /// A student enrolled in a course.
    StudentEnrolled {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// A student was unenrolled from a course.
    StudentUnenrolled {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
    },
    /// An enrollment's mark was updated.
    MarkUpdated {
        /// The student.
        student: StudentId,
        /// The course.
        course: CourseCode,
        /// The new mark.
        mark: u8,
    },
    /// A batch enrollment finished.
    BatchEnrollmentCompleted {
        /// The course enrolled into.
        course: CourseCode,
        /// The students actually enrolled; skipped students are absent.
        enrolled: Vec<StudentId>,
    },
    /// An actor was granted the instructor role.
    InstructorGranted {
        /// The granted actor.
        actor: ActorId,
    },
    /// An actor lost the instructor role.
    InstructorRevoked {
        /// The revoked actor.
        actor: ActorId,
    },
}

/// An event paired with its position in the total emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonically increasing sequence number, starting at 1.
    pub sequence: u64,
    /// The event itself.
    pub event: RegistryEvent,
}

/// Fans registry events out to subscribers and keeps a bounded history
/// for polling.
///
/// Events are emitted in operation order; a subscriber sees them in the
/// same total order the registry applied them.
pub struct EventFeed {
    /// Subscribers (senders).
    subscribers: RwLock<Vec<Sender<EventRecord>>>,
    /// Recent events for cursor-based polling.
    history: RwLock<Vec<EventRecord>>,
    /// Next sequence number to assign.
    next_sequence: RwLock<u64>,
    /// Maximum history size.
    max_history: usize,
}

impl EventFeed {
    /// Creates a feed with the default history bound.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Creates a feed with a specific history bound.
    #[must_use]
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
            next_sequence: RwLock::new(1),
            max_history,
        }
    }

    /// Subscribes to the feed.
    ///
    /// Returns a receiver that sees all future events. The receiver
    /// should be drained regularly to avoid unbounded channel growth.
    pub fn subscribe(&self) -> Receiver<EventRecord> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Assigns the next sequence number to the event and distributes it.
    ///
    /// Returns the assigned sequence number.
    pub fn emit(&self, event: RegistryEvent) -> u64 {
        let sequence = {
            let mut next = self.next_sequence.write();
            let seq = *next;
            *next += 1;
            seq
        };
        let record = EventRecord { sequence, event };

        {
            let mut history = self.history.write();
            history.push(record.clone());
            if history.len() > self.max_history {
                let excess = history.len() - self.max_history;
                history.drain(0..excess);
            }
        }

        // Disconnected subscribers are dropped on the way through.
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(record.clone()).is_ok());
        sequence
    }

    /// Returns events with sequence greater than `cursor`, up to `limit`.
    #[must_use]
    pub fn poll(&self, cursor: u64, limit: usize) -> Vec<EventRecord> {
        self.history
            .read()
            .iter()
            .filter(|r| r.sequence > cursor)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Returns the latest assigned sequence number, 0 if none.
    #[must_use]
    pub fn latest_sequence(&self) -> u64 {
        *self.next_sequence.read() - 1
    }

    /// Returns the number of connected subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Returns the number of events retained in history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.read().len()
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeed")
            .field("latest_sequence", &self.latest_sequence())
            .field("subscriber_count", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
