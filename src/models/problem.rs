//! Problem instance model.
//!
//! A `Problem` fixes everything the solvers are not allowed to change:
//! course catalogue, required lecture counts, the time grid, classrooms,
//! and the students' enrollments. Construction also derives the student
//! grouping index that keeps objective evaluation proportional to the
//! number of *distinct* enrollment sets rather than the number of students.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable timetabling instance.
///
/// Course ids run from 1 to `course_count`; 0 is reserved for "no lecture".
/// Each student record is an ascending, duplicate-free list of course ids
/// (see [`crate::validation`] for structural checks).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawProblem", into = "RawProblem")]
pub struct Problem {
    course_count: usize,
    day_count: usize,
    timeslots_per_day: usize,
    classroom_count: usize,
    students: Vec<Vec<usize>>,
    lectures_per_course: Vec<usize>,
    /// Enrollment set → number of students sharing exactly that set.
    student_groups: HashMap<Vec<usize>, usize>,
}

/// Serialization mirror of `Problem` without the derived grouping index.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawProblem {
    course_count: usize,
    day_count: usize,
    timeslots_per_day: usize,
    classroom_count: usize,
    students: Vec<Vec<usize>>,
    lectures_per_course: Vec<usize>,
}

impl From<RawProblem> for Problem {
    fn from(raw: RawProblem) -> Self {
        Problem::new(
            raw.course_count,
            raw.day_count,
            raw.timeslots_per_day,
            raw.classroom_count,
            raw.students,
            raw.lectures_per_course,
        )
    }
}

impl From<Problem> for RawProblem {
    fn from(p: Problem) -> Self {
        RawProblem {
            course_count: p.course_count,
            day_count: p.day_count,
            timeslots_per_day: p.timeslots_per_day,
            classroom_count: p.classroom_count,
            students: p.students,
            lectures_per_course: p.lectures_per_course,
        }
    }
}

impl Problem {
    /// Creates an instance and derives the student grouping index.
    ///
    /// `lectures_per_course[c - 1]` is the required lecture count of course
    /// `c`. Students with identical enrollment lists are collapsed into one
    /// group carrying their headcount.
    pub fn new(
        course_count: usize,
        day_count: usize,
        timeslots_per_day: usize,
        classroom_count: usize,
        students: Vec<Vec<usize>>,
        lectures_per_course: Vec<usize>,
    ) -> Self {
        let mut student_groups: HashMap<Vec<usize>, usize> = HashMap::new();
        for courses in &students {
            *student_groups.entry(courses.clone()).or_insert(0) += 1;
        }

        Self {
            course_count,
            day_count,
            timeslots_per_day,
            classroom_count,
            students,
            lectures_per_course,
            student_groups,
        }
    }

    /// Number of students.
    #[inline]
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Number of courses (ids 1..=course_count).
    #[inline]
    pub fn course_count(&self) -> usize {
        self.course_count
    }

    /// Number of teaching days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.day_count
    }

    /// Time slots per day.
    #[inline]
    pub fn timeslots_per_day(&self) -> usize {
        self.timeslots_per_day
    }

    /// Total time slots across all days.
    #[inline]
    pub fn timeslots_count(&self) -> usize {
        self.day_count * self.timeslots_per_day
    }

    /// Number of classrooms.
    #[inline]
    pub fn classroom_count(&self) -> usize {
        self.classroom_count
    }

    /// Per-student enrollment lists.
    #[inline]
    pub fn students(&self) -> &[Vec<usize>] {
        &self.students
    }

    /// Required lecture counts, indexed by course id minus one.
    #[inline]
    pub fn lectures_per_course(&self) -> &[usize] {
        &self.lectures_per_course
    }

    /// Derived grouping: enrollment set → student headcount.
    #[inline]
    pub fn student_groups(&self) -> &HashMap<Vec<usize>, usize> {
        &self.student_groups
    }

    /// Sum of required lectures over all courses.
    pub fn total_lectures(&self) -> usize {
        self.lectures_per_course.iter().sum()
    }

    /// Whether the time grid can hold every required lecture.
    ///
    /// An instance failing this can never be scheduled exactly; generators
    /// are expected to reject such instances before they reach the solvers.
    pub fn is_valid(&self) -> bool {
        self.classroom_count * self.timeslots_count() >= self.total_lectures()
    }
}
