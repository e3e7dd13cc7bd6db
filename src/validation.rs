//! Structural validation of problem instances.
//!
//! Checks the integrity of a [`Problem`] before any solver touches it:
//! - Dimensions actually provide schedulable cells
//! - Course ids in student enrollments stay in range
//! - Enrollment lists are ascending and duplicate-free
//! - Every course has a positive required lecture count
//! - The time grid can hold every required lecture
//!
//! Degenerate instances that only break the *diagnostics* (e.g. no enrolled
//! lectures at all) are additionally rejected at [`crate::Evaluator`]
//! construction.

use crate::models::Problem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A dimension (days, slots per day, classrooms) is zero.
    EmptyDimension,
    /// `lectures_per_course` does not have one entry per course.
    LectureTableMismatch,
    /// A course requires zero lectures.
    CourseWithoutLectures,
    /// A student enrollment references a course id outside 1..=course_count.
    CourseIdOutOfRange,
    /// A student enrollment lists the same course twice.
    DuplicateEnrollment,
    /// A student enrollment is not in ascending order.
    UnsortedEnrollment,
    /// The time grid cannot hold every required lecture.
    InsufficientCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &Problem) -> ValidationResult {
    let mut errors = Vec::new();

    if problem.day_count() == 0 || problem.timeslots_per_day() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDimension,
            "instance has no time slots",
        ));
    }
    if problem.classroom_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyDimension,
            "instance has no classrooms",
        ));
    }

    if problem.lectures_per_course().len() != problem.course_count() {
        errors.push(ValidationError::new(
            ValidationErrorKind::LectureTableMismatch,
            format!(
                "expected {} lecture counts, found {}",
                problem.course_count(),
                problem.lectures_per_course().len()
            ),
        ));
    }

    for (idx, &count) in problem.lectures_per_course().iter().enumerate() {
        if count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::CourseWithoutLectures,
                format!("course {} requires zero lectures", idx + 1),
            ));
        }
    }

    for (student, courses) in problem.students().iter().enumerate() {
        for &course in courses {
            if course == 0 || course > problem.course_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CourseIdOutOfRange,
                    format!("student {student} references unknown course {course}"),
                ));
            }
        }
        for pair in courses.windows(2) {
            if pair[0] == pair[1] {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateEnrollment,
                    format!("student {student} lists course {} twice", pair[0]),
                ));
            } else if pair[0] > pair[1] {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnsortedEnrollment,
                    format!("student {student} enrollment is not ascending"),
                ));
            }
        }
    }

    if !problem.is_valid() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InsufficientCapacity,
            format!(
                "{} cells cannot hold {} required lectures",
                problem.classroom_count() * problem.timeslots_count(),
                problem.total_lectures()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
