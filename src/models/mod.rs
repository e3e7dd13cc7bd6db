//! Timetabling domain models.
//!
//! Provides the two data types every other module operates on:
//!
//! | Type | Meaning |
//! |------|---------|
//! | `Problem` | Immutable instance: courses, students, rooms, time slots |
//! | `Solution` | A schedule: time slot × classroom matrix of course ids |
//!
//! Course ids run from 1 to `course_count`; 0 marks an empty cell.

mod problem;
mod solution;

pub use problem::Problem;
pub use solution::Solution;
