//! Schedule scoring and diagnostics.
//!
//! The evaluator is the shared objective model of all solvers: a set of
//! pure functions over `(Problem, Solution)`. Construction caches the two
//! problem-derived totals every diagnostic normalizes against; everything
//! else is recomputed from the solution passed in, using `O(course_count)`
//! scratch space, so solvers can query it millions of times per run.
//!
//! # Objective
//!
//! `evaluate = taken_lectures − infeasible_lectures − Σ_c |required_c − scheduled_c|`
//!
//! Higher is better. A student group contributes to `taken_lectures` at most
//! once per time slot: students attend at most one lecture at a time.

use std::fmt;

use crate::models::{Problem, Solution};

/// Degenerate problem instances rejected at evaluator construction.
///
/// Each variant would otherwise surface later as a division by zero in one
/// of the percentage diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// The instance declares no courses.
    NoCourses,
    /// No course requires any lecture (`Σ lectures_per_course == 0`).
    NoRequiredLectures,
    /// No student is enrolled in any lecture.
    NoEnrolledLectures,
}

impl fmt::Display for EvaluatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCourses => write!(f, "problem declares no courses"),
            Self::NoRequiredLectures => {
                write!(f, "no course requires any lecture")
            }
            Self::NoEnrolledLectures => {
                write!(f, "no student is enrolled in any lecture")
            }
        }
    }
}

impl std::error::Error for EvaluatorError {}

/// Scoring and diagnostic queries over one problem instance.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    problem: &'a Problem,
    total_lectures: usize,
    total_enrolled_lectures: usize,
}

impl<'a> Evaluator<'a> {
    /// Builds an evaluator, caching the instance totals.
    ///
    /// Fails on degenerate instances whose diagnostics would be undefined.
    pub fn new(problem: &'a Problem) -> Result<Self, EvaluatorError> {
        if problem.course_count() == 0 {
            return Err(EvaluatorError::NoCourses);
        }

        let total_lectures = problem.total_lectures();
        if total_lectures == 0 {
            return Err(EvaluatorError::NoRequiredLectures);
        }

        let total_enrolled_lectures = problem
            .student_groups()
            .iter()
            .map(|(courses, &count)| {
                let group_lectures: usize = courses
                    .iter()
                    .filter(|&&c| c >= 1 && c <= problem.course_count())
                    .map(|&c| problem.lectures_per_course()[c - 1])
                    .sum();
                count * group_lectures
            })
            .sum();
        if total_enrolled_lectures == 0 {
            return Err(EvaluatorError::NoEnrolledLectures);
        }

        Ok(Self {
            problem,
            total_lectures,
            total_enrolled_lectures,
        })
    }

    /// The problem this evaluator scores against.
    #[inline]
    pub fn problem(&self) -> &Problem {
        self.problem
    }

    /// Cached `Σ lectures_per_course`.
    #[inline]
    pub fn total_lectures(&self) -> usize {
        self.total_lectures
    }

    /// Cached `Σ_groups headcount × (required lectures of the group's courses)`.
    #[inline]
    pub fn total_enrolled_lectures(&self) -> usize {
        self.total_enrolled_lectures
    }

    /// The search objective: attendance minus duplication and count penalties.
    pub fn evaluate(&self, s: &Solution) -> i64 {
        let scheduled = self.lecture_counts(s);
        let count_deviation: i64 = self
            .problem
            .lectures_per_course()
            .iter()
            .zip(&scheduled)
            .map(|(&required, &actual)| (required as i64 - actual as i64).abs())
            .sum();

        self.taken_lectures(s) as i64 - self.infeasible_lectures(s) as i64 - count_deviation
    }

    /// Lecture-attendances the students can actually make.
    ///
    /// For each time slot and each student group, adds the group's headcount
    /// once if any of the group's courses is offered in that slot; the first
    /// intersecting course short-circuits the rest.
    pub fn taken_lectures(&self, s: &Solution) -> usize {
        let groups = self.problem.student_groups();
        let mut sum = 0;
        for slot in s.timeslots() {
            for (courses, &count) in groups {
                if courses.iter().any(|c| slot.contains(c)) {
                    sum += count;
                }
            }
        }
        sum
    }

    /// Lectures duplicating a course within a single time slot.
    ///
    /// Every occurrence of a course beyond its first in one slot counts as
    /// one infeasible lecture.
    pub fn infeasible_lectures(&self, s: &Solution) -> usize {
        let mut in_slot = vec![0usize; self.problem.course_count()];
        let mut sum = 0;
        for slot in s.timeslots() {
            in_slot.fill(0);
            for &course in slot {
                if course >= 1 && course <= self.problem.course_count() {
                    in_slot[course - 1] += 1;
                    if in_slot[course - 1] > 1 {
                        sum += 1;
                    }
                }
            }
        }
        sum
    }

    /// Cells of the whole schedule holding the given course id.
    pub fn scheduled_lectures(&self, course: usize, s: &Solution) -> usize {
        s.timeslots()
            .map(|slot| slot.iter().filter(|&&c| c == course).count())
            .sum()
    }

    /// True iff no course repeats within any single time slot.
    pub fn check_feasible_lectures(&self, s: &Solution) -> bool {
        self.infeasible_lectures(s) == 0
    }

    /// True iff every course is scheduled exactly as often as required.
    pub fn check_number_of_lectures(&self, s: &Solution) -> bool {
        let scheduled = self.lecture_counts(s);
        self.problem
            .lectures_per_course()
            .iter()
            .zip(&scheduled)
            .all(|(&required, &actual)| required == actual)
    }

    /// Share of lectures duplicating a course in a slot, against all
    /// required lectures (0.0..=100.0 for repaired schedules).
    pub fn percentage_infeasible_lectures(&self, s: &Solution) -> f64 {
        100.0 * self.infeasible_lectures(s) as f64 / self.total_lectures as f64
    }

    /// Share of required lectures actually present in the schedule.
    ///
    /// Over-provisioned courses count at most their required number, so a
    /// schedule only reaches 100.0 by meeting every requirement.
    pub fn percentage_scheduled_lectures(&self, s: &Solution) -> f64 {
        let scheduled = self.lecture_counts(s);
        let satisfied: usize = self
            .problem
            .lectures_per_course()
            .iter()
            .zip(&scheduled)
            .map(|(&required, &actual)| required.min(actual))
            .sum();
        100.0 * satisfied as f64 / self.total_lectures as f64
    }

    /// Share of enrolled lecture-attendances the students cannot make.
    ///
    /// The shortfall `total_enrolled_lectures − taken_lectures` normalized
    /// against all enrollments; clamped at zero when over-provisioning lets
    /// attendance exceed enrollment.
    pub fn percentage_overlaps(&self, s: &Solution) -> f64 {
        let missed = self
            .total_enrolled_lectures
            .saturating_sub(self.taken_lectures(s));
        100.0 * missed as f64 / self.total_enrolled_lectures as f64
    }

    /// Share of courses scheduled exactly as often as required.
    pub fn percentage_courses_with_right_number_of_lectures(&self, s: &Solution) -> f64 {
        let scheduled = self.lecture_counts(s);
        let exact = self
            .problem
            .lectures_per_course()
            .iter()
            .zip(&scheduled)
            .filter(|(required, actual)| required == actual)
            .count();
        100.0 * exact as f64 / self.problem.course_count() as f64
    }

    /// Per-course cell counts; ids outside 1..=course_count are ignored.
    pub(crate) fn lecture_counts(&self, s: &Solution) -> Vec<usize> {
        let mut counts = vec![0usize; self.problem.course_count()];
        for slot in s.timeslots() {
            for &course in slot {
                if course >= 1 && course <= self.problem.course_count() {
                    counts[course - 1] += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two courses of one lecture each, one room, two slots, one student
    /// taking both courses.
    fn tiny_problem() -> Problem {
        Problem::new(2, 1, 2, 1, vec![vec![1, 2]], vec![1, 1])
    }

    fn wide_problem() -> Problem {
        // 3 courses, 2 slots, 2 rooms; two student groups.
        Problem::new(
            3,
            1,
            2,
            2,
            vec![vec![1, 2], vec![1, 2], vec![3]],
            vec![1, 2, 1],
        )
    }

    #[test]
    fn test_rejects_degenerate_problems() {
        let no_courses = Problem::new(0, 1, 2, 1, vec![], vec![]);
        assert_eq!(
            Evaluator::new(&no_courses).unwrap_err(),
            EvaluatorError::NoCourses
        );

        let no_lectures = Problem::new(2, 1, 2, 1, vec![vec![1]], vec![0, 0]);
        assert_eq!(
            Evaluator::new(&no_lectures).unwrap_err(),
            EvaluatorError::NoRequiredLectures
        );

        let no_students = Problem::new(2, 1, 2, 1, vec![], vec![1, 1]);
        assert_eq!(
            Evaluator::new(&no_students).unwrap_err(),
            EvaluatorError::NoEnrolledLectures
        );
    }

    #[test]
    fn test_cached_totals() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        assert_eq!(e.total_lectures(), 4);
        // group {1,2} x2 students: 2*(1+2)=6; group {3} x1: 1
        assert_eq!(e.total_enrolled_lectures(), 7);
    }

    #[test]
    fn test_taken_lectures_counts_group_once_per_slot() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        // Slot 0 offers courses 1 and 2: the {1,2} group attends once, not twice.
        let s = Solution::from_matrix(vec![vec![1, 2], vec![3, 2]]);
        // slot 0: {1,2} group (2 students) -> 2; slot 1: {1,2} via course 2 -> 2, {3} -> 1
        assert_eq!(e.taken_lectures(&s), 5);
    }

    #[test]
    fn test_evaluate_matches_manual_computation() {
        let p = tiny_problem();
        let e = Evaluator::new(&p).unwrap();
        // Any feasible schedule places the two courses in different slots.
        let s = Solution::from_matrix(vec![vec![1], vec![2]]);
        assert_eq!(e.taken_lectures(&s), 2);
        assert_eq!(e.infeasible_lectures(&s), 0);
        assert!(e.check_number_of_lectures(&s));
        assert_eq!(e.evaluate(&s), 2);
    }

    #[test]
    fn test_evaluate_penalizes_count_deviation() {
        let p = tiny_problem();
        let e = Evaluator::new(&p).unwrap();
        // Course 1 twice, course 2 never: deviation |1-2| + |1-0| = 2.
        let s = Solution::from_matrix(vec![vec![1], vec![1]]);
        assert_eq!(e.taken_lectures(&s), 2);
        assert_eq!(e.evaluate(&s), 0);
    }

    #[test]
    fn test_duplicate_course_in_slot_is_infeasible() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        let s = Solution::from_matrix(vec![vec![2, 2], vec![1, 3]]);
        assert_eq!(e.infeasible_lectures(&s), 1);
        assert!(!e.check_feasible_lectures(&s));
    }

    #[test]
    fn test_feasibility_check_agrees_with_infeasible_count() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        for matrix in [
            vec![vec![1, 2], vec![2, 3]],
            vec![vec![3, 3], vec![1, 1]],
            vec![vec![0, 0], vec![0, 0]],
        ] {
            let s = Solution::from_matrix(matrix);
            assert_eq!(
                e.check_feasible_lectures(&s),
                e.infeasible_lectures(&s) == 0
            );
        }
    }

    #[test]
    fn test_scheduled_lectures_counts_whole_matrix() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        let s = Solution::from_matrix(vec![vec![2, 1], vec![2, 0]]);
        assert_eq!(e.scheduled_lectures(1, &s), 1);
        assert_eq!(e.scheduled_lectures(2, &s), 2);
        assert_eq!(e.scheduled_lectures(3, &s), 0);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        let s = Solution::from_matrix(vec![vec![1, 2], vec![2, 3]]);
        let first = e.evaluate(&s);
        for _ in 0..10 {
            assert_eq!(e.evaluate(&s), first);
        }
    }

    #[test]
    fn test_percentages_on_exact_schedule() {
        let p = wide_problem();
        let e = Evaluator::new(&p).unwrap();
        // Courses 1,2,3 scheduled exactly 1,2,1 times, no slot duplicates.
        let s = Solution::from_matrix(vec![vec![1, 2], vec![2, 3]]);
        assert_eq!(e.percentage_courses_with_right_number_of_lectures(&s), 100.0);
        assert_eq!(e.percentage_scheduled_lectures(&s), 100.0);
        assert_eq!(e.percentage_infeasible_lectures(&s), 0.0);
    }

    #[test]
    fn test_percentage_overlaps_is_the_attendance_shortfall() {
        let p = tiny_problem();
        let e = Evaluator::new(&p).unwrap();
        // Spread out, the student makes both enrolled lectures.
        let s = Solution::from_matrix(vec![vec![1], vec![2]]);
        assert_eq!(e.percentage_overlaps(&s), 0.0);

        // Course 2 never offered: one of two enrollments is missed.
        let partial = Solution::from_matrix(vec![vec![1], vec![0]]);
        assert_eq!(e.percentage_overlaps(&partial), 50.0);
    }

    #[test]
    fn test_percentage_scheduled_caps_over_provisioning() {
        let p = tiny_problem();
        let e = Evaluator::new(&p).unwrap();
        // Course 1 over-provisioned, course 2 missing: 1 of 2 requirements met.
        let s = Solution::from_matrix(vec![vec![1], vec![1]]);
        assert_eq!(e.percentage_scheduled_lectures(&s), 50.0);
    }

    #[test]
    fn test_out_of_range_ids_are_ignored_in_counts() {
        let p = tiny_problem();
        let e = Evaluator::new(&p).unwrap();
        let s = Solution::from_matrix(vec![vec![9], vec![9]]);
        assert_eq!(e.infeasible_lectures(&s), 0);
        assert_eq!(e.scheduled_lectures(9, &s), 2);
        assert!(!e.check_number_of_lectures(&s));
    }
}
