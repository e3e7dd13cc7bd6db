//! Schedule (solution) model.
//!
//! A schedule is a `timeslots_count × classroom_count` matrix of course
//! ids. Placing one course per cell makes "two lectures in the same room
//! at the same time" structurally impossible; every other constraint is a
//! property the solvers establish or the evaluator penalizes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A schedule matrix: rows are time slots, columns are classrooms.
///
/// Cell values are course ids; 0 means the cell holds no lecture. The type
/// enforces no feasibility invariant of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    schedule: Vec<Vec<usize>>,
}

impl Solution {
    /// Creates an empty schedule of the given dimensions.
    pub fn new(timeslots_count: usize, classroom_count: usize) -> Self {
        Self {
            schedule: vec![vec![0; classroom_count]; timeslots_count],
        }
    }

    /// Wraps an existing matrix.
    pub fn from_matrix(schedule: Vec<Vec<usize>>) -> Self {
        Self { schedule }
    }

    /// Number of time slots (rows).
    #[inline]
    pub fn timeslots_count(&self) -> usize {
        self.schedule.len()
    }

    /// Number of classrooms (columns).
    #[inline]
    pub fn classroom_count(&self) -> usize {
        self.schedule.first().map_or(0, Vec::len)
    }

    /// Course id at (time slot, classroom).
    #[inline]
    pub fn get(&self, timeslot: usize, classroom: usize) -> usize {
        self.schedule[timeslot][classroom]
    }

    /// Sets the course id at (time slot, classroom).
    #[inline]
    pub fn set(&mut self, timeslot: usize, classroom: usize, course: usize) {
        self.schedule[timeslot][classroom] = course;
    }

    /// Exchanges the contents of two cells.
    pub fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        let tmp = self.schedule[a.0][a.1];
        self.schedule[a.0][a.1] = self.schedule[b.0][b.1];
        self.schedule[b.0][b.1] = tmp;
    }

    /// The cells of one time slot.
    #[inline]
    pub fn timeslot(&self, timeslot: usize) -> &[usize] {
        &self.schedule[timeslot]
    }

    /// Iterates over time slot rows.
    pub fn timeslots(&self) -> impl Iterator<Item = &[usize]> {
        self.schedule.iter().map(Vec::as_slice)
    }

    /// The underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &[Vec<usize>] {
        &self.schedule
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.schedule {
            for cell in row {
                write!(f, "{cell}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let s = Solution::new(3, 2);
        assert_eq!(s.timeslots_count(), 3);
        assert_eq!(s.classroom_count(), 2);
        assert!(s.timeslots().all(|row| row.iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_get_set() {
        let mut s = Solution::new(2, 2);
        s.set(1, 0, 7);
        assert_eq!(s.get(1, 0), 7);
        assert_eq!(s.get(0, 0), 0);
    }

    #[test]
    fn test_swap_cells() {
        let mut s = Solution::from_matrix(vec![vec![1, 2], vec![3, 4]]);
        s.swap_cells((0, 0), (1, 1));
        assert_eq!(s.get(0, 0), 4);
        assert_eq!(s.get(1, 1), 1);
        s.swap_cells((0, 1), (0, 1));
        assert_eq!(s.get(0, 1), 2);
    }

    #[test]
    fn test_display_tab_separated() {
        let s = Solution::from_matrix(vec![vec![1, 0], vec![2, 3]]);
        assert_eq!(s.to_string(), "1\t0\t\n2\t3\t\n");
    }

    #[test]
    fn test_serde_round_trip() {
        let s = Solution::from_matrix(vec![vec![1, 2], vec![0, 3]]);
        let json = serde_json::to_string(&s).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
