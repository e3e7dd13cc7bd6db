//! Metaheuristic timetable solvers.
//!
//! Three searches over the same objective model:
//!
//! - [`Annealing`]: single-trajectory simulated annealing with geometric
//!   cooling over the raw schedule matrix
//! - [`Hill`]: steepest-ascent-style hill climbing over random cell swaps
//! - [`Genetic`]: generational GA over a bit-encoded, self-repairing
//!   chromosome
//!
//! Every solver owns its working state for the duration of one `solve`
//! call; nothing is shared across runs or solver types. Randomness is
//! injected as a single `rand::Rng` per run so tests can pin a seed.
//!
//! # References
//!
//! - Kirkpatrick et al. (1983), "Optimization by Simulated Annealing"
//! - Russell & Norvig (2010), "Artificial Intelligence: A Modern Approach", Ch. 4

pub mod annealing;
pub mod genetic;
pub mod hill;

use std::fmt;

use rand::Rng;

use crate::evaluator::{Evaluator, EvaluatorError};
use crate::models::{Problem, Solution};

pub use annealing::Annealing;
pub use genetic::{Chromosome, Genetic};
pub use hill::Hill;

/// Attempts before feasible initialization gives up.
///
/// The random tiling below is rejection-sampled; instances whose lecture
/// distribution cannot produce a duplicate-free tiling would otherwise
/// loop forever.
const MAX_INIT_ATTEMPTS: usize = 1_000;

/// Errors shared by all solvers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A construction parameter is out of its documented range.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// The problem instance is degenerate (see [`EvaluatorError`]).
    DegenerateProblem(EvaluatorError),
    /// No feasible initial schedule was found within the retry budget.
    InfeasibleInitialization {
        /// Number of rejected random tilings.
        attempts: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, message } => {
                write!(f, "invalid parameter `{name}`: {message}")
            }
            Self::DegenerateProblem(e) => write!(f, "degenerate problem: {e}"),
            Self::InfeasibleInitialization { attempts } => write!(
                f,
                "unable to construct feasible initial schedule after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DegenerateProblem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EvaluatorError> for SolverError {
    fn from(e: EvaluatorError) -> Self {
        Self::DegenerateProblem(e)
    }
}

/// A timetable search procedure.
///
/// Implementations are constructed over one problem instance and may be
/// run repeatedly; each run draws from the generator passed in.
pub trait Solver {
    /// Runs the search and returns the best schedule it found.
    fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError>;
}

/// One random full tiling of the schedule.
///
/// Walks the cells in row-major order assigning a uniformly random course
/// that still has remaining required lectures, and mirrors the assignment
/// into the cell symmetric about the schedule's centre when that cell is
/// still empty and the course still has lectures left. Stops once every
/// course's remaining count reaches zero.
fn random_tiling<R: Rng>(problem: &Problem, rng: &mut R) -> Solution {
    let timeslots = problem.timeslots_count();
    let classrooms = problem.classroom_count();
    let mut schedule = Solution::new(timeslots, classrooms);
    let mut remaining: Vec<usize> = problem.lectures_per_course().to_vec();
    let mut open_courses = remaining.iter().filter(|&&n| n > 0).count();

    'cells: for t in 0..timeslots {
        for cl in 0..classrooms {
            if open_courses == 0 {
                break 'cells;
            }
            if schedule.get(t, cl) != 0 {
                continue;
            }
            let course = loop {
                let candidate = rng.random_range(1..=problem.course_count());
                if remaining[candidate - 1] > 0 {
                    break candidate;
                }
            };
            schedule.set(t, cl, course);
            remaining[course - 1] -= 1;
            if remaining[course - 1] == 0 {
                open_courses -= 1;
            }

            let mirror = (timeslots - 1 - t, classrooms - 1 - cl);
            if mirror != (t, cl) && schedule.get(mirror.0, mirror.1) == 0 && remaining[course - 1] > 0
            {
                schedule.set(mirror.0, mirror.1, course);
                remaining[course - 1] -= 1;
                if remaining[course - 1] == 0 {
                    open_courses -= 1;
                }
            }
        }
    }
    schedule
}

/// Rejection-samples random tilings until one is feasible and exact.
///
/// A tiling is accepted when no course repeats within a time slot and
/// every course is scheduled exactly as often as required. Fails with
/// [`SolverError::InfeasibleInitialization`] once the retry budget is
/// exhausted.
pub(crate) fn feasible_initial_schedule<R: Rng>(
    problem: &Problem,
    evaluator: &Evaluator<'_>,
    rng: &mut R,
) -> Result<Solution, SolverError> {
    for _ in 0..MAX_INIT_ATTEMPTS {
        let schedule = random_tiling(problem, rng);
        if evaluator.check_feasible_lectures(&schedule)
            && evaluator.check_number_of_lectures(&schedule)
        {
            return Ok(schedule);
        }
    }
    Err(SolverError::InfeasibleInitialization {
        attempts: MAX_INIT_ATTEMPTS,
    })
}
