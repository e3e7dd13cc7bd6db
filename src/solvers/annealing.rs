//! Simulated annealing over the raw schedule matrix.
//!
//! The search starts from a feasible, exact-count schedule, then perturbs
//! it one random cell swap at a time. Swaps preserve the multiset of
//! scheduled lectures, so the lecture-count invariant survives the whole
//! run; per-slot duplicates introduced by a swap are not repaired but
//! priced in by the evaluator, which steers the acceptance criterion away
//! from them. Temperature decays geometrically; the best schedule seen is
//! tracked in its own deep copy and returned at the end.
//!
//! # Reference
//! Kirkpatrick et al. (1983), "Optimization by Simulated Annealing"

use log::{debug, trace};
use rand::Rng;

use super::{feasible_initial_schedule, Solver, SolverError};
use crate::evaluator::Evaluator;
use crate::models::{Problem, Solution};

/// Simulated annealing solver.
pub struct Annealing<'a> {
    problem: &'a Problem,
    evaluator: Evaluator<'a>,
    initial_temperature: f64,
    cooling_rate: f64,
}

impl<'a> Annealing<'a> {
    /// Creates a solver.
    ///
    /// `initial_temperature` must be positive and finite; `cooling_rate`
    /// must lie strictly between 0 and 1. The search loop runs while the
    /// temperature exceeds 1, so an initial temperature at or below 1
    /// returns the initial schedule unperturbed.
    pub fn new(
        initial_temperature: f64,
        cooling_rate: f64,
        problem: &'a Problem,
    ) -> Result<Self, SolverError> {
        if !initial_temperature.is_finite() || initial_temperature <= 0.0 {
            return Err(SolverError::InvalidParameter {
                name: "initial_temperature",
                message: format!("must be positive and finite, got {initial_temperature}"),
            });
        }
        if !cooling_rate.is_finite() || cooling_rate <= 0.0 || cooling_rate >= 1.0 {
            return Err(SolverError::InvalidParameter {
                name: "cooling_rate",
                message: format!("must lie in (0, 1), got {cooling_rate}"),
            });
        }
        let evaluator = Evaluator::new(problem)?;
        Ok(Self {
            problem,
            evaluator,
            initial_temperature,
            cooling_rate,
        })
    }

    /// Runs the annealing schedule and returns the best schedule observed.
    pub fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        let timeslots = self.problem.timeslots_count();
        let classrooms = self.problem.classroom_count();

        let mut current = feasible_initial_schedule(self.problem, &self.evaluator, rng)?;
        let mut best = current.clone();
        let mut best_cost = self.evaluator.evaluate(&best);
        let mut temperature = self.initial_temperature;

        while temperature > 1.0 {
            let mut neighbor = current.clone();
            let a = (rng.random_range(0..timeslots), rng.random_range(0..classrooms));
            let b = (rng.random_range(0..timeslots), rng.random_range(0..classrooms));
            neighbor.swap_cells(a, b);

            let cost = self.evaluator.evaluate(&current);
            let new_cost = self.evaluator.evaluate(&neighbor);

            if new_cost > cost {
                current = neighbor;
                if new_cost > best_cost {
                    best = current.clone();
                    best_cost = new_cost;
                    trace!("new best score {best_cost} at temperature {temperature:.3}");
                }
            } else {
                let keep = (((cost - new_cost) as f64) / temperature).exp();
                if keep > rng.random::<f64>() {
                    current = neighbor;
                }
            }
            temperature *= 1.0 - self.cooling_rate;
        }

        debug!("annealing finished with best score {best_cost}");
        Ok(best)
    }
}

impl Solver for Annealing<'_> {
    fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        Annealing::solve(self, rng)
    }
}
