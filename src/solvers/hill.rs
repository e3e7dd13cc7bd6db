//! Hill climbing over random cell swaps.
//!
//! A simpler sibling of [`super::Annealing`]: the same feasible
//! initialization and swap neighborhood, but only strictly improving
//! moves are ever accepted. Each round samples `neighbor_count` random
//! swaps; the search stops after the first round in which none of them
//! improves the current schedule.

use log::debug;
use rand::Rng;

use super::{feasible_initial_schedule, Solver, SolverError};
use crate::evaluator::Evaluator;
use crate::models::{Problem, Solution};

/// Random-restart-free hill climbing solver.
pub struct Hill<'a> {
    problem: &'a Problem,
    evaluator: Evaluator<'a>,
    neighbor_count: usize,
}

impl<'a> Hill<'a> {
    /// Creates a solver sampling `neighbor_count` swaps per round.
    pub fn new(neighbor_count: usize, problem: &'a Problem) -> Result<Self, SolverError> {
        if neighbor_count == 0 {
            return Err(SolverError::InvalidParameter {
                name: "neighbor_count",
                message: "must be at least 1".into(),
            });
        }
        let evaluator = Evaluator::new(problem)?;
        Ok(Self {
            problem,
            evaluator,
            neighbor_count,
        })
    }

    /// Climbs until a whole round yields no improvement.
    pub fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        let timeslots = self.problem.timeslots_count();
        let classrooms = self.problem.classroom_count();

        let mut current = feasible_initial_schedule(self.problem, &self.evaluator, rng)?;
        let mut cost = self.evaluator.evaluate(&current);
        let mut best = current.clone();
        let mut best_cost = cost;

        let mut improved = true;
        while improved {
            improved = false;
            for _ in 0..self.neighbor_count {
                let mut neighbor = current.clone();
                let a = (rng.random_range(0..timeslots), rng.random_range(0..classrooms));
                let b = (rng.random_range(0..timeslots), rng.random_range(0..classrooms));
                neighbor.swap_cells(a, b);

                let new_cost = self.evaluator.evaluate(&neighbor);
                if new_cost > cost {
                    current = neighbor;
                    cost = new_cost;
                    if new_cost > best_cost {
                        best = current.clone();
                        best_cost = new_cost;
                    }
                    improved = true;
                }
            }
        }

        debug!("hill climbing finished with best score {best_cost}");
        Ok(best)
    }
}

impl Solver for Hill<'_> {
    fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        Hill::solve(self, rng)
    }
}
