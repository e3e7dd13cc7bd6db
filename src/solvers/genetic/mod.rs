//! Generational genetic algorithm.
//!
//! Follows the plain generational scheme of Russell & Norvig, Ch. 4:
//! fitness-proportionate (roulette-wheel) selection, single-point
//! crossover aligned to time-slot boundaries, optional one-bit mutation,
//! and repair after every operator. Each generation fully replaces the
//! previous one — there is no elitism, so the run's answer is the best
//! chromosome of the *final* generation, which can regress below an
//! earlier generation's best. That behavior is preserved deliberately;
//! see the crate's DESIGN notes.
//!
//! Termination is checked once per generation: wall-clock budget reached
//! or a chromosome has hit `enough_fitness`. Cancellation granularity is
//! therefore one full generation.

mod chromosome;

use std::time::{Duration, Instant};

use log::debug;
use rand::Rng;

use super::{Solver, SolverError};
use crate::evaluator::Evaluator;
use crate::models::{Problem, Solution};

pub use chromosome::{
    decode, encode, fitness, genes_per_course, genes_per_timeslot, repair, Chromosome,
};

/// Generational genetic solver.
pub struct Genetic<'a> {
    evaluator: Evaluator<'a>,
    population_size: usize,
    mutation_probability: f64,
    enough_fitness: i64,
    max_time: Duration,
}

impl<'a> Genetic<'a> {
    /// Creates a solver.
    ///
    /// `population_size` must be at least 1, `mutation_probability` must
    /// lie in `[0, 1]`, and `max_time` must be positive. `enough_fitness`
    /// is the early-exit threshold on the per-generation best fitness.
    pub fn new(
        problem: &'a Problem,
        population_size: usize,
        mutation_probability: f64,
        enough_fitness: i64,
        max_time: Duration,
    ) -> Result<Self, SolverError> {
        if population_size == 0 {
            return Err(SolverError::InvalidParameter {
                name: "population_size",
                message: "must be at least 1".into(),
            });
        }
        if !mutation_probability.is_finite()
            || !(0.0..=1.0).contains(&mutation_probability)
        {
            return Err(SolverError::InvalidParameter {
                name: "mutation_probability",
                message: format!("must lie in [0, 1], got {mutation_probability}"),
            });
        }
        if max_time.is_zero() {
            return Err(SolverError::InvalidParameter {
                name: "max_time",
                message: "must be positive".into(),
            });
        }
        let evaluator = Evaluator::new(problem)?;
        Ok(Self {
            evaluator,
            population_size,
            mutation_probability,
            enough_fitness,
            max_time,
        })
    }

    /// Evolves the population and returns the final generation's best
    /// chromosome as a schedule.
    pub fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        let start = Instant::now();

        let mut population: Vec<Chromosome> = (0..self.population_size)
            .map(|_| Chromosome::random(&self.evaluator, rng))
            .collect();

        let mut generation = 0usize;
        loop {
            generation += 1;

            let mut next = Vec::with_capacity(self.population_size);
            for _ in 0..self.population_size {
                let x = select(&population, rng);
                let y = select(&population, rng);
                let mut child = Chromosome::offspring(x, y, &self.evaluator, rng);
                if rng.random::<f64>() <= self.mutation_probability {
                    child.mutate(&self.evaluator, rng);
                }
                next.push(child);
            }
            population = next;

            // First chromosome with the maximum fitness of this generation.
            let mut best = &population[0];
            for candidate in &population[1..] {
                if candidate.fitness() > best.fitness() {
                    best = candidate;
                }
            }
            debug!("generation {generation}: best fitness {}", best.fitness());

            if start.elapsed() >= self.max_time || best.fitness() >= self.enough_fitness {
                debug!(
                    "genetic search stopped after {generation} generations with fitness {}",
                    best.fitness()
                );
                return Ok(best.clone().into_solution());
            }
        }
    }
}

impl Solver for Genetic<'_> {
    fn solve<R: Rng>(&self, rng: &mut R) -> Result<Solution, SolverError> {
        Genetic::solve(self, rng)
    }
}

/// Roulette-wheel selection over the population, with replacement.
fn select<'p, R: Rng>(population: &'p [Chromosome], rng: &mut R) -> &'p Chromosome {
    let weights: Vec<i64> = population.iter().map(Chromosome::fitness).collect();
    &population[roulette_index(&weights, rng)]
}

/// Draws an index with probability proportional to its weight.
///
/// Weights must be non-negative. When every weight is zero the wheel is
/// undefined, so the draw falls back to a uniform choice.
fn roulette_index<R: Rng>(weights: &[i64], rng: &mut R) -> usize {
    let total: i64 = weights.iter().sum();
    if total == 0 {
        return rng.random_range(0..weights.len());
    }
    let draw = rng.random_range(0..total);
    let mut acc = 0i64;
    for (idx, &w) in weights.iter().enumerate() {
        acc += w;
        if acc > draw {
            return idx;
        }
    }
    weights.len() - 1
}
