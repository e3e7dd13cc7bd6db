//! University course timetabling.
//!
//! Assigns course lectures to (time slot, classroom) cells so that as many
//! enrolled students as possible can attend a lecture in every time slot,
//! while penalizing duplicate lectures of one course within a time slot and
//! deviations from each course's required lecture count.
//!
//! # Modules
//!
//! - **`models`**: Problem instance and schedule matrix — `Problem`, `Solution`
//! - **`evaluator`**: Shared objective and diagnostics over (Problem, Solution)
//! - **`solvers`**: Metaheuristic searches — `Annealing`, `Hill`, `Genetic`
//! - **`validation`**: Structural integrity checks on problem inputs
//!
//! # Architecture
//!
//! The crate is the optimization core only. Instance generation, exact (ILP)
//! formulations, on-disk serialization, and benchmark drivers are collaborator
//! concerns that construct a `Problem` and consume a `Solution`.
//!
//! # References
//!
//! - Russell & Norvig (2010), "Artificial Intelligence: A Modern Approach", Ch. 4
//! - Kirkpatrick et al. (1983), "Optimization by Simulated Annealing"
//! - Schaerf (1999), "A Survey of Automated Timetabling"

pub mod evaluator;
pub mod models;
pub mod solvers;
pub mod validation;

pub use evaluator::{Evaluator, EvaluatorError};
pub use models::{Problem, Solution};
pub use solvers::{Annealing, Genetic, Hill, Solver, SolverError};
