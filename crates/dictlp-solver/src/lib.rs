mod dictionary;
mod problem;
mod simplex;
mod solution;

pub use dictionary::{Dictionary, InvariantViolation, Leaving, Pivot, ProblemError};
pub use problem::{Constraint, LpProblem};
pub use simplex::{Outcome, Solver};
pub use solution::{Analysis, ReducedCost, ShadowPrice, Solution, SolutionStatus};
