use tracing::{debug, trace, warn};

use crate::dictionary::{Dictionary, Pivot, ProblemError};
use crate::problem::LpProblem;
use crate::solution::Solution;

/// Simplex solver for problems with a feasible all-slack start
#[derive(Debug, Clone)]
pub struct Solver {
    /// Maximum pivots before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
        }
    }
}

/// How a run of the pivoting loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No tight variable can improve the objective
    Optimal { iterations: usize },
    /// `entering` improves the objective but no constraint limits it
    Unbounded { entering: usize, iterations: usize },
    /// The pivot cap was hit
    IterationLimit { iterations: usize },
}

impl Outcome {
    pub fn iterations(&self) -> usize {
        match *self {
            Outcome::Optimal { iterations }
            | Outcome::Unbounded { iterations, .. }
            | Outcome::IterationLimit { iterations } => iterations,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, Outcome::Optimal { .. })
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Negative or NaN tolerances are treated as zero.
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol.max(0.0);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the LP problem starting from the all-slack basis
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, ProblemError> {
        let mut dictionary = Dictionary::from_problem(problem)?;
        let outcome = self.run(&mut dictionary);
        Ok(Solution::extract(&dictionary, problem, outcome, self.tolerance))
    }

    /// Pivot `dictionary` until it is optimal, unbounded, or the cap is hit.
    pub fn run(&self, dictionary: &mut Dictionary) -> Outcome {
        self.run_observed(dictionary, |_, _| {})
    }

    /// Like [`Solver::run`], calling `observer` after every pivot.
    pub fn run_observed<F>(&self, dictionary: &mut Dictionary, mut observer: F) -> Outcome
    where
        F: FnMut(&Pivot, &Dictionary),
    {
        trace!("initial dictionary\n{dictionary}");

        let mut iteration = 0;
        loop {
            let Some(entering) = dictionary.entering_variable(self.tolerance) else {
                debug!(iterations = iteration, objective = dictionary.objective(), "optimal");
                return Outcome::Optimal { iterations: iteration };
            };
            let Some(leaving) = dictionary.leaving_row(entering, self.tolerance) else {
                warn!(entering, iterations = iteration, "objective is unbounded");
                return Outcome::Unbounded {
                    entering,
                    iterations: iteration,
                };
            };
            if iteration == self.max_iterations {
                warn!(
                    max_iterations = self.max_iterations,
                    objective = dictionary.objective(),
                    "iteration limit reached"
                );
                return Outcome::IterationLimit { iterations: iteration };
            }

            // The ratio test only returns rows with a nonzero coefficient
            let Some(pivot) = dictionary.pivot(entering, leaving.row) else {
                unreachable!("ratio test selected row {} for variable {entering}", leaving.row);
            };
            iteration += 1;
            debug!(
                iteration,
                entering = pivot.entering,
                leaving = pivot.leaving,
                row = pivot.row,
                objective = pivot.objective,
                "pivot"
            );
            trace!("dictionary after pivot\n{dictionary}");
            observer(&pivot, &*dictionary);
        }
    }
}
