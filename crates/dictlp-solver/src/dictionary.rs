use std::fmt;

use thiserror::Error;

use crate::problem::LpProblem;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("Constraint #{row} has negative right-hand side {value}; the origin is not feasible")]
    NegativeRhs { row: usize, value: f64 },
    #[error("Non-finite value in {0}")]
    NonFinite(String),
}

/// A broken tableau invariant, reported by [`Dictionary::check_invariants`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Variable {0} is out of range")]
    OutOfRange(usize),
    #[error("Variable {0} appears more than once in the tight and loose sets")]
    Duplicate(usize),
    #[error("Variable {0} is neither tight nor loose")]
    Missing(usize),
    #[error("Expected {expected} tight variables, found {found}")]
    TightCount { expected: usize, found: usize },
    #[error("Row {row} references its own basic variable {variable}")]
    SelfReference { row: usize, variable: usize },
}

/// The row chosen by the ratio test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaving {
    /// Tableau row whose basic variable leaves
    pub row: usize,
    /// The basic variable of that row
    pub variable: usize,
    /// `constant / coefficient` for the row, always `<= 0`
    pub ratio: f64,
}

/// Record of a single pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub entering: usize,
    pub leaving: usize,
    pub row: usize,
    pub ratio: f64,
    /// Objective value after the pivot
    pub objective: f64,
}

/// Simplex tableau in dictionary form.
///
/// Variables `0..n` are the decision variables and `n..n + m` the slacks.
/// Row `i` defines basic variable `loose[i]` as
/// `rows[i][n + m] + sum(rows[i][j] * x_j)` over the tight variables `j`.
/// The objective row has the same layout, its last slot holding the current
/// objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    n: usize,
    m: usize,
    objective: Vec<f64>,
    rows: Vec<Vec<f64>>,
    tight: Vec<usize>,
    loose: Vec<usize>,
}

impl Dictionary {
    /// Build the all-slack starting dictionary for
    /// `maximize c·x subject to Ax <= b, x >= 0`.
    ///
    /// Every `b[i]` must be non-negative so that the start is feasible.
    pub fn new<R: AsRef<[f64]>>(c: &[f64], a: &[R], b: &[f64]) -> Result<Self, ProblemError> {
        let n = c.len();
        let m = a.len();
        let width = n + m + 1;

        if b.len() != m {
            return Err(ProblemError::DimensionMismatch {
                what: "right-hand side".to_string(),
                expected: m,
                found: b.len(),
            });
        }
        if c.iter().any(|x| !x.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }

        let mut rows = Vec::with_capacity(m);
        for (i, (coefficients, &rhs)) in a.iter().zip(b).enumerate() {
            let coefficients: &[f64] = coefficients.as_ref();
            if coefficients.len() != n {
                return Err(ProblemError::DimensionMismatch {
                    what: format!("constraint #{i}"),
                    expected: n,
                    found: coefficients.len(),
                });
            }
            if !rhs.is_finite() || coefficients.iter().any(|x| !x.is_finite()) {
                return Err(ProblemError::NonFinite(format!("constraint #{i}")));
            }
            if rhs < 0.0 {
                return Err(ProblemError::NegativeRhs { row: i, value: rhs });
            }

            let mut row = vec![0.0; width];
            for (slot, &coef) in row.iter_mut().zip(coefficients) {
                *slot = -coef;
            }
            row[width - 1] = rhs;
            rows.push(row);
        }

        let mut objective = vec![0.0; width];
        objective[..n].copy_from_slice(c);

        Ok(Self {
            n,
            m,
            objective,
            rows,
            tight: (0..n).collect(),
            loose: (n..n + m).collect(),
        })
    }

    pub fn from_problem(problem: &LpProblem) -> Result<Self, ProblemError> {
        if problem.objective.len() != problem.num_variables() {
            return Err(ProblemError::DimensionMismatch {
                what: "objective".to_string(),
                expected: problem.num_variables(),
                found: problem.objective.len(),
            });
        }
        let matrix: Vec<&[f64]> = problem
            .constraints
            .iter()
            .map(|c| c.coefficients.as_slice())
            .collect();
        let rhs: Vec<f64> = problem.constraints.iter().map(|c| c.rhs).collect();
        Self::new(&problem.objective, &matrix, &rhs)
    }

    pub fn num_variables(&self) -> usize {
        self.n
    }

    pub fn num_constraints(&self) -> usize {
        self.m
    }

    /// Current objective value: the constant of the objective row.
    pub fn objective(&self) -> f64 {
        self.objective[self.n + self.m]
    }

    pub fn objective_row(&self) -> &[f64] {
        &self.objective
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn tight(&self) -> &[usize] {
        &self.tight
    }

    pub fn loose(&self) -> &[usize] {
        &self.loose
    }

    pub fn is_tight(&self, variable: usize) -> bool {
        self.tight.contains(&variable)
    }

    /// Value of `variable` in the current basic solution, `None` if out of range.
    pub fn value(&self, variable: usize) -> Option<f64> {
        if variable >= self.n + self.m {
            return None;
        }
        let rhs = self.rhs_col();
        Some(
            self.loose
                .iter()
                .position(|&v| v == variable)
                .map_or(0.0, |row| self.rows[row][rhs]),
        )
    }

    /// Values of all `n + m` variables, decision variables first.
    pub fn values(&self) -> Vec<f64> {
        let rhs = self.rhs_col();
        let mut values = vec![0.0; self.n + self.m];
        for (row, &var) in self.rows.iter().zip(&self.loose) {
            values[var] = row[rhs];
        }
        values
    }

    /// Dantzig's rule: the tight variable with the largest objective
    /// coefficient, or `None` if no coefficient exceeds `tolerance`.
    /// Ties go to the first variable in tight order.
    pub fn entering_variable(&self, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &var in &self.tight {
            let coeff = self.objective[var];
            if best.is_none_or(|(_, highest)| coeff > highest) {
                best = Some((var, coeff));
            }
        }
        best.filter(|&(_, coeff)| coeff > tolerance).map(|(var, _)| var)
    }

    /// Ratio test for `entering`.
    ///
    /// Rows whose coefficient for `entering` is within `tolerance` of zero are
    /// skipped. Of the remaining rows, those with `constant / coefficient <= 0`
    /// are eligible and the largest ratio wins, first row on ties. `None`
    /// means the objective is unbounded along `entering`, or that `entering`
    /// is not a tight variable.
    pub fn leaving_row(&self, entering: usize, tolerance: f64) -> Option<Leaving> {
        if !self.is_tight(entering) {
            return None;
        }
        let rhs = self.rhs_col();
        let mut best: Option<Leaving> = None;
        for (i, row) in self.rows.iter().enumerate() {
            let coeff = row[entering];
            if coeff.abs() <= tolerance {
                continue;
            }
            let ratio = row[rhs] / coeff;
            if ratio <= 0.0 && best.is_none_or(|b| ratio > b.ratio) {
                best = Some(Leaving {
                    row: i,
                    variable: self.loose[i],
                    ratio,
                });
            }
        }
        best
    }

    /// Swap `entering` into the basis in place of the basic variable of `row`.
    ///
    /// Returns `None`, leaving the dictionary untouched, if `entering` is not
    /// tight, `row` is out of range, or the coefficient of `entering` in `row`
    /// is zero.
    pub fn pivot(&mut self, entering: usize, row: usize) -> Option<Pivot> {
        let slot = self.tight.iter().position(|&v| v == entering)?;
        let coeff = *self.rows.get(row)?.get(entering)?;
        if coeff == 0.0 {
            return None;
        }
        Some(self.apply_pivot(slot, entering, row, coeff))
    }

    fn apply_pivot(&mut self, slot: usize, entering: usize, row: usize, coeff: f64) -> Pivot {
        let rhs = self.rhs_col();
        let leaving = self.loose[row];
        let ratio = self.rows[row][rhs] / coeff;

        // Solve the row for `entering`
        self.loose[row] = entering;
        let mut pivot_row = std::mem::take(&mut self.rows[row]);
        pivot_row[entering] = 0.0;
        pivot_row[leaving] = -1.0;
        for x in pivot_row.iter_mut() {
            *x /= -coeff;
        }

        // Substitute it everywhere else
        for (i, other) in self.rows.iter_mut().enumerate() {
            if i != row {
                eliminate(other, &pivot_row, entering);
            }
        }
        eliminate(&mut self.objective, &pivot_row, entering);

        self.rows[row] = pivot_row;
        self.tight[slot] = leaving;

        Pivot {
            entering,
            leaving,
            row,
            ratio,
            objective: self.objective(),
        }
    }

    /// Verify that tight and loose partition the variables and that no row
    /// references its own basic variable.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let total = self.n + self.m;
        if self.tight.len() != self.n {
            return Err(InvariantViolation::TightCount {
                expected: self.n,
                found: self.tight.len(),
            });
        }

        let mut seen = vec![false; total];
        for &var in self.tight.iter().chain(&self.loose) {
            if var >= total {
                return Err(InvariantViolation::OutOfRange(var));
            }
            if seen[var] {
                return Err(InvariantViolation::Duplicate(var));
            }
            seen[var] = true;
        }
        if let Some(var) = seen.iter().position(|&s| !s) {
            return Err(InvariantViolation::Missing(var));
        }

        for (row, &variable) in self.loose.iter().enumerate() {
            if self.rows[row][variable] != 0.0 {
                return Err(InvariantViolation::SelfReference { row, variable });
            }
        }
        Ok(())
    }

    fn rhs_col(&self) -> usize {
        self.n + self.m
    }
}

/// Add `target[entering]` times `pivot_row` to `target`, then clear the
/// `entering` column.
fn eliminate(target: &mut [f64], pivot_row: &[f64], entering: usize) {
    let factor = target[entering];
    if factor != 0.0 {
        for (t, &p) in target.iter_mut().zip(pivot_row) {
            *t += factor * p;
        }
    }
    target[entering] = 0.0;
}

fn write_row(f: &mut fmt::Formatter<'_>, row: &[f64]) -> fmt::Result {
    let mut first = true;
    for x in row {
        if !first {
            write!(f, " ")?;
        }
        write!(f, "{x}")?;
        first = false;
    }
    writeln!(f)
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "objective: ")?;
        write_row(f, &self.objective)?;
        writeln!(f, "tight: {:?}", self.tight)?;
        writeln!(f, "loose: {:?}", self.loose)?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}
