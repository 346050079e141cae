use crate::dictionary::ProblemError;

/// A linear program in the form: maximize `objective · x` subject to
/// `coefficients · x <= rhs` for every constraint, with `x >= 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LpProblem {
    /// Variable names
    pub variables: Vec<String>,
    /// Objective function coefficients, one per variable
    #[cfg_attr(feature = "serde", serde(default))]
    pub objective: Vec<f64>,
    /// Constraints
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Right-hand side value, must be non-negative
    pub rhs: f64,
}

impl LpProblem {
    pub fn new(variables: Vec<String>) -> Self {
        let n = variables.len();
        Self {
            variables,
            objective: vec![0.0; n],
            constraints: Vec::new(),
        }
    }

    /// Build a problem from dense data, naming variables `x1..xn` and
    /// constraints `c1..cm`. `matrix` and `rhs` must have one entry per
    /// constraint.
    pub fn from_dense(
        objective: Vec<f64>,
        matrix: Vec<Vec<f64>>,
        rhs: Vec<f64>,
    ) -> Result<Self, ProblemError> {
        if matrix.len() != rhs.len() {
            return Err(ProblemError::DimensionMismatch {
                what: "right-hand side".to_string(),
                expected: matrix.len(),
                found: rhs.len(),
            });
        }
        let variables = (1..=objective.len()).map(|j| format!("x{j}")).collect();
        let constraints = matrix
            .into_iter()
            .zip(rhs)
            .enumerate()
            .map(|(i, (coefficients, rhs))| Constraint {
                name: format!("c{}", i + 1),
                coefficients,
                rhs,
            })
            .collect();
        Ok(Self {
            variables,
            objective,
            constraints,
        })
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>) {
        self.objective = coefficients;
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dense_names() {
        let problem = LpProblem::from_dense(
            vec![1.2, 1.7],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            vec![3000.0, 4000.0, 5000.0],
        )
        .unwrap();

        assert_eq!(problem.variables, vec!["x1", "x2"]);
        assert_eq!(problem.num_constraints(), 3);
        assert_eq!(problem.constraints[2].name, "c3");
        assert_eq!(problem.constraints[2].coefficients, vec![1.0, 1.0]);
        assert_eq!(problem.constraints[2].rhs, 5000.0);
    }

    #[test]
    fn test_from_dense_rejects_mismatched_rhs() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];

        let err = LpProblem::from_dense(vec![1.2, 1.7], rows.clone(), vec![3000.0, 4000.0])
            .unwrap_err();
        assert_eq!(
            err,
            ProblemError::DimensionMismatch {
                what: "right-hand side".to_string(),
                expected: 3,
                found: 2,
            }
        );

        let err = LpProblem::from_dense(vec![1.2, 1.7], rows[..1].to_vec(), vec![1.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            ProblemError::DimensionMismatch { expected: 1, found: 2, .. }
        ));
    }

    #[test]
    fn test_new_has_zero_objective() {
        let mut problem = LpProblem::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(problem.objective, vec![0.0, 0.0]);

        problem.add_constraint("cap", vec![1.0, 1.0], 4.0);
        assert_eq!(problem.num_variables(), 2);
        assert_eq!(problem.num_constraints(), 1);
    }
}
