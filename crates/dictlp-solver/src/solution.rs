use crate::dictionary::Dictionary;
use crate::problem::LpProblem;
use crate::simplex::Outcome;

/// The result of solving an LP problem
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Values of the decision variables in the final basic solution
    pub values: Vec<f64>,
    /// Values of the slack variables, one per constraint
    pub slacks: Vec<f64>,
    /// Optimal objective value, only present when `status` is `Optimal`
    pub objective_value: Option<f64>,
    /// Number of pivots performed
    pub iterations: usize,
    /// Detailed analysis (empty unless optimal)
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The objective can grow without limit
    Unbounded,
    /// The iteration cap was reached before an optimum was found
    IterationLimit,
}

/// Detailed analysis of the optimal solution
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint
    /// Indicates how much the objective would change per unit relaxation
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable
    /// For non-basic variables, indicates how much the objective coefficient
    /// must grow before the variable enters the solution
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (slack is zero) at optimum
    pub binding_constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
    /// Interpretation
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Objective-row coefficient, zero for basic variables
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

impl Solution {
    pub(crate) fn extract(
        dictionary: &Dictionary,
        problem: &LpProblem,
        outcome: Outcome,
        tolerance: f64,
    ) -> Self {
        let n = dictionary.num_variables();
        let mut values = dictionary.values();
        let slacks = values.split_off(n);

        let (status, objective_value, analysis) = match outcome {
            Outcome::Optimal { .. } => (
                SolutionStatus::Optimal,
                Some(dictionary.objective()),
                analyze(dictionary, problem, &values, &slacks, tolerance),
            ),
            Outcome::Unbounded { .. } => (SolutionStatus::Unbounded, None, Analysis::default()),
            Outcome::IterationLimit { .. } => {
                (SolutionStatus::IterationLimit, None, Analysis::default())
            }
        };

        Self {
            status,
            values,
            slacks,
            objective_value,
            iterations: outcome.iterations(),
            analysis,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

fn analyze(
    dictionary: &Dictionary,
    problem: &LpProblem,
    values: &[f64],
    slacks: &[f64],
    tolerance: f64,
) -> Analysis {
    let n = dictionary.num_variables();
    let row = dictionary.objective_row();

    // Shadow prices: negated objective-row entries of tight slacks
    let shadow_prices: Vec<ShadowPrice> = problem
        .constraints
        .iter()
        .enumerate()
        .map(|(i, constraint)| {
            let slack = n + i;
            let value = if dictionary.is_tight(slack) { -row[slack] } else { 0.0 };
            let interpretation = if value.abs() <= tolerance {
                "Non-binding constraint".to_string()
            } else {
                format!("Increasing RHS by 1 unit would increase the objective by {:.4}", value)
            };
            ShadowPrice {
                constraint: constraint.name.clone(),
                value,
                interpretation,
            }
        })
        .collect();

    let reduced_costs = problem
        .variables
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let is_basic = !dictionary.is_tight(j);
            ReducedCost {
                variable: name.clone(),
                value: values[j],
                reduced_cost: if is_basic { 0.0 } else { row[j] },
                is_basic,
            }
        })
        .collect();

    let binding_constraints = problem
        .constraints
        .iter()
        .zip(slacks)
        .filter(|(_, slack)| slack.abs() <= tolerance)
        .map(|(c, _)| c.name.clone())
        .collect();

    Analysis {
        shadow_prices,
        reduced_costs,
        binding_constraints,
    }
}
