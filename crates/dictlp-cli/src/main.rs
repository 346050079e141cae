use clap::{ArgAction, Parser, Subcommand};
use dictlp_solver::{LpProblem, ProblemError, Solver, SolutionStatus};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "dictlp")]
#[command(about = "Solve small dense linear programs with the dictionary simplex method", long_about = None)]
struct Cli {
    /// Log solver progress to stderr (-v info, -vv pivots, -vvv full dictionaries)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem file and output the optimal solution
    Solve {
        /// JSON file describing the problem
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
        /// Show detailed analysis
        #[arg(short, long)]
        analysis: bool,
        /// Maximum number of pivots
        #[arg(long, default_value_t = 10000)]
        max_iterations: usize,
        /// Tolerance for floating point comparisons
        #[arg(long, default_value_t = 1e-9)]
        tolerance: f64,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Solve the built-in reference problems
    Demo,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let level = match cli.verbose {
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to set tracing subscriber: {}", e);
            std::process::exit(1);
        }
    }

    match cli.command {
        Commands::Solve {
            file,
            format,
            analysis,
            max_iterations,
            tolerance,
        } => {
            let problem = match load_problem(&file) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            };

            let solver = Solver::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance);
            let solution = match solver.solve(&problem) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Invalid problem: {}", e);
                    std::process::exit(1);
                }
            };
            tracing::info!(status = ?solution.status, iterations = solution.iterations, "solved");

            if format == "json" {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing solution: {}", e);
                        std::process::exit(1);
                    }
                }
                if !solution.is_optimal() {
                    std::process::exit(1);
                }
                return;
            }

            match solution.status {
                SolutionStatus::Optimal => {
                    println!("Status: OPTIMAL");
                    if let Some(objective) = solution.objective_value {
                        println!("Objective: {:.4}", objective);
                    }
                    println!("Pivots: {}", solution.iterations);
                    println!();
                    println!("Variables:");
                    for (name, value) in problem.variables.iter().zip(&solution.values) {
                        if value.abs() > 0.001 {
                            println!("  {:20} {:12.4}", name, value);
                        }
                    }

                    if analysis {
                        println!();
                        println!("Analysis:");
                        println!();

                        if !solution.analysis.binding_constraints.is_empty() {
                            println!("Binding constraints:");
                            for name in &solution.analysis.binding_constraints {
                                println!("  - {}", name);
                            }
                            println!();
                        }

                        println!("Shadow prices:");
                        for sp in &solution.analysis.shadow_prices {
                            if sp.value.abs() > 0.001 {
                                println!("  {:30} {:10.4}", sp.constraint, sp.value);
                                println!("    {}", sp.interpretation);
                            }
                        }
                        println!();

                        println!("Reduced costs (variables not in solution):");
                        for rc in &solution.analysis.reduced_costs {
                            if !rc.is_basic && rc.reduced_cost.abs() > 0.001 {
                                println!(
                                    "  {:20} coefficient must increase by {:.4} to enter solution",
                                    rc.variable, -rc.reduced_cost
                                );
                            }
                        }
                    }
                }
                SolutionStatus::Unbounded => {
                    println!("Status: UNBOUNDED");
                    println!("The objective can increase without limit.");
                    std::process::exit(1);
                }
                SolutionStatus::IterationLimit => {
                    println!("Status: ITERATION LIMIT");
                    println!("No optimum found within {} pivots.", solution.iterations);
                    std::process::exit(1);
                }
            }
        }
        Commands::Check { file } => {
            let problem = match load_problem(&file) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("✗ {}", e);
                    std::process::exit(1);
                }
            };

            match dictlp_solver::Dictionary::from_problem(&problem) {
                Ok(_) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", problem.num_variables());
                    println!("  {} constraints", problem.num_constraints());
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Demo => {
            let problems = match demo_problems() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Invalid demo problem: {}", e);
                    std::process::exit(1);
                }
            };
            let solver = Solver::new();
            for (name, problem) in problems {
                match solver.solve(&problem) {
                    Ok(solution) => match solution.objective_value {
                        Some(objective) => println!("{}: {}", name, objective),
                        None => println!("{}: {:?}", name, solution.status),
                    },
                    Err(e) => {
                        eprintln!("{}: {}", name, e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
}

fn load_problem(file: &Path) -> Result<LpProblem, String> {
    let source =
        std::fs::read_to_string(file).map_err(|e| format!("Error reading file: {}", e))?;
    parse_problem(&source)
}

fn parse_problem(source: &str) -> Result<LpProblem, String> {
    serde_json::from_str(source).map_err(|e| format!("Parse error: {}", e))
}

fn demo_problems() -> Result<Vec<(&'static str, LpProblem)>, ProblemError> {
    Ok(vec![
        (
            "production mix",
            LpProblem::from_dense(
                vec![1.2, 1.7],
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
                vec![3000.0, 4000.0, 5000.0],
            )?,
        ),
        (
            "three variables",
            LpProblem::from_dense(
                vec![5.0, 4.0, 3.0],
                vec![vec![2.0, 3.0, 1.0], vec![4.0, 1.0, 2.0], vec![3.0, 4.0, 2.0]],
                vec![5.0, 11.0, 8.0],
            )?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_problem_file() {
        let source = r#"{
            "variables": ["x", "y"],
            "objective": [3.0, 2.0],
            "constraints": [
                { "name": "sum", "coefficients": [1.0, 1.0], "rhs": 4.0 },
                { "name": "x_max", "coefficients": [1.0, 0.0], "rhs": 3.0 }
            ]
        }"#;

        let problem = parse_problem(source).unwrap();
        assert_eq!(problem.num_variables(), 2);
        assert_eq!(problem.constraints[1].name, "x_max");

        let solution = Solver::new().solve(&problem).unwrap();
        let obj = solution.objective_value.unwrap();
        assert!((obj - 11.0).abs() < 1e-6, "obj = {} (expected 11)", obj);
    }

    #[test]
    fn test_parse_defaults_missing_constraints() {
        let problem = parse_problem(r#"{ "variables": [] }"#).unwrap();
        assert!(problem.objective.is_empty());
        assert!(problem.constraints.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_problem(r#"{ "objective": [1.0] }"#).unwrap_err();
        assert!(err.starts_with("Parse error"), "{}", err);
    }

    #[test]
    fn test_solution_json_status() {
        let problem = LpProblem::from_dense(vec![1.0], vec![vec![-1.0]], vec![1.0]).unwrap();
        let solution = Solver::new().solve(&problem).unwrap();
        let json: serde_json::Value = serde_json::to_value(&solution).unwrap();
        assert_eq!(json["status"], "Unbounded");
        assert!(json["objective_value"].is_null());
    }

    #[test]
    fn test_demo_problems() {
        let expected = [8000.0, 13.0];
        for ((name, problem), want) in demo_problems().unwrap().into_iter().zip(expected) {
            let solution = Solver::new().solve(&problem).unwrap();
            let obj = solution.objective_value.unwrap();
            assert!((obj - want).abs() < 1e-3, "{}: obj = {} (expected {})", name, obj, want);
        }
    }
}
