//! External move solver
//!
//! The solver is a separate program. It receives the cube-state string,
//! the candidate limit and the time budget as its last three arguments and
//! prints the move sequence on standard output.

use std::io;
use std::process::Command;

use cubot_core::traits::Solver;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("no solver command configured")]
    NotConfigured,

    #[error("failed to run solver `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("solver failed ({status}): {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("solver printed no moves")]
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct CommandSolver {
    /// Program followed by its fixed arguments
    command: Vec<String>,
}

impl CommandSolver {
    pub fn new(command: Option<&str>) -> Self {
        Self {
            command: command
                .map(|c| c.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
        }
    }
}

impl Solver for CommandSolver {
    type Output = String;
    type Error = SolverError;

    fn solve(
        &mut self,
        cube_state: &str,
        candidate_limit: u32,
        time_budget_s: u32,
    ) -> Result<String, SolverError> {
        let (program, fixed) = self
            .command
            .split_first()
            .ok_or(SolverError::NotConfigured)?;

        info!(cube_state, candidate_limit, time_budget_s, "solving");
        let output = Command::new(program)
            .args(fixed)
            .arg(cube_state)
            .arg(candidate_limit.to_string())
            .arg(time_budget_s.to_string())
            .output()
            .map_err(|source| SolverError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(SolverError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let moves = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if moves.is_empty() {
            return Err(SolverError::Empty);
        }
        debug!(%moves, "solved");
        Ok(moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

    #[test]
    fn test_not_configured() {
        let mut solver = CommandSolver::new(None);
        assert!(matches!(
            solver.solve(SOLVED, 100, 5),
            Err(SolverError::NotConfigured)
        ));
    }

    #[test]
    fn test_arguments_are_appended() {
        let mut solver = CommandSolver::new(Some("echo R2 U"));
        let moves = solver.solve(SOLVED, 100, 5).unwrap();
        assert_eq!(moves, format!("R2 U {SOLVED} 100 5"));
    }

    #[test]
    fn test_failing_solver() {
        let mut solver = CommandSolver::new(Some("false"));
        assert!(matches!(
            solver.solve(SOLVED, 100, 5),
            Err(SolverError::Failed { .. })
        ));
    }

    #[test]
    fn test_silent_solver() {
        let mut solver = CommandSolver::new(Some("true"));
        assert!(matches!(solver.solve(SOLVED, 100, 5), Err(SolverError::Empty)));
    }
}
