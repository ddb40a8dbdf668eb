//! External move solver

/// Cube solving algorithm
///
/// Treated as a pure function of the cube-state string. The returned move
/// string is opaque to the core.
pub trait Solver {
    /// Move string type
    type Output;
    /// Error type
    type Error;

    /// Solve a 54-symbol cube-state string
    ///
    /// # Arguments
    /// - `cube_state`: facelets in U, R, F, D, L, B face order
    /// - `candidate_limit`: maximum solution length the search accepts
    /// - `time_budget_s`: search time in seconds
    fn solve(
        &mut self,
        cube_state: &str,
        candidate_limit: u32,
        time_budget_s: u32,
    ) -> Result<Self::Output, Self::Error>;
}
