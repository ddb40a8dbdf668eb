//! Solve session
//!
//! Loads the cube, photographs and classifies it, asks the solver for the
//! moves and releases the cube. Whatever happens after the session starts,
//! a release is attempted before it ends.

use std::path::PathBuf;

use cubot_core::motion::{MotionController, MotionError};
use cubot_core::scan::{run_scan, SampleGrid, ScanError};
use cubot_core::state::{Event, FailureKind, State};
use cubot_core::traits::{ButtonInput, ServoOutput, Solver, StillCamera};
use embedded_hal::delay::DelayNs;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calibration::CalibrationLoadError;
use crate::camera::CameraError;
use crate::config::HostConfig;
use crate::images::{classify_dir, ImageError};
use crate::solver::SolverError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Calibration(#[from] CalibrationLoadError),

    #[error("cancelled")]
    Cancelled,

    #[error("servo command rejected: {0:?}")]
    Motion(MotionError),

    #[error("scan incomplete: {state} (face counts {counts:?})")]
    ScanIncomplete { state: String, counts: [u8; 6] },

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

impl From<MotionError> for SessionError {
    fn from(e: MotionError) -> Self {
        match e {
            MotionError::Cancelled => SessionError::Cancelled,
            other => SessionError::Motion(other),
        }
    }
}

impl From<ScanError<CameraError>> for SessionError {
    fn from(e: ScanError<CameraError>) -> Self {
        match e {
            ScanError::Motion(e) => e.into(),
            ScanError::Camera(e) => e.into(),
        }
    }
}

impl SessionError {
    /// State machine event for this failure
    pub fn event(&self) -> Event {
        match self {
            SessionError::Calibration(_) => Event::Fault(FailureKind::Calibration),
            SessionError::Cancelled => Event::Cancelled,
            SessionError::Motion(_) => Event::Fault(FailureKind::Motion),
            SessionError::ScanIncomplete { .. } => Event::Classified { success: false },
            SessionError::Camera(_) => Event::Fault(FailureKind::Camera),
            SessionError::Image(_) => Event::Fault(FailureKind::Image),
            SessionError::Solver(_) => Event::Fault(FailureKind::Solver),
        }
    }
}

/// Settings a session needs beyond its devices
#[derive(Debug, Clone)]
pub struct SolveSettings {
    pub image_dir: PathBuf,
    pub grid: SampleGrid,
    pub candidate_limit: u32,
    pub time_budget_s: u32,
}

impl From<&HostConfig> for SolveSettings {
    fn from(config: &HostConfig) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            grid: config.grid,
            candidate_limit: config.candidate_limit,
            time_budget_s: config.time_budget_s,
        }
    }
}

/// Result of a successful session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// 54-symbol cube state
    pub cube_state: String,
    /// Solver output
    pub moves: String,
}

pub struct SolveSession<S, B, D, C, V> {
    motion: MotionController<S, B, D>,
    camera: C,
    solver: V,
    settings: SolveSettings,
    state: State,
}

impl<S, B, D, C, V> SolveSession<S, B, D, C, V>
where
    S: ServoOutput,
    B: ButtonInput,
    D: DelayNs,
    C: StillCamera<Error = CameraError>,
    V: Solver<Output = String, Error = SolverError>,
{
    pub fn new(
        motion: MotionController<S, B, D>,
        camera: C,
        solver: V,
        settings: SolveSettings,
    ) -> Self {
        Self {
            motion,
            camera,
            solver,
            settings,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn motion(&self) -> &MotionController<S, B, D> {
        &self.motion
    }

    fn advance(&mut self, event: Event) {
        let next = self.state.transition(event);
        debug!(from = ?self.state, ?event, to = ?next, "session transition");
        self.state = next;
    }

    /// Run one session from load to release
    ///
    /// The outcome of a previous run is acknowledged first, so the same
    /// session can be run again.
    pub fn run(&mut self) -> Result<Solution, SessionError> {
        if self.state.is_terminal() {
            self.advance(Event::Acknowledge);
        }
        self.advance(Event::Start);

        let result = self.attempt();
        if let Err(e) = &result {
            warn!(error = %e, "session failed");
            self.advance(e.event());
        }

        if self.state.motion_allowed() {
            info!("releasing cube");
            if let Err(e) = self.motion.cube_release() {
                warn!(error = ?e, "cube release interrupted");
            }
            self.advance(Event::Released);
        }

        if self.state.is_failed() {
            warn!(state = ?self.state, "session ended early");
        } else {
            info!(state = ?self.state, "session finished");
        }

        result
    }

    fn attempt(&mut self) -> Result<Solution, SessionError> {
        info!("insert the cube and press Enter");
        self.motion.cube_load()?;
        self.advance(Event::CubeLoaded);

        let order = run_scan(&mut self.motion, &mut self.camera)?;
        debug!(?order, "faces captured");
        self.advance(Event::ScanCaptured);

        let classification = classify_dir(&self.settings.image_dir, &self.settings.grid)?;
        let cube_state = classification.as_str().to_string();
        info!(%cube_state, counts = ?classification.counts, "classified");
        if !classification.success {
            return Err(SessionError::ScanIncomplete {
                state: cube_state,
                counts: classification.counts,
            });
        }
        self.advance(Event::Classified { success: true });

        let moves = self.solver.solve(
            &cube_state,
            self.settings.candidate_limit,
            self.settings.time_budget_s,
        )?;
        self.advance(Event::Solved);

        Ok(Solution { cube_state, moves })
    }
}
