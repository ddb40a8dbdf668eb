//! State machine definition

use super::events::Event;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for a session to start
    Idle,
    /// Tables centered, grips at load, waiting for the cube
    Loading,
    /// Photographing the faces
    Scanning,
    /// Sampling and labeling the photographs
    Classifying,
    /// Waiting on the external solver
    Solving,
    /// Letting go of the cube; `failure` is the outcome once released
    Releasing { failure: Option<FailureKind> },
    /// Session finished and the cube released
    Complete,
    /// Session ended early
    Failed(FailureKind),
}

/// Why a session ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureKind {
    /// Calibration missing or invalid
    Calibration,
    /// User aborted during motion
    Cancelled,
    /// A servo command did not fit its actuator
    Motion,
    /// Some face did not get exactly nine cells
    ScanIncomplete,
    /// Still capture failed
    Camera,
    /// A captured image could not be read or sampled
    Image,
    /// Solver failed or is not configured
    Solver,
}

impl State {
    /// Check if servos may move in this state
    pub fn motion_allowed(&self) -> bool {
        matches!(
            self,
            State::Loading | State::Scanning | State::Releasing { .. }
        )
    }

    /// Check if this is a failure state
    pub fn is_failed(&self) -> bool {
        matches!(self, State::Failed(_))
    }

    /// Check if this is a terminal state requiring user action
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Complete | State::Failed(_))
    }

    /// Process an event and return the next state
    ///
    /// Any failure once the cube may be held goes through `Releasing`, so
    /// the cube is always let go before the session ends.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Idle transitions
            (Idle, Start) => Loading,
            (Idle, Fault(kind)) => Failed(kind),

            // Forward progress
            (Loading, CubeLoaded) => Scanning,
            (Scanning, ScanCaptured) => Classifying,
            (Classifying, Classified { success: true }) => Solving,
            (Classifying, Classified { success: false }) => Releasing {
                failure: Some(FailureKind::ScanIncomplete),
            },
            (Solving, Solved) => Releasing { failure: None },

            // Failures while the cube may be held
            (Loading | Scanning | Classifying | Solving, Cancelled) => Releasing {
                failure: Some(FailureKind::Cancelled),
            },
            (Loading | Scanning | Classifying | Solving, Fault(kind)) => Releasing {
                failure: Some(kind),
            },

            // Release is best effort; the outcome was decided on entry
            (Releasing { failure }, Released | Cancelled | Fault(_)) => match failure {
                Some(kind) => Failed(kind),
                None => Complete,
            },

            // Terminal transitions
            (Complete | Failed(_), Acknowledge) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: &[Event]) -> State {
        events
            .iter()
            .fold(State::Idle, |state, event| state.transition(*event))
    }

    #[test]
    fn test_successful_session() {
        let state = run(&[
            Event::Start,
            Event::CubeLoaded,
            Event::ScanCaptured,
            Event::Classified { success: true },
            Event::Solved,
        ]);
        assert_eq!(state, State::Releasing { failure: None });
        assert_eq!(state.transition(Event::Released), State::Complete);
    }

    #[test]
    fn test_incomplete_scan_skips_solver() {
        let state = run(&[
            Event::Start,
            Event::CubeLoaded,
            Event::ScanCaptured,
            Event::Classified { success: false },
        ]);
        assert_eq!(
            state,
            State::Releasing {
                failure: Some(FailureKind::ScanIncomplete)
            }
        );
        assert_eq!(
            state.transition(Event::Released),
            State::Failed(FailureKind::ScanIncomplete)
        );
    }

    #[test]
    fn test_cancel_from_any_active_state_releases() {
        let states = [
            State::Loading,
            State::Scanning,
            State::Classifying,
            State::Solving,
        ];

        for state in states {
            let next = state.transition(Event::Cancelled);
            assert_eq!(
                next,
                State::Releasing {
                    failure: Some(FailureKind::Cancelled)
                }
            );
            assert_eq!(
                next.transition(Event::Released),
                State::Failed(FailureKind::Cancelled)
            );
        }
    }

    #[test]
    fn test_fault_before_start_fails_directly() {
        let next = State::Idle.transition(Event::Fault(FailureKind::Calibration));
        assert_eq!(next, State::Failed(FailureKind::Calibration));
    }

    #[test]
    fn test_failed_release_keeps_outcome() {
        let releasing = State::Releasing {
            failure: Some(FailureKind::Camera),
        };
        assert_eq!(
            releasing.transition(Event::Cancelled),
            State::Failed(FailureKind::Camera)
        );
        assert_eq!(
            State::Releasing { failure: None }.transition(Event::Fault(FailureKind::Cancelled)),
            State::Complete
        );
    }

    #[test]
    fn test_acknowledge_returns_to_idle() {
        assert_eq!(State::Complete.transition(Event::Acknowledge), State::Idle);
        assert_eq!(
            State::Failed(FailureKind::Solver).transition(Event::Acknowledge),
            State::Idle
        );
    }

    #[test]
    fn test_unexpected_events_are_ignored() {
        assert_eq!(State::Idle.transition(Event::Solved), State::Idle);
        assert_eq!(State::Scanning.transition(Event::Start), State::Scanning);
        assert_eq!(State::Complete.transition(Event::Cancelled), State::Complete);
    }

    #[test]
    fn test_motion_allowed() {
        assert!(State::Loading.motion_allowed());
        assert!(State::Scanning.motion_allowed());
        assert!(State::Releasing { failure: None }.motion_allowed());
        assert!(!State::Solving.motion_allowed());
        assert!(!State::Idle.motion_allowed());
    }

    #[test]
    fn test_terminal_states() {
        assert!(State::Complete.is_terminal());
        assert!(State::Failed(FailureKind::Image).is_terminal());
        assert!(State::Failed(FailureKind::Image).is_failed());
        assert!(!State::Solving.is_terminal());
    }
}
