use std::fmt;

/// Lifecycle of one batch run.
///
/// `Idle → Loading → Provisioning → Dispatching → Completed`; any non-terminal state may go to `Aborted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Loading,
    Provisioning,
    Dispatching,
    Completed,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted)
    }

    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle, Loading) | (Loading, Provisioning) | (Provisioning, Dispatching) => true,
            (Dispatching, Completed) => true,
            (from, Aborted) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Loading => "loading",
            RunState::Provisioning => "provisioning",
            RunState::Dispatching => "dispatching",
            RunState::Completed => "completed",
            RunState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}
