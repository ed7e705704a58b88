use tokio::task::JoinHandle;

use askvote_core::models::button::ButtonState;

use crate::error::VoteError;
use crate::page::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
}

impl ClickEvent {
    pub fn on(target: NodeId) -> Self {
        Self { target }
    }
}

/// Final result of a dispatched vote: the highlighting that was applied.
pub type VoteResult = Result<ButtonState, VoteError>;

#[derive(Debug)]
pub enum ClickOutcome {
    /// Not a vote control; the click keeps its default action.
    Ignored,
    /// Vote control is disabled, nothing sent.
    Disabled,
    /// Stopped before sending; the user has been alerted.
    Aborted(VoteError),
    /// Request in flight.
    Dispatched(JoinHandle<VoteResult>),
}

impl ClickOutcome {
    pub fn default_prevented(&self) -> bool {
        !matches!(self, ClickOutcome::Ignored)
    }
}
