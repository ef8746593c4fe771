use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::enums::TurnState;

/// A patient's queued request to see a doctor; precursor to an appointment.
/// Patient attribution and state are server-assigned, never caller input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub state: TurnState,
}

impl Turn {
    pub fn accepted(&self) -> bool {
        matches!(self.state, TurnState::Accepted | TurnState::Consumed)
    }

    pub fn visited(&self) -> bool {
        self.state == TurnState::Consumed
    }
}

/// Turn creation input: the caller only names the doctor they want to see.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTurn {
    pub doctor_id: Uuid,
}

/// A transition was requested from a state that does not allow it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnStateError {
    #[error("turn not yet accepted")]
    NotYetAccepted,
    #[error("turn already accepted")]
    AlreadyAccepted,
    #[error("turn already has an appointment")]
    AlreadyVisited,
}

// TODO: there is no way out of `pending` except acceptance; declining a
// request needs a terminal `rejected` state and a doctor endpoint to set it.
impl TurnState {
    /// Doctor accepts a pending turn.
    pub fn accept(self) -> Result<TurnState, TurnStateError> {
        match self {
            TurnState::Pending => Ok(TurnState::Accepted),
            TurnState::Accepted => Err(TurnStateError::AlreadyAccepted),
            TurnState::Consumed => Err(TurnStateError::AlreadyVisited),
        }
    }

    /// Consume an accepted turn. Only appointment creation calls this, so
    /// `consumed` is set exactly once and never by any direct edit path.
    pub fn consume(self) -> Result<TurnState, TurnStateError> {
        match self {
            TurnState::Pending => Err(TurnStateError::NotYetAccepted),
            TurnState::Accepted => Ok(TurnState::Consumed),
            TurnState::Consumed => Err(TurnStateError::AlreadyVisited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_only_from_pending() {
        assert_eq!(TurnState::Pending.accept(), Ok(TurnState::Accepted));
        assert_eq!(
            TurnState::Accepted.accept(),
            Err(TurnStateError::AlreadyAccepted)
        );
        assert_eq!(
            TurnState::Consumed.accept(),
            Err(TurnStateError::AlreadyVisited)
        );
    }

    #[test]
    fn consume_only_from_accepted() {
        assert_eq!(
            TurnState::Pending.consume(),
            Err(TurnStateError::NotYetAccepted)
        );
        assert_eq!(TurnState::Accepted.consume(), Ok(TurnState::Consumed));
        assert_eq!(
            TurnState::Consumed.consume(),
            Err(TurnStateError::AlreadyVisited)
        );
    }

    #[test]
    fn derived_flags_match_state() {
        let mut turn = Turn {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            requested_at: Utc::now(),
            state: TurnState::Pending,
        };
        assert!(!turn.accepted());
        assert!(!turn.visited());

        turn.state = TurnState::Accepted;
        assert!(turn.accepted());
        assert!(!turn.visited());

        turn.state = TurnState::Consumed;
        assert!(turn.accepted());
        assert!(turn.visited());
    }

    #[test]
    fn error_messages_are_caller_facing() {
        assert_eq!(
            TurnStateError::NotYetAccepted.to_string(),
            "turn not yet accepted"
        );
        assert_eq!(
            TurnStateError::AlreadyVisited.to_string(),
            "turn already has an appointment"
        );
    }
}
