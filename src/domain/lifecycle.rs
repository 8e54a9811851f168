//! Campaign lifecycle state machine.
//!
//! [`TRANSITIONS`] is the only place that states which status changes exist.
//! Everything that writes `status` goes through [`request_transition`].

use std::collections::HashSet;

use super::error::DomainError;
use super::types::CampaignStatus;

/// Adjacency table: state followed by the states it may move to.
pub static TRANSITIONS: [(CampaignStatus, &[CampaignStatus]); 5] = [
    (CampaignStatus::Draft, &[CampaignStatus::Published]),
    (
        CampaignStatus::Published,
        &[CampaignStatus::Active, CampaignStatus::Archived],
    ),
    (
        CampaignStatus::Active,
        &[CampaignStatus::Completed, CampaignStatus::Archived],
    ),
    (CampaignStatus::Completed, &[CampaignStatus::Archived]),
    (CampaignStatus::Archived, &[]),
];

/// States with no way out.
pub const TERMINAL_STATES: [CampaignStatus; 1] = [CampaignStatus::Archived];

pub fn allowed_targets(current: CampaignStatus) -> &'static [CampaignStatus] {
    TRANSITIONS
        .iter()
        .find(|(state, _)| *state == current)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

pub fn is_terminal(status: CampaignStatus) -> bool {
    TERMINAL_STATES.contains(&status)
}

/// Validate a status change against the adjacency table.
pub fn request_transition(
    current: CampaignStatus,
    target: CampaignStatus,
) -> Result<CampaignStatus, DomainError> {
    if allowed_targets(current).contains(&target) {
        Ok(target)
    } else {
        Err(DomainError::InvalidTransition {
            from: current,
            to: target,
        })
    }
}

/// Startup check that the adjacency table is complete and well formed.
pub fn verify_transition_table() -> Result<(), DomainError> {
    let mut seen = HashSet::new();

    for (state, targets) in TRANSITIONS.iter() {
        if !seen.insert(*state) {
            return Err(DomainError::invariant(format!(
                "state `{state}` appears more than once in the transition table"
            )));
        }

        if targets.contains(state) {
            return Err(DomainError::invariant(format!(
                "state `{state}` lists itself as a target"
            )));
        }

        match (is_terminal(*state), targets.is_empty()) {
            (true, false) => {
                return Err(DomainError::invariant(format!(
                    "terminal state `{state}` has outgoing transitions"
                )));
            }
            (false, true) => {
                return Err(DomainError::invariant(format!(
                    "non-terminal state `{state}` has no outgoing transitions"
                )));
            }
            _ => {}
        }
    }

    if let Some(missing) = CampaignStatus::ALL
        .into_iter()
        .find(|state| !seen.contains(state))
    {
        return Err(DomainError::invariant(format!(
            "state `{missing}` is missing from the transition table"
        )));
    }

    Ok(())
}
