use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::budget::{BudgetStatus, BudgetVersion};
use crate::model::role::Role;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "kebab-case")]
pub enum BudgetAction {
    Submit,
    Approve,
    Reject,
    RequestChanges,
}

impl BudgetAction {
    /// Last path segment of the backend endpoint for this action.
    pub fn path_segment(&self) -> String {
        self.to_string()
    }

    /// Status a version ends up in after the action succeeds.
    pub fn target_status(&self) -> BudgetStatus {
        match self {
            BudgetAction::Submit => BudgetStatus::Submitted,
            BudgetAction::Approve => BudgetStatus::Approved,
            BudgetAction::Reject => BudgetStatus::Rejected,
            BudgetAction::RequestChanges => BudgetStatus::ChangesRequested,
        }
    }

    /// States the action may be taken from.
    fn allowed_from(&self, status: BudgetStatus) -> bool {
        match self {
            BudgetAction::Submit => matches!(status, BudgetStatus::Draft | BudgetStatus::ChangesRequested),
            BudgetAction::Approve | BudgetAction::Reject | BudgetAction::RequestChanges => {
                status == BudgetStatus::Submitted
            }
        }
    }
}

/// Who is looking at the version.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: u64,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denied {
    /// The role may not perform this action on this version
    Role,
    /// The version's current status does not allow the action
    State { status: BudgetStatus },
}

/// Checks one action against the version's status and the actor's role.
///
/// State is checked first: a terminal version reports `State` even to a user
/// who would lack the role anyway.
pub fn check_action(version: &BudgetVersion, actor: &Actor, action: BudgetAction) -> Result<(), Denied> {
    if !action.allowed_from(version.status) {
        return Err(Denied::State {
            status: version.status,
        });
    }

    let permitted = match action {
        BudgetAction::Submit => actor.role.is_approver() || version.created_by == Some(actor.user_id),
        BudgetAction::Approve | BudgetAction::Reject | BudgetAction::RequestChanges => actor.role.is_approver(),
    };

    if permitted { Ok(()) } else { Err(Denied::Role) }
}

/// Enabled workflow buttons for the actor.
pub fn allowed_actions(version: &BudgetVersion, actor: &Actor) -> Vec<BudgetAction> {
    BudgetAction::iter()
        .filter(|action| check_action(version, actor, *action).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(status: BudgetStatus, created_by: u64) -> BudgetVersion {
        BudgetVersion {
            id: 1,
            year: 2026,
            version_name: "Base".to_string(),
            status,
            created_by: Some(created_by),
            comment: None,
            created_at: None,
            updated_at: None,
        }
    }

    const AUTHOR: Actor = Actor {
        user_id: 10,
        role: Role::User,
    };
    const STRANGER: Actor = Actor {
        user_id: 11,
        role: Role::Accountant,
    };
    const MANAGER: Actor = Actor {
        user_id: 2,
        role: Role::Manager,
    };

    #[test]
    fn author_submits_own_draft() {
        let draft = version(BudgetStatus::Draft, 10);
        assert_eq!(allowed_actions(&draft, &AUTHOR), vec![BudgetAction::Submit]);
        assert_eq!(check_action(&draft, &STRANGER, BudgetAction::Submit), Err(Denied::Role));
        assert_eq!(allowed_actions(&draft, &MANAGER), vec![BudgetAction::Submit]);
    }

    #[test]
    fn submitted_version_is_decided_by_approvers_only() {
        let submitted = version(BudgetStatus::Submitted, 10);
        assert_eq!(
            allowed_actions(&submitted, &MANAGER),
            vec![BudgetAction::Approve, BudgetAction::Reject, BudgetAction::RequestChanges]
        );
        assert!(allowed_actions(&submitted, &AUTHOR).is_empty());
        assert_eq!(check_action(&submitted, &AUTHOR, BudgetAction::Approve), Err(Denied::Role));
    }

    #[test]
    fn changes_requested_can_be_resubmitted() {
        let returned = version(BudgetStatus::ChangesRequested, 10);
        assert_eq!(allowed_actions(&returned, &AUTHOR), vec![BudgetAction::Submit]);
        assert_eq!(BudgetAction::Submit.target_status(), BudgetStatus::Submitted);
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for status in [BudgetStatus::Approved, BudgetStatus::Rejected] {
            let v = version(status, 10);
            assert!(status.is_terminal());
            assert!(allowed_actions(&v, &MANAGER).is_empty());
            assert!(allowed_actions(&v, &AUTHOR).is_empty());
            assert_eq!(
                check_action(&v, &MANAGER, BudgetAction::Submit),
                Err(Denied::State { status })
            );
        }
    }

    #[test]
    fn approve_from_draft_is_a_state_error() {
        let draft = version(BudgetStatus::Draft, 10);
        assert_eq!(
            check_action(&draft, &MANAGER, BudgetAction::Approve),
            Err(Denied::State {
                status: BudgetStatus::Draft
            })
        );
    }

    #[test]
    fn path_segments_match_backend_routes() {
        assert_eq!(BudgetAction::Submit.path_segment(), "submit");
        assert_eq!(BudgetAction::RequestChanges.path_segment(), "request-changes");
        assert_eq!("request-changes".parse::<BudgetAction>().unwrap(), BudgetAction::RequestChanges);
    }
}
