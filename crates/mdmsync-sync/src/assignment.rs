//! Checkout reconciliation as a pure decision.

use mdmsync_snipeit::Assignee;

/// What to do with an asset's assignment given who the MDM says uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentAction {
    /// Already correct.
    Keep,
    /// Unassigned asset, device has a user.
    Assign(String),
    /// Device has no user; clear the assignment.
    Unassign,
    /// Assigned to someone else; check in, then out to this email.
    Reassign(String),
}

impl AssignmentAction {
    #[must_use]
    pub fn plan(current: Option<&Assignee>, intended: Option<&str>) -> Self {
        match (current, intended) {
            (None, Some(email)) => AssignmentAction::Assign(email.to_string()),
            (Some(_), None) => AssignmentAction::Unassign,
            (Some(assignee), Some(email)) if !assignee.matches_email(email) => {
                AssignmentAction::Reassign(email.to_string())
            }
            _ => AssignmentAction::Keep,
        }
    }
}
