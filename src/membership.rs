//! The membership state machine.
//!
//! A user's relationship to a community is exactly one of three states:
//! absent (no row), pending (row with a pending status), or member. The
//! functions here are pure transition decisions; applying an effect to the
//! store is the caller's job and happens in the same transaction that
//! re-read the row.

use crate::{
    actor::ActorContext,
    error::HubError,
    models::{Community, CommunityMember},
    status::{CommunityStatus, MembershipStatus},
};

/// A user's relationship to one community.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipState {
    /// No membership row exists.
    Absent,
    /// A join request is awaiting a decision.
    Pending,
    /// Full member.
    Member,
}

impl MembershipState {
    /// Derive the state from an optionally present membership row.
    #[must_use]
    pub fn from_row(row: Option<&CommunityMember>) -> Self {
        match row.map(|m| m.status) {
            None => Self::Absent,
            Some(MembershipStatus::Pending) => Self::Pending,
            Some(MembershipStatus::Member) => Self::Member,
        }
    }
}

/// Outcome of a join request or code redemption.
///
/// Repeat submissions are reported rather than rejected: the UI may
/// double-submit, so both entry points are idempotent by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    /// A fresh pending request was recorded.
    Requested,
    /// A pending request already existed; nothing changed.
    AlreadyRequested,
    /// The user became a member.
    Joined,
    /// The user was already a member; nothing changed.
    AlreadyMember,
}

/// Effect to apply to the membership row for a roster action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEffect {
    /// Promote the pending row to member.
    Promote,
    /// Delete the row.
    Remove,
}

/// Roster management actions available to a community's administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterAction {
    /// Accept a pending join request.
    Accept,
    /// Reject a pending join request.
    Reject,
    /// Remove an existing member.
    Kick,
}

/// Decide a plain join request against the current state.
///
/// # Errors
/// Returns [`HubError::Conflict`] when the community is not accepting
/// join requests (any status other than approved).
pub fn request_join_outcome(
    community: &Community,
    state: MembershipState,
) -> Result<JoinOutcome, HubError> {
    if community.status != CommunityStatus::Approved {
        return Err(HubError::conflict("community is not accepting join requests"));
    }
    Ok(match state {
        MembershipState::Absent => JoinOutcome::Requested,
        MembershipState::Pending => JoinOutcome::AlreadyRequested,
        MembershipState::Member => JoinOutcome::AlreadyMember,
    })
}

/// Decide a join-code redemption against the current state.
///
/// Redemption skips the pending step entirely: an absent user becomes a
/// member, and an existing pending request is upgraded.
///
/// # Errors
/// Returns [`HubError::Conflict`] when the community is not approved.
pub fn redeem_code_outcome(
    community: &Community,
    state: MembershipState,
) -> Result<JoinOutcome, HubError> {
    if community.status != CommunityStatus::Approved {
        return Err(HubError::conflict("community is not accepting members"));
    }
    Ok(match state {
        MembershipState::Absent | MembershipState::Pending => JoinOutcome::Joined,
        MembershipState::Member => JoinOutcome::AlreadyMember,
    })
}

/// Check that `actor` may perform `action` on the community's roster.
///
/// Accept and reject are open to the creator and to general admins. Kick
/// is creator-only: platform-wide moderation powers over content do not
/// extend to the membership roster of someone else's community.
///
/// # Errors
/// Returns [`HubError::Permission`] when the actor is not entitled to the
/// action.
pub fn authorize_roster_action(
    actor: &ActorContext,
    community: &Community,
    action: RosterAction,
) -> Result<(), HubError> {
    let is_creator = community.creator_id == actor.id;
    match action {
        RosterAction::Kick if !is_creator => Err(HubError::permission(
            "only the community creator can kick members",
        )),
        RosterAction::Accept | RosterAction::Reject
            if !is_creator && !actor.is_general_admin() =>
        {
            Err(HubError::permission(
                "only the community creator or a general admin can manage join requests",
            ))
        }
        _ => Ok(()),
    }
}

/// Decide the row effect of a roster action against the target's state.
///
/// # Errors
/// Returns [`HubError::Conflict`] when the target is the creator (who can
/// never be removed) or when the target's state does not admit the
/// transition, and [`HubError::NotFound`] when no row exists at all.
pub fn roster_transition(
    action: RosterAction,
    community: &Community,
    target_user_id: &str,
    state: MembershipState,
) -> Result<RosterEffect, HubError> {
    if target_user_id == community.creator_id {
        return Err(HubError::conflict(
            "the community creator cannot be removed from their own community",
        ));
    }
    match (action, state) {
        (_, MembershipState::Absent) => Err(HubError::NotFound("membership")),
        (RosterAction::Accept, MembershipState::Pending) => Ok(RosterEffect::Promote),
        (RosterAction::Accept, MembershipState::Member) => {
            Err(HubError::conflict("user is already a member"))
        }
        (RosterAction::Reject, MembershipState::Pending) => Ok(RosterEffect::Remove),
        (RosterAction::Reject, MembershipState::Member) => {
            Err(HubError::conflict("user is a member, not a pending applicant"))
        }
        (RosterAction::Kick, MembershipState::Member) => Ok(RosterEffect::Remove),
        (RosterAction::Kick, MembershipState::Pending) => {
            Err(HubError::conflict("user is a pending applicant, not a member"))
        }
    }
}

/// Check that `actor` may move a community out of its pending state.
///
/// Approval is final; a community that is no longer pending admits no
/// further status transitions.
///
/// # Errors
/// Returns [`HubError::Permission`] for non-admin actors and
/// [`HubError::Conflict`] when the community has already been decided.
pub fn authorize_community_review(
    actor: &ActorContext,
    community: &Community,
) -> Result<(), HubError> {
    if !actor.is_general_admin() {
        return Err(HubError::permission(
            "only a general admin can review communities",
        ));
    }
    if community.status != CommunityStatus::Pending {
        return Err(HubError::conflict("community has already been reviewed"));
    }
    Ok(())
}
